//! Builds the minimal render-ready table out of a resolution.

use log::debug;
use polars::prelude::DataFrame;

use crate::dataset::Dataset;
use crate::error::IdebmapError;
use crate::regions;
use crate::resolve::{Resolution, ResolvedColumns};
use crate::COL;

/// Outcome of a projection request. `NoChange` propagates the no-op for
/// unpublished years; the caller keeps its last rendered view.
#[derive(Debug, Clone)]
pub enum Projection {
    NoChange,
    View(FilteredView),
}

impl Projection {
    pub fn view(&self) -> Option<&FilteredView> {
        match self {
            Projection::View(view) => Some(view),
            Projection::NoChange => None,
        }
    }
}

/// The render-ready table: identifier columns plus the resolved metric
/// columns, aggregate rows removed, region names replaced by canonical
/// codes. Rebuilt per request, never mutated in place. The renderer treats
/// rows as opaque; the last column is the color metric.
#[derive(Debug, Clone)]
pub struct FilteredView {
    frame: DataFrame,
    columns: ResolvedColumns,
}

impl FilteredView {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn columns(&self) -> &ResolvedColumns {
        &self.columns
    }

    /// The designated color metric (last column), absent on an
    /// identifiers-only view.
    pub fn primary_metric(&self) -> Option<&str> {
        self.columns.primary_metric()
    }

    /// Up to two annotation metrics preceding the primary one.
    pub fn secondary_metrics(&self) -> Vec<&str> {
        self.columns.secondary_metrics()
    }

    /// Canonical codes of every row, in row order.
    pub fn region_codes(&self) -> Result<Vec<String>, IdebmapError> {
        Ok(self
            .frame
            .column(COL::REGION)?
            .str()?
            .into_no_null_iter()
            .map(str::to_string)
            .collect())
    }
}

/// Project the dataset down to the resolved columns and normalise the
/// result. A `NoDataForYear` resolution projects to `Projection::NoChange`.
pub fn project(dataset: &Dataset, resolution: &Resolution) -> Result<Projection, IdebmapError> {
    let resolved = match resolution {
        Resolution::NoDataForYear => return Ok(Projection::NoChange),
        Resolution::Resolved(resolved) => resolved,
    };
    let selected = dataset.frame().select(resolved.names())?;
    let frame = regions::normalize(&selected)?;
    debug!(
        "projected {} columns over {} regions for year {}",
        frame.width(),
        frame.height(),
        resolved.year,
    );
    Ok(Projection::View(FilteredView {
        frame,
        columns: resolved.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use polars::df;

    use crate::dataset::MetricFamily;
    use crate::resolve::resolve_columns;

    use super::*;

    fn test_dataset() -> Dataset {
        Dataset::from_dataframe(
            df!(
                "Regiao" => &["São Paulo", "Rio de Janeiro", "Sudeste"],
                "Rede" => &["Estadual", "Estadual", "Pública"],
                "6º_TxAp2005" => &[95.2, 93.0, 94.1],
                "Nota Média Padronizada (N)_saeb2005" => &[5.4, 5.1, 5.2],
            )
            .unwrap(),
        )
    }

    #[test]
    fn score_projection_should_match_the_render_contract() -> anyhow::Result<()> {
        let dataset = test_dataset();
        let resolution = resolve_columns(&dataset, "2005", MetricFamily::Score)?;
        let projection = project(&dataset, &resolution)?;
        let view = projection.view().expect("2005 is a published year");

        // Aggregate row gone, names replaced by codes
        assert_eq!(view.region_codes()?, vec!["SP", "RJ"]);
        // Approval columns excluded for the score family
        assert_eq!(
            view.primary_metric(),
            Some("Nota Média Padronizada (N)_saeb2005")
        );
        let primary = view
            .frame()
            .column("Nota Média Padronizada (N)_saeb2005")?
            .f64()?;
        assert_eq!(primary.get(0), Some(5.4));
        assert!(view.frame().column("6º_TxAp2005").is_err());
        Ok(())
    }

    #[test]
    fn aggregate_regions_should_never_appear_in_output() -> anyhow::Result<()> {
        let dataset = test_dataset();
        let resolution = resolve_columns(&dataset, "2005", MetricFamily::Approval)?;
        let view = project(&dataset, &resolution)?
            .view()
            .cloned()
            .expect("published year");
        for code in view.region_codes()? {
            assert!(
                !crate::regions::is_aggregate(&code),
                "aggregate {code} leaked into the projection"
            );
        }
        Ok(())
    }

    #[test]
    fn unpublished_years_should_project_to_no_change() -> anyhow::Result<()> {
        let dataset = test_dataset();
        let resolution = resolve_columns(&dataset, "2006", MetricFamily::Score)?;
        let projection = project(&dataset, &resolution)?;
        assert!(projection.view().is_none());
        Ok(())
    }

    #[test]
    fn identifiers_only_resolution_should_still_project() -> anyhow::Result<()> {
        let dataset = test_dataset();
        // 2013 is published but absent from the test frame
        let resolution = resolve_columns(&dataset, "2013", MetricFamily::Score)?;
        let view = project(&dataset, &resolution)?
            .view()
            .cloned()
            .expect("identifiers-only is a valid view, not a failure");
        assert_eq!(view.frame().width(), 2);
        assert_eq!(view.primary_metric(), None);
        assert!(view.secondary_metrics().is_empty());
        Ok(())
    }
}
