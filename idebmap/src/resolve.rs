//! Types and functions to resolve which dataset columns a year selects.

use std::collections::HashMap;

use log::debug;
use nonempty::{nonempty, NonEmpty};
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, MetricFamily};
use crate::error::IdebmapError;
use crate::COL;

/// The biennial years for which the source release publishes data. Anything
/// else (even years included) resolves to [`Resolution::NoDataForYear`].
pub const SUPPORTED_YEARS: [u16; 8] = [2005, 2007, 2009, 2011, 2013, 2015, 2017, 2019];

/// Parse a year token. Tokens longer than four characters are truncated to
/// the first four, so a full date-picker string such as "2005-01-01"
/// resolves exactly like "2005". An unparseable remainder is an
/// [`IdebmapError::InvalidYear`].
pub fn parse_year(token: &str) -> Result<u16, IdebmapError> {
    let year: String = token.chars().take(4).collect();
    year.parse::<u16>()
        .map_err(|_| IdebmapError::InvalidYear(token.to_string()))
}

/// Outcome of a column resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// The year is outside the published set. This is a defined no-op, not a
    /// failure: callers must keep whatever view they last rendered rather
    /// than render an empty table.
    NoDataForYear,
    Resolved(ResolvedColumns),
}

impl Resolution {
    pub fn resolved(&self) -> Option<&ResolvedColumns> {
        match self {
            Resolution::Resolved(resolved) => Some(resolved),
            Resolution::NoDataForYear => None,
        }
    }
}

/// An ordered column selection: the two identifier columns first, then the
/// accepted metric columns in the dataset's declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    pub year: u16,
    pub family: MetricFamily,
    columns: NonEmpty<String>,
}

impl ResolvedColumns {
    /// All column names in render order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    /// The metric columns beyond the identifiers, possibly empty.
    pub fn metric_columns(&self) -> &[String] {
        &self.columns.tail[COL::IDENTIFIERS.len() - 1..]
    }

    /// The designated primary/color metric: the last resolved column.
    pub fn primary_metric(&self) -> Option<&str> {
        self.metric_columns().last().map(String::as_str)
    }

    /// Up to two annotation metrics immediately preceding the primary one.
    /// Sparse resolutions yield fewer (or none).
    pub fn secondary_metrics(&self) -> Vec<&str> {
        let metrics = self.metric_columns();
        let end = metrics.len().saturating_sub(1);
        let start = end.saturating_sub(2);
        metrics[start..end].iter().map(String::as_str).collect()
    }

    pub fn is_identifiers_only(&self) -> bool {
        self.metric_columns().is_empty()
    }
}

/// Resolve the dataset columns relevant to `token` for the requested metric
/// family. Identifier columns are always prepended; candidates from the
/// other family and auxiliary columns are rejected. Deterministic: the
/// output order is the dataset's declared column order.
pub fn resolve_columns(
    dataset: &Dataset,
    token: &str,
    family: MetricFamily,
) -> Result<Resolution, IdebmapError> {
    let year = parse_year(token)?;
    if !SUPPORTED_YEARS.contains(&year) {
        debug!("no data published for year {year}, propagating no-op");
        return Ok(Resolution::NoDataForYear);
    }
    let mut columns = nonempty![COL::REGION.to_string(), COL::NETWORK.to_string()];
    for meta in dataset.columns() {
        if meta.year == Some(year) && meta.kind.family() == Some(family) {
            columns.push(meta.name.clone());
        }
    }
    if columns.len() == COL::IDENTIFIERS.len() {
        debug!("no {family} columns matched year {year}, resolution is identifiers-only");
    }
    Ok(Resolution::Resolved(ResolvedColumns {
        year,
        family,
        columns,
    }))
}

/// Memoises resolutions keyed by (year, family). Resolution is a pure
/// function of the immutable dataset, so entries never go stale for the
/// dataset they were built from.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<(u16, MetricFamily), Resolution>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve through the cache. Parse failures are surfaced without being
    /// cached; no-op sentinels are cached like any other resolution.
    pub fn resolve(
        &mut self,
        dataset: &Dataset,
        token: &str,
        family: MetricFamily,
    ) -> Result<Resolution, IdebmapError> {
        let year = parse_year(token)?;
        if let Some(hit) = self.entries.get(&(year, family)) {
            debug!("resolution cache hit for ({year}, {family})");
            return Ok(hit.clone());
        }
        let resolution = resolve_columns(dataset, &year.to_string(), family)?;
        self.entries.insert((year, family), resolution.clone());
        Ok(resolution)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
