//! The in-memory wide IDEB table, plus the structured metadata parsed from
//! its column headers.
//!
//! Header classification runs exactly once, at load time: every column gets a
//! [`ColumnMeta`] with its kind, year and grade, and resolution afterwards is
//! a typed lookup rather than a substring scan over raw header text.

use std::path::Path;
use std::sync::OnceLock;

use itertools::Itertools;
use log::{debug, info};
use polars::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::IdebmapError;
use crate::COL;

/// Header fragment identifying approval-rate columns ("Taxa de Aprovação").
pub const APPROVAL_MARKER: &str = "TxAp";

/// Header fragments identifying standardized-score columns.
pub const SCORE_MARKERS: [&str; 2] = ["Nota Média Padronizada", "saeb"];

/// Header fragment identifying the composite IDEB index columns.
pub const IDEB_MARKER: &str = "IDEB";

/// Header fragments of non-metric columns that no resolution may return:
/// the yield indicator, the per-subject score breakdowns, and the `_p`
/// variant columns. Fixed at build time.
pub const AUXILIARY_MARKERS: [&str; 4] = [
    "Indicador de Rendimento",
    "Matemática",
    "Língua Portuguesa",
    "_p",
];

/// The two mutually exclusive families of yearly measurement. A resolution
/// targets exactly one of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum MetricFamily {
    /// Approval-rate columns, per grade or grade span.
    Approval,
    /// Standardized SAEB scores and the composite IDEB index.
    #[default]
    Score,
}

/// Grade level encoded in an approval-rate header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    /// The 6º-9º span aggregate.
    SixthToNinth,
}

/// What a column is, as parsed from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Region or network identifier; carried through every resolution.
    Identifier,
    /// Approval rate for a grade or grade span.
    ApprovalRate,
    /// Standardized SAEB score.
    StandardizedScore,
    /// Composite IDEB index (score x approval).
    Ideb,
    /// Non-metric noise, or anything the classifier does not recognise.
    /// Never a resolution candidate.
    Auxiliary,
}

impl ColumnKind {
    /// The metric family this kind belongs to, if any.
    pub fn family(&self) -> Option<MetricFamily> {
        match self {
            ColumnKind::ApprovalRate => Some(MetricFamily::Approval),
            ColumnKind::StandardizedScore | ColumnKind::Ideb => Some(MetricFamily::Score),
            ColumnKind::Identifier | ColumnKind::Auxiliary => None,
        }
    }
}

/// Structured metadata for one dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
    pub year: Option<u16>,
    pub grade: Option<Grade>,
}

fn year_regex() -> &'static Regex {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    // Unwrap: the pattern is a compile-time constant
    YEAR_RE.get_or_init(|| Regex::new(r"(19|20)\d{2}").unwrap())
}

fn year_in_header(name: &str) -> Option<u16> {
    year_regex()
        .find(name)
        .and_then(|m| m.as_str().parse().ok())
}

fn grade_in_header(name: &str) -> Option<Grade> {
    // The span marker must be checked before the single grades since it
    // contains both "6º" and "9º".
    if name.contains("6º_a_9º") {
        Some(Grade::SixthToNinth)
    } else if name.contains("6º") {
        Some(Grade::Sixth)
    } else if name.contains("7º") {
        Some(Grade::Seventh)
    } else if name.contains("8º") {
        Some(Grade::Eighth)
    } else if name.contains("9º") {
        Some(Grade::Ninth)
    } else {
        None
    }
}

impl ColumnMeta {
    /// Classify a column header. Identifier names are matched exactly;
    /// auxiliary markers are checked before the family markers so that a
    /// noise column carrying a year token never becomes a candidate.
    pub fn parse(name: &str) -> Self {
        let kind = if COL::IDENTIFIERS.contains(&name) {
            ColumnKind::Identifier
        } else if AUXILIARY_MARKERS.iter().any(|marker| name.contains(marker)) {
            ColumnKind::Auxiliary
        } else if name.contains(APPROVAL_MARKER) {
            ColumnKind::ApprovalRate
        } else if SCORE_MARKERS.iter().any(|marker| name.contains(marker)) {
            ColumnKind::StandardizedScore
        } else if name.contains(IDEB_MARKER) {
            ColumnKind::Ideb
        } else {
            ColumnKind::Auxiliary
        };
        let year = match kind {
            ColumnKind::Identifier => None,
            _ => year_in_header(name),
        };
        let grade = match kind {
            ColumnKind::ApprovalRate => grade_in_header(name),
            _ => None,
        };
        ColumnMeta {
            name: name.to_string(),
            kind,
            year,
            grade,
        }
    }
}

/// The wide source table, loaded once at startup and immutable afterwards.
/// All downstream operations read it through shared references.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    columns: Vec<ColumnMeta>,
}

impl Dataset {
    /// Wrap an already-loaded frame, classifying every column header.
    pub fn from_dataframe(frame: DataFrame) -> Self {
        let columns: Vec<ColumnMeta> = frame
            .get_column_names()
            .iter()
            .map(|name| ColumnMeta::parse(name))
            .collect();
        debug!(
            "classified {} columns ({} identifiers, {} metrics)",
            columns.len(),
            columns
                .iter()
                .filter(|c| c.kind == ColumnKind::Identifier)
                .count(),
            columns.iter().filter(|c| c.kind.family().is_some()).count(),
        );
        Self { frame, columns }
    }

    /// Load the dataset from a CSV export of the source sheet.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, IdebmapError> {
        info!(
            "Attempting to load dataset from {}",
            path.as_ref().display()
        );
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()?;
        Ok(Self::from_dataframe(frame))
    }

    /// Load the dataset from a parquet file.
    pub fn from_parquet(path: impl AsRef<Path>) -> Result<Self, IdebmapError> {
        info!(
            "Attempting to load dataset from {}",
            path.as_ref().display()
        );
        let frame = LazyFrame::scan_parquet(path, ScanArgsParquet::default())?.collect()?;
        Ok(Self::from_dataframe(frame))
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Column metadata in the frame's declared column order.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// The distinct years any metric column carries, sorted ascending.
    pub fn metric_years(&self) -> Vec<u16> {
        self.columns
            .iter()
            .filter(|meta| meta.kind.family().is_some())
            .filter_map(|meta| meta.year)
            .unique()
            .sorted()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use polars::df;

    use super::*;

    #[test]
    fn ideb_headers_should_classify_as_score_family() {
        let meta = ColumnMeta::parse("IDEB\n2005\n(N x P)");
        assert_eq!(meta.kind, ColumnKind::Ideb);
        assert_eq!(meta.kind.family(), Some(MetricFamily::Score));
        assert_eq!(meta.year, Some(2005));

        let meta = ColumnMeta::parse("IDEB_2019");
        assert_eq!(meta.kind, ColumnKind::Ideb);
        assert_eq!(meta.year, Some(2019));
    }

    #[test]
    fn saeb_headers_should_classify_as_standardized_score() {
        let meta = ColumnMeta::parse("Nota Média Padronizada (N)_saeb2013");
        assert_eq!(meta.kind, ColumnKind::StandardizedScore);
        assert_eq!(meta.kind.family(), Some(MetricFamily::Score));
        assert_eq!(meta.year, Some(2013));
    }

    #[test]
    fn approval_headers_should_carry_their_grade() {
        let meta = ColumnMeta::parse("6º_TxAp2005");
        assert_eq!(meta.kind, ColumnKind::ApprovalRate);
        assert_eq!(meta.grade, Some(Grade::Sixth));
        assert_eq!(meta.year, Some(2005));

        let meta = ColumnMeta::parse("9º_TxAp2017");
        assert_eq!(meta.grade, Some(Grade::Ninth));

        let meta = ColumnMeta::parse("6º_a_9ºano_TxAp2005");
        assert_eq!(meta.kind, ColumnKind::ApprovalRate);
        assert_eq!(meta.grade, Some(Grade::SixthToNinth));
    }

    #[test]
    fn noise_headers_should_classify_as_auxiliary() {
        for name in [
            "Indicador de Rendimento (P)_2005",
            "Matemática_saeb2005",
            "Língua Portuguesa_saeb2005",
            "VL_OBSERVADO_p2019",
        ] {
            let meta = ColumnMeta::parse(name);
            assert_eq!(meta.kind, ColumnKind::Auxiliary, "header: {name}");
            assert_eq!(meta.kind.family(), None);
        }
    }

    #[test]
    fn identifier_headers_should_match_exactly() {
        assert_eq!(ColumnMeta::parse("Regiao").kind, ColumnKind::Identifier);
        assert_eq!(ColumnMeta::parse("Rede").kind, ColumnKind::Identifier);
        // A header merely containing an identifier name is not an identifier
        assert_eq!(ColumnMeta::parse("Regiao_p").kind, ColumnKind::Auxiliary);
    }

    #[test]
    fn metric_years_should_be_sorted_and_unique() {
        let frame = df!(
            "Regiao" => &["São Paulo"],
            "Rede" => &["Estadual"],
            "IDEB_2019" => &[5.1],
            "6º_TxAp2005" => &[95.2],
            "Nota Média Padronizada (N)_saeb2005" => &[5.4],
        )
        .unwrap();
        let dataset = Dataset::from_dataframe(frame);
        assert_eq!(dataset.metric_years(), vec![2005, 2019]);
    }

    #[test]
    fn dataset_should_load_from_csv() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
        writeln!(file, "Regiao,Rede,IDEB_2019")?;
        writeln!(file, "São Paulo,Estadual,5.1")?;
        writeln!(file, "Norte,Pública,4.2")?;
        file.flush()?;

        let dataset = Dataset::from_csv(file.path())?;
        assert_eq!(dataset.frame().shape(), (2, 3));
        assert_eq!(dataset.columns()[2].kind, ColumnKind::Ideb);
        assert_eq!(dataset.columns()[2].year, Some(2019));
        Ok(())
    }
}
