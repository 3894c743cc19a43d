//! Canonical region codes and the normaliser that rewrites tables to use
//! them.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use polars::prelude::*;

use crate::error::IdebmapError;
use crate::COL;

/// Macro-region aggregate rows present in the source sheet. They have no
/// boundary polygon, so the normaliser drops them.
pub const AGGREGATE_REGIONS: [&str; 5] = ["Norte", "Nordeste", "Sul", "Sudeste", "Centro-Oeste"];

/// Every non-aggregate region name appearing in the source sheet (spelled as
/// the sheet spells it), mapped to the code the boundary collection is keyed
/// by: the 27 federative units plus the one city-level row the release
/// carries (Goiânia).
pub const REGION_CODES: [(&str, &str); 28] = [
    ("Rondônia", "RO"),
    ("Acre", "AC"),
    ("Amazonas", "AM"),
    ("Roraima", "RR"),
    ("Pará", "PA"),
    ("Amapá", "AP"),
    ("Tocantins", "TO"),
    ("Maranhão", "MA"),
    ("Piauí", "PI"),
    ("Ceará", "CE"),
    ("R. G. do Norte", "RN"),
    ("Paraíba", "PB"),
    ("Pernambuco", "PE"),
    ("Alagoas", "AL"),
    ("Sergipe", "SE"),
    ("Bahia", "BA"),
    ("Minas Gerais", "MG"),
    ("Espírito Santo", "ES"),
    ("Rio de Janeiro", "RJ"),
    ("São Paulo", "SP"),
    ("Paraná", "PR"),
    ("Santa Catarina", "SC"),
    ("R. G. do Sul", "RS"),
    ("M. G. do Sul", "MS"),
    ("Mato Grosso", "MT"),
    ("Goiás", "GO"),
    ("Goiânia", "GYN"),
    ("Distrito Federal", "DF"),
];

fn code_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| REGION_CODES.iter().copied().collect())
}

/// Canonical code for a region name, if the table covers it.
pub fn region_code(name: &str) -> Option<&'static str> {
    code_table().get(name).copied()
}

/// Whether `value` is already one of the canonical codes.
pub fn is_canonical_code(value: &str) -> bool {
    REGION_CODES.iter().any(|(_, code)| *code == value)
}

/// Whether `name` is one of the aggregate macro-region rows.
pub fn is_aggregate(name: &str) -> bool {
    AGGREGATE_REGIONS.contains(&name)
}

/// Rewrite `df` so its region column holds canonical codes: aggregate rows
/// are dropped, names are replaced via the code table, and values that are
/// already canonical codes pass through unchanged (applying the normaliser
/// twice is a no-op). Any other value is an [`IdebmapError::UnmappedRegion`]
/// for the whole request; the caller keeps its last good table.
pub fn normalize(df: &DataFrame) -> Result<DataFrame, IdebmapError> {
    let region = df.column(COL::REGION)?.str()?;
    let keep: Vec<bool> = region
        .into_iter()
        .map(|name| !matches!(name, Some(name) if is_aggregate(name)))
        .collect();
    let mut filtered = df.filter(&BooleanChunked::from_slice("keep", &keep))?;
    debug!(
        "dropped {} aggregate rows, normalising {} region values",
        df.height() - filtered.height(),
        filtered.height(),
    );

    let codes: Vec<String> = filtered
        .column(COL::REGION)?
        .str()?
        .into_iter()
        .map(|name| match name {
            Some(name) => {
                if let Some(code) = region_code(name) {
                    Ok(code.to_string())
                } else if is_canonical_code(name) {
                    Ok(name.to_string())
                } else {
                    Err(IdebmapError::UnmappedRegion(name.to_string()))
                }
            }
            None => Err(IdebmapError::UnmappedRegion("<missing region>".into())),
        })
        .collect::<Result<_, _>>()?;

    filtered.replace(COL::REGION, Series::new(COL::REGION, codes))?;
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use polars::df;

    use super::*;

    fn test_df() -> DataFrame {
        df!(
            COL::REGION => &["São Paulo", "Nordeste", "R. G. do Norte", "Goiânia", "Sul"],
            COL::NETWORK => &["Estadual", "Pública", "Estadual", "Municipal", "Pública"],
            "IDEB_2019" => &[5.1, 4.0, 4.3, 5.3, 4.8],
        )
        .unwrap()
    }

    #[test]
    fn aggregates_should_be_dropped_and_names_replaced() -> anyhow::Result<()> {
        let normalized = normalize(&test_df())?;
        assert_eq!(normalized.height(), 3);
        let codes: Vec<Option<&str>> = normalized.column(COL::REGION)?.str()?.into_iter().collect();
        assert_eq!(codes, vec![Some("SP"), Some("RN"), Some("GYN")]);
        Ok(())
    }

    #[test]
    fn normalize_should_be_idempotent() -> anyhow::Result<()> {
        let once = normalize(&test_df())?;
        let twice = normalize(&once)?;
        assert!(once.equals(&twice));
        Ok(())
    }

    #[test]
    fn unmapped_regions_should_fail_loudly() {
        let df = df!(
            COL::REGION => &["São Paulo", "Atlantis"],
            "IDEB_2019" => &[5.1, 0.0],
        )
        .unwrap();
        let result = normalize(&df);
        assert!(
            matches!(result, Err(IdebmapError::UnmappedRegion(name)) if name == "Atlantis"),
            "pass-through of unknown region names is a defect"
        );
    }

    #[test]
    fn code_table_should_cover_all_federative_units() {
        // 26 states + Distrito Federal + the city-level outlier
        assert_eq!(REGION_CODES.len(), 28);
        assert_eq!(region_code("São Paulo"), Some("SP"));
        assert_eq!(region_code("Distrito Federal"), Some("DF"));
        assert_eq!(region_code("Goiânia"), Some("GYN"));
        assert_eq!(region_code("Norte"), None, "aggregates have no code");
        for (name, code) in REGION_CODES {
            assert!(region_code(name).is_some());
            assert!(is_canonical_code(code));
            assert!((2..=3).contains(&code.len()), "code {code} out of shape");
        }
    }

    #[test]
    fn codes_already_canonical_should_pass_through() -> anyhow::Result<()> {
        let df = df!(
            COL::REGION => &["SP", "GYN"],
            "IDEB_2019" => &[5.1, 5.3],
        )
        .unwrap();
        let normalized = normalize(&df)?;
        assert!(normalized.equals(&df));
        Ok(())
    }
}
