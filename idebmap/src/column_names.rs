//! This module stores the column names of the source IDEB spreadsheet that the
//! rest of the crate keys on. Note that these must be synchronised with the
//! headers of the published INEP release!

/// Region name as spelled in the source sheet (e.g. "São Paulo", "Nordeste").
/// After normalisation the same column holds canonical codes (e.g. "SP").
pub const REGION: &str = "Regiao";

/// Administrative network type (e.g. "Estadual", "Pública").
pub const NETWORK: &str = "Rede";

/// The two identifier columns prepended to every resolution, in order.
pub const IDENTIFIERS: [&str; 2] = [REGION, NETWORK];
