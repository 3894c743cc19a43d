//! Error types.

#[derive(thiserror::Error, Debug)]
pub enum IdebmapError {
    #[error("Invalid year token: '{0}'")]
    InvalidYear(String),
    #[error("No canonical code for region: '{0}'")]
    UnmappedRegion(String),
    #[error("Wrapped polars error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),
    #[error("Wrapped geojson error: {0}")]
    GeoJsonError(#[from] geojson::Error),
    #[error("std IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Wrapped anyhow error: {0}")]
    AnyhowError(#[from] anyhow::Error),
}
