use idebmap::error::IdebmapError;
use polars::error::PolarsError;

#[derive(thiserror::Error, Debug)]
pub enum IdebmapCliError {
    #[error("Anyhow error")]
    Anyhow(#[from] anyhow::Error),
    #[error("serde JSON error")]
    SerdeJSONError(#[from] serde_json::Error),
    #[error("polars error")]
    PolarsError(#[from] PolarsError),
    #[error("idebmap error")]
    IdebmapError(#[from] IdebmapError),
    #[error("std IO error")]
    IOError(#[from] std::io::Error),
}

pub type IdebmapCliResult<T> = Result<T, IdebmapCliError>;
