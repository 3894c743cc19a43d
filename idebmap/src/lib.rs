use log::debug;

use boundaries::Boundaries;
use config::Config;
use dataset::{Dataset, MetricFamily};
use error::IdebmapError;
use project::Projection;
use resolve::Resolution;

// Re-exports
pub use column_names as COL;

// Modules
pub mod boundaries;
pub mod column_names;
pub mod config;
pub mod dataset;
pub mod error;
pub mod formatters;
pub mod project;
pub mod regions;
pub mod resolve;
pub mod selection;

/// Type for the idebmap data-preparation pipeline and API
pub struct Idebmap {
    pub dataset: Dataset,
    pub config: Config,
}

impl Idebmap {
    /// Setup the Idebmap object with default configuration
    pub fn new() -> Result<Self, IdebmapError> {
        Self::new_with_config(Config::default())
    }

    /// Setup the Idebmap object with custom configuration
    pub fn new_with_config(config: Config) -> Result<Self, IdebmapError> {
        debug!("config: {config:?}");
        let dataset = Dataset::from_csv(&config.dataset_path)?;
        Ok(Self { dataset, config })
    }

    /// Wrap an already-loaded dataset
    pub fn from_dataset(dataset: Dataset, config: Config) -> Self {
        Self { dataset, config }
    }

    /// Resolve the dataset columns relevant to `year` for `family`
    pub fn resolve_columns(
        &self,
        year: &str,
        family: MetricFamily,
    ) -> Result<Resolution, IdebmapError> {
        resolve::resolve_columns(&self.dataset, year, family)
    }

    /// Resolve then project the render-ready table for `year`
    pub fn project(&self, year: &str, family: MetricFamily) -> Result<Projection, IdebmapError> {
        let resolution = self.resolve_columns(year, family)?;
        project::project(&self.dataset, &resolution)
    }

    /// Load the boundary collection named by the configuration
    pub fn boundaries(&self) -> Result<Boundaries, IdebmapError> {
        Boundaries::from_path(&self.config.boundaries_path)
    }
}
