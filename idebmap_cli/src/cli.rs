use std::fs::File;
use std::path::Path;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use enum_dispatch::enum_dispatch;
use idebmap::config::Config;
use idebmap::dataset::MetricFamily;
use idebmap::formatters::{
    CsvFormatter, GeoJsonFormatter, GeoJsonSeqFormatter, OutputFormatter, OutputGenerator,
};
use idebmap::project::{FilteredView, Projection};
use idebmap::resolve::{Resolution, SUPPORTED_YEARS};
use idebmap::Idebmap;
use log::info;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use crate::display::{display_region_codes, display_resolved_columns, display_view, display_years};
use crate::error::IdebmapCliResult;

/// Defines the output formats we are able to produce data in.
#[derive(Clone, Debug, Deserialize, Serialize, EnumString, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum OutputFormat {
    Csv,
    GeoJSON,
    GeoJSONSeq,
    Stdout,
}

impl From<&OutputFormat> for OutputFormatter {
    fn from(value: &OutputFormat) -> Self {
        match value {
            OutputFormat::Csv => OutputFormatter::Csv(CsvFormatter),
            OutputFormat::GeoJSON => OutputFormatter::GeoJson(GeoJsonFormatter),
            OutputFormat::GeoJSONSeq => OutputFormatter::GeoJsonSeq(GeoJsonSeqFormatter),
            OutputFormat::Stdout => OutputFormatter::Csv(CsvFormatter),
        }
    }
}

impl From<OutputFormat> for OutputFormatter {
    fn from(value: OutputFormat) -> Self {
        Self::from(&value)
    }
}

fn write_output<T, U>(
    output_generator: T,
    view: &FilteredView,
    output_file: Option<U>,
) -> IdebmapCliResult<()>
where
    T: OutputGenerator,
    U: AsRef<Path>,
{
    if let Some(output_file) = output_file {
        let mut f = File::create(output_file).context("Failed to write output")?;
        output_generator.save(&mut f, view)?;
    } else {
        let mut stdout_lock = std::io::stdout().lock();
        output_generator.save(&mut stdout_lock, view)?;
    };
    Ok(())
}

/// Trait that defines what to run when a given subcommand is invoked.
#[enum_dispatch]
pub trait RunCommand {
    fn run(&self, config: Config) -> IdebmapCliResult<()>;
}

/// The `columns` command resolves and displays the dataset columns relevant
/// to a year.
#[derive(Args, Debug)]
pub struct ColumnsCommand {
    #[arg(short, long, help = "Year to resolve (biennial, 2005 through 2019)")]
    year: String,
    #[arg(
        long,
        default_value = "score",
        help = "Metric family to resolve: 'score' or 'approval'"
    )]
    family: MetricFamily,
}

impl RunCommand for ColumnsCommand {
    fn run(&self, config: Config) -> IdebmapCliResult<()> {
        info!("Running `columns` subcommand");
        let idebmap = Idebmap::new_with_config(config)?;
        match idebmap.resolve_columns(&self.year, self.family)? {
            Resolution::NoDataForYear => {
                println!(
                    "No data is published for '{}'; the previous view is kept.",
                    self.year
                );
            }
            Resolution::Resolved(resolved) => display_resolved_columns(&resolved)?,
        }
        Ok(())
    }
}

/// The `data` command projects the render-ready table for a given year and
/// outputs it in the requested format.
#[derive(Args, Debug)]
pub struct DataCommand {
    #[arg(short, long, help = "Year to project (biennial, 2005 through 2019)")]
    year: String,
    #[arg(
        long,
        default_value = "score",
        help = "Metric family to project: 'score' or 'approval'"
    )]
    family: MetricFamily,
    #[arg(
        short = 'f',
        long,
        value_name = "csv|geojson|geojsonseq",
        default_value = "stdout",
        help = "Output format for the results"
    )]
    output_format: OutputFormat,
    #[arg(short = 'o', long, help = "Output file to place the results")]
    output_file: Option<String>,
}

impl RunCommand for DataCommand {
    fn run(&self, config: Config) -> IdebmapCliResult<()> {
        info!("Running `data` subcommand");
        let idebmap = Idebmap::new_with_config(config)?;
        let view = match idebmap.project(&self.year, self.family)? {
            Projection::NoChange => {
                println!(
                    "No data is published for '{}'; the previous view is kept.",
                    self.year
                );
                return Ok(());
            }
            Projection::View(view) => view,
        };
        if self.output_format == OutputFormat::Stdout && self.output_file.is_none() {
            display_view(&view, None)?;
            return Ok(());
        }
        let formatter: OutputFormatter = (&self.output_format).into();
        write_output(formatter, &view, self.output_file.as_deref())?;
        Ok(())
    }
}

/// The `regions` command displays the canonical region code table.
#[derive(Args, Debug)]
pub struct RegionsCommand {}

impl RunCommand for RegionsCommand {
    fn run(&self, _config: Config) -> IdebmapCliResult<()> {
        info!("Running `regions` subcommand");
        display_region_codes()?;
        Ok(())
    }
}

/// The `years` command lists the published years and whether the configured
/// dataset carries columns for them.
#[derive(Args, Debug)]
pub struct YearsCommand {}

impl RunCommand for YearsCommand {
    fn run(&self, config: Config) -> IdebmapCliResult<()> {
        info!("Running `years` subcommand");
        let idebmap = Idebmap::new_with_config(config)?;
        display_years(&SUPPORTED_YEARS, &idebmap.dataset.metric_years())?;
        Ok(())
    }
}

/// The entrypoint for the CLI.
#[derive(Parser, Debug)]
#[command(version, about="idebmap prepares the IDEB map data you need!", long_about = None, name="idebmap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Commands contains the list of subcommands avaliable for use in the CLI.
/// Each command should implmement the RunCommand trait and specify the list
/// of required args for that command.
#[derive(Subcommand, Debug)]
#[enum_dispatch(RunCommand)]
pub enum Commands {
    /// Resolve the dataset columns relevant to a year
    Columns(ColumnsCommand),
    /// Output the render-ready table for a given year
    Data(DataCommand),
    /// List the canonical region code table
    Regions(RegionsCommand),
    /// List published years and dataset coverage
    Years(YearsCommand),
}
