use std::io::{Cursor, Write};

use anyhow::{anyhow, Result};
use enum_dispatch::enum_dispatch;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::project::FilteredView;
use crate::COL;

/// Utility function to convert from polars `AnyValue` to `serde_json::Value`
/// for the types a projected view can contain.
fn any_value_to_json(value: &AnyValue) -> Result<Value> {
    match value {
        AnyValue::Null => Ok(Value::Null),
        AnyValue::Boolean(b) => Ok(Value::Bool(*b)),
        AnyValue::String(s) => Ok(Value::String((*s).to_string())),
        AnyValue::Int32(n) => Ok(json!(*n)),
        AnyValue::Int64(n) => Ok(json!(*n)),
        AnyValue::UInt32(n) => Ok(json!(*n)),
        AnyValue::UInt64(n) => Ok(json!(*n)),
        AnyValue::Float32(n) => Ok(json!(*n)),
        AnyValue::Float64(n) => Ok(json!(*n)),
        _ => Err(anyhow!("Failed to convert type")),
    }
}

/// One projected row as a geometry-less feature: the region code becomes the
/// feature id (the renderer joins polygons on it) and every column lands in
/// the properties map.
fn row_to_feature(frame: &DataFrame, idx: usize) -> Result<Feature> {
    let mut properties = Map::new();
    let mut id = None;
    for column in frame.get_columns() {
        let value = any_value_to_json(&column.get(idx)?)?;
        if column.name() == COL::REGION {
            if let Value::String(code) = &value {
                id = Some(Id::String(code.clone()));
            }
        }
        properties.insert(column.name().to_string(), value);
    }
    Ok(Feature {
        bbox: None,
        geometry: None,
        id,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Trait to define the different output generators for the render table.
/// `save` streams the serialized view into a writer; `format` buffers it
/// into a string.
#[enum_dispatch]
pub trait OutputGenerator {
    fn save(&self, writer: &mut impl Write, view: &FilteredView) -> Result<()>;
    fn format(&self, view: &FilteredView) -> Result<String> {
        let mut data: Vec<u8> = vec![];
        let mut buff = Cursor::new(&mut data);
        self.save(&mut buff, view)?;
        Ok(String::from_utf8(data)?)
    }
}

/// Enum of OutputFormatters, one for each potential output type.
#[enum_dispatch(OutputGenerator)]
#[derive(Serialize, Deserialize, Debug)]
pub enum OutputFormatter {
    Csv(CsvFormatter),
    GeoJson(GeoJsonFormatter),
    GeoJsonSeq(GeoJsonSeqFormatter),
}

/// CSV, one row per region, columns in render order (color metric last).
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CsvFormatter;

impl OutputGenerator for CsvFormatter {
    fn save(&self, writer: &mut impl Write, view: &FilteredView) -> Result<()> {
        let mut frame = view.frame().clone();
        CsvWriter::new(writer).finish(&mut frame)?;
        Ok(())
    }
}

/// A single geometry-less FeatureCollection keyed by region code.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct GeoJsonFormatter;

impl OutputGenerator for GeoJsonFormatter {
    fn save(&self, writer: &mut impl Write, view: &FilteredView) -> Result<()> {
        let frame = view.frame();
        let features = (0..frame.height())
            .map(|idx| row_to_feature(frame, idx))
            .collect::<Result<Vec<Feature>>>()?;
        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        serde_json::to_writer(writer, &collection)?;
        Ok(())
    }
}

/// GeoJSON sequence format: one feature serialized per line.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct GeoJsonSeqFormatter;

impl OutputGenerator for GeoJsonSeqFormatter {
    fn save(&self, writer: &mut impl Write, view: &FilteredView) -> Result<()> {
        let frame = view.frame();
        for idx in 0..frame.height() {
            let feature = row_to_feature(frame, idx)?;
            writeln!(writer, "{feature}")?;
        }
        Ok(())
    }
}
