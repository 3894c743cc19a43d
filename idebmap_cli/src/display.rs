use comfy_table::{presets::NOTHING, *};
use itertools::Itertools;

use idebmap::project::FilteredView;
use idebmap::regions::REGION_CODES;
use idebmap::resolve::ResolvedColumns;
use idebmap::COL;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_style(comfy_table::TableComponent::BottomBorder, '─')
        .set_style(comfy_table::TableComponent::MiddleHeaderIntersections, '─')
        .set_style(comfy_table::TableComponent::HeaderLines, '─')
        .set_style(comfy_table::TableComponent::BottomBorderIntersections, '─')
        .set_style(comfy_table::TableComponent::TopBorder, '─')
        .set_style(comfy_table::TableComponent::TopBorderIntersections, '─');
    table
}

fn bold_header(names: Vec<&str>) -> Vec<Cell> {
    names
        .into_iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

/// What role a resolved column plays in the render contract.
fn column_role(resolved: &ResolvedColumns, name: &str) -> &'static str {
    if COL::IDENTIFIERS.contains(&name) {
        "identifier"
    } else if resolved.primary_metric() == Some(name) {
        "primary (color)"
    } else if resolved.secondary_metrics().contains(&name) {
        "annotation"
    } else {
        "metric"
    }
}

pub fn display_resolved_columns(resolved: &ResolvedColumns) -> anyhow::Result<()> {
    let mut table = new_table();
    table.set_header(bold_header(vec!["Column", "Role"]));
    for name in resolved.names() {
        table.add_row(vec![name, column_role(resolved, name)]);
    }
    println!("\n{}", table);
    println!(
        "Resolved {} metric column(s) for {} ({})",
        resolved.metric_columns().len(),
        resolved.year,
        resolved.family,
    );
    Ok(())
}

pub fn display_region_codes() -> anyhow::Result<()> {
    let mut table = new_table();
    table.set_header(bold_header(vec!["Region", "Code"]));
    for (name, code) in REGION_CODES {
        table.add_row(vec![name, code]);
    }
    println!("\n{}", table);
    Ok(())
}

pub fn display_years(supported: &[u16], in_dataset: &[u16]) -> anyhow::Result<()> {
    let mut table = new_table();
    table.set_header(bold_header(vec!["Year", "In dataset"]));
    for year in supported {
        table.add_row(vec![
            year.to_string(),
            if in_dataset.contains(year) { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("\n{}", table);
    Ok(())
}

pub fn display_view(view: &FilteredView, max_results: Option<usize>) -> anyhow::Result<()> {
    let frame = view.frame();
    let frame_to_show = match max_results {
        Some(max) => frame.head(Some(max)),
        None => frame.clone(),
    };
    let mut table = new_table();
    table.set_header(bold_header(frame_to_show.get_column_names()));
    for idx in 0..frame_to_show.height() {
        let row = frame_to_show.get_row(idx)?;
        table.add_row(row.0.iter().map(|value| value.to_string()));
    }
    println!("\n{}", table);
    if let Some(primary) = view.primary_metric() {
        println!(
            "Color metric: {} (annotations: {})",
            primary,
            view.secondary_metrics().iter().join(", "),
        );
    }
    Ok(())
}
