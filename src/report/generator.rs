//! Snapshot export.
//!
//! Renders a computed dashboard snapshot as pretty JSON or as a plain
//! Markdown document with one table per panel.

use crate::dashboard::{DashboardSnapshot, PanelView};
use crate::view::{DistributionView, FrequencyBarView, RankedBarView, ShareView, ViewModel};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(snapshot: &DashboardSnapshot) -> String {
    let mut output = String::new();

    output.push_str("# Salary Dashboard\n\n");
    output.push_str(&format!(
        "- **Years:** {} to {}\n- **Panels:** {}\n\n",
        snapshot.year_from,
        snapshot.year_to,
        snapshot.panels.len()
    ));

    for panel in &snapshot.panels {
        output.push_str(&generate_panel_section(panel));
    }

    output
}

/// Generate the section for one panel.
fn generate_panel_section(panel: &PanelView) -> String {
    let mut section = format!("## {}\n\n", panel.title);

    if panel.view.is_empty() {
        section.push_str("_No data for the current selection._\n\n");
        return section;
    }

    let table = match &panel.view {
        ViewModel::Distribution(v) => distribution_table(v),
        ViewModel::RankedBar(v) => ranked_table(v),
        ViewModel::FrequencyBar(v) => frequency_table(v),
        ViewModel::Share(v) => share_table(v),
    };
    section.push_str(&table);
    section.push('\n');

    section
}

fn distribution_table(view: &DistributionView) -> String {
    let mut table = String::from("| Group | N | Min | Q1 | Median | Q3 | Max |\n");
    table.push_str("|-------|---|-----|----|--------|----|-----|\n");
    for g in &view.groups {
        table.push_str(&format!(
            "| {} | {} | {:.0} | {:.0} | {:.0} | {:.0} | {:.0} |\n",
            g.label,
            g.raw_values.len(),
            g.min,
            g.q1,
            g.median,
            g.q3,
            g.max
        ));
    }
    table
}

fn ranked_table(view: &RankedBarView) -> String {
    let mut table = String::from("| Rank | Label | Value |\n|------|-------|-------|\n");
    for (i, bar) in view.bars.iter().enumerate() {
        table.push_str(&format!("| {} | {} | {:.0} |\n", i + 1, bar.label, bar.value));
    }
    table
}

fn frequency_table(view: &FrequencyBarView) -> String {
    let mut table = String::from("| Label | Count |\n|-------|-------|\n");
    for bar in &view.bars {
        table.push_str(&format!("| {} | {} |\n", bar.label, bar.count));
    }
    table
}

fn share_table(view: &ShareView) -> String {
    let mut table = String::from("| Label | Count | Share |\n|-------|-------|-------|\n");
    for slice in &view.slices {
        table.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            slice.label,
            slice.count,
            slice.fraction * 100.0
        ));
    }
    table
}

/// Write the Markdown report to a file.
pub fn write_report(snapshot: &DashboardSnapshot, path: &Path) -> Result<()> {
    let content = generate_markdown_report(snapshot);

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(snapshot: &DashboardSnapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(snapshot: &DashboardSnapshot, path: &Path) -> Result<()> {
    let content = generate_json_report(snapshot)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
