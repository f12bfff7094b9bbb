//! Exportable report content.
//!
//! [`HtmlReport`] renders a standalone HTML page with the dataset shape and
//! the generated insights. [`summary_sheets`] builds the `Raw` and `Stats`
//! tables of the summary export, which [`write_summary_csv`] writes as one
//! CSV file per sheet.
//!
//! # Example
//!
//! ```rust
//! use insightrs::report::HtmlReport;
//! use insightrs::{generate_insights, Column, Table};
//!
//! let table = Table::new(vec![Column::numeric("Sales", vec![Some(1.0), Some(2.0)])]).unwrap();
//! let insights = generate_insights(&table);
//! let html = HtmlReport::new(&table, &insights).to_html();
//! assert!(html.contains("<p>Rows: 2 | Columns: 1</p>"));
//! ```

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use log::debug;

use crate::column::Column;
use crate::error::Result;
use crate::insights::Insight;
use crate::io::csv::write_csv;
use crate::stats::summarize;
use crate::table::Table;

/// Heading used when no title is set
pub const DEFAULT_TITLE: &str = "Sales Insights & Forecasting";

/// Name of the sheet holding the ingested table
pub const RAW_SHEET: &str = "Raw";
/// Name of the sheet holding the per-column statistics
pub const STATS_SHEET: &str = "Stats";

/// HTML report over a table and its insights
#[derive(Debug, Clone)]
pub struct HtmlReport<'a> {
    table: &'a Table,
    insights: &'a [Insight],
    title: String,
    generated: Option<NaiveDateTime>,
}

impl<'a> HtmlReport<'a> {
    pub fn new(table: &'a Table, insights: &'a [Insight]) -> Self {
        HtmlReport {
            table,
            insights,
            title: DEFAULT_TITLE.to_string(),
            generated: None,
        }
    }

    /// Sets the page heading
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Fixes the "Generated" timestamp; the local time of rendering otherwise.
    pub fn generated_at(mut self, generated: NaiveDateTime) -> Self {
        self.generated = Some(generated);
        self
    }

    /// Renders the report as a UTF-8 HTML document.
    ///
    /// The title and every insight line are HTML-escaped.
    pub fn to_html(&self) -> String {
        let generated = self
            .generated
            .unwrap_or_else(|| Local::now().naive_local())
            .format("%Y-%m-%d %H:%M:%S");

        let items: String = self
            .insights
            .iter()
            .map(|insight| format!("<li>{}</li>", escape(&insight.to_string())))
            .collect();

        format!(
            r#"<html><head><meta charset="utf-8"><title>Report</title></head><body><h1>{title}</h1><p>Generated: {generated}</p><h2>Dataset</h2><p>Rows: {rows} | Columns: {columns}</p><h3>Insights</h3><ul>{items}</ul></body></html>"#,
            title = escape(&self.title),
            generated = generated,
            rows = self.table.row_count(),
            columns = self.table.column_count(),
            items = items,
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The `Raw` and `Stats` sheets of the summary export, in that order.
///
/// `Stats` has one row per numeric column: its name under `Column`, then
/// `count`, `mean`, `median`, `max`, `min` and `std`. It has no columns at
/// all when the table has no numeric column.
pub fn summary_sheets(table: &Table) -> Result<Vec<(String, Table)>> {
    let summary = summarize(table);
    let stats = if summary.is_empty() {
        Table::new(Vec::new())?
    } else {
        Table::new(vec![
            Column::text("Column", summary.iter().map(|s| Some(s.name.clone())).collect()),
            Column::numeric("count", summary.iter().map(|s| Some(s.count as f64)).collect()),
            Column::numeric("mean", summary.iter().map(|s| s.mean).collect()),
            Column::numeric("median", summary.iter().map(|s| s.median).collect()),
            Column::numeric("max", summary.iter().map(|s| s.max).collect()),
            Column::numeric("min", summary.iter().map(|s| s.min).collect()),
            Column::numeric("std", summary.iter().map(|s| s.dev).collect()),
        ])?
    };

    Ok(vec![
        (RAW_SHEET.to_string(), table.clone()),
        (STATS_SHEET.to_string(), stats),
    ])
}

/// Writes every summary sheet to `<dir>/<sheet>.csv` and returns the paths
/// in sheet order.
pub fn write_summary_csv<P: AsRef<Path>>(table: &Table, dir: P) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for (name, sheet) in summary_sheets(table)? {
        let path = dir.as_ref().join(format!("{}.csv", name));
        write_csv(&sheet, &path)?;
        debug!("report: wrote sheet '{}' to {}", name, path.display());
        paths.push(path);
    }
    Ok(paths)
}
