//! Spreadsheet ingestion and trend forecasting.
//!
//! Raw grids decoded from CSV or Excel files go through [`ingest`], which
//! finds the header row, names the columns and types every column. The
//! resulting [`Table`] feeds the statistics, pivot, insight, report and
//! [`forecast`] modules.
//!
//! ```rust
//! use insightrs::{forecast, ingest, RawBlock, RawCell};
//!
//! let mut rows = vec![vec![RawCell::from("Month"), RawCell::from("Sales")]];
//! for (i, sales) in [10.0, 12.0, 14.0, 16.0].iter().enumerate() {
//!     rows.push(vec![RawCell::from(format!("2024-{:02}-01", i + 1)), RawCell::from(*sales)]);
//! }
//! let table = ingest(&RawBlock::new(rows)).unwrap();
//! let series = table.time_series("Month", "Sales").unwrap();
//! let result = forecast(&series, 2).unwrap();
//! assert_eq!(result.len(), 2);
//! ```

pub mod cell;
pub mod column;
pub mod config;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod insights;
pub mod io;
pub mod pivot;
pub mod report;
pub mod series;
pub mod stats;
pub mod table;
pub mod temporal;

// Re-export commonly used types
pub use cell::{RawBlock, RawCell};
pub use column::{Column, ColumnData, ColumnType};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use forecast::{forecast, ForecastOptions, ForecastPoint, ForecastResult, TrendForecaster};
pub use ingest::{ingest, CoercionPolicy, HeaderPolicy, IngestOptions, Ingestor};
pub use insights::{generate_insights, Insight};
pub use pivot::{AggFunction, PivotResult, PivotSpec, PivotTable};
pub use report::HtmlReport;
pub use series::Series;
pub use table::Table;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
