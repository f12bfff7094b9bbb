//! File decoding into raw grids and export of ingested tables.
//!
//! Readers never assume a header: they hand back a [`RawBlock`](crate::cell::RawBlock)
//! and leave header detection to [`ingest`](crate::ingest).

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;

// Re-export commonly used functions
pub use self::csv::{read_csv, read_csv_raw, read_csv_raw_from_reader, write_csv, write_csv_to_writer};
#[cfg(feature = "excel")]
pub use self::excel::{list_sheet_names, read_excel, read_excel_raw};
pub use self::json::{to_json_value, write_json, JsonOrient};
