use csv::{ReaderBuilder, Trim, Writer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::cell::{RawBlock, RawCell};
use crate::error::Result;
use crate::ingest::{IngestOptions, Ingestor};
use crate::table::Table;

/// Reads a CSV file into a raw grid without treating any row as a header.
///
/// Every non-blank field becomes a text cell; ragged rows are allowed and
/// padded.
pub fn read_csv_raw<P: AsRef<Path>>(path: P) -> Result<RawBlock> {
    let file = File::open(path.as_ref())?;
    read_csv_raw_from_reader(file)
}

/// Same as [`read_csv_raw`] for any reader.
pub fn read_csv_raw_from_reader<R: Read>(reader: R) -> Result<RawBlock> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    debug!("decoded {} csv rows", rows.len());
    Ok(RawBlock::new(rows))
}

/// Reads and ingests a CSV file.
///
/// # Example
///
/// ```no_run
/// use insightrs::ingest::IngestOptions;
/// use insightrs::io::read_csv;
///
/// let table = read_csv("sales.csv", &IngestOptions::default()).unwrap();
/// println!("{:?}", table.column_names());
/// ```
pub fn read_csv<P: AsRef<Path>>(path: P, options: &IngestOptions) -> Result<Table> {
    let block = read_csv_raw(path)?;
    Ingestor::new(options.clone())?.ingest(&block)
}

/// Writes a table to a CSV file: the header row, then one record per row.
/// Missing values are written as empty fields.
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_csv_to_writer(table, file)
}

/// Same as [`write_csv`] for any writer.
pub fn write_csv_to_writer<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(table.column_names())?;

    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column.data().display_value(row).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
