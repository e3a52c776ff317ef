use crate::{error::DataError, series::CandleTable};
use chrono::SecondsFormat;
use rust_decimal::Decimal;
use serde::Serialize;
use std::{fs, io, path::Path};
use tracing::info;

/// One CSV row: the time index followed by the nine candle fields.
#[derive(Debug, Serialize)]
struct CsvRow {
    datetime: String,
    open_ask: Decimal,
    close_ask: Decimal,
    high_ask: Decimal,
    low_ask: Decimal,
    open_bid: Decimal,
    close_bid: Decimal,
    high_bid: Decimal,
    low_bid: Decimal,
    volume: u64,
}

/// Column order of every CSV written by [`write_csv`].
pub const CSV_HEADER: [&str; 10] = [
    "datetime",
    "open_ask",
    "close_ask",
    "high_ask",
    "low_ask",
    "open_bid",
    "close_bid",
    "high_bid",
    "low_bid",
    "volume",
];

/// Serialise `table` as CSV into `writer`, one row per record in table order.
///
/// The header is written even when the table is empty.
pub fn write_table<Writer>(writer: Writer, table: &CandleTable) -> Result<(), DataError>
where
    Writer: io::Write,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    let mut header = CSV_HEADER;
    header[0] = table.index_name;
    csv_writer.write_record(header)?;

    for record in &table.rows {
        csv_writer.serialize(CsvRow {
            datetime: record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            open_ask: record.open_ask,
            close_ask: record.close_ask,
            high_ask: record.high_ask,
            low_ask: record.low_ask,
            open_bid: record.open_bid,
            close_bid: record.close_bid,
            high_bid: record.high_bid,
            low_bid: record.low_bid,
            volume: record.volume,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write `table` to a CSV file at `path`, creating missing parent directories.
pub fn write_csv(path: &Path, table: &CandleTable) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    write_table(io::BufWriter::new(file), table)?;

    info!(path = %path.display(), rows = table.len(), "saved candles to csv");
    Ok(())
}
