use crate::candle::CandleRecord;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Name of the time index column of a finalised [`CandleTable`].
pub const INDEX_NAME: &str = "datetime";

/// Running series of [`CandleRecord`]s, kept in arrival order.
///
/// Records are neither re-sorted nor de-duplicated: a timestamp returned by two windows
/// appears twice.
#[derive(Clone, Debug, Default)]
pub struct CandleSeries {
    records: Vec<CandleRecord>,
    cutoff: Option<DateTime<Utc>>,
}

impl CandleSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a [`CandleSeries`] that drops any record timestamped at or after `cutoff`.
    pub fn with_cutoff(cutoff: DateTime<Utc>) -> Self {
        Self {
            records: Vec::new(),
            cutoff: Some(cutoff),
        }
    }

    /// Append `records` to the end of the series, returning how many were kept.
    pub fn append<Records>(&mut self, records: Records) -> usize
    where
        Records: IntoIterator<Item = CandleRecord>,
    {
        let before = self.records.len();

        match self.cutoff {
            Some(cutoff) => self
                .records
                .extend(records.into_iter().filter(|record| record.timestamp < cutoff)),
            None => self.records.extend(records),
        }

        let appended = self.records.len() - before;
        debug!(appended, total = self.records.len(), "appended candles to series");
        appended
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CandleRecord] {
        &self.records
    }

    /// Consume the series into an indexed [`CandleTable`] ready for serialisation.
    pub fn finalize(self) -> CandleTable {
        CandleTable {
            index_name: INDEX_NAME,
            rows: self.records,
        }
    }
}

/// Final, read-only candle table indexed by time.
#[derive(Clone, Debug, PartialEq)]
pub struct CandleTable {
    pub index_name: &'static str,
    pub rows: Vec<CandleRecord>,
}

impl CandleTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
