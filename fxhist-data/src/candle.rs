use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalised fxhist bid/ask OHLCV [`CandleRecord`] model.
///
/// Each candle carries independent open/high/low/close prices for both sides of the quote.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct CandleRecord {
    pub timestamp: DateTime<Utc>,
    pub open_ask: Decimal,
    pub close_ask: Decimal,
    pub high_ask: Decimal,
    pub low_ask: Decimal,
    pub open_bid: Decimal,
    pub close_bid: Decimal,
    pub high_bid: Decimal,
    pub low_bid: Decimal,
    pub volume: u64,
}
