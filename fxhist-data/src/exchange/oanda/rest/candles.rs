use crate::{
    candle::CandleRecord,
    exchange::oanda::OANDA_CANDLES_PATH,
    rest::{client::RestRequest, window::RequestWindow},
};
use chrono::{DateTime, SecondsFormat, Utc};
use fxhist_instrument::InstrumentName;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// REST request to fetch the candles of one [`RequestWindow`] from the Oanda v1 API.
#[derive(Debug, Clone)]
pub struct GetCandles {
    pub params: GetCandlesParams,
}

/// Query parameters for an Oanda candles REST request.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GetCandlesParams {
    pub instrument: String,
    pub granularity: String,
    pub start: String,
    pub end: String,
}

impl GetCandles {
    pub fn new(window: &RequestWindow, instrument: &InstrumentName) -> Self {
        Self {
            params: GetCandlesParams {
                instrument: instrument.as_str().to_owned(),
                granularity: window.granularity.as_str().to_owned(),
                start: oanda_timestamp(window.start),
                end: oanda_timestamp(window.end),
            },
        }
    }
}

impl RestRequest for GetCandles {
    type Response = OandaCandlesResponse;
    type QueryParams = GetCandlesParams;

    fn path(&self) -> Cow<'static, str> {
        Cow::Borrowed(OANDA_CANDLES_PATH)
    }

    fn query_params(&self) -> Option<&Self::QueryParams> {
        Some(&self.params)
    }
}

/// Format an instant as RFC 3339 with an explicit UTC designator, eg/ "2014-01-01T00:00:00Z".
pub fn oanda_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Oanda candles response envelope.
///
/// ```json
/// {
///   "instrument": "EUR_USD",
///   "granularity": "H1",
///   "candles": [{ "time": "2014-01-01T22:00:00.000000Z", "openAsk": 1.37727, ... }]
/// }
/// ```
///
/// Candles are kept as raw JSON so that one malformed entry does not fail the whole window.
#[derive(Debug, Deserialize)]
pub struct OandaCandlesResponse {
    #[serde(default)]
    pub instrument: Option<String>,
    #[serde(default)]
    pub granularity: Option<String>,
    pub candles: Vec<serde_json::Value>,
}

/// Raw bid/ask candle returned by the Oanda v1 candles endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OandaCandleRaw {
    pub time: DateTime<Utc>,
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

impl From<OandaCandleRaw> for CandleRecord {
    fn from(raw: OandaCandleRaw) -> Self {
        Self {
            timestamp: raw.time,
            open_ask: raw.open_ask,
            close_ask: raw.close_ask,
            high_ask: raw.high_ask,
            low_ask: raw.low_ask,
            open_bid: raw.open_bid,
            close_bid: raw.close_bid,
            high_bid: raw.high_bid,
            low_bid: raw.low_bid,
            volume: raw.volume,
        }
    }
}

impl TryFrom<&serde_json::Value> for CandleRecord {
    type Error = serde_json::Error;

    fn try_from(raw: &serde_json::Value) -> Result<Self, Self::Error> {
        OandaCandleRaw::deserialize(raw).map(CandleRecord::from)
    }
}
