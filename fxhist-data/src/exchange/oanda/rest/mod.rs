use crate::{
    candle::CandleRecord,
    error::DataError,
    exchange::oanda::OANDA_PRACTICE_BASE_URL,
    rest::{CandleFetcher, WindowFetch, client::RestClient, window::RequestWindow},
};
use fxhist_instrument::InstrumentName;
use std::future::Future;
use tracing::{Instrument, debug, info, warn};

/// Oanda candles REST request, raw DTOs, and conversion to [`CandleRecord`].
pub mod candles;

/// REST client for the Oanda v1 candles endpoint.
///
/// A single client (and connection pool) is reused for every window of a job.
#[derive(Clone, Debug)]
pub struct OandaRestClient {
    pub client: RestClient,
}

impl OandaRestClient {
    /// Construct a new [`OandaRestClient`] against the Oanda practice environment.
    pub fn new(token: impl Into<String>) -> Result<Self, DataError> {
        Self::with_base_url(OANDA_PRACTICE_BASE_URL, token)
    }

    /// Construct an [`OandaRestClient`] with a custom base URL.
    ///
    /// Used to target the live environment, or a mock server in tests.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, DataError> {
        Ok(Self {
            client: RestClient::new(base_url, token)?,
        })
    }
}

/// Convert raw Oanda candles into [`CandleRecord`]s, skipping and logging malformed entries.
///
/// Returns the well-formed records in response order along with the number skipped.
pub fn parse_candles(raw_candles: &[serde_json::Value]) -> (Vec<CandleRecord>, usize) {
    let mut skipped = 0;

    let candles = raw_candles
        .iter()
        .filter_map(|raw| match CandleRecord::try_from(raw) {
            Ok(candle) => Some(candle),
            Err(error) => {
                let error = DataError::MalformedRecord(error.to_string());
                warn!(%error, candle = %raw, "skipping malformed candle");
                skipped += 1;
                None
            }
        })
        .collect();

    (candles, skipped)
}

impl CandleFetcher for OandaRestClient {
    /// Fetch the candles of one window from the Oanda REST API.
    ///
    /// Builds a [`GetCandles`](candles::GetCandles) request from the window, executes it once
    /// and converts each raw candle independently.
    fn fetch_window(
        &self,
        window: RequestWindow,
        instrument: &InstrumentName,
    ) -> impl Future<Output = Result<WindowFetch, DataError>> + Send {
        let span = tracing::info_span!(
            "fetch_window",
            exchange = "oanda",
            instrument = %instrument,
            granularity = %window.granularity,
        );
        let request = candles::GetCandles::new(&window, instrument);

        async move {
            info!(
                window_start = %request.params.start,
                window_end = %request.params.end,
                "requesting candles"
            );

            let response = match self.client.execute(request).await {
                Ok(response) => response,
                Err(error) => {
                    warn!(%error, window_start = %window.start, "candles request failed");
                    return Err(error);
                }
            };

            let (candles, skipped) = parse_candles(&response.candles);

            if skipped > 0 {
                // Log the full payload of any window with a malformed candle
                warn!(
                    skipped,
                    response = ?response,
                    "candles response contained malformed records"
                );
            }

            debug!(count = candles.len(), skipped, "fetched candles window");

            Ok(WindowFetch {
                window,
                candles,
                skipped,
            })
        }
        .instrument(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_candles_skips_malformed_entries() {
        let raw = vec![
            json!({
                "time": "2014-01-01T22:00:00.000000Z",
                "openAsk": 1.37727, "closeAsk": 1.37739, "highAsk": 1.37765, "lowAsk": 1.37694,
                "openBid": 1.37612, "closeBid": 1.37696, "highBid": 1.37703, "lowBid": 1.37591,
                "volume": 171
            }),
            json!({
                "time": "2014-01-01T23:00:00.000000Z",
                "openAsk": 1.37739,
                "volume": 12
            }),
            json!({
                "time": "2014-01-02T00:00:00.000000Z",
                "openAsk": 1.37740, "closeAsk": 1.37750, "highAsk": 1.37780, "lowAsk": 1.37700,
                "openBid": 1.37690, "closeBid": 1.37700, "highBid": 1.37710, "lowBid": 1.37600,
                "volume": 98
            }),
        ];

        let (candles, skipped) = parse_candles(&raw);

        assert_eq!(skipped, 1);
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].volume, 171);
        assert_eq!(candles[1].volume, 98);
    }

    #[test]
    fn test_parse_candles_empty() {
        let (candles, skipped) = parse_candles(&[]);
        assert!(candles.is_empty());
        assert_eq!(skipped, 0);
    }
}
