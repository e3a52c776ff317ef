pub mod client;
pub mod window;

use self::window::{RequestWindow, WindowPlan, Windows};
use crate::{candle::CandleRecord, error::DataError};
use futures::stream::{self, Stream};
use fxhist_instrument::InstrumentName;
use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tracing::debug;

/// Fixed pause between two consecutive window requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Candles fetched for a single [`RequestWindow`].
#[derive(Clone, Debug)]
pub struct WindowFetch {
    pub window: RequestWindow,
    /// Well-formed candles, in response order.
    pub candles: Vec<CandleRecord>,
    /// Number of candles in the response that were skipped as malformed.
    pub skipped: usize,
}

/// Terminal state of one window request.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum WindowStatus {
    Succeeded,
    PartiallyMalformed,
    HttpFailed,
}

impl WindowFetch {
    pub fn status(&self) -> WindowStatus {
        if self.skipped == 0 {
            WindowStatus::Succeeded
        } else {
            WindowStatus::PartiallyMalformed
        }
    }
}

/// Trait for fetching the historical candles of one bounded [`RequestWindow`].
pub trait CandleFetcher {
    /// Fetch every candle the remote API returns for `window`.
    ///
    /// Malformed candles are skipped and counted in [`WindowFetch::skipped`]. A non-success
    /// response status is returned as [`DataError::Http`].
    fn fetch_window(
        &self,
        window: RequestWindow,
        instrument: &InstrumentName,
    ) -> impl Future<Output = Result<WindowFetch, DataError>> + Send;
}

/// Internal state used by [`stream_windows`] to walk a [`WindowPlan`].
struct WindowStreamState<'a, Fetcher> {
    fetcher: &'a Fetcher,
    instrument: InstrumentName,
    windows: Windows,
    delay: Duration,
    done: bool,
}

/// Stream the outcome of every window in `plan`, strictly one request at a time.
///
/// After each window, whatever its outcome, the stream waits `delay` before issuing the next
/// request. Recoverable errors (see [`DataError::is_recoverable`]) are yielded and the stream
/// moves on to the next window. Any other error is yielded once and terminates the stream.
pub fn stream_windows<'a, Fetcher>(
    fetcher: &'a Fetcher,
    plan: WindowPlan,
    instrument: InstrumentName,
    delay: Duration,
) -> impl Stream<Item = Result<WindowFetch, DataError>> + 'a
where
    Fetcher: CandleFetcher + Sync,
{
    let state = WindowStreamState {
        fetcher,
        instrument,
        windows: plan.windows(),
        delay,
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        let window = state.windows.next()?;

        let outcome = state.fetcher.fetch_window(window, &state.instrument).await;

        if let Err(error) = &outcome {
            if !error.is_recoverable() {
                state.done = true;
                return Some((outcome, state));
            }
        }

        debug!(delay_ms = state.delay.as_millis() as u64, "throttling before next window");
        sleep(state.delay).await;

        Some((outcome, state))
    })
}
