#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # fxhist-data
//! Downloads historical bid/ask candles for one instrument across an arbitrary date range by
//! chaining bounded requests against the Oanda REST API, then writes a single CSV table.
//!
//! ## Flow
//! * [`WindowPlan`](rest::window::WindowPlan) splits the job range into request windows of at
//!   most [`MAX_CANDLES_PER_REQUEST`](rest::window::MAX_CANDLES_PER_REQUEST) candles.
//! * A [`CandleFetcher`](rest::CandleFetcher) fetches each window, one at a time, with a fixed
//!   delay between requests.
//! * [`CandleSeries`](series::CandleSeries) folds every successful window in arrival order.
//! * [`write_csv`](sink::write_csv) persists the finalised table.
//!
//! A failed window or a malformed candle is logged and skipped; any other error aborts the job.
//!
//! ## Example
//! ```rust,no_run
//! use fxhist_data::{
//!     exchange::oanda::rest::OandaRestClient,
//!     job::{DownloadJob, JobConfig},
//! };
//! use fxhist_instrument::{Granularity, InstrumentName};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fxhist_data::error::DataError> {
//!     let client = OandaRestClient::new("my-token")?;
//!     let config = JobConfig::from_years(InstrumentName::from("EUR_USD"), Granularity::H1, 2014, 2015)?;
//!
//!     let report = DownloadJob::new(config).run_to_csv(&client).await?;
//!     println!("{report:?}");
//!     Ok(())
//! }
//! ```

/// Normalised bid/ask [`CandleRecord`](candle::CandleRecord) model.
pub mod candle;

/// All [`Error`](std::error::Error)s generated in fxhist-data.
pub mod error;

/// Broker specific REST clients, request and response types.
pub mod exchange;

/// Download job driver: [`JobConfig`](job::JobConfig), [`DownloadJob`](job::DownloadJob) and
/// [`JobReport`](job::JobReport).
pub mod job;

/// Generic REST plumbing: authenticated client, request window planning and the
/// [`CandleFetcher`](rest::CandleFetcher) abstraction.
pub mod rest;

/// Candle series assembly and the finalised time-indexed table.
pub mod series;

/// CSV serialisation of a finalised candle table.
pub mod sink;

