#![forbid(unsafe_code)]
#![warn(
    missing_debug_implementations,
    missing_copy_implementations,
    rust_2018_idioms
)]

//! Instrument and candle granularity definitions shared by the fxhist crates.

/// Fixed catalog of candle [`Granularity`](granularity::Granularity) codes, their
/// time spans and OANDA wire identifiers.
pub mod granularity;

/// OANDA instrument symbol, eg/ "EUR_USD".
pub mod instrument;

pub use granularity::{Granularity, UnknownGranularity, duration_of};
pub use instrument::InstrumentName;
