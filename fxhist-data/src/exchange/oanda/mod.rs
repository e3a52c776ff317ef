/// REST client for the Oanda candles endpoint.
pub mod rest;

/// Base URL of the Oanda fxTrade Practice environment.
pub const OANDA_PRACTICE_BASE_URL: &str = "https://api-fxpractice.oanda.com";

/// Base URL of the Oanda fxTrade (live) environment.
pub const OANDA_LIVE_BASE_URL: &str = "https://api-fxtrade.oanda.com";

/// Path of the v1 instrument history endpoint.
pub const OANDA_CANDLES_PATH: &str = "/v1/candles";
