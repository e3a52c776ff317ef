/// `Oanda` v1 REST API: base URLs, authenticated client and candles endpoint.
pub mod oanda;
