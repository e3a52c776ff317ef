use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// OANDA instrument symbol, eg/ "EUR_USD".
///
/// The symbol is passed through to the API verbatim; it is not validated.
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display, Constructor,
)]
pub struct InstrumentName(pub String);

impl InstrumentName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InstrumentName {
    fn default() -> Self {
        Self::from("EUR_USD")
    }
}

impl From<&str> for InstrumentName {
    fn from(symbol: &str) -> Self {
        Self(symbol.to_owned())
    }
}
