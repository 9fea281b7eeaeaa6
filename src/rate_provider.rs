//! Provider abstractions for daily currency exchange rates.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Display;

/// Rates for one subject currency: maps another currency's code to how many
/// units of it equal 1 unit of the subject currency.
pub type RateMapping = HashMap<String, f64>;

/// Errors a rate fetch can fail with. Clonable because the fetcher carries
/// the latest failure through a watch channel; the underlying reqwest and
/// serde_json errors are captured as display strings.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request for '{code}' rates failed: {reason}")]
    Network { code: String, reason: String },
    #[error("invalid rates document for '{code}': {reason}")]
    Parse { code: String, reason: String },
}

impl FetchError {
    pub fn network(code: &str, reason: impl Display) -> Self {
        FetchError::Network {
            code: code.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(code: &str, reason: impl Display) -> Self {
        FetchError::Parse {
            code: code.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
pub trait CurrencyRatesProvider: Send + Sync {
    /// Fetch the day's full rate mapping for `code`.
    ///
    /// Returns `Ok(None)` when the provider's document has no entry for
    /// `code`; that is an answer, not an error. The code is forwarded
    /// verbatim, no normalization or validation happens here.
    async fn fetch_rates(&self, code: &str) -> Result<Option<RateMapping>, FetchError>;
}
