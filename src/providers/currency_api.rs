use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::rate_provider::{CurrencyRatesProvider, FetchError, RateMapping};
use async_trait::async_trait;

/// Daily exchange-rate documents served by the fawazahmed0 currency-api
/// from the jsDelivr CDN. One JSON document per currency, no auth.
pub const DEFAULT_BASE_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1";

pub struct CurrencyApiProvider {
    base_url: String,
}

impl CurrencyApiProvider {
    pub fn new(base_url: &str) -> Self {
        CurrencyApiProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl CurrencyRatesProvider for CurrencyApiProvider {
    #[instrument(
        name = "CurrencyApiFetch",
        skip(self),
        fields(code = %code)
    )]
    async fn fetch_rates(&self, code: &str) -> Result<Option<RateMapping>, FetchError> {
        let url = format!("{}/currencies/{}.json", self.base_url, code);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxr/0.1")
            .build()
            .map_err(|e| FetchError::network(code, e))?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::network(code, e))?;

        if !response.status().is_success() {
            return Err(FetchError::network(
                code,
                format!("HTTP error: {}", response.status()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::network(code, e))?;

        // Document shape: { "date": "2024-03-06", "<code>": { "<other>": rate, ... } }
        let document: HashMap<String, Value> =
            serde_json::from_str(&text).map_err(|e| FetchError::parse(code, e))?;

        if let Some(date) = document.get("date").and_then(Value::as_str) {
            debug!("Rates document published on {}", date);
        }

        let Some(entry) = document.get(code) else {
            debug!("Document has no entry for '{}'", code);
            return Ok(None);
        };

        let rates: RateMapping =
            serde_json::from_value(entry.clone()).map_err(|e| FetchError::parse(code, e))?;

        debug!("Fetched {} rates for '{}'", rates.len(), code);
        Ok(Some(rates))
    }
}
