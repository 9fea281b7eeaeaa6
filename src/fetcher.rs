//! Reactive currency-rate state.
//!
//! `RateFetcher` re-fetches whenever the observed currency code changes and
//! publishes the latest good `RateMapping` over a watch channel. Failures
//! never clobber previously published rates; they surface on a separate
//! error channel that callers may watch or ignore.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use crate::rate_provider::{CurrencyRatesProvider, FetchError, RateMapping};

struct Inner {
    provider: Arc<dyn CurrencyRatesProvider>,
    rates_tx: watch::Sender<Option<RateMapping>>,
    error_tx: watch::Sender<Option<FetchError>>,
    last_code: Mutex<Option<String>>,
    issued: AtomicU64,
    // Highest sequence number whose completion has been processed. Guarded
    // by a mutex so the stale check and the publish are atomic.
    applied: Mutex<u64>,
}

pub struct RateFetcher {
    inner: Arc<Inner>,
}

impl RateFetcher {
    pub fn new(provider: Arc<dyn CurrencyRatesProvider>) -> Self {
        let (rates_tx, _) = watch::channel(None);
        let (error_tx, _) = watch::channel(None);

        RateFetcher {
            inner: Arc::new(Inner {
                provider,
                rates_tx,
                error_tx,
                last_code: Mutex::new(None),
                issued: AtomicU64::new(0),
                applied: Mutex::new(0),
            }),
        }
    }

    /// Latest good rates: `None` until the first successful fetch, then the
    /// last successfully retrieved mapping. A successful response that lacks
    /// the requested code publishes `None` again.
    pub fn subscribe(&self) -> watch::Receiver<Option<RateMapping>> {
        self.inner.rates_tx.subscribe()
    }

    /// Most recent fetch failure, cleared on the next successful fetch.
    pub fn errors(&self) -> watch::Receiver<Option<FetchError>> {
        self.inner.error_tx.subscribe()
    }

    /// Observe a currency code. A change from the previously observed code
    /// (including the very first call) starts one fetch in the background;
    /// an unchanged code issues no request. Never blocks on the network.
    ///
    /// Each fetch carries a sequence number taken at issue time. Only the
    /// completion with the highest sequence number seen so far is applied,
    /// so when codes change rapidly an older response cannot overwrite a
    /// newer one.
    pub async fn set(&self, code: &str) {
        {
            let mut last = self.inner.last_code.lock().await;
            if last.as_deref() == Some(code) {
                debug!("Code '{}' unchanged, skipping fetch", code);
                return;
            }
            *last = Some(code.to_string());
        }

        let seq = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(&self.inner);
        let code = code.to_string();

        debug!("Issuing fetch #{} for '{}'", seq, code);
        tokio::spawn(async move {
            let outcome = inner.provider.fetch_rates(&code).await;

            let mut applied = inner.applied.lock().await;
            if seq <= *applied {
                debug!("Dropping stale completion #{} for '{}'", seq, code);
                return;
            }
            *applied = seq;

            match outcome {
                Ok(rates) => {
                    debug!(
                        "Publishing {} rates for '{}' from fetch #{}",
                        rates.as_ref().map_or(0, RateMapping::len),
                        code,
                        seq
                    );
                    // Clear the error before publishing so an observer woken
                    // by the rates update sees a consistent pair.
                    inner.error_tx.send_if_modified(|e| e.take().is_some());
                    inner.rates_tx.send_replace(rates);
                }
                Err(err) => {
                    warn!("Fetch #{} for '{}' failed, keeping previous rates: {}", seq, code, err);
                    inner.error_tx.send_replace(Some(err));
                }
            }
        });
    }
}
