//! Orchestration of shortening backends and the masking transform.

use std::sync::Arc;

use futures_util::future;

use crate::domain::masking::mask;
use crate::domain::values::{CloakOutcome, CloakRequest, MaskedUrl};
use crate::error::{BackendError, CloakError};
use crate::infrastructure::shorteners::ShorteningBackend;

/// Drives the configured backend set for one cloak request.
///
/// Every backend is invoked exactly once per request; the calls run
/// concurrently but the aggregation joins them all in registration order,
/// so the output sequence is deterministic regardless of completion timing.
/// The service holds only the immutable backend set, so concurrent `cloak`
/// calls for different requests never interfere.
pub struct CloakService {
    backends: Vec<Arc<dyn ShorteningBackend>>,
}

impl CloakService {
    /// Creates a service over an ordered backend set.
    ///
    /// The vector order is the registration order that anchors output
    /// ordering.
    pub fn new(backends: Vec<Arc<dyn ShorteningBackend>>) -> Self {
        Self { backends }
    }

    /// Shortens the target through every backend and masks each success.
    ///
    /// A backend failure is isolated: it lands in the outcome's `failures`
    /// list and never aborts the request. A success whose output cannot be
    /// masked is recorded against that backend the same way. Partial
    /// success is the expected steady state. Dropping the returned future
    /// cancels all in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns [`CloakError::AllBackendsFailed`] only when no backend
    /// produced a maskable short URL; the error carries one entry per
    /// backend.
    pub async fn cloak(&self, request: &CloakRequest) -> Result<CloakOutcome, CloakError> {
        tracing::info!(
            target_url = %request.target,
            backends = self.backends.len(),
            "dispatching cloak request"
        );

        // join_all preserves input order, which keeps the aggregation
        // deterministic even though the calls complete in any order.
        let results = future::join_all(
            self.backends
                .iter()
                .map(|backend| async move { (backend.name(), backend.shorten(&request.target).await) }),
        )
        .await;

        let mut masked_urls: Vec<MaskedUrl> = Vec::new();
        let mut failures: Vec<BackendError> = Vec::new();

        for (service, result) in results {
            match result {
                Ok(short_url) => match mask(&request.domain, &request.keyword, &short_url) {
                    Ok(masked) => {
                        tracing::info!(service, masked_url = %masked, "masked short url");
                        masked_urls.push(masked);
                    }
                    Err(e) => {
                        tracing::warn!(service, error = %e, "unmaskable shortener output");
                        failures.push(BackendError::new(service, e.into()));
                    }
                },
                Err(e) => {
                    tracing::warn!(service, error = %e.kind, "shortening failed");
                    failures.push(e);
                }
            }
        }

        if masked_urls.is_empty() {
            tracing::error!(failures = failures.len(), "all shortening services failed");
            return Err(CloakError::AllBackendsFailed { failures });
        }

        Ok(CloakOutcome {
            masked_urls,
            failures,
        })
    }
}
