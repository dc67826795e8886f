//! URL shortening providers.
//!
//! Each provider wraps one external service behind the
//! [`ShorteningBackend`] trait. Backends know nothing about domains,
//! keywords, or masking: they take a validated target URL and return the
//! provider's short URL as a bare string, translating every provider
//! problem (timeout, non-2xx status, junk payload) into a typed
//! [`BackendError`] instead of letting it escape.

mod clckru;
mod dagd;
mod osdb;
mod tinyurl;

pub use clckru::ClckRu;
pub use dagd::DaGd;
pub use osdb::Osdb;
pub use tinyurl::TinyUrl;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use crate::config::ShadowlinkConfig;
use crate::domain::values::TargetUrl;
use crate::error::{BackendError, BackendErrorKind};

/// One external URL shortening provider.
///
/// Implementations must never panic or bubble a raw transport error: every
/// failure path returns a [`BackendError`] so the orchestrator can isolate
/// it. The request timeout is enforced by the HTTP client each backend is
/// constructed with.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShorteningBackend: Send + Sync {
    /// Stable service identifier used in configuration, logs, and errors.
    fn name(&self) -> &'static str;

    /// Shortens `target` via the external service.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on timeout, transport failure, non-success
    /// status, or an unusable response body.
    async fn shorten(&self, target: &TargetUrl) -> Result<String, BackendError>;
}

/// Service identifiers accepted in `enabled_services`, in default order.
pub const KNOWN_SERVICES: &[&str] = &[
    tinyurl::SERVICE_NAME,
    dagd::SERVICE_NAME,
    clckru::SERVICE_NAME,
    osdb::SERVICE_NAME,
];

/// Builds the ordered backend set named by the configuration.
///
/// The returned vector preserves `enabled_services` order, which defines the
/// registration order the orchestrator's output ordering is anchored to.
/// All backends share a single HTTP client carrying the configured timeout.
///
/// # Errors
///
/// Fails when the HTTP client cannot be constructed or a configured service
/// name is unknown.
pub fn registry(config: &ShadowlinkConfig) -> Result<Vec<Arc<dyn ShorteningBackend>>> {
    let http = build_http_client(Duration::from_secs(config.request_timeout_secs))
        .context("Failed to build HTTP client")?;

    let mut backends: Vec<Arc<dyn ShorteningBackend>> =
        Vec::with_capacity(config.enabled_services.len());

    for service in &config.enabled_services {
        let backend: Arc<dyn ShorteningBackend> = match service.as_str() {
            tinyurl::SERVICE_NAME => Arc::new(TinyUrl::new(http.clone())),
            dagd::SERVICE_NAME => Arc::new(DaGd::new(http.clone())),
            clckru::SERVICE_NAME => Arc::new(ClckRu::new(http.clone())),
            osdb::SERVICE_NAME => Arc::new(Osdb::new(http.clone())),
            unknown => bail!(
                "Unknown shortening service '{}' (known: {})",
                unknown,
                KNOWN_SERVICES.join(", ")
            ),
        };
        backends.push(backend);
    }

    Ok(backends)
}

/// Builds the shared HTTP client with the per-request timeout applied.
fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("shadowlink/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Maps a reqwest transport error into the backend error taxonomy.
pub(crate) fn map_transport_error(service: &'static str, err: reqwest::Error) -> BackendError {
    let kind = if err.is_timeout() {
        BackendErrorKind::Timeout
    } else if let Some(status) = err.status() {
        BackendErrorKind::HttpStatus {
            status: status.as_u16(),
        }
    } else {
        BackendErrorKind::Network {
            detail: err.to_string(),
        }
    };

    BackendError::new(service, kind)
}

/// Interprets a provider's plain-text response body as a short URL.
///
/// The body is trimmed; anything empty, multi-token, or not an absolute
/// http(s) URL is a malformed response. Some providers return a prose error
/// message with HTTP 200, which this catches.
pub(crate) fn parse_short_url(service: &'static str, body: &str) -> Result<String, BackendError> {
    let candidate = body.trim();

    let malformed = |detail: String| BackendError::new(service, BackendErrorKind::MalformedResponse { detail });

    if candidate.is_empty() {
        return Err(malformed("empty response body".to_string()));
    }

    if candidate.chars().any(char::is_whitespace) {
        return Err(malformed(format!(
            "expected a single short url, got: {}",
            truncate(candidate, 120)
        )));
    }

    if !candidate.starts_with("http://") && !candidate.starts_with("https://") {
        return Err(malformed(format!(
            "response is not an absolute http(s) url: {}",
            truncate(candidate, 120)
        )));
    }

    Ok(candidate.to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    }
}

/// Shared request flow for providers that answer with a plain-text body.
///
/// Sends the prepared request, rejects non-success statuses, and runs the
/// body through [`parse_short_url`].
pub(crate) async fn fetch_plain_text_short_url(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<String, BackendError> {
    let response = request
        .send()
        .await
        .map_err(|e| map_transport_error(service, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::new(
            service,
            BackendErrorKind::HttpStatus {
                status: status.as_u16(),
            },
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| map_transport_error(service, e))?;

    parse_short_url(service, &body)
}
