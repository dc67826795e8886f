//! Error taxonomy for validation, shortening, masking, and orchestration.
//!
//! Each error kind carries exactly the fields relevant to it: validation
//! errors carry the rejected value and a distinct reason, backend errors
//! carry the service name, and [`CloakError::AllBackendsFailed`] carries the
//! full per-service failure list so callers can surface it.

use thiserror::Error;

/// Why a target URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidUrlReason {
    #[error("must be a non-empty string")]
    Empty,

    #[error("must not contain whitespace")]
    ContainsWhitespace,

    #[error("must start with http:// or https://")]
    MissingScheme,

    #[error("scheme `{scheme}` is not supported, only http and https are allowed")]
    UnsupportedScheme { scheme: String },

    #[error("host must be a domain name, localhost, or an IPv4 address")]
    InvalidHost,
}

/// Why a disguise domain was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDomainReason {
    #[error("must be a non-empty string")]
    Empty,

    #[error("must not start or end with a dot")]
    LeadingOrTrailingDot,

    #[error("must not contain consecutive dots")]
    ConsecutiveDots,

    #[error("must be a valid domain name (e.g. example.com)")]
    Malformed,
}

/// Why a keyword was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidKeywordReason {
    #[error("must be a non-empty string")]
    Empty,

    #[error("must not start or end with a hyphen")]
    EdgeHyphen,

    #[error("must be {max} characters or less")]
    TooLong { max: usize },

    #[error("can only contain letters, digits, and hyphens")]
    InvalidCharacter,
}

/// Input validation failure for one of the three user-supplied fields.
///
/// Always carries the rejected value and a specific reason so the CLI can
/// tell the user exactly what to fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid url `{value}`: {reason}")]
    InvalidUrl {
        value: String,
        reason: InvalidUrlReason,
    },

    #[error("invalid domain `{value}`: {reason}")]
    InvalidDomain {
        value: String,
        reason: InvalidDomainReason,
    },

    #[error("invalid keyword `{value}`: {reason}")]
    InvalidKeyword {
        value: String,
        reason: InvalidKeywordReason,
    },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "url",
            Self::InvalidDomain { .. } => "domain",
            Self::InvalidKeyword { .. } => "keyword",
        }
    }

    /// The rejected input value.
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidUrl { value, .. }
            | Self::InvalidDomain { value, .. }
            | Self::InvalidKeyword { value, .. } => value,
        }
    }
}

/// Failure to rewrite a shortened URL into its masked form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskingError {
    #[error("short url `{url}` has no scheme")]
    MissingScheme { url: String },

    #[error("short url `{url}` has no authority")]
    MissingAuthority { url: String },

    #[error("short url `{url}` could not be parsed: {detail}")]
    Unparseable { url: String, detail: String },
}

/// What went wrong when talking to (or interpreting) one shortening service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendErrorKind {
    #[error("request timed out")]
    Timeout,

    #[error("service returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("malformed response: {detail}")]
    MalformedResponse { detail: String },

    #[error("network error: {detail}")]
    Network { detail: String },

    #[error(transparent)]
    Masking(#[from] MaskingError),
}

/// A single shortening service failed to produce a usable masked link.
///
/// Masking failures on a service's output are recorded here too: from the
/// caller's perspective both mean "this service did not produce a link".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{service}: {kind}")]
pub struct BackendError {
    pub service: &'static str,
    pub kind: BackendErrorKind,
}

impl BackendError {
    pub fn new(service: &'static str, kind: BackendErrorKind) -> Self {
        Self { service, kind }
    }
}

/// Terminal failure of a whole cloak request.
///
/// Raised only when every configured backend failed or produced unmaskable
/// output. Partial success is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloakError {
    #[error("all {} shortening services failed", failures.len())]
    AllBackendsFailed { failures: Vec<BackendError> },
}

impl CloakError {
    /// Per-service failures behind this error.
    pub fn failures(&self) -> &[BackendError] {
        match self {
            Self::AllBackendsFailed { failures } => failures,
        }
    }
}
