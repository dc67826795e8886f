//! Syntactic validation of the three user-supplied inputs.
//!
//! All checks are pure predicates over strings: no I/O, no DNS lookups.
//! Every rejection carries the offending value and a distinct reason, never
//! a boolean-only signal, because the CLI surfaces the specific message.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::values::{DisguiseDomain, Keyword, TargetUrl};
use crate::error::{
    InvalidDomainReason, InvalidKeywordReason, InvalidUrlReason, ValidationError,
};

/// Anchored pattern for the authority+path part of a target URL.
///
/// Host is a dotted DNS name ending in an alphabetic TLD, `localhost`, or an
/// IPv4 dotted quad; each may carry a 1-5 digit port. The optional path must
/// start with `/` and contain no whitespace.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}(?::\d{1,5})?|localhost(?::\d{1,5})?|(?:\d{1,3}\.){3}\d{1,3}(?::\d{1,5})?)(?:/\S*)?$",
    )
    .expect("url regex must compile")
});

/// Captures whatever scheme prefix is present, valid or not.
static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.-]*)://").expect("scheme regex must compile")
});

/// Anchored pattern for a disguise domain: one or more DNS labels followed
/// by an alphabetic TLD of at least two characters.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$")
        .expect("domain regex must compile")
});

static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("keyword regex must compile"));

/// Checks that `raw` is a syntactically valid HTTP(S) URL.
///
/// Accepts only `http`/`https` (case-insensitive), a host that is a DNS
/// name, `localhost`, or an IPv4 address, an optional numeric port, and an
/// optional whitespace-free path/query. The whole string must match; no
/// trailing garbage is tolerated.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidUrl`] with the first failing reason.
pub fn validate_url(raw: &str) -> Result<TargetUrl, ValidationError> {
    let trimmed = raw.trim();

    let reject = |reason| {
        Err(ValidationError::InvalidUrl {
            value: trimmed.to_string(),
            reason,
        })
    };

    if trimmed.is_empty() {
        return reject(InvalidUrlReason::Empty);
    }

    if trimmed.chars().any(char::is_whitespace) {
        return reject(InvalidUrlReason::ContainsWhitespace);
    }

    match SCHEME_RE.captures(trimmed) {
        None => return reject(InvalidUrlReason::MissingScheme),
        Some(caps) => {
            let scheme = &caps[1];
            if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
                return reject(InvalidUrlReason::UnsupportedScheme {
                    scheme: scheme.to_ascii_lowercase(),
                });
            }
        }
    }

    if !URL_RE.is_match(trimmed) {
        return reject(InvalidUrlReason::InvalidHost);
    }

    Ok(TargetUrl::from_validated(trimmed.to_string()))
}

/// Checks that `raw` is a syntactically valid domain name.
///
/// Dot-placement problems are reported with their own reasons before the
/// structural match so the user sees the actual mistake, not a generic
/// "invalid domain".
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDomain`] with the first failing reason.
pub fn validate_domain(raw: &str) -> Result<DisguiseDomain, ValidationError> {
    let trimmed = raw.trim();

    let reject = |reason| {
        Err(ValidationError::InvalidDomain {
            value: trimmed.to_string(),
            reason,
        })
    };

    if trimmed.is_empty() {
        return reject(InvalidDomainReason::Empty);
    }

    if trimmed.starts_with('.') || trimmed.ends_with('.') {
        return reject(InvalidDomainReason::LeadingOrTrailingDot);
    }

    if trimmed.contains("..") {
        return reject(InvalidDomainReason::ConsecutiveDots);
    }

    if !DOMAIN_RE.is_match(trimmed) {
        return reject(InvalidDomainReason::Malformed);
    }

    Ok(DisguiseDomain::from_validated(trimmed.to_string()))
}

/// Checks that `raw` is a usable masking keyword.
///
/// Allowed charset is exactly `[A-Za-z0-9-]`, hyphens may not sit at either
/// edge, and the length is capped at `max_length` characters.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidKeyword`] with the first failing reason.
pub fn validate_keyword(raw: &str, max_length: usize) -> Result<Keyword, ValidationError> {
    let trimmed = raw.trim();

    let reject = |reason| {
        Err(ValidationError::InvalidKeyword {
            value: trimmed.to_string(),
            reason,
        })
    };

    if trimmed.is_empty() {
        return reject(InvalidKeywordReason::Empty);
    }

    if trimmed.starts_with('-') || trimmed.ends_with('-') {
        return reject(InvalidKeywordReason::EdgeHyphen);
    }

    if trimmed.chars().count() > max_length {
        return reject(InvalidKeywordReason::TooLong { max: max_length });
    }

    if !KEYWORD_RE.is_match(trimmed) {
        return reject(InvalidKeywordReason::InvalidCharacter);
    }

    Ok(Keyword::from_validated(trimmed.to_string()))
}
