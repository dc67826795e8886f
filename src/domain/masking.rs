//! The userinfo-injection transform that produces the disguised link.
//!
//! `https://tinyurl.com/abc` masked with domain `facebook.com` and keyword
//! `login` becomes `https://facebook.com-login@tinyurl.com/abc`: browsers
//! render the text before `@` as if it were the host, while the connection
//! goes to the real authority after it.

use url::Url;

use crate::domain::values::{DisguiseDomain, Keyword, MaskedUrl};
use crate::error::MaskingError;

/// Rewrites a shortened URL's authority to carry `domain-keyword` as its
/// userinfo component.
///
/// Pure and idempotent for fixed inputs: no network, no I/O, no mutation.
/// Path, query, and fragment of the short URL are preserved verbatim.
///
/// # Errors
///
/// Returns [`MaskingError`] when the short URL cannot be parsed or lacks a
/// scheme or authority. A malformed shortener response is a recoverable
/// failure for the orchestrator, never a crash.
pub fn mask(
    domain: &DisguiseDomain,
    keyword: &Keyword,
    short_url: &str,
) -> Result<MaskedUrl, MaskingError> {
    let parsed = Url::parse(short_url).map_err(|e| match e {
        url::ParseError::RelativeUrlWithoutBase => MaskingError::MissingScheme {
            url: short_url.to_string(),
        },
        other => MaskingError::Unparseable {
            url: short_url.to_string(),
            detail: other.to_string(),
        },
    })?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| MaskingError::MissingAuthority {
            url: short_url.to_string(),
        })?;

    let mut authority = host.to_string();
    if let Some(port) = parsed.port() {
        authority.push(':');
        authority.push_str(&port.to_string());
    }

    let mut tail = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        tail.push('?');
        tail.push_str(query);
    }
    if let Some(fragment) = parsed.fragment() {
        tail.push('#');
        tail.push_str(fragment);
    }

    Ok(MaskedUrl::new(format!(
        "{}://{}-{}@{}{}",
        parsed.scheme(),
        domain,
        keyword,
        authority,
        tail
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::DEFAULT_MAX_KEYWORD_LENGTH;

    fn domain(raw: &str) -> DisguiseDomain {
        DisguiseDomain::parse(raw).unwrap()
    }

    fn keyword(raw: &str) -> Keyword {
        Keyword::parse(raw, DEFAULT_MAX_KEYWORD_LENGTH).unwrap()
    }

    #[test]
    fn test_mask_injects_userinfo_and_preserves_path() {
        let masked = mask(
            &domain("facebook.com"),
            &keyword("login"),
            "https://tinyurl.com/abc123",
        )
        .unwrap();

        assert_eq!(masked.as_str(), "https://facebook.com-login@tinyurl.com/abc123");
    }

    #[test]
    fn test_mask_preserves_query_and_fragment() {
        let masked = mask(
            &domain("google.com"),
            &keyword("verify"),
            "https://da.gd/x?ref=1#top",
        )
        .unwrap();

        assert_eq!(masked.as_str(), "https://google.com-verify@da.gd/x?ref=1#top");
    }

    #[test]
    fn test_mask_keeps_explicit_port() {
        let masked = mask(
            &domain("example.com"),
            &keyword("login"),
            "http://clck.ru:8080/zz",
        )
        .unwrap();

        assert_eq!(masked.as_str(), "http://example.com-login@clck.ru:8080/zz");
    }

    #[test]
    fn test_mask_is_idempotent_for_fixed_inputs() {
        let d = domain("x.com");
        let k = keyword("pay");

        let first = mask(&d, &k, "https://tinyurl.com/zz9").unwrap();
        let second = mask(&d, &k, "https://tinyurl.com/zz9").unwrap();

        assert_eq!(first, second);
        // Inputs are untouched.
        assert_eq!(d.as_str(), "x.com");
        assert_eq!(k.as_str(), "pay");
    }

    #[test]
    fn test_mask_rejects_missing_scheme() {
        let err = mask(&domain("x.com"), &keyword("go"), "tinyurl.com/abc").unwrap_err();
        assert!(matches!(err, MaskingError::MissingScheme { .. }));
    }

    #[test]
    fn test_mask_rejects_missing_authority() {
        let err = mask(&domain("x.com"), &keyword("go"), "mailto:user@example.com").unwrap_err();
        assert!(matches!(err, MaskingError::MissingAuthority { .. }));

        let err = mask(&domain("x.com"), &keyword("go"), "data:text/plain,hi").unwrap_err();
        assert!(matches!(err, MaskingError::MissingAuthority { .. }));
    }

    #[test]
    fn test_mask_rejects_garbage() {
        let err = mask(&domain("x.com"), &keyword("go"), "https://exa mple.com/").unwrap_err();
        assert!(matches!(err, MaskingError::Unparseable { .. }));
    }
}
