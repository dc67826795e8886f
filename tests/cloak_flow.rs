//! End-to-end cloaking flow: validation -> orchestrator -> masking,
//! exercised with in-process stub backends instead of live services.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use shadowlink::error::{BackendError, BackendErrorKind};
use shadowlink::prelude::*;

/// Stub backend with a fixed outcome and an optional artificial delay.
struct StubBackend {
    name: &'static str,
    delay: Duration,
    outcome: Result<String, BackendErrorKind>,
}

impl StubBackend {
    fn succeeding(name: &'static str, short_url: &str, delay_ms: u64) -> Arc<dyn ShorteningBackend> {
        Arc::new(Self {
            name,
            delay: Duration::from_millis(delay_ms),
            outcome: Ok(short_url.to_string()),
        })
    }

    fn failing(name: &'static str, kind: BackendErrorKind, delay_ms: u64) -> Arc<dyn ShorteningBackend> {
        Arc::new(Self {
            name,
            delay: Duration::from_millis(delay_ms),
            outcome: Err(kind),
        })
    }
}

#[async_trait]
impl ShorteningBackend for StubBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn shorten(&self, _target: &TargetUrl) -> Result<String, BackendError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome
            .clone()
            .map_err(|kind| BackendError::new(self.name, kind))
    }
}

fn request() -> CloakRequest {
    CloakRequest::new(
        validate_url("https://example.com/path?q=1").unwrap(),
        validate_domain("google.com").unwrap(),
        validate_keyword("verify", 15).unwrap(),
    )
}

#[tokio::test]
async fn one_success_among_four_backends_yields_one_masked_url() {
    let service = CloakService::new(vec![
        StubBackend::failing("svc-1", BackendErrorKind::Timeout, 0),
        StubBackend::succeeding("svc-2", "https://tinyurl.com/zz9", 0),
        StubBackend::failing("svc-3", BackendErrorKind::HttpStatus { status: 502 }, 0),
        StubBackend::failing(
            "svc-4",
            BackendErrorKind::MalformedResponse {
                detail: "empty response body".to_string(),
            },
            0,
        ),
    ]);

    let outcome = service.cloak(&request()).await.unwrap();

    assert_eq!(outcome.masked_urls.len(), 1);
    assert_eq!(
        outcome.masked_urls[0].as_str(),
        "https://google.com-verify@tinyurl.com/zz9"
    );
    assert_eq!(outcome.failures.len(), 3);
}

#[tokio::test]
async fn output_order_follows_registration_not_completion() {
    // The first-registered backend finishes last; its link must still come
    // first in the outcome.
    let service = CloakService::new(vec![
        StubBackend::succeeding("slow", "https://a.example/slow", 80),
        StubBackend::succeeding("fast", "https://b.example/fast", 0),
        StubBackend::succeeding("mid", "https://c.example/mid", 30),
    ]);

    let outcome = service.cloak(&request()).await.unwrap();

    let masked: Vec<&str> = outcome.masked_urls.iter().map(|m| m.as_str()).collect();
    assert_eq!(
        masked,
        vec![
            "https://google.com-verify@a.example/slow",
            "https://google.com-verify@b.example/fast",
            "https://google.com-verify@c.example/mid",
        ]
    );
}

#[tokio::test]
async fn failure_order_follows_registration_too() {
    let service = CloakService::new(vec![
        StubBackend::failing("slow-fail", BackendErrorKind::Timeout, 60),
        StubBackend::succeeding("ok", "https://b.example/x", 0),
        StubBackend::failing("fast-fail", BackendErrorKind::HttpStatus { status: 500 }, 0),
    ]);

    let outcome = service.cloak(&request()).await.unwrap();

    assert_eq!(outcome.failures[0].service, "slow-fail");
    assert_eq!(outcome.failures[1].service, "fast-fail");
}

#[tokio::test]
async fn all_backends_failing_is_a_distinct_terminal_error() {
    let service = CloakService::new(vec![
        StubBackend::failing("svc-1", BackendErrorKind::Timeout, 0),
        StubBackend::failing(
            "svc-2",
            BackendErrorKind::Network {
                detail: "connection refused".to_string(),
            },
            10,
        ),
    ]);

    let err = service.cloak(&request()).await.unwrap_err();

    assert_eq!(err.failures().len(), 2);
    assert_eq!(err.failures()[0].service, "svc-1");
    assert_eq!(err.failures()[1].service, "svc-2");
    assert!(err.to_string().contains("all 2 shortening services failed"));
}

#[tokio::test]
async fn unmaskable_shortener_output_counts_as_that_backends_failure() {
    let service = CloakService::new(vec![
        StubBackend::succeeding("weird", "no-scheme-at-all", 0),
        StubBackend::succeeding("fine", "https://b.example/ok?k=1", 0),
    ]);

    let outcome = service.cloak(&request()).await.unwrap();

    assert_eq!(outcome.masked_urls.len(), 1);
    assert_eq!(
        outcome.masked_urls[0].as_str(),
        "https://google.com-verify@b.example/ok?k=1"
    );
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].service, "weird");
    assert!(matches!(
        outcome.failures[0].kind,
        BackendErrorKind::Masking(_)
    ));
}

#[tokio::test]
async fn repeated_cloak_calls_are_deterministic() {
    let make = || {
        CloakService::new(vec![
            StubBackend::succeeding("a", "https://a.example/1", 40),
            StubBackend::failing("b", BackendErrorKind::Timeout, 0),
            StubBackend::succeeding("c", "https://c.example/2", 10),
        ])
    };

    let first = make().cloak(&request()).await.unwrap();
    for _ in 0..3 {
        let again = make().cloak(&request()).await.unwrap();
        assert_eq!(first, again);
    }
}

#[tokio::test]
async fn report_from_end_to_end_outcome_carries_everything() {
    let service = CloakService::new(vec![
        StubBackend::succeeding("svc-1", "https://tinyurl.com/zz9", 0),
        StubBackend::failing("svc-2", BackendErrorKind::Timeout, 0),
    ]);

    let request = request();
    let outcome = service.cloak(&request).await.unwrap();
    let report = CloakReport::from_outcome(&request, &outcome);

    assert_eq!(report.original_url, "https://example.com/path?q=1");
    assert_eq!(report.domain, "google.com");
    assert_eq!(report.keyword, "verify");
    assert_eq!(
        report.masked_urls,
        vec!["https://google.com-verify@tinyurl.com/zz9"]
    );
    assert_eq!(report.failures, vec!["svc-2: request timed out"]);
}
