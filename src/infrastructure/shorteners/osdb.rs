//! osdb.link provider.

use async_trait::async_trait;

use super::{ShorteningBackend, fetch_plain_text_short_url};
use crate::domain::values::TargetUrl;
use crate::error::BackendError;

pub(super) const SERVICE_NAME: &str = "osdb";

const API_URL: &str = "https://osdb.link/";

/// Backend for the osdb.link shortening API.
///
/// `POST /` with a form-encoded `url` field answers with the short URL as
/// plain text.
pub struct Osdb {
    http: reqwest::Client,
}

impl Osdb {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ShorteningBackend for Osdb {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn shorten(&self, target: &TargetUrl) -> Result<String, BackendError> {
        let request = self.http.post(API_URL).form(&[("url", target.as_str())]);
        fetch_plain_text_short_url(SERVICE_NAME, request).await
    }
}
