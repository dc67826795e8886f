//! clck.ru provider.

use async_trait::async_trait;

use super::{ShorteningBackend, fetch_plain_text_short_url};
use crate::domain::values::TargetUrl;
use crate::error::BackendError;

pub(super) const SERVICE_NAME: &str = "clckru";

const API_URL: &str = "https://clck.ru/--";

/// Backend for the clck.ru shortening API.
///
/// `GET /--?url=<target>` answers with the short URL as plain text.
pub struct ClckRu {
    http: reqwest::Client,
}

impl ClckRu {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ShorteningBackend for ClckRu {
    fn name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn shorten(&self, target: &TargetUrl) -> Result<String, BackendError> {
        let request = self.http.get(API_URL).query(&[("url", target.as_str())]);
        fetch_plain_text_short_url(SERVICE_NAME, request).await
    }
}
