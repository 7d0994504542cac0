use reqwest::{header, Client};
use std::time::Duration;
use url::Url;

use crate::FetchError;

/// Responses past this size are dropped rather than parsed.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Bounded-timeout HTML retrieval over one shared connection pool.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch one URL. Only 2xx `text/html` responses under the size cap
    /// come back as a body; everything else is a `FetchError` for the
    /// caller to log and drop.
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(ct) = resp.headers().get(header::CONTENT_TYPE) {
            let ct = ct.to_str().unwrap_or_default();
            if !ct.starts_with("text/html") {
                return Err(FetchError::NotHtml(ct.to_string()));
            }
        }

        let bytes = resp.bytes().await.map_err(classify)?;
        if bytes.len() > MAX_BODY_BYTES {
            return Err(FetchError::TooLarge(bytes.len()));
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Connection(err.to_string())
    }
}
