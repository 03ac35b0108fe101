use crate::error::{Result, SyncError};
use async_trait::async_trait;
use std::time::Duration;

/// Capability to fetch a remote file body. The controller only ever sees
/// this seam, so tests can substitute canned or failing transports.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher over `reqwest` with rustls. No automatic retries; a failed
/// fetch fails the whole update cycle.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given overall request timeout. The timeout
    /// is interpreted post-hoc by error classification, not enforced
    /// anywhere else in the core.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SyncError::Other(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| classify(url, &err))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound {
                url: url.to_string(),
            });
        }
        let response = response
            .error_for_status()
            .map_err(|err| classify(url, &err))?;
        response.text().await.map_err(|err| classify(url, &err))
    }
}

fn classify(url: &str, err: &reqwest::Error) -> SyncError {
    let url = url.to_string();
    if err.is_timeout() {
        return SyncError::Timeout { url };
    }
    if err.is_connect() {
        // reqwest folds resolver failures into connect errors; the source
        // chain still names dns.
        let chain = format!("{err:?}").to_lowercase();
        if chain.contains("dns") {
            return SyncError::Dns { url };
        }
    }
    SyncError::Transport {
        url,
        detail: err.to_string(),
    }
}

/// Fetches `url` and parses the body as JSON. A parse failure on a
/// successful fetch is reported as [`SyncError::Parse`], distinct from any
/// transport error.
pub async fn fetch_json(fetcher: &dyn RemoteFetcher, url: &str) -> Result<serde_json::Value> {
    let body = fetcher.fetch(url).await?;
    serde_json::from_str(&body).map_err(|err| SyncError::Parse {
        url: url.to_string(),
        detail: err.to_string(),
    })
}
