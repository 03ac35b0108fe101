use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("remote config location not found: {url}")]
    NotFound { url: String },

    #[error("DNS resolution failed while reaching {url}")]
    Dns { url: String },

    #[error("connection timed out while fetching {url}")]
    Timeout { url: String },

    #[error("error parsing remote JSON from {url}: {detail}")]
    Parse { url: String, detail: String },

    #[error("transport error while fetching {url}: {detail}")]
    Transport { url: String, detail: String },

    #[error("index error: {0}")]
    Index(#[from] docdex_index::IndexError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("autodocs registry error: {0}")]
    Registry(String),

    #[error("config store error: {0}")]
    Store(String),

    #[error("{0}")]
    Other(String),
}

impl SyncError {
    /// Longer, user-facing guidance for a failed update cycle. Every class
    /// maps to a distinct message but the same control flow: the cycle
    /// fails and is not retried until the next tick or a forced call.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            SyncError::NotFound { url } => format!(
                "The remote config directory could not be located, so there is \
                 nowhere to pull docs from. Url attempted: {url}"
            ),
            SyncError::Dns { .. } => String::from(
                "DNS resolution failed while checking for doc updates. \
                 Is this machine connected to the internet?",
            ),
            SyncError::Timeout { .. } => String::from(
                "The connection timed out while fetching the doc index. \
                 How is that internet connection looking?",
            ),
            SyncError::Parse { url, detail } => {
                format!("The remote at {url} returned JSON that could not be parsed: {detail}")
            }
            other => format!("Unexpected error while requesting the remote index: {other}"),
        }
    }
}
