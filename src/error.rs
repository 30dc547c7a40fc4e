use thiserror::Error;

/// Failures of a single signed call.
///
/// Application-level outcomes (`code != 200`) are not represented here; they
/// come back as a decoded [`crate::ApiResponse`] the caller branches on.
#[derive(Debug, Error)]
pub enum YidunError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected http status ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl YidunError {
    /// The request never produced a usable HTTP 2xx response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }

    /// A response arrived but its body was not the expected JSON.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, YidunError>;
