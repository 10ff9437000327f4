use thiserror::Error;

/// Boxed underlying cause of a transport failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a call to the usage-recording service
#[derive(Debug, Error)]
pub enum ClientError {
    /// The exchange did not complete (connect refused, DNS, timeout,
    /// unreadable or undecodable body)
    #[error("{0}")]
    Transport(#[source] BoxError),

    /// The service answered with a non-success status; `body` is shown as-is
    #[error("{body}")]
    RequestFailed { status: u16, body: String },
}

impl ClientError {
    /// Build a transport error from any cause
    pub fn transport(cause: impl Into<BoxError>) -> Self {
        Self::Transport(cause.into())
    }

    /// Status code of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(_) => None,
            Self::RequestFailed { status, .. } => Some(*status),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
