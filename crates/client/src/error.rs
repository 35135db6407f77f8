use reqwest::StatusCode;
use thiserror::Error;

/// Failure surface exposed to every caller of the client.
///
/// A 401 that the client manages to recover through a silent refresh never
/// shows up here; callers only ever see the final outcome of a request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("http {status}: {body}")]
    Http { status: StatusCode, body: String },
    /// The session could not be recovered: no refresh credential was
    /// available, the refresh exchange failed, or the replayed request was
    /// rejected again. The session-expired side effect has already fired.
    #[error("session expired")]
    AuthExpired,
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether this error means the user is effectively logged out.
    #[inline]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// HTTP status of a server rejection, if this was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
