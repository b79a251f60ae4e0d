use reqwest::StatusCode;

/// Errors surfaced by generated clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("server responded with {status}: {body}")]
  Status { status: StatusCode, body: String },

  #[error("HTTP transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("JSON deserialization error at path {path}: {inner}")]
  Decode { path: String, inner: serde_json::Error },

  #[error("JSON serialization error: {0}")]
  Encode(#[source] serde_json::Error),

  #[error("invalid value for header `{name}`")]
  InvalidHeader { name: String },

  #[error("invalid request url: {0}")]
  InvalidUrl(String),
}

impl ApiError {
  /// Returns the HTTP status for [`ApiError::Status`] failures.
  #[must_use]
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Status { status, .. } => Some(*status),
      Self::Transport(err) => err.status(),
      _ => None,
    }
  }
}
