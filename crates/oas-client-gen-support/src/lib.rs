//! Runtime support for clients produced by `oas-client-gen`.
//!
//! Generated code only depends on the items re-exported here plus `reqwest`, `serde`,
//! `serde_json` and `chrono`.

mod byte_stream;
mod error;

use std::fmt::Display;

pub use byte_stream::ByteStream;
pub use error::ApiError;
pub use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Response, Url, header::HeaderValue, multipart::Part};
use serde::{Serialize, de::DeserializeOwned};

pub const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[inline]
#[must_use]
pub fn percent_encode_path_segment(segment: &str) -> String {
  utf8_percent_encode(segment, PATH_ENCODE_SET).to_string()
}

/// Appends an already-encoded path to the configured base URL.
pub fn join_url(base_url: &str, path: &str) -> Result<Url, ApiError> {
  let raw = format!("{}{path}", base_url.trim_end_matches('/'));
  Url::parse(&raw).map_err(|err| ApiError::InvalidUrl(format!("{raw}: {err}")))
}

/// Passes 2xx responses through and turns everything else into [`ApiError::Status`].
pub async fn error_for_status(response: Response) -> Result<Response, ApiError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(ApiError::Status { status, body })
}

/// Reads the whole body and deserializes it as JSON, reporting the failing path on error.
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
  let bytes = response.bytes().await?;
  decode_json_slice(&bytes)
}

fn decode_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
  let mut de = serde_json::Deserializer::from_slice(bytes);
  serde_path_to_error::deserialize(&mut de).map_err(|err| ApiError::Decode {
    path: err.path().to_string(),
    inner: err.into_inner(),
  })
}

/// Builds a header value from anything printable.
pub fn header_value(name: &str, value: impl Display) -> Result<HeaderValue, ApiError> {
  HeaderValue::from_str(&value.to_string()).map_err(|_| ApiError::InvalidHeader { name: name.to_string() })
}

/// A multipart part carrying a file upload.
#[must_use]
pub fn file_part(data: ByteStream, file_name: impl Into<String>) -> Part {
  Part::stream(data.into_body()).file_name(file_name.into())
}

/// Renders any serializable value the way it travels in a path, header, query or text part.
///
/// Strings are sent without quotes, `null` as an empty string, and structures as JSON text.
pub fn to_text<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
  let value = serde_json::to_value(value).map_err(ApiError::Encode)?;
  Ok(json_value_text(value)?.unwrap_or_default())
}

/// Renders a JSON value as a multipart text field; `None` for `null`.
pub fn json_value_text(value: serde_json::Value) -> Result<Option<String>, ApiError> {
  Ok(match value {
    serde_json::Value::Null => None,
    serde_json::Value::String(s) => Some(s),
    serde_json::Value::Number(n) => Some(n.to_string()),
    serde_json::Value::Bool(b) => Some(b.to_string()),
    other => Some(serde_json::to_string(&other).map_err(ApiError::Encode)?),
  })
}
