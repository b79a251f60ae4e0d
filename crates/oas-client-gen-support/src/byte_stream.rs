use std::{
  pin::Pin,
  task::{Context, Poll},
};

use bytes::{Bytes, BytesMut};
use futures_core::Stream;

use crate::ApiError;

type BoxedChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

enum Source {
  Buffered(Option<Bytes>),
  Streaming(BoxedChunkStream),
}

/// A binary payload that is either held in memory or streamed from an HTTP response.
///
/// Generated clients use this for `format: binary` schemas and `application/octet-stream`
/// responses, so large downloads never have to be buffered in full.
///
/// # Example
///
/// ```ignore
/// use futures::StreamExt;
///
/// let mut stream = client.download_report(42).await?;
/// while let Some(chunk) = stream.next().await {
///     file.write_all(&chunk?).await?;
/// }
/// ```
pub struct ByteStream {
  source: Source,
}

impl std::fmt::Debug for ByteStream {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match &self.source {
      Source::Buffered(bytes) => f
        .debug_struct("ByteStream")
        .field("buffered", &bytes.as_ref().map_or(0, Bytes::len))
        .finish(),
      Source::Streaming(_) => f.debug_struct("ByteStream").finish_non_exhaustive(),
    }
  }
}

impl Default for ByteStream {
  fn default() -> Self {
    Self::from_bytes(Bytes::new())
  }
}

impl ByteStream {
  /// Wraps an in-memory buffer.
  #[must_use]
  pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
    Self {
      source: Source::Buffered(Some(bytes.into())),
    }
  }

  /// Streams the body of an HTTP response without buffering it.
  #[must_use]
  pub fn from_response(response: reqwest::Response) -> Self {
    Self {
      source: Source::Streaming(Box::pin(response.bytes_stream())),
    }
  }

  /// Converts the payload into a request body.
  #[must_use]
  pub fn into_body(self) -> reqwest::Body {
    match self.source {
      Source::Buffered(bytes) => reqwest::Body::from(bytes.unwrap_or_default()),
      Source::Streaming(stream) => reqwest::Body::wrap_stream(stream),
    }
  }

  /// Drains the stream into a single contiguous buffer.
  pub async fn collect(mut self) -> Result<Bytes, ApiError> {
    if let Source::Buffered(bytes) = &mut self.source {
      return Ok(bytes.take().unwrap_or_default());
    }

    let mut buffer = BytesMut::new();
    while let Some(chunk) = std::future::poll_fn(|cx| Pin::new(&mut self).poll_next(cx)).await {
      buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer.freeze())
  }
}

impl From<Vec<u8>> for ByteStream {
  fn from(value: Vec<u8>) -> Self {
    Self::from_bytes(value)
  }
}

impl From<Bytes> for ByteStream {
  fn from(value: Bytes) -> Self {
    Self::from_bytes(value)
  }
}

impl Stream for ByteStream {
  type Item = Result<Bytes, reqwest::Error>;

  fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    match &mut self.source {
      Source::Buffered(bytes) => Poll::Ready(bytes.take().map(Ok)),
      Source::Streaming(stream) => stream.as_mut().poll_next(cx),
    }
  }
}
