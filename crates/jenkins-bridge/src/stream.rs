//! Streaming response bodies
//!
//! Console logs and artifacts can be large, so they are exposed as a stream
//! of chunks instead of a buffered body. Each chunk read is bounded by the
//! caller's [`Context`].

use crate::context::Context;
use crate::error::{Error, Result};
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

/// A stream of body chunks.
pub struct ByteStream {
    inner: BoxStream<'static, Result<Bytes>>,
    content_length: Option<u64>,
}

impl ByteStream {
    /// Wrap a response body; every chunk read honours `ctx`.
    pub(crate) fn from_response(response: reqwest::Response, ctx: Context) -> Self {
        let content_length = response.content_length();
        let body = response.bytes_stream().boxed();

        let inner = stream::unfold(Some((body, ctx)), |state| async move {
            let (mut body, ctx) = state?;
            match ctx.run(async { Ok(body.next().await) }).await {
                Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some((body, ctx)))),
                Ok(Some(Err(e))) => Some((
                    Err(Error::Network(format!("failed to read response body: {}", e))),
                    None,
                )),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
        .boxed();

        Self {
            inner,
            content_length,
        }
    }

    /// A stream over in-memory chunks.
    pub fn from_chunks(chunks: Vec<Bytes>) -> Self {
        let content_length = chunks.iter().map(|c| c.len() as u64).sum();
        Self {
            inner: stream::iter(chunks.into_iter().map(Ok)).boxed(),
            content_length: Some(content_length),
        }
    }

    /// Length announced by the server, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Stop after `max_bytes`, truncating the final chunk.
    pub fn limit(self, max_bytes: u64) -> Self {
        let content_length = self.content_length.map(|len| len.min(max_bytes));
        let inner = stream::unfold((self.inner, max_bytes), |(mut inner, remaining)| async move {
            if remaining == 0 {
                return None;
            }
            match inner.next().await? {
                Ok(mut chunk) => {
                    if chunk.len() as u64 > remaining {
                        chunk.truncate(remaining as usize);
                    }
                    let left = remaining - chunk.len() as u64;
                    Some((Ok(chunk), (inner, left)))
                }
                Err(e) => Some((Err(e), (inner, 0))),
            }
        })
        .boxed();

        Self {
            inner,
            content_length,
        }
    }

    /// Read the whole stream into memory.
    pub async fn collect_bytes(mut self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.inner.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Read the whole stream as text; invalid UTF-8 is replaced.
    pub async fn collect_text(self) -> Result<String> {
        let bytes = self.collect_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Stream for ByteStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}
