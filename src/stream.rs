//! Open response bodies returned by streaming calls.

use crate::error::{NlpCloudError, Result};
use crate::transport::{ByteStream, TransportResponse};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A live response body, read chunk by chunk as the server emits it.
///
/// The connection stays open until the stream is exhausted or dropped.
/// Framing of the chunks (plain text for generation endpoints) is left to
/// the caller.
pub struct ResponseStream {
    status: u16,
    headers: HeaderMap,
    body: ByteStream,
}

impl ResponseStream {
    pub(crate) fn new(response: TransportResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.body,
        }
    }

    /// Status of the response (200 or 202).
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Wait for the next chunk. `None` once the server closed the body.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        match self.body.next().await {
            Some(chunk) => Ok(Some(chunk?)),
            None => Ok(None),
        }
    }

    /// Read the rest of the stream and decode it as UTF-8 text.
    pub async fn text(mut self) -> Result<String> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.next_chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Close the connection without reading the rest of the body.
    pub fn close(self) {}
}

impl Stream for ResponseStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.body
            .poll_next_unpin(cx)
            .map(|chunk| chunk.map(|c| c.map_err(NlpCloudError::from)))
    }
}

impl std::fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStream")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn stream_of(chunks: &[&'static str]) -> ResponseStream {
        let body = stream::iter(
            chunks
                .iter()
                .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                .collect::<Vec<_>>(),
        )
        .boxed();
        ResponseStream::new(TransportResponse::new(200, body))
    }

    #[tokio::test]
    async fn test_next_chunk_yields_in_order() {
        let mut s = stream_of(&["Hel", "lo"]);
        assert_eq!(s.next_chunk().await.unwrap().unwrap(), "Hel");
        assert_eq!(s.next_chunk().await.unwrap().unwrap(), "lo");
        assert!(s.next_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_text_collects_remaining() {
        let s = stream_of(&["John ", "Doe ", "is"]);
        assert_eq!(s.status(), 200);
        assert_eq!(s.text().await.unwrap(), "John Doe is");
    }

    #[tokio::test]
    async fn test_stream_impl() {
        let chunks: Vec<Bytes> = stream_of(&["a", "b"])
            .map(|c| c.unwrap())
            .collect()
            .await;
        assert_eq!(chunks, vec![Bytes::from("a"), Bytes::from("b")]);
    }
}
