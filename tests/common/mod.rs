//! Transport doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use nlpcloud::{
    Client, ClientConfig, Transport, TransportError, TransportRequest, TransportResponse,
};
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// What the fake transport answers with.
pub enum Reply {
    /// A complete response.
    Body {
        status: u16,
        headers: HeaderMap,
        body: Bytes,
    },
    /// A response whose body is fed through a channel by the test.
    Channel {
        status: u16,
        receiver: mpsc::UnboundedReceiver<Result<Bytes, TransportError>>,
    },
    /// A connection-level failure.
    Fail(String),
    /// Never answer.
    Hang,
}

/// Transport returning a canned reply and recording every request.
pub struct FakeTransport {
    reply: Mutex<Option<Reply>>,
    requests: Mutex<Vec<TransportRequest>>,
    calls: AtomicUsize,
}

impl FakeTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Some(reply)),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn json(status: u16, body: &str) -> Arc<Self> {
        Self::new(Reply::Body {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        })
    }

    pub fn with_headers(status: u16, headers: HeaderMap, body: &str) -> Arc<Self> {
        Self::new(Reply::Body {
            status,
            headers,
            body: Bytes::from(body.to_string()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::new(Reply::Fail(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn last_body_json(&self) -> serde_json::Value {
        let body = self.last_request().body.expect("request had no body");
        serde_json::from_slice(&body).expect("request body is not JSON")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);

        let reply = self.reply.lock().take().expect("fake transport used twice");
        match reply {
            Reply::Body {
                status,
                headers,
                body,
            } => Ok(TransportResponse::from_bytes(status, body).with_headers(headers)),
            Reply::Channel { status, receiver } => Ok(TransportResponse::new(
                status,
                UnboundedReceiverStream::new(receiver).boxed(),
            )),
            Reply::Fail(message) => Err(TransportError::Other(message)),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Other("hung transport woke up".to_string()))
            }
        }
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("en_core_web_lg", "test-token")
}

pub fn client(transport: Arc<FakeTransport>) -> Client {
    Client::with_transport(transport, config())
}
