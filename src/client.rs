//! Request dispatch.
//!
//! Every endpoint goes through one of two routines on [`Client`]:
//! [`Client::issue_request`] buffers and decodes the response, and
//! [`Client::issue_streaming_request`] hands the open body to the caller.
//! Both check for a transport before doing anything else, set the
//! authentication headers, treat 200 and 202 as success and map every
//! other status through the error table.

use crate::config::ClientConfig;
use crate::error::{NlpCloudError, Result};
use crate::stream::ResponseStream;
use crate::transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("nlpcloud-rust-client/", env!("CARGO_PKG_VERSION"));

/// Per-call deadline and cancellation.
///
/// The default has neither: the call runs until the transport gives up.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl CallOptions {
    /// Options with no deadline and no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the call with [`NlpCloudError::TimedOut`] after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort the call with [`NlpCloudError::Cancelled`] when `token` fires.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Configured deadline.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Configured cancellation token.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Run `fut` under this deadline and cancellation token.
    async fn guard<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        let timed = async {
            match self.timeout {
                Some(after) => match tokio::time::timeout(after, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(NlpCloudError::TimedOut { after }),
                },
                None => fut.await,
            }
        };

        match &self.cancellation {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => Err(NlpCloudError::Cancelled),
                result = timed => result,
            },
            None => timed.await,
        }
    }
}

/// Client for the NLP Cloud API.
///
/// Cloning is cheap: clones share the configuration and the transport.
/// The configuration never changes after construction, so one client can
/// serve concurrent calls from many tasks.
#[derive(Clone)]
pub struct Client {
    transport: Option<Arc<dyn Transport>>,
    config: Arc<ClientConfig>,
    root_url: Arc<str>,
    options: CallOptions,
}

impl Client {
    /// Create a client backed by a `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::from_parts(Some(Arc::new(transport)), config))
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self::from_parts(Some(transport), config)
    }

    /// Create a client from an optional transport.
    ///
    /// A client without transport fails every call with
    /// [`NlpCloudError::NotConfigured`].
    pub fn from_parts(transport: Option<Arc<dyn Transport>>, config: ClientConfig) -> Self {
        let root_url = config.root_url();
        debug!(root_url = %root_url, "Created client");

        Self {
            transport,
            config: Arc::new(config),
            root_url: root_url.into(),
            options: CallOptions::default(),
        }
    }

    /// A clone of this client whose endpoint methods use `options`.
    #[must_use]
    pub fn with_options(&self, options: CallOptions) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolved root URL every endpoint path is appended to.
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Options applied by the endpoint methods.
    pub fn options(&self) -> &CallOptions {
        &self.options
    }

    /// POST `params` to `endpoint` and decode the response.
    ///
    /// Useful for endpoints without a dedicated method, and in async mode,
    /// where the API answers with an [`crate::AsyncJob`] instead of the
    /// endpoint's result.
    pub async fn call<P, R>(&self, endpoint: &str, params: &P) -> Result<R>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        self.issue_request(Method::POST, endpoint, Some(params), &self.options)
            .await
    }

    /// GET `endpoint` and decode the response.
    pub async fn get<R>(&self, endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.issue_request::<(), R>(Method::GET, endpoint, None, &self.options)
            .await
    }

    /// POST `params` to `endpoint` in streaming mode.
    pub async fn call_streaming<P>(&self, endpoint: &str, params: &P) -> Result<ResponseStream>
    where
        P: Serialize + ?Sized + Sync,
    {
        self.issue_streaming_request(Method::POST, endpoint, Some(params), &self.options)
            .await
    }

    /// Send one request and decode the buffered response into `R`.
    pub async fn issue_request<P, R>(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<&P>,
        options: &CallOptions,
    ) -> Result<R>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let transport = self.transport()?;

        let body = params
            .map(|p| serde_json::to_vec(p).map(Bytes::from))
            .transpose()
            .map_err(NlpCloudError::RequestEncode)?;

        let url = self.endpoint_url(endpoint);
        let body = self.execute(transport, method, url, body, options).await?;
        decode(&body)
    }

    /// Send one request with `"stream": true` and return the open body.
    ///
    /// The body is neither buffered nor decoded on success. On failure it
    /// is drained into the returned error.
    pub async fn issue_streaming_request<P>(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<&P>,
        options: &CallOptions,
    ) -> Result<ResponseStream>
    where
        P: Serialize + ?Sized + Sync,
    {
        let transport = self.transport()?;
        let body = streaming_payload(params)?;
        let url = self.endpoint_url(endpoint);
        let request = self.build_request(method, url, Some(body))?;

        let response = options
            .guard(async { Ok::<_, NlpCloudError>(transport.send(request).await?) })
            .await?;
        debug!(endpoint, status = response.status, "Received streaming response");

        if is_success(response.status) {
            return Ok(ResponseStream::new(response));
        }

        let TransportResponse {
            status,
            headers,
            body,
        } = response;
        let body = options
            .guard(async {
                Ok::<_, NlpCloudError>(TransportResponse::new(status, body).bytes().await?)
            })
            .await
            .unwrap_or_default();
        Err(NlpCloudError::from_response(status, &headers, &body))
    }

    /// Send a request to an absolute URL and return the body of a success
    /// response.
    pub(crate) async fn execute(
        &self,
        transport: &Arc<dyn Transport>,
        method: Method,
        url: String,
        body: Option<Bytes>,
        options: &CallOptions,
    ) -> Result<Vec<u8>> {
        let mut request = self.build_request(method, url, body)?;
        // Streamed bodies are plain text, so only buffered calls ask for JSON
        request
            .headers
            .insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let (status, headers, body) = options
            .guard(async {
                let response = transport.send(request).await?;
                let status = response.status;
                let headers = response.headers.clone();
                let body = response.bytes().await?;
                Ok::<_, NlpCloudError>((status, headers, body))
            })
            .await?;

        trace!(status, bytes = body.len(), "Received response");

        if is_success(status) {
            Ok(body)
        } else {
            Err(NlpCloudError::from_response(status, &headers, &body))
        }
    }

    pub(crate) fn transport(&self) -> Result<&Arc<dyn Transport>> {
        self.transport.as_ref().ok_or(NlpCloudError::NotConfigured)
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.root_url, endpoint)
    }

    fn build_request(
        &self,
        method: Method,
        url: String,
        body: Option<Bytes>,
    ) -> Result<TransportRequest> {
        let mut authorization = HeaderValue::from_str(&format!("Token {}", self.config.token))
            .map_err(|_| {
                NlpCloudError::InvalidConfig(
                    "token contains characters that are not allowed in an HTTP header".to_string(),
                )
            })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        if body.is_some() {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }

        trace!(method = %method, url = %url, "Dispatching request");

        Ok(TransportRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("root_url", &self.root_url)
            .field("configured", &self.transport.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// 202 is how the API acknowledges async jobs.
fn is_success(status: u16) -> bool {
    status == 200 || status == 202
}

pub(crate) fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    serde_json::from_slice(body).map_err(|source| NlpCloudError::ResponseParse {
        source,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Encode `params` with a `"stream": true` member appended to the top-level
/// object. No parameters encode as `{"stream":true}`.
pub fn streaming_payload<P>(params: Option<&P>) -> Result<Bytes>
where
    P: Serialize + ?Sized,
{
    let mut value = match params {
        Some(params) => serde_json::to_value(params).map_err(NlpCloudError::RequestEncode)?,
        None => Value::Object(serde_json::Map::new()),
    };

    let Value::Object(map) = &mut value else {
        return Err(NlpCloudError::RequestEncode(serde_json::Error::custom(
            "streaming parameters must encode as a JSON object",
        )));
    };
    map.insert("stream".to_string(), Value::Bool(true));

    serde_json::to_vec(&value)
        .map(Bytes::from)
        .map_err(NlpCloudError::RequestEncode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Text<'a> {
        text: &'a str,
    }

    #[test]
    fn test_streaming_payload_appends_flag() {
        let body = streaming_payload(Some(&Text { text: "hello" })).unwrap();
        assert_eq!(&body[..], br#"{"text":"hello","stream":true}"#);
    }

    #[test]
    fn test_streaming_payload_preserves_field_order() {
        let params = json!({"text": "a", "max_length": 50, "top_p": 0.9});
        let body = streaming_payload(Some(&params)).unwrap();
        assert_eq!(
            &body[..],
            br#"{"text":"a","max_length":50,"top_p":0.9,"stream":true}"#
        );
    }

    #[test]
    fn test_streaming_payload_without_params() {
        let body = streaming_payload::<()>(None).unwrap();
        assert_eq!(&body[..], br#"{"stream":true}"#);
    }

    #[test]
    fn test_streaming_payload_empty_object() {
        let body = streaming_payload(Some(&json!({}))).unwrap();
        assert_eq!(&body[..], br#"{"stream":true}"#);
    }

    #[test]
    fn test_streaming_payload_rejects_non_object() {
        let err = streaming_payload(Some(&vec!["a", "b"])).unwrap_err();
        assert!(matches!(err, NlpCloudError::RequestEncode(_)));
    }

    #[test]
    fn test_success_statuses() {
        assert!(is_success(200));
        assert!(is_success(202));
        assert!(!is_success(201));
        assert!(!is_success(204));
        assert!(!is_success(0));
    }

    #[test]
    fn test_decode_failure_keeps_body() {
        let err = decode::<Value>(b"{[}]").unwrap_err();
        assert!(matches!(err, NlpCloudError::ResponseParse { .. }));
        assert_eq!(err.body(), Some("{[}]"));
    }

    #[tokio::test]
    async fn test_guard_timeout() {
        let options = CallOptions::new().with_timeout(Duration::from_millis(10));
        let result: Result<()> = options
            .guard(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(NlpCloudError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn test_guard_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let options = CallOptions::new().with_cancellation(token);
        let result: Result<u8> = options.guard(async { Ok(1) }).await;
        assert!(matches!(result, Err(NlpCloudError::Cancelled)));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = Client::from_parts(None, ClientConfig::new("m", "secret-token"));
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("configured: false"));
    }
}
