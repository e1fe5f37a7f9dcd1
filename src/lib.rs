//! # NLP Cloud
//!
//! Async client for the [NLP Cloud](https://nlpcloud.com) API.
//!
//! Every endpoint (entity extraction, classification, generation,
//! translation, summarization, speech recognition and more) is a method on
//! [`Client`] taking a typed parameter struct and returning a typed
//! response. Generation-style endpoints also have streaming variants that
//! return the open response body.
//!
//! ## Features
//!
//! - **Typed endpoints**: one parameter and one response type per endpoint
//! - **Streaming**: read generated text as the model produces it
//! - **Async mode**: submit jobs and poll their results
//! - **Error taxonomy**: every documented HTTP status maps to an [`ApiErrorKind`]
//! - **Pluggable transport**: bring your own [`Transport`] or use the bundled `reqwest` one
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nlpcloud::{Client, ClientConfig, EntitiesParams};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new(ClientConfig::new("en_core_web_lg", "your-token"))?;
//!
//!     let entities = client
//!         .entities(&EntitiesParams::new("John Doe has been working for Microsoft in Seattle since 1999."))
//!         .await?;
//!
//!     for entity in entities.entities {
//!         println!("{} ({})", entity.text, entity.kind);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! [`ClientConfig`] can be built in code, or loaded via:
//! - Command-line arguments of the `nlpcloud` binary
//! - Environment variables (prefixed with `NLPCLOUD_`)
//! - JSON configuration files
//!
//! Per-call timeouts and cancellation are set with [`CallOptions`] and
//! [`Client::with_options`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod stream;
pub mod transport;

// Re-exports for convenience
pub use client::{CallOptions, Client, USER_AGENT};
pub use config::{Args, ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiErrorKind, NlpCloudError, Result};
pub use request::*;
pub use response::*;
pub use stream::ResponseStream;
pub use transport::{
    ByteStream, ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
pub use tokio_util::sync::CancellationToken;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
