//! Callback-driven HTTP request facade
//!
//! This crate is a convenience layer over `reqwest`. Callers build a GET,
//! POST or PUT commit, attach a query string, routing-rule path segments
//! and headers, then `commit` it; every outcome is delivered through a
//! consumer-supplied [`RequestorCallback`] rather than a return value.
//! Responses are expected to use the fixed envelope
//! `{success, body, bodyList, messages, errorCode}`.
//!
//! An expired-token response (401) is resolved transparently: a POST is
//! fired at `/auth/refreshToken`, the renewed token is installed into the
//! original commit's `Authorization` header, and the commit is replayed
//! once. Consumers opt in by exposing a [`TokenStore`] from their callback.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use requestor::{HttpGet, QueryString, RequestorCallback};
//! use serde_json::Value;
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl RequestorCallback for Printer {
//!     async fn on_progress(&self, name: Option<&str>) {
//!         println!("started {name:?}");
//!     }
//!     async fn on_success(&self, data: Option<Value>, _name: Option<&str>, message: &str) {
//!         println!("{message}: {data:?}");
//!     }
//!     async fn on_error(&self, messages: Vec<String>, code: u16, _name: Option<&str>) {
//!         eprintln!("failed ({code}): {messages:?}");
//!     }
//!     async fn on_progress_finished(&self, success: bool) {
//!         println!("finished, success: {success}");
//!     }
//! }
//!
//! # async fn example() {
//! HttpGet::new()
//!     .set_query_string(QueryString::new().append("page", "1"))
//!     .commit("https://api.example.com", "/items", Arc::new(Printer), Some("listItems"))
//!     .await;
//! # }
//! ```

mod callback;
mod client;
mod commit;
mod dispatch;
mod envelope;
mod error;
mod params;
mod refresh;

pub use callback::{RequestorCallback, TokenStore};
pub use client::{HttpClient, HttpClientBuilder};
pub use commit::{HttpGet, HttpPost, HttpPut};
pub use envelope::Envelope;
pub use error::Error;
pub use params::{FormData, Header, QueryString, RoutingRule};
