//! Callback contract
//!
//! Commits report every outcome through a consumer-supplied
//! [`RequestorCallback`]; nothing is returned from `commit` itself. Token
//! storage is a separate capability: only consumers that can hold tokens
//! implement [`TokenStore`], and the refresh flow checks for it at the
//! point an expired-token response needs it.

use async_trait::async_trait;
use serde_json::Value;

/// Consumer-implemented notification contract for a commit's lifecycle
#[async_trait]
pub trait RequestorCallback: Send + Sync {
    /// Fired once before dispatch, and again before a replay
    async fn on_progress(&self, request_name: Option<&str>);

    /// Business success
    ///
    /// `data` is the envelope's `body` field or, when that is absent, its
    /// `bodyList`. `message` is the first server message, else `"success"`.
    async fn on_success(&self, data: Option<Value>, request_name: Option<&str>, message: &str);

    /// Business or transport failure
    async fn on_error(&self, messages: Vec<String>, code: u16, request_name: Option<&str>);

    /// Progress teardown; `success` mirrors the outcome
    async fn on_progress_finished(&self, success: bool);

    /// Token storage capability, consulted only by the refresh flow
    ///
    /// Returning `None` (the default) makes an expired-token response
    /// surface as a plain error instead of triggering a refresh.
    fn token_store(&self) -> Option<&dyn TokenStore> {
        None
    }
}

/// Token storage consulted when an expired-token response is resolved
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store a renewed access token
    async fn set_access_token(&self, token: &str);

    /// Store a renewed refresh token
    async fn set_refresh_token(&self, token: &str);

    /// Current refresh token, if any
    async fn refresh_token(&self) -> Option<String>;
}
