//! Expired-token refresh and replay
//!
//! When a commit comes back with the expired-token code, no error is
//! surfaced yet. A [`RefreshCoordinator`] takes ownership of the original
//! commit and a POST is issued to the refresh endpoint, carrying the
//! original request's `Authorization` value and the callback's refresh
//! token. On success the coordinator pushes the renewed tokens into the
//! callback's token store, installs `Bearer <accessToken>` on the original
//! commit and replays it. On failure it forwards the error under the
//! original request name. The refresh hop's own progress notifications are
//! swallowed; the consumer never sees it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::callback::RequestorCallback;
use crate::client::HttpClient;
use crate::commit::{Commit, Method};
use crate::dispatch::{execute, EXPIRED_TOKEN};
use crate::error::Error;
use crate::params::Header;

/// Fixed endpoint the refresh POST targets, relative to the base URL
pub(crate) const REFRESH_TOKEN_API_URL: &str = "/auth/refreshToken";
/// Logical name of the refresh request
pub(crate) const REFRESH_TOKEN_REQUEST_NAME: &str = "refreshToken";
/// Header carrying the access token
pub(crate) const TOKEN_HEADER_KEY: &str = "Authorization";

/// Start the refresh hop for a commit that hit the expired-token code
pub(crate) async fn begin(
    client: HttpClient,
    commit: Commit,
    base_url: String,
    api_url: String,
    callback: Arc<dyn RequestorCallback>,
    request_name: Option<String>,
    depth: u8,
) {
    let refresh_token = match callback.token_store() {
        Some(store) => store.refresh_token().await,
        None => {
            let err = Error::RefreshUnsupported;
            tracing::error!("{err}");
            callback.on_progress_finished(false).await;
            callback
                .on_error(vec![err.to_string()], EXPIRED_TOKEN, request_name.as_deref())
                .await;
            return;
        }
    };

    let mut header = Header::new();
    if let Some(value) = commit.header_value(TOKEN_HEADER_KEY) {
        header = header.append(TOKEN_HEADER_KEY, value);
    }

    let mut refresh_commit = Commit::new(Method::Post);
    refresh_commit.header = Some(header);
    refresh_commit.body = Some(json!({ "refreshToken": refresh_token }));

    let coordinator = Arc::new(RefreshCoordinator {
        client: client.clone(),
        callback,
        original: Mutex::new(Some(commit)),
        base_url: base_url.clone(),
        api_url,
        request_name,
        depth,
    });

    execute(
        client,
        refresh_commit,
        base_url,
        REFRESH_TOKEN_API_URL.to_string(),
        coordinator,
        Some(REFRESH_TOKEN_REQUEST_NAME.to_string()),
        depth + 1,
    )
    .await;
}

/// Adapter intercepting the refresh call's outcome
///
/// Single-use: the original commit is taken from its slot exactly once,
/// when the refresh call succeeds and the replay starts.
pub(crate) struct RefreshCoordinator {
    client: HttpClient,
    callback: Arc<dyn RequestorCallback>,
    original: Mutex<Option<Commit>>,
    base_url: String,
    api_url: String,
    request_name: Option<String>,
    depth: u8,
}

impl fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("base_url", &self.base_url)
            .field("api_url", &self.api_url)
            .field("request_name", &self.request_name)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RequestorCallback for RefreshCoordinator {
    /// Refresh-hop progress is not surfaced to the consumer
    async fn on_progress(&self, _request_name: Option<&str>) {}

    /// Refresh-hop progress is not surfaced to the consumer
    async fn on_progress_finished(&self, _success: bool) {}

    async fn on_success(&self, data: Option<Value>, _request_name: Option<&str>, _message: &str) {
        let Some(mut original) = self.original.lock().await.take() else {
            tracing::warn!("refresh coordinator resolved more than once");
            return;
        };

        let access_token = data
            .as_ref()
            .and_then(|payload| payload.get("accessToken"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let Some(access_token) = access_token else {
            let err = Error::RefreshPayload;
            tracing::error!("{err}");
            self.callback
                .on_error(
                    vec![err.to_string()],
                    EXPIRED_TOKEN,
                    self.request_name.as_deref(),
                )
                .await;
            return;
        };
        let refresh_token = data
            .as_ref()
            .and_then(|payload| payload.get("refreshToken"))
            .and_then(Value::as_str);

        if let Some(store) = self.callback.token_store() {
            store.set_access_token(&access_token).await;
            if let Some(refresh_token) = refresh_token {
                store.set_refresh_token(refresh_token).await;
            }
        }

        original.set_header_value(TOKEN_HEADER_KEY, format!("Bearer {access_token}"));

        execute(
            self.client.clone(),
            original,
            self.base_url.clone(),
            self.api_url.clone(),
            self.callback.clone(),
            self.request_name.clone(),
            self.depth + 1,
        )
        .await;
    }

    /// Forwarded under the original request name, not the refresh call's
    async fn on_error(&self, messages: Vec<String>, code: u16, _request_name: Option<&str>) {
        self.callback
            .on_error(messages, code, self.request_name.as_deref())
            .await;
    }
}
