//! Unified dispatch and envelope interpretation
//!
//! All three commit variants funnel into [`execute`]: notify progress,
//! check the body precondition, assemble the target URL, dispatch with the
//! header snapshot and interpret the response envelope. An expired-token
//! response hands over to the refresh flow instead of reporting an error.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::instrument;

use crate::callback::RequestorCallback;
use crate::client::HttpClient;
use crate::commit::{Commit, Method};
use crate::envelope::Envelope;
use crate::error::Error;
use crate::params::Header;
use crate::refresh;

/// Response code treated as an expired access token
pub(crate) const EXPIRED_TOKEN: u16 = 401;
/// Fallback code when a request was sent but no response arrived
pub(crate) const SERVICE_UNAVAILABLE: u16 = 503;
/// Refresh hops allowed per commit before an expired-token response is
/// surfaced as a plain error
///
/// The source design recurses into another refresh attempt when the refresh
/// endpoint itself answers with the expired-token code; this guard bounds
/// that recursion instead of looping.
pub(crate) const MAX_REFRESH_HOPS: u8 = 1;

/// Dispatch a commit and route the outcome through `callback`
///
/// Boxed so the refresh flow can replay the original commit through the
/// same routine.
pub(crate) fn execute(
    client: HttpClient,
    commit: Commit,
    base_url: String,
    api_url: String,
    callback: Arc<dyn RequestorCallback>,
    request_name: Option<String>,
    depth: u8,
) -> BoxFuture<'static, ()> {
    run(client, commit, base_url, api_url, callback, request_name, depth).boxed()
}

#[instrument(skip(client, commit, callback))]
async fn run(
    client: HttpClient,
    mut commit: Commit,
    base_url: String,
    api_url: String,
    callback: Arc<dyn RequestorCallback>,
    request_name: Option<String>,
    depth: u8,
) {
    let name = request_name.as_deref();
    callback.on_progress(name).await;

    if commit.requires_body() && commit.body.is_none() {
        tracing::error!("commit rejected: {}", Error::MissingBody);
        callback.on_progress_finished(false).await;
        return;
    }

    let url = commit.target_url(&base_url, &api_url);
    let header = commit.header.get_or_insert_with(Header::new).clone();

    let mut request = match commit.method {
        Method::Get => client.inner().get(&url),
        Method::Post => client.inner().post(&url),
        Method::Put => client.inner().put(&url),
    };

    let multipart = commit.form.is_some();
    for (key, value) in header.entries() {
        // reqwest supplies the boundary-carrying Content-Type for
        // multipart payloads
        if multipart && key.eq_ignore_ascii_case("Content-Type") {
            continue;
        }
        request = request.header(&key, &value);
    }

    request = match (&commit.form, &commit.body) {
        (Some(form), _) => request.multipart(form.to_multipart()),
        (None, Some(body)) => request.json(body),
        (None, None) => request,
    };

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            match Error::from(err) {
                Error::Request(reason) => {
                    // nothing left the client; surfaced as a failed
                    // progress signal only
                    tracing::error!("request not sent: {reason}");
                    callback.on_progress_finished(false).await;
                }
                other => {
                    callback.on_progress_finished(false).await;
                    callback
                        .on_error(vec![other.to_string()], SERVICE_UNAVAILABLE, name)
                        .await;
                }
            }
            return;
        }
    };

    let status = response.status().as_u16();
    let transport_ok = response.status().is_success();
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            let err = Error::from(err);
            tracing::warn!("response body unreadable: {err}");
            callback.on_progress_finished(false).await;
            callback.on_error(vec![err.to_string()], status, name).await;
            return;
        }
    };

    if transport_ok {
        interpret_envelope(&commit, &text, status, callback.as_ref(), name).await;
        return;
    }

    // error status: derive messages and code from the body when it parses
    let envelope = serde_json::from_str::<Envelope>(&text).ok();
    let messages = envelope
        .as_ref()
        .and_then(|e| e.messages.clone())
        .unwrap_or_default();
    let code = envelope.as_ref().and_then(|e| e.error_code).unwrap_or(status);

    if code == EXPIRED_TOKEN {
        if depth < MAX_REFRESH_HOPS {
            refresh::begin(client, commit, base_url, api_url, callback, request_name, depth).await;
        } else {
            tracing::warn!("expired-token response after a refresh hop, stopping");
            callback.on_progress_finished(false).await;
            callback.on_error(messages, code, name).await;
        }
        return;
    }

    callback.on_progress_finished(false).await;
    callback.on_error(messages, code, name).await;
}

/// Interpret a 2xx response's envelope and notify the callback
async fn interpret_envelope(
    commit: &Commit,
    text: &str,
    status: u16,
    callback: &dyn RequestorCallback,
    name: Option<&str>,
) {
    let envelope = match serde_json::from_str::<Envelope>(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!("response is not an envelope: {err}");
            let err = Error::Decode(err.to_string());
            callback.on_progress_finished(false).await;
            callback.on_error(vec![err.to_string()], status, name).await;
            return;
        }
    };

    if envelope.success {
        callback.on_progress_finished(true).await;
        let message = envelope.first_message();
        callback.on_success(envelope.payload(), name, &message).await;
        return;
    }

    callback.on_progress_finished(false).await;
    // POST alone falls back to bodyList when messages is absent
    let messages = if commit.method == Method::Post {
        envelope
            .messages
            .clone()
            .or_else(|| envelope.body_list_messages())
            .unwrap_or_default()
    } else {
        envelope.error_messages()
    };
    callback
        .on_error(messages, envelope.error_code.unwrap_or_default(), name)
        .await;
}
