//! Request commit builders
//!
//! A commit is a configured, not-yet-dispatched request. [`HttpGet`],
//! [`HttpPost`] and [`HttpPut`] expose the setters their verb allows and a
//! single `commit` operation that dispatches the request and routes the
//! outcome through the caller's [`RequestorCallback`](crate::RequestorCallback).
//! `commit` consumes the builder; a commit is single-use.

use std::sync::Arc;

use serde_json::Value;

use crate::callback::RequestorCallback;
use crate::client::HttpClient;
use crate::dispatch;
use crate::params::{FormData, Header, QueryString, RoutingRule};

/// HTTP verb of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
}

/// Unified request state shared by the three commit variants
#[derive(Debug, Clone)]
pub(crate) struct Commit {
    pub(crate) method: Method,
    pub(crate) query: Option<QueryString>,
    pub(crate) routing: Option<RoutingRule>,
    pub(crate) header: Option<Header>,
    pub(crate) body: Option<Value>,
    pub(crate) form: Option<FormData>,
}

impl Commit {
    pub(crate) fn new(method: Method) -> Self {
        Self {
            method,
            query: None,
            routing: None,
            header: None,
            body: None,
            form: None,
        }
    }

    /// GET needs no body; POST and PUT do
    pub(crate) fn requires_body(&self) -> bool {
        !matches!(self.method, Method::Get)
    }

    /// Target URL: `base_url + api_url`, appended with the query-string
    /// rendering if set, else the routing-rule rendering if set. When both
    /// are set the query string wins.
    pub(crate) fn target_url(&self, base_url: &str, api_url: &str) -> String {
        let mut url = format!("{base_url}{api_url}");
        if let Some(query) = &self.query {
            url.push_str(&query.to_string());
        } else if let Some(routing) = &self.routing {
            url.push_str(&routing.to_string());
        }
        url
    }

    pub(crate) fn header_value(&self, key: &str) -> Option<String> {
        self.header
            .as_ref()
            .and_then(|header| header.value(key))
            .map(str::to_string)
    }

    /// Install or replace a header entry; used by the refresh replay to
    /// carry the renewed `Authorization` value
    pub(crate) fn set_header_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.header.get_or_insert_with(Header::new).set(key, value);
    }
}

/// GET commit
#[derive(Debug, Clone)]
pub struct HttpGet {
    client: HttpClient,
    inner: Commit,
}

impl Default for HttpGet {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpGet {
    /// Create a GET commit with a fresh client
    pub fn new() -> Self {
        Self::with_client(HttpClient::new())
    }

    /// Create a GET commit dispatched through an existing client
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            inner: Commit::new(Method::Get),
        }
    }

    /// Attach a query string, chainable
    pub fn set_query_string(mut self, query: QueryString) -> Self {
        self.inner.query = Some(query);
        self
    }

    /// Attach a routing rule, chainable; a query string takes precedence
    pub fn set_routing_rule(mut self, routing: RoutingRule) -> Self {
        self.inner.routing = Some(routing);
        self
    }

    /// Attach headers, chainable
    pub fn set_header(mut self, header: Header) -> Self {
        self.inner.header = Some(header);
        self
    }

    /// Dispatch the request; every outcome flows through `callback`
    pub async fn commit(
        self,
        base_url: &str,
        api_url: &str,
        callback: Arc<dyn RequestorCallback>,
        request_name: Option<&str>,
    ) {
        dispatch::execute(
            self.client,
            self.inner,
            base_url.to_string(),
            api_url.to_string(),
            callback,
            request_name.map(str::to_string),
            0,
        )
        .await;
    }
}

/// POST commit; a JSON body is mandatory
#[derive(Debug, Clone)]
pub struct HttpPost {
    client: HttpClient,
    inner: Commit,
}

impl Default for HttpPost {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPost {
    /// Create a POST commit with a fresh client
    pub fn new() -> Self {
        Self::with_client(HttpClient::new())
    }

    /// Create a POST commit dispatched through an existing client
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            inner: Commit::new(Method::Post),
        }
    }

    /// Attach a query string, chainable
    pub fn set_query_string(mut self, query: QueryString) -> Self {
        self.inner.query = Some(query);
        self
    }

    /// Attach a routing rule, chainable; a query string takes precedence
    pub fn set_routing_rule(mut self, routing: RoutingRule) -> Self {
        self.inner.routing = Some(routing);
        self
    }

    /// Attach headers, chainable
    pub fn set_header(mut self, header: Header) -> Self {
        self.inner.header = Some(header);
        self
    }

    /// Set the JSON body, chainable; mandatory even when form data is set
    pub fn set_body(mut self, body: Value) -> Self {
        self.inner.body = Some(body);
        self
    }

    /// Substitute a multipart form as the transmitted payload, chainable
    ///
    /// Forces the header's `Content-Type` to `multipart/form-data`; the
    /// boundary-carrying value reqwest generates is what actually goes on
    /// the wire.
    pub fn set_form_data(mut self, form: FormData) -> Self {
        self.inner
            .set_header_value("Content-Type", "multipart/form-data");
        self.inner.form = Some(form);
        self
    }

    /// Dispatch the request; every outcome flows through `callback`
    pub async fn commit(
        self,
        base_url: &str,
        api_url: &str,
        callback: Arc<dyn RequestorCallback>,
        request_name: Option<&str>,
    ) {
        dispatch::execute(
            self.client,
            self.inner,
            base_url.to_string(),
            api_url.to_string(),
            callback,
            request_name.map(str::to_string),
            0,
        )
        .await;
    }
}

/// PUT commit; a JSON body is mandatory
#[derive(Debug, Clone)]
pub struct HttpPut {
    client: HttpClient,
    inner: Commit,
}

impl Default for HttpPut {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPut {
    /// Create a PUT commit with a fresh client
    pub fn new() -> Self {
        Self::with_client(HttpClient::new())
    }

    /// Create a PUT commit dispatched through an existing client
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            inner: Commit::new(Method::Put),
        }
    }

    /// Attach a query string, chainable
    pub fn set_query_string(mut self, query: QueryString) -> Self {
        self.inner.query = Some(query);
        self
    }

    /// Attach a routing rule, chainable; a query string takes precedence
    pub fn set_routing_rule(mut self, routing: RoutingRule) -> Self {
        self.inner.routing = Some(routing);
        self
    }

    /// Attach headers, chainable
    pub fn set_header(mut self, header: Header) -> Self {
        self.inner.header = Some(header);
        self
    }

    /// Set the JSON body, chainable
    pub fn set_body(mut self, body: Value) -> Self {
        self.inner.body = Some(body);
        self
    }

    /// Dispatch the request; every outcome flows through `callback`
    pub async fn commit(
        self,
        base_url: &str,
        api_url: &str,
        callback: Arc<dyn RequestorCallback>,
        request_name: Option<&str>,
    ) {
        dispatch::execute(
            self.client,
            self.inner,
            base_url.to_string(),
            api_url.to_string(),
            callback,
            request_name.map(str::to_string),
            0,
        )
        .await;
    }
}
