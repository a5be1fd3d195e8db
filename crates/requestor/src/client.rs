//! HTTP client wrapper

use std::time::Duration;

use crate::error::Error;

/// HTTP client shared by commits
///
/// Wraps a `reqwest::Client` so commits dispatched against the same
/// `HttpClient` share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Create a new HTTP client builder
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create an HttpClient from a `reqwest::Client`
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    pub(crate) fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

/// HTTP client builder for timeout, proxy and TLS settings
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    accept_invalid_certs: bool,
    timeout: Option<Duration>,
    proxy: Option<url::Url>,
}

impl HttpClientBuilder {
    /// Accept invalid TLS certificates
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set a whole-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Route all requests through a proxy
    pub fn proxy(mut self, url: url::Url) -> Self {
        self.proxy = Some(url);
        self
    }

    /// Build the HTTP client
    pub fn build(self) -> Result<HttpClient, Error> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|e| Error::Build(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| Error::Build(e.to_string()))?;
        Ok(HttpClient { inner: client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new() {
        let client = HttpClient::new();
        let _ = format!("{:?}", client);
    }

    #[test]
    fn client_default() {
        let client = HttpClient::default();
        let _ = format!("{:?}", client);
    }

    #[test]
    fn builder_build() {
        let result = HttpClientBuilder::default().build();
        assert!(result.is_ok());
    }

    #[test]
    fn builder_chained_config() {
        let proxy_url = url::Url::parse("http://localhost:8080").expect("valid proxy url");
        let result = HttpClient::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(5))
            .proxy(proxy_url)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn from_reqwest() {
        let client = HttpClient::from_reqwest(reqwest::Client::new());
        let _ = format!("{:?}", client);
    }
}
