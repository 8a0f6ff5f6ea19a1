//! HTTP transport.
//!
//! [`Transport`] is the seam between services and the network. The
//! production implementation, [`HttpTransport`], wraps a pooled
//! `reqwest::Client`; tests substitute their own implementation.
//!
//! GET and DELETE carry their parameters in the query string, POST and PUT
//! send them as an `application/x-www-form-urlencoded` body. Nothing is
//! retried here.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use url::Url;

use crate::error::{KayakoError, TransportError};

/// Request parameters, kept sorted so that requests are reproducible.
pub type Params = BTreeMap<String, String>;

/// A response as received, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status.
    pub reason: String,
    /// Response body decoded as text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response from its parts.
    pub fn new(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }
}

/// Sends one HTTP request and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues `method` against `address` with `params`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` when no response could be obtained.
    async fn send(
        &self,
        method: Method,
        address: &str,
        params: &Params,
    ) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `KayakoError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(timeout: Duration) -> Result<Self, KayakoError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KayakoError::HttpClient)?;
        Ok(Self { http })
    }

    /// Wraps an already configured client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }

    fn sends_query(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::DELETE | Method::HEAD)
    }

    /// Appends `params` to the query string of `address`.
    fn url_with_query(address: &str, params: &Params) -> Result<Url, TransportError> {
        let mut url = Url::parse(address)
            .map_err(|e| TransportError::new(format!("invalid address {}: {}", address, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    fn form_body(params: &Params) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        address: &str,
        params: &Params,
    ) -> Result<RawResponse, TransportError> {
        tracing::debug!(
            method = %method,
            action = params.get("e").map(String::as_str).unwrap_or(""),
            "Sending Kayako API request"
        );

        let request = if Self::sends_query(&method) {
            let url = Self::url_with_query(address, params)?;
            self.http.request(method, url)
        } else {
            self.http
                .request(method, address)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Self::form_body(params))
        };

        let response = request.send().await?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.text().await?;

        tracing::trace!(status = status.as_u16(), "Kayako API response received");

        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}
