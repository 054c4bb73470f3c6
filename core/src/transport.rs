//! The I/O seam: send an [`HttpRequest`], get an [`HttpResponse`] back.
//!
//! # Design
//! The client never touches the network directly. Everything it builds goes
//! through a `Transport`, so tests substitute an in-memory one and callers can
//! bring their own (for example an OAuth-signing HTTP stack). The reqwest
//! implementation is the default. Error messages coming out of a transport
//! must not contain the request URL; the dispatcher appends a sanitized one.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};

use crate::error::{ConfigError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseBody};

#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport. With `keep_alive` off, idle connections are never
    /// pooled, which avoids stale-connection errors against short-lived backends.
    pub fn new(timeout: Option<Duration>, keep_alive: bool) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if !keep_alive {
            builder = builder.pool_max_idle_per_host(0);
        }
        let client = builder
            .build()
            .map_err(|err| ConfigError::Transport(err.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = ResponseBody::from_stream(
            response.bytes_stream().map_err(map_reqwest_error).boxed(),
        );

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    let error = error.without_url();
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else {
        TransportError::new(error.to_string())
    }
}
