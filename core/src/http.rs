//! HTTP request and response types exchanged with a [`Transport`].
//!
//! # Design
//! Requests are plain data: the client builds an `HttpRequest` completely
//! (URL, headers, encoded body) before any I/O happens, so request building is
//! deterministic and testable without a network. Responses keep their body as
//! a stream so the dispatcher decides whether to read, copy or discard it.
//!
//! [`Transport`]: crate::transport::Transport

use std::fmt;

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use url::Url;

use crate::error::TransportError;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const AUTHORIZATION: &str = "Authorization";
pub const USER_AGENT: &str = "User-Agent";
pub const METHOD_OVERRIDE: &str = "X-HTTP-Method-Override";
pub const LINK: &str = "Link";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set `name` to `value`, replacing any earlier value (names compare case-insensitively).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response whose body has not been read yet.
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Streaming response body. Dropping it releases the underlying connection.
pub struct ResponseBody {
    chunks: BoxStream<'static, Result<Bytes, TransportError>>,
}

impl ResponseBody {
    pub fn from_stream(chunks: BoxStream<'static, Result<Bytes, TransportError>>) -> Self {
        Self { chunks }
    }

    pub fn empty() -> Self {
        Self::from_stream(stream::empty().boxed())
    }

    /// Read everything that is left.
    pub async fn read_to_end(&mut self) -> Result<Bytes, TransportError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.chunks.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Copy everything that is left into `sink`, returning the byte count.
    pub async fn copy_to<W: std::io::Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64, crate::Error> {
        let mut written = 0u64;
        while let Some(chunk) = self.chunks.next().await {
            let chunk = chunk.map_err(|err| crate::Error::Transport(err.message))?;
            sink.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }

    /// Read and throw away at most `limit` bytes. Errors are ignored.
    pub async fn drain(&mut self, limit: usize) {
        let mut seen = 0;
        while seen < limit {
            match self.chunks.next().await {
                Some(Ok(chunk)) => seen += chunk.len(),
                _ => break,
            }
        }
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            return Self::empty();
        }
        Self::from_stream(stream::once(async move { Ok(bytes) }).boxed())
    }
}

impl From<&'static str> for ResponseBody {
    fn from(text: &'static str) -> Self {
        Bytes::from_static(text.as_bytes()).into()
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        Bytes::from(text).into()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut req = HttpRequest::new(HttpMethod::Get, Url::parse("http://localhost/").unwrap());
        req.set_header("content-type", "text/plain");
        req.set_header(CONTENT_TYPE, "application/json");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[tokio::test]
    async fn body_reads_all_chunks() {
        let chunks = vec![Ok(Bytes::from_static(b"ab")), Ok(Bytes::from_static(b"cd"))];
        let mut body = ResponseBody::from_stream(stream::iter(chunks).boxed());
        assert_eq!(body.read_to_end().await.unwrap(), Bytes::from_static(b"abcd"));
        assert!(body.read_to_end().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn drain_stops_at_limit() {
        let chunks = (0..10).map(|_| Ok(Bytes::from_static(b"0123456789")));
        let mut body = ResponseBody::from_stream(stream::iter(chunks).boxed());
        body.drain(25).await;
        assert_eq!(body.read_to_end().await.unwrap().len(), 70);
    }
}
