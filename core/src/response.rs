//! The response envelope returned next to every decoded value.

use serde::Deserialize;
use url::Url;

use crate::http::{HttpMethod, HttpResponse};
use crate::pagination::{Pagination, HEADER_TOTAL_PAGES, HEADER_TOTAL_RECORDS};

/// Metadata of one API response: request line, status, headers and
/// pagination. Built for every response the server sends, errors included.
#[derive(Debug, Clone)]
pub struct Response {
    pub method: HttpMethod,
    /// Request URL with secrets redacted.
    pub url: Url,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub pagination: Pagination,
}

impl Response {
    pub(crate) fn new(method: HttpMethod, url: Url, response: &HttpResponse) -> Self {
        let pagination = Pagination::from_parts(
            response.header(HEADER_TOTAL_RECORDS),
            response.header(HEADER_TOTAL_PAGES),
            url.query(),
        );
        Self {
            method,
            url,
            status: response.status,
            headers: response.headers.clone(),
            pagination,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn total_records(&self) -> u64 {
        self.pagination.total_records
    }

    pub fn total_pages(&self) -> u64 {
        self.pagination.total_pages
    }

    pub fn previous_page(&self) -> u64 {
        self.pagination.previous_page
    }

    pub fn next_page(&self) -> u64 {
        self.pagination.next_page
    }
}

/// Body returned by a forced delete.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteEnvelope {
    #[serde(default)]
    pub deleted: bool,
    pub previous: Option<serde_json::Value>,
}

/// Redact secrets carried in the query string before a URL reaches an error or a log line.
pub fn sanitize_url(url: &Url) -> Url {
    let has_password = url
        .query_pairs()
        .any(|(key, value)| key == "password" && !value.is_empty());
    if !has_password {
        return url.clone();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            if key == "password" {
                (key.into_owned(), "REDACTED".to_string())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();

    let mut sanitized = url.clone();
    sanitized.query_pairs_mut().clear().extend_pairs(pairs);
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ResponseBody;

    #[test]
    fn password_is_redacted() {
        let url = Url::parse("https://example.com/wp-json/wp/v2/posts/1?password=hunter2&context=view").unwrap();
        let clean = sanitize_url(&url);
        assert_eq!(clean.as_str(), "https://example.com/wp-json/wp/v2/posts/1?password=REDACTED&context=view");
    }

    #[test]
    fn url_without_password_is_untouched() {
        let url = Url::parse("https://example.com/wp-json/wp/v2/posts?page=2").unwrap();
        assert_eq!(sanitize_url(&url), url);
    }

    #[test]
    fn envelope_reads_pagination_headers() {
        let raw = HttpResponse {
            status: 200,
            headers: vec![
                ("x-wp-total".to_string(), "42".to_string()),
                ("x-wp-totalpages".to_string(), "5".to_string()),
            ],
            body: ResponseBody::empty(),
        };
        let url = Url::parse("https://example.com/wp-json/wp/v2/posts?page=5").unwrap();
        let response = Response::new(HttpMethod::Get, url, &raw);
        assert_eq!(response.total_records(), 42);
        assert_eq!(response.total_pages(), 5);
        assert_eq!(response.previous_page(), 5);
        assert_eq!(response.next_page(), 0);
    }

    #[test]
    fn delete_envelope_keeps_previous_payload() {
        let envelope: DeleteEnvelope =
            serde_json::from_str(r#"{"deleted":true,"previous":{"id":7,"name":"x"}}"#).unwrap();
        assert!(envelope.deleted);
        assert_eq!(envelope.previous.unwrap(), serde_json::json!({"id": 7, "name": "x"}));
    }
}
