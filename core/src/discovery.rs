//! API root information and API discovery.
//!
//! Sites announce their REST root with a `Link: <...>; rel="https://api.w.org/"`
//! header on every page. [`discover`] follows that header to the base URL a
//! [`Client`] needs; [`Client::root_info`] reads the index served at the root.

use std::collections::BTreeMap;

use chrono::FixedOffset;
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::debug;
use url::Url;

use crate::client::{guard, Client, API_ROOT};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, LINK, USER_AGENT};
use crate::query::Query;
use crate::response::{sanitize_url, Response};
use crate::transport::Transport;

/// Relation naming the REST API root in a `Link` header.
pub const API_LINK_REL: &str = "https://api.w.org/";

/// Public description of a site, served at `<base>wp-json/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootInfo {
    pub name: String,
    pub description: String,
    pub url: String,
    pub home: String,
    /// Hours east of UTC. Sites send it as a number or as a numeric string.
    #[serde(deserialize_with = "hours")]
    pub gmt_offset: f64,
    pub timezone_string: String,
    pub namespaces: Vec<String>,
    pub authentication: BTreeMap<String, serde_json::Value>,
    pub permalink_structure: String,
}

impl RootInfo {
    /// The site's UTC offset, for use as a client location.
    pub fn location(&self) -> Option<FixedOffset> {
        let seconds = (self.gmt_offset * 3600.0).round();
        if !seconds.is_finite() || seconds.abs() >= 86_400.0 {
            return None;
        }
        FixedOffset::east_opt(seconds as i32)
    }
}

fn hours<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(hours) => Ok(hours),
        Raw::Text(text) if text.trim().is_empty() => Ok(0.0),
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

impl Client {
    /// Fetch the API index at `<base>wp-json/`.
    pub async fn root_info(&self, ctx: &Context) -> Result<(RootInfo, Response)> {
        let request = self.new_root_request(Query::None)?;
        self.execute_json(ctx, request).await
    }
}

/// Where a site serves its API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    /// The API root announced by the site, e.g. `https://example.com/wp-json/`.
    pub api_root: Url,
    /// The base URL to build a [`Client`] with.
    pub base_url: Url,
}

/// Ask `site_url` where its API lives.
pub async fn discover(ctx: &Context, transport: &dyn Transport, site_url: &str) -> Result<Discovered> {
    let site = Url::parse(site_url).map_err(|err| Error::Discovery(format!("invalid site url {site_url:?}: {err}")))?;
    let clean = sanitize_url(&site);
    let mut request = HttpRequest::new(HttpMethod::Get, site.clone());
    request.set_header(USER_AGENT, crate::config::DEFAULT_USER_AGENT);
    debug!(url = %clean, "discovering api root");

    let sent = tokio::select! {
        biased;
        reason = ctx.done() => return Err(reason),
        result = transport.send(request) => result,
    };
    let mut response = match sent {
        Ok(response) => response,
        Err(err) => {
            if let Some(reason) = ctx.err() {
                return Err(reason);
            }
            return Err(Error::Transport(format!("GET {clean}: {err}")));
        }
    };
    let link = response.header(LINK).map(str::to_string);
    guard(ctx, response.body.drain(512)).await?;

    if !(200..=299).contains(&response.status) {
        return Err(Error::Discovery(format!("{clean} answered {}", response.status)));
    }
    let href = link
        .as_deref()
        .and_then(|header| find_link(header, API_LINK_REL))
        .ok_or_else(|| Error::Discovery(format!("{clean} does not announce an api root")))?;

    let api_root = site
        .join(&href)
        .map_err(|err| Error::Discovery(format!("invalid api root {href:?}: {err}")))?;
    if !api_root.path().ends_with(API_ROOT) {
        return Err(Error::Discovery(format!(
            "api root {api_root} is not served under /{API_ROOT}"
        )));
    }
    let base_url = api_root
        .join("../")
        .map_err(|err| Error::Discovery(format!("invalid api root {api_root}: {err}")))?;

    debug!(api_root = %api_root, base_url = %base_url, "discovered api root");
    Ok(Discovered { api_root, base_url })
}

/// The target of the first `Link` entry whose `rel` includes `rel`.
///
/// Targets are read between `<` and `>`, so they may contain `,` and `;`.
pub fn find_link(header: &str, rel: &str) -> Option<String> {
    let mut rest = header;
    while let Some(open) = rest.find('<') {
        let close = open + rest[open..].find('>')?;
        let target = &rest[open + 1..close];
        let after = &rest[close + 1..];
        let (params, next) = match unquoted_index(after, ',') {
            Some(comma) => (&after[..comma], &after[comma + 1..]),
            None => (after, ""),
        };
        if split_unquoted(params, ';').any(|param| has_rel(param, rel)) {
            return Some(target.to_string());
        }
        rest = next;
    }
    None
}

fn has_rel(param: &str, rel: &str) -> bool {
    let Some((key, value)) = param.split_once('=') else {
        return false;
    };
    key.trim().eq_ignore_ascii_case("rel") && value.trim().trim_matches('"').split_whitespace().any(|r| r == rel)
}

/// Byte index of the first `sep` outside a quoted string.
fn unquoted_index(text: &str, sep: char) -> Option<usize> {
    let mut quoted = false;
    for (index, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            c if c == sep && !quoted => return Some(index),
            _ => {}
        }
    }
    None
}

fn split_unquoted(text: &str, sep: char) -> impl Iterator<Item = &str> + '_ {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match unquoted_index(current, sep) {
            Some(index) => {
                rest = Some(&current[index + sep.len_utf8()..]);
                Some(&current[..index])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use rstest::rstest;

    #[rstest]
    #[case(r#"<https://example.com/wp-json/>; rel="https://api.w.org/""#, Some("https://example.com/wp-json/"))]
    #[case(
        r#"<https://example.com/?p=1>; rel=shortlink, <https://example.com/wp-json/>; rel="https://api.w.org/""#,
        Some("https://example.com/wp-json/")
    )]
    #[case(r#"<https://example.com/?p=1>; rel=shortlink"#, None)]
    #[case("garbage", None)]
    #[case(
        r#"<https://example.com/a,b;c/wp-json/>; rel="https://api.w.org/""#,
        Some("https://example.com/a,b;c/wp-json/")
    )]
    #[case(
        r#"<https://example.com/x>; title="one, two; three"; rel=alternate, <https://example.com/wp-json/>; rel="https://api.w.org/""#,
        Some("https://example.com/wp-json/")
    )]
    #[case(r#"<https://example.com/x>; title="rel=https://api.w.org/""#, None)]
    fn link_header_parsing(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(find_link(header, API_LINK_REL).as_deref(), expected);
    }

    #[rstest]
    #[case(serde_json::json!(2), 7200)]
    #[case(serde_json::json!("5.5"), 19800)]
    #[case(serde_json::json!(-3), -10800)]
    #[case(serde_json::json!(""), 0)]
    fn gmt_offset_becomes_location(#[case] offset: serde_json::Value, #[case] seconds: i32) {
        let info: RootInfo = serde_json::from_value(serde_json::json!({"name": "Site", "gmt_offset": offset})).unwrap();
        assert_eq!(info.location().unwrap().local_minus_utc(), seconds);
    }

    #[tokio::test]
    async fn discovery_follows_link_header() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            &[("Link", r#"<https://example.com/blog/wp-json/>; rel="https://api.w.org/""#)],
            "<html></html>",
        );

        let found = discover(&Context::background(), &transport, "https://example.com/blog/")
            .await
            .unwrap();
        assert_eq!(found.api_root.as_str(), "https://example.com/blog/wp-json/");
        assert_eq!(found.base_url.as_str(), "https://example.com/blog/");
        assert!(Client::builder(found.base_url.as_str())
            .transport(transport.clone())
            .build()
            .is_ok());
    }

    #[tokio::test]
    async fn discovery_without_link_fails() {
        let transport = FakeTransport::new();
        transport.respond(200, &[], "<html></html>");

        let err = discover(&Context::background(), &transport, "https://example.com/")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Discovery(_)));
    }

    #[tokio::test]
    async fn root_info_reads_index() {
        let transport = FakeTransport::new();
        transport.respond(
            200,
            &[],
            r#"{"name":"Site","gmt_offset":1,"namespaces":["wp/v2"],"authentication":{}}"#,
        );
        let client = Client::builder("https://example.com/")
            .transport(transport.clone())
            .build()
            .unwrap();

        let (info, _) = client.root_info(&Context::background()).await.unwrap();
        assert_eq!(info.namespaces, ["wp/v2"]);
        assert_eq!(info.location().unwrap().local_minus_utc(), 3600);
        assert_eq!(transport.requests()[0].url.as_str(), "https://example.com/wp-json/");
    }
}
