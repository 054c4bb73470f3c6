//! Request building and response dispatch for the WordPress REST API.
//!
//! # Design
//! `Client` is a cheap handle over shared, read-only configuration: base URL,
//! user agent, timestamp location, one authenticator and one transport. It
//! keeps no per-call state, so clones can be used from many tasks at once.
//!
//! A call has two halves. The `new_*_request` methods build a complete
//! [`HttpRequest`] (URL under the fixed API mount, query, JSON or multipart
//! body, user agent, credentials) without I/O. The `execute*` methods send it
//! through the [`Transport`], racing the caller's [`Context`], wrap whatever
//! comes back in a [`Response`] envelope and then decide between success, API
//! error and decode error. The response body is read, copied or drained on
//! every path, and dropping it releases the connection.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::FixedOffset;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::auth::{Anonymous, Authenticator, BasicAuth, BearerToken};
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::{ApiError, ConfigError, Error, ErrorPayload, Result, TransportError};
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, ResponseBody, CONTENT_DISPOSITION, CONTENT_TYPE, METHOD_OVERRIDE,
    USER_AGENT,
};
use crate::query::Query;
use crate::response::{sanitize_url, DeleteEnvelope, Response};
use crate::time;
use crate::transport::{ReqwestTransport, Transport};

/// Mount point of the v2 API under the site's base URL.
pub const API_MOUNT: &str = "wp-json/wp/v2/";

/// Root of the REST API index under the site's base URL.
pub const API_ROOT: &str = "wp-json/";

/// Bytes read from an unconsumed body before it is dropped.
const DRAIN_LIMIT: usize = 512;

/// Client for one WordPress site.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    base_url: Url,
    api_url: Url,
    user_agent: String,
    location: FixedOffset,
    auth: Arc<dyn Authenticator>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("user_agent", &self.inner.user_agent)
            .field("location", &self.inner.location)
            .field("auth", &self.inner.auth)
            .field("transport", &self.inner.transport)
            .finish()
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    base_url: String,
    user_agent: String,
    location: FixedOffset,
    auth: Arc<dyn Authenticator>,
    transport: Option<Arc<dyn Transport>>,
    timeout: Option<Duration>,
    keep_alive: bool,
}

impl ClientBuilder {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            location: time::utc(),
            auth: Arc::new(Anonymous),
            transport: None,
            timeout: None,
            keep_alive: false,
        }
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Location naive timestamps are read in.
    pub fn location(mut self, location: FixedOffset) -> Self {
        self.location = location;
        self
    }

    pub fn authenticator(mut self, auth: impl Authenticator + 'static) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.authenticator(BasicAuth::new(username, password))
    }

    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.authenticator(BearerToken::new(token))
    }

    /// Replace the default reqwest transport. `timeout` and `keep_alive` are then ignored.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn build(self) -> Result<Client, ConfigError> {
        let base_url = parse_base_url(&self.base_url)?;
        let api_url = base_url.join(API_MOUNT).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.timeout, self.keep_alive)?),
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                base_url,
                api_url,
                user_agent: self.user_agent,
                location: self.location,
                auth: self.auth,
                transport,
            }),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    if raw.contains("/wp/v2") {
        return Err(ConfigError::ContainsApiMount(raw.to_string()));
    }
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        return Err(ConfigError::MissingTrailingSlash(raw.to_string()));
    }
    Ok(url)
}

impl Client {
    /// Anonymous client with the default transport.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: &str) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::builder(&config.base_url)
            .user_agent(config.user_agent.clone())
            .location(config.location()?)
            .keep_alive(config.keep_alive);
        builder.auth = config.auth.authenticator();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Base URL with the API mount appended.
    pub fn api_url(&self) -> &Url {
        &self.inner.api_url
    }

    pub fn location(&self) -> FixedOffset {
        self.inner.location
    }

    pub fn user_agent(&self) -> &str {
        &self.inner.user_agent
    }

    pub(crate) fn downgrade(&self) -> Weak<ClientInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(inner: &Weak<ClientInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    // ---------------------------------------------------------------------
    // Request building
    // ---------------------------------------------------------------------

    /// Build a body-less request for `path` under the API mount.
    pub fn new_request(&self, method: HttpMethod, path: &str, query: Query<'_>) -> Result<HttpRequest> {
        let url = self.resolve(path, query)?;
        self.finish(HttpRequest::new(method, url))
    }

    /// Build a request carrying `body` as JSON.
    pub fn new_json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query<'_>,
        body: &B,
    ) -> Result<HttpRequest> {
        let url = self.resolve(path, query)?;
        let mut request = HttpRequest::new(method, url);
        request.body = Some(serde_json::to_vec(body).map_err(Error::Encode)?);
        request.set_header(CONTENT_TYPE, "application/json");
        self.finish(request)
    }

    /// Build a multipart upload with `data` as the single `file` part.
    pub fn new_upload_request(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
        filename: &str,
    ) -> Result<HttpRequest> {
        let url = self.resolve(path, Query::None)?;
        let boundary = format!("wp-rest-{}", Uuid::new_v4().simple());

        let mut body = Vec::with_capacity(data.len() + 256);
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {content_type}\r\n\r\n",
                escape_quotes(filename)
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let mut request = HttpRequest::new(HttpMethod::Post, url);
        request.body = Some(body);
        request.set_header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"));
        request.set_header(CONTENT_DISPOSITION, format!("filename={filename}"));
        self.finish(request)
    }

    /// Build a GET for the API index at `<base>wp-json/`.
    pub fn new_root_request(&self, query: Query<'_>) -> Result<HttpRequest> {
        let mut url = self
            .inner
            .base_url
            .join(API_ROOT)
            .map_err(|source| ConfigError::InvalidPath {
                path: API_ROOT.to_string(),
                source,
            })?;
        if let Some(query) = query.encode() {
            url.set_query(Some(&query));
        }
        self.finish(HttpRequest::new(HttpMethod::Get, url))
    }

    fn resolve(&self, path: &str, query: Query<'_>) -> Result<Url> {
        let mut url = self
            .inner
            .api_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ConfigError::InvalidPath {
                path: path.to_string(),
                source,
            })?;
        if let Some(query) = query.encode() {
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    fn finish(&self, mut request: HttpRequest) -> Result<HttpRequest> {
        if !self.inner.user_agent.is_empty() {
            request.set_header(USER_AGENT, self.inner.user_agent.clone());
        }
        self.inner.auth.authenticate(&mut request)?;
        Ok(request)
    }

    // ---------------------------------------------------------------------
    // Dispatch
    // ---------------------------------------------------------------------

    /// Send `request` and discard the body.
    pub async fn execute(&self, ctx: &Context, request: HttpRequest) -> Result<Response> {
        let (response, mut body) = self.dispatch(ctx, request).await?;
        guard(ctx, body.drain(DRAIN_LIMIT)).await?;
        Ok(response)
    }

    /// Send `request` and decode the JSON body into `T`. An empty body yields `T::default()`.
    pub async fn execute_json<T>(&self, ctx: &Context, request: HttpRequest) -> Result<(T, Response)>
    where
        T: DeserializeOwned + Default,
    {
        let (response, mut body) = self.dispatch(ctx, request).await?;
        let bytes = guard(ctx, body.read_to_end())
            .await?
            .map_err(|err| body_error(&response, err))?;
        let value = self.decode(&bytes)?;
        Ok((value, response))
    }

    /// Send `request` and copy the raw body into `sink` without decoding.
    pub async fn execute_into<W>(&self, ctx: &Context, request: HttpRequest, sink: &mut W) -> Result<Response>
    where
        W: std::io::Write + ?Sized,
    {
        let (response, mut body) = self.dispatch(ctx, request).await?;
        let copied = guard(ctx, body.copy_to(sink)).await?;
        let _ = guard(ctx, body.drain(DRAIN_LIMIT)).await;
        copied?;
        Ok(response)
    }

    /// Decode a success body, reading naive timestamps in this client's location.
    pub fn decode<T: DeserializeOwned + Default>(&self, bytes: &[u8]) -> Result<T> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        time::with_location(self.inner.location, || serde_json::from_slice(bytes)).map_err(Error::Decode)
    }

    async fn dispatch(&self, ctx: &Context, request: HttpRequest) -> Result<(Response, ResponseBody)> {
        let method = request.method;
        let url = sanitize_url(&request.url);
        debug!(%method, %url, "sending request");

        let sent = tokio::select! {
            biased;
            reason = ctx.done() => Err(reason),
            result = self.inner.transport.send(request) => Ok(result),
        };
        let raw = match sent {
            Err(reason) => return Err(reason),
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                if let Some(reason) = ctx.err() {
                    return Err(reason);
                }
                debug!(%method, %url, error = %err, "transport failed");
                return Err(Error::Transport(format!("{method} {url}: {err}")));
            }
        };

        let response = Response::new(method, url, &raw);
        debug!(%method, url = %response.url, status = response.status, "received response");
        let HttpResponse { mut body, .. } = raw;

        if is_success(response.status) {
            return Ok((response, body));
        }

        let bytes = guard(ctx, body.read_to_end()).await?;
        let _ = guard(ctx, body.drain(DRAIN_LIMIT)).await;
        let bytes = bytes.map_err(|err| body_error(&response, err))?;
        match serde_json::from_slice::<ErrorPayload>(&bytes) {
            Ok(payload) => {
                warn!(
                    %method,
                    url = %response.url,
                    status = response.status,
                    code = %payload.code,
                    "api error"
                );
                Err(Error::Api(Box::new(ApiError {
                    body: payload,
                    response,
                })))
            }
            Err(source) => {
                warn!(%method, url = %response.url, status = response.status, "unreadable api error body");
                Err(Error::ErrorBody {
                    response: Box::new(response),
                    source,
                })
            }
        }
    }

    // ---------------------------------------------------------------------
    // Generic verbs
    // ---------------------------------------------------------------------

    /// GET a collection.
    pub async fn list<T>(&self, ctx: &Context, path: &str, query: Query<'_>) -> Result<(T, Response)>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.new_request(HttpMethod::Get, path, query)?;
        self.execute_json(ctx, request).await
    }

    /// GET a single item.
    pub async fn get<T>(&self, ctx: &Context, path: &str, query: Query<'_>) -> Result<(T, Response)>
    where
        T: DeserializeOwned + Default,
    {
        let request = self.new_request(HttpMethod::Get, path, query)?;
        self.execute_json(ctx, request).await
    }

    /// POST `body` to a collection.
    pub async fn create<T, B>(&self, ctx: &Context, path: &str, body: &B) -> Result<(T, Response)>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let request = self.new_json_request(HttpMethod::Post, path, Query::None, body)?;
        self.execute_json(ctx, request).await
    }

    /// POST `body` to an item with `X-HTTP-Method-Override: PUT`.
    pub async fn update<T, B>(&self, ctx: &Context, path: &str, body: &B) -> Result<(T, Response)>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let mut request = self.new_json_request(HttpMethod::Post, path, Query::None, body)?;
        request.set_header(METHOD_OVERRIDE, HttpMethod::Put.as_str());
        self.execute_json(ctx, request).await
    }

    /// POST to an item with `X-HTTP-Method-Override: DELETE`.
    ///
    /// A forced delete answers with `{deleted, previous}`; `previous` is then
    /// decoded into `T`, or `T::default()` is returned when nothing was deleted.
    pub async fn delete<T>(&self, ctx: &Context, path: &str, query: Query<'_>) -> Result<(T, Response)>
    where
        T: DeserializeOwned + Default,
    {
        let mut request = self.new_request(HttpMethod::Post, path, query)?;
        request.set_header(METHOD_OVERRIDE, HttpMethod::Delete.as_str());

        if !is_forced(&request.url) {
            return self.execute_json(ctx, request).await;
        }

        let (envelope, response) = self.execute_json::<DeleteEnvelope>(ctx, request).await?;
        match envelope.previous {
            Some(previous) if envelope.deleted => {
                let value = time::with_location(self.inner.location, || serde_json::from_value(previous))
                    .map_err(Error::Decode)?;
                Ok((value, response))
            }
            _ => Ok((T::default(), response)),
        }
    }
}

/// Await a body read unless `ctx` fires first.
pub(crate) async fn guard<F: Future>(ctx: &Context, read: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        reason = ctx.done() => Err(reason),
        output = read => Ok(output),
    }
}

/// 2xx except 202, which the API also uses for half-finished operations.
fn is_success(status: u16) -> bool {
    (200..=299).contains(&status) && status != 202
}

fn is_forced(url: &Url) -> bool {
    url.query_pairs()
        .any(|(key, value)| key == "force" && !value.is_empty() && value != "false" && value != "0")
}

fn body_error(response: &Response, err: TransportError) -> Error {
    Error::Transport(format!("{} {}: reading body: {err}", response.method, response.url))
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
