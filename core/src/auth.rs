//! Authentication strategies applied as the last step of request building.
//!
//! A client holds exactly one [`Authenticator`]. Basic credentials and static
//! bearer tokens ship here; OAuth-signed schemes live outside the crate and
//! plug in by implementing the same trait.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;
use crate::http::{HttpRequest, AUTHORIZATION};

/// Decorates a fully built request with credentials.
pub trait Authenticator: Send + Sync + fmt::Debug {
    fn authenticate(&self, request: &mut HttpRequest) -> Result<()>;
}

/// No credentials; only public endpoints will answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Authenticator for Anonymous {
    fn authenticate(&self, _request: &mut HttpRequest) -> Result<()> {
        Ok(())
    }
}

/// HTTP Basic credentials, usually an application password.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Authenticator for BasicAuth {
    fn authenticate(&self, request: &mut HttpRequest) -> Result<()> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        request.set_header(AUTHORIZATION, format!("Basic {encoded}"));
        Ok(())
    }
}

/// A static token sent as `Authorization: Bearer <token>` (JWT plugins).
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl Authenticator for BearerToken {
    fn authenticate(&self, request: &mut HttpRequest) -> Result<()> {
        request.set_header(AUTHORIZATION, format!("Bearer {}", self.0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use url::Url;

    fn request() -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, Url::parse("https://example.com/wp-json/wp/v2/posts").unwrap())
    }

    #[test]
    fn basic_sets_encoded_credentials() {
        let mut req = request();
        BasicAuth::new("admin", "secret").authenticate(&mut req).unwrap();
        assert_eq!(req.header(AUTHORIZATION), Some("Basic YWRtaW46c2VjcmV0"));
    }

    #[test]
    fn bearer_sets_token() {
        let mut req = request();
        BearerToken::new("abc.def.ghi").authenticate(&mut req).unwrap();
        assert_eq!(req.header(AUTHORIZATION), Some("Bearer abc.def.ghi"));
    }

    #[test]
    fn anonymous_leaves_request_alone() {
        let mut req = request();
        Anonymous.authenticate(&mut req).unwrap();
        assert!(req.headers.is_empty());
    }

    #[test]
    fn debug_hides_secrets() {
        let basic = format!("{:?}", BasicAuth::new("admin", "secret"));
        assert!(!basic.contains("secret"));
        assert!(!format!("{:?}", BearerToken::new("s3cr3t")).contains("s3cr3t"));
    }
}
