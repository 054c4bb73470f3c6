//! Typed async client core for the WordPress REST API (`wp-json/wp/v2`).
//!
//! # Overview
//! Requests are built as plain [`HttpRequest`] values and sent through a
//! pluggable [`Transport`] (reqwest by default), so request building and
//! response handling are deterministic and testable without a network.
//!
//! # Design
//! - `Client` is a cheap `Clone` over shared read-only configuration and
//!   holds one authenticator and one transport.
//! - Every resource is a serde type served through the generic
//!   [`Collection`]; entities it returns carry an [`Origin`] so nested
//!   collections (revisions, meta, post terms) hang off the entity itself.
//! - Every call returns the decoded value next to a [`Response`] envelope
//!   with status, headers and pagination. Errors carry the envelope too
//!   whenever the server answered.
//! - Timestamps accept both the offset and the naive layout the API mixes,
//!   reading naive values in the client's configured location.
//! - Schemas are defined independently from the mock-server crate;
//!   integration tests catch drift.

pub mod auth;
pub mod client;
pub mod collection;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod http;
pub mod pagination;
pub mod query;
pub mod resources;
pub mod response;
pub mod time;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{Anonymous, Authenticator, BasicAuth, BearerToken};
pub use client::{Client, ClientBuilder};
pub use collection::{Catalog, Collection, Origin, Resource};
pub use config::{AuthConfig, ClientConfig};
pub use context::Context;
pub use discovery::{discover, Discovered, RootInfo};
pub use error::{ApiError, ConfigError, Error, ErrorPayload, Result, TimestampError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ResponseBody};
pub use pagination::Pagination;
pub use query::{DeleteParams, GetParams, ListOptions, Query, QueryOptions, QueryPairs};
pub use response::Response;
pub use time::Timestamp;
pub use transport::{ReqwestTransport, Transport};
