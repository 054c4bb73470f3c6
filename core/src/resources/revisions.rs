//! Revisions of a post or page.

use serde::{Deserialize, Serialize};

use super::common::{is_default, RenderedString};
use crate::client::Client;
use crate::collection::{Collection, Resource};
use crate::context::Context;
use crate::error::Result;
use crate::query::{DeleteParams, Query};
use crate::response::Response;
use crate::time::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Revision {
    #[serde(skip_serializing_if = "is_default")]
    pub id: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub author: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_gmt: Option<Timestamp>,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub guid: RenderedString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_gmt: Option<Timestamp>,
    #[serde(skip_serializing_if = "is_default")]
    pub parent: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub title: RenderedString,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub content: RenderedString,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub excerpt: RenderedString,
}

impl Resource for Revision {}

/// Revisions below one parent item, e.g. `posts/7/revisions`.
#[derive(Debug, Clone)]
pub struct Revisions {
    inner: Collection<Revision>,
}

impl Revisions {
    pub(crate) fn new(client: &Client, path: String) -> Self {
        Self {
            inner: Collection::new(client, path),
        }
    }

    pub fn path(&self) -> &str {
        self.inner.path()
    }

    pub async fn list<'q>(&self, ctx: &Context, query: impl Into<Query<'q>>) -> Result<(Vec<Revision>, Response)> {
        self.inner.list(ctx, query).await
    }

    pub async fn get<'q>(&self, ctx: &Context, id: u64, query: impl Into<Query<'q>>) -> Result<(Revision, Response)> {
        self.inner.get(ctx, id, query).await
    }

    /// Revisions have no trash, so deletes are always forced.
    pub async fn delete(&self, ctx: &Context, id: u64) -> Result<(Revision, Response)> {
        self.inner.delete(ctx, id, &DeleteParams::force()).await
    }
}
