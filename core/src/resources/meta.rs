//! Custom fields of a post or page.

use serde::{Deserialize, Serialize};

use super::common::is_default;
use crate::client::Client;
use crate::collection::{Collection, Resource};
use crate::context::Context;
use crate::error::Result;
use crate::http::{HttpMethod, METHOD_OVERRIDE};
use crate::query::{DeleteParams, Query};
use crate::response::Response;

/// One meta entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(skip_serializing_if = "is_default")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub value: serde_json::Value,
}

impl Resource for Meta {}

/// Answer to a meta delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MetaDeleted {
    pub message: String,
}

/// Meta entries below one parent item, e.g. `pages/3/meta`.
#[derive(Debug, Clone)]
pub struct MetaCollection {
    inner: Collection<Meta>,
}

impl MetaCollection {
    pub(crate) fn new(client: &Client, path: String) -> Self {
        Self {
            inner: Collection::new(client, path),
        }
    }

    pub fn path(&self) -> &str {
        self.inner.path()
    }

    pub async fn list<'q>(&self, ctx: &Context, query: impl Into<Query<'q>>) -> Result<(Vec<Meta>, Response)> {
        self.inner.list(ctx, query).await
    }

    pub async fn get<'q>(&self, ctx: &Context, id: u64, query: impl Into<Query<'q>>) -> Result<(Meta, Response)> {
        self.inner.get(ctx, id, query).await
    }

    pub async fn create(&self, ctx: &Context, meta: &Meta) -> Result<(Meta, Response)> {
        self.inner.create(ctx, meta).await
    }

    pub async fn update(&self, ctx: &Context, id: u64, meta: &Meta) -> Result<(Meta, Response)> {
        self.inner.update(ctx, id, meta).await
    }

    /// Meta entries cannot be trashed. The server answers with a message instead of the entry.
    pub async fn delete(&self, ctx: &Context, id: u64) -> Result<(MetaDeleted, Response)> {
        let client = self.inner.client();
        let params = DeleteParams::force();
        let mut request = client.new_request(HttpMethod::Post, &self.inner.item_path(id), Query::from(&params))?;
        request.set_header(METHOD_OVERRIDE, HttpMethod::Delete.as_str());
        client.execute_json(ctx, request).await
    }
}
