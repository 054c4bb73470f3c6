//! Site settings: one object, no ids.

use serde::{Deserialize, Serialize};

use super::common::is_default;
use crate::client::Client;
use crate::context::Context;
use crate::error::Result;
use crate::query::Query;
use crate::response::Response;

const PATH: &str = "settings";

/// Site settings. Zero fields are left out of updates, so an update only
/// changes what was set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timezone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date_format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time_format: String,
    #[serde(skip_serializing_if = "is_default")]
    pub start_of_week: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(skip_serializing_if = "is_default")]
    pub use_smilies: bool,
    #[serde(skip_serializing_if = "is_default")]
    pub default_category: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_post_format: String,
    #[serde(skip_serializing_if = "is_default")]
    pub posts_per_page: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_ping_status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_comment_status: String,
}

/// The `settings` endpoint. Needs an administrator.
#[derive(Debug, Clone)]
pub struct SettingsEndpoint {
    client: Client,
}

impl SettingsEndpoint {
    pub(crate) fn new(client: &Client) -> Self {
        Self { client: client.clone() }
    }

    pub async fn get(&self, ctx: &Context) -> Result<(Settings, Response)> {
        self.client.get(ctx, PATH, Query::None).await
    }

    pub async fn update(&self, ctx: &Context, settings: &Settings) -> Result<(Settings, Response)> {
        self.client.update(ctx, PATH, settings).await
    }
}
