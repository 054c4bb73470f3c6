//! The media library and file uploads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{is_default, RenderedString};
use crate::collection::{Collection, Resource};
use crate::context::Context;
use crate::error::Result;
use crate::query::{ListOptions, QueryOptions, QueryPairs};
use crate::response::Response;
use crate::time::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSize {
    pub file: String,
    pub width: u64,
    pub height: u64,
    pub mime_type: String,
    pub source_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaDetails {
    pub width: u64,
    pub height: u64,
    pub file: String,
    /// Generated sizes by name (`thumbnail`, `medium`, `full`, ...).
    pub sizes: BTreeMap<String, MediaSize>,
    pub image_meta: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    #[serde(skip_serializing_if = "is_default")]
    pub id: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alt_text: String,
    #[serde(skip_serializing_if = "is_default")]
    pub author: u64,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub caption: RenderedString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_gmt: Option<Timestamp>,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub description: RenderedString,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub guid: RenderedString,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing)]
    pub media_details: MediaDetails,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_gmt: Option<Timestamp>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ping_status: String,
    /// Id of the post the file is attached to.
    #[serde(skip_serializing_if = "is_default")]
    pub post: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub title: RenderedString,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Resource for Media {}

pub type MediaLibrary = Collection<Media>;

/// A file to upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaUploadOptions {
    pub filename: String,
    /// MIME type of `data`, e.g. `image/png`.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Collection<Media> {
    /// Upload a file as a new media item.
    pub async fn upload(&self, ctx: &Context, file: &MediaUploadOptions) -> Result<(Media, Response)> {
        let client = self.client();
        let request = client.new_upload_request(self.path(), &file.data, &file.content_type, &file.filename)?;
        client.execute_json(ctx, request).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaListOptions {
    pub after: Option<DateTime<Utc>>,
    pub author: Vec<u64>,
    pub author_exclude: Vec<u64>,
    pub before: Option<DateTime<Utc>>,
    pub media_type: String,
    pub mime_type: String,
    pub parent: Vec<u64>,
    pub parent_exclude: Vec<u64>,
    pub slug: String,
    pub status: String,
    pub list: ListOptions,
}

impl QueryOptions for MediaListOptions {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs
            .time("after", self.after.as_ref())
            .list("author", &self.author)
            .list("author_exclude", &self.author_exclude)
            .time("before", self.before.as_ref())
            .text("media_type", &self.media_type)
            .text("mime_type", &self.mime_type)
            .list("parent", &self.parent)
            .list("parent_exclude", &self.parent_exclude)
            .text("slug", &self.slug)
            .text("status", &self.status);
        self.list.encode(pairs);
    }
}
