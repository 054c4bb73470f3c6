//! Comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{is_default, AvatarUrls, RenderedString};
use crate::collection::{Collection, Resource};
use crate::query::{ListOptions, QueryOptions, QueryPairs};
use crate::time::Timestamp;

pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_UNAPPROVED: &str = "unapproved";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(skip_serializing_if = "is_default")]
    pub id: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub author: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub author_avatar_urls: AvatarUrls,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_user_agent: String,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub content: RenderedString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_gmt: Option<Timestamp>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "is_default")]
    pub parent: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub post: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Resource for Comment {}

pub type Comments = Collection<Comment>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentListOptions {
    pub after: Option<DateTime<Utc>>,
    pub author: Vec<u64>,
    pub author_exclude: Vec<u64>,
    pub author_email: String,
    pub before: Option<DateTime<Utc>>,
    pub parent: Vec<u64>,
    pub parent_exclude: Vec<u64>,
    /// Password of the parent post when it is protected.
    pub password: String,
    pub post: Vec<u64>,
    pub status: String,
    pub kind: String,
    pub list: ListOptions,
}

impl QueryOptions for CommentListOptions {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs
            .time("after", self.after.as_ref())
            .list("author", &self.author)
            .list("author_exclude", &self.author_exclude)
            .text("author_email", &self.author_email)
            .time("before", self.before.as_ref())
            .list("parent", &self.parent)
            .list("parent_exclude", &self.parent_exclude)
            .text("password", &self.password)
            .list("post", &self.post)
            .text("status", &self.status)
            .text("type", &self.kind);
        self.list.encode(pairs);
    }
}
