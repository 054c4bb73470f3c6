//! Pages. Like posts, minus terms, plus hierarchy and menu order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{is_default, RenderedString};
use super::meta::MetaCollection;
use super::revisions::Revisions;
use crate::collection::{parent, Collection, Origin, Resource};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::query::{ListOptions, Query, QueryOptions, QueryPairs};
use crate::response::Response;
use crate::time::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    #[serde(skip)]
    origin: Option<Origin>,

    #[serde(skip_serializing_if = "is_default")]
    pub id: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub author: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment_status: String,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub content: RenderedString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_gmt: Option<Timestamp>,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub excerpt: RenderedString,
    #[serde(skip_serializing_if = "is_default")]
    pub featured_media: u64,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub guid: RenderedString,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "is_default")]
    pub menu_order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_gmt: Option<Timestamp>,
    #[serde(skip_serializing_if = "is_default")]
    pub parent: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ping_status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub template: String,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub title: RenderedString,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Resource for Page {
    fn attach(&mut self, origin: &Origin) {
        self.origin = Some(origin.clone());
    }
}

impl Page {
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn revisions(&self) -> Option<Revisions> {
        let (client, origin) = parent(self.origin.as_ref(), "page")?;
        Some(Revisions::new(&client, origin.child_path(self.id, "revisions")))
    }

    pub fn meta(&self) -> Option<MetaCollection> {
        let (client, origin) = parent(self.origin.as_ref(), "page")?;
        Some(MetaCollection::new(&client, origin.child_path(self.id, "meta")))
    }

    pub async fn populate<'q>(&self, ctx: &Context, query: impl Into<Query<'q>>) -> Result<(Page, Response)> {
        let (client, origin) = parent(self.origin.as_ref(), "page").ok_or(Error::Detached("page"))?;
        Collection::<Page>::new(&client, origin.collection())
            .get(ctx, self.id, query)
            .await
    }
}

pub type Pages = Collection<Page>;

impl Collection<Page> {
    pub fn entity(&self, id: u64) -> Page {
        Page {
            origin: Some(self.origin()),
            id,
            ..Page::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageListOptions {
    pub after: Option<DateTime<Utc>>,
    pub author: Vec<u64>,
    pub author_exclude: Vec<u64>,
    pub before: Option<DateTime<Utc>>,
    pub menu_order: u64,
    pub parent: Vec<u64>,
    pub parent_exclude: Vec<u64>,
    pub slug: String,
    pub status: String,
    pub list: ListOptions,
}

impl QueryOptions for PageListOptions {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs
            .time("after", self.after.as_ref())
            .list("author", &self.author)
            .list("author_exclude", &self.author_exclude)
            .time("before", self.before.as_ref())
            .number("menu_order", self.menu_order)
            .list("parent", &self.parent)
            .list("parent_exclude", &self.parent_exclude)
            .text("slug", &self.slug)
            .text("status", &self.status);
        self.list.encode(pairs);
    }
}
