//! Posts and their nested collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{is_default, RenderedString};
use super::meta::MetaCollection;
use super::revisions::Revisions;
use super::terms::PostTerms;
use crate::collection::{parent, Collection, Origin, Resource};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::query::{ListOptions, Query, QueryOptions, QueryPairs};
use crate::response::Response;
use crate::time::Timestamp;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PRIVATE: &str = "private";
pub const STATUS_PUBLISH: &str = "publish";
pub const STATUS_TRASH: &str = "trash";

pub const COMMENTS_OPEN: &str = "open";
pub const COMMENTS_CLOSED: &str = "closed";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    #[serde(skip)]
    pub origin: Option<Origin>,

    #[serde(skip_serializing_if = "is_default")]
    pub id: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub author: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u64>,
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
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub guid: RenderedString,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_gmt: Option<Timestamp>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ping_status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "is_default")]
    pub sticky: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub template: String,
    #[serde(skip_serializing_if = "RenderedString::is_empty")]
    pub title: RenderedString,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Resource for Post {
    fn attach(&mut self, origin: &Origin) {
        self.origin = Some(origin.clone());
    }
}

impl Post {
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn revisions(&self) -> Option<Revisions> {
        let (client, origin) = parent(self.origin.as_ref(), "post")?;
        Some(Revisions::new(&client, origin.child_path(self.id, "revisions")))
    }

    pub fn terms(&self) -> Option<PostTerms> {
        let (client, origin) = parent(self.origin.as_ref(), "post")?;
        Some(PostTerms::new(&client, origin.child_path(self.id, "terms")))
    }

    pub fn meta(&self) -> Option<MetaCollection> {
        let (client, origin) = parent(self.origin.as_ref(), "post")?;
        Some(MetaCollection::new(&client, origin.child_path(self.id, "meta")))
    }

    /// Fetch the full post for an entity created with [`Posts::entity`].
    pub async fn populate<'q>(&self, ctx: &Context, query: impl Into<Query<'q>>) -> Result<(Post, Response)> {
        let (client, origin) = parent(self.origin.as_ref(), "post").ok_or(Error::Detached("post"))?;
        Collection::<Post>::new(&client, origin.collection())
            .get(ctx, self.id, query)
            .await
    }
}

pub type Posts = Collection<Post>;

impl Collection<Post> {
    /// A post carrying only `id`, bound to this collection so nested accessors work without a fetch.
    pub fn entity(&self, id: u64) -> Post {
        Post {
            origin: Some(self.origin()),
            id,
            ..Post::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListOptions {
    pub after: Option<DateTime<Utc>>,
    pub author: Vec<u64>,
    pub author_exclude: Vec<u64>,
    pub before: Option<DateTime<Utc>>,
    pub categories: Vec<u64>,
    pub categories_exclude: Vec<u64>,
    pub slug: String,
    pub status: String,
    pub sticky: bool,
    pub tags: Vec<u64>,
    pub tags_exclude: Vec<u64>,
    pub list: ListOptions,
}

impl QueryOptions for PostListOptions {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs
            .time("after", self.after.as_ref())
            .list("author", &self.author)
            .list("author_exclude", &self.author_exclude)
            .time("before", self.before.as_ref())
            .list("categories", &self.categories)
            .list("categories_exclude", &self.categories_exclude)
            .text("slug", &self.slug)
            .text("status", &self.status)
            .flag("sticky", self.sticky)
            .list("tags", &self.tags)
            .list("tags_exclude", &self.tags_exclude);
        self.list.encode(pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::http::HttpMethod;
    use crate::testing::FakeTransport;
    use chrono::TimeZone;

    fn setup() -> (FakeTransport, Client) {
        let transport = FakeTransport::new();
        let client = Client::builder("https://example.com/")
            .transport(transport.clone())
            .build()
            .unwrap();
        (transport, client)
    }

    #[test]
    fn detached_post_has_no_nested_collections() {
        let post = Post {
            id: 4,
            ..Post::default()
        };
        assert!(post.revisions().is_none());
        assert!(post.terms().is_none());
        assert!(post.meta().is_none());
    }

    #[tokio::test]
    async fn populate_without_origin_fails() {
        let err = Post::default()
            .populate(&Context::background(), Query::None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Detached("post")));
    }

    #[tokio::test]
    async fn entity_reaches_nested_paths_and_populates() {
        let (transport, client) = setup();
        transport.respond(200, &[], r#"{"id":12,"title":{"rendered":"Hello"}}"#);
        let post = client.posts().entity(12);

        assert_eq!(post.revisions().unwrap().path(), "posts/12/revisions");
        assert_eq!(post.meta().unwrap().path(), "posts/12/meta");
        assert_eq!(post.terms().unwrap().tag().path(), "posts/12/terms/tag");

        let (full, _) = post.populate(&Context::background(), Query::None).await.unwrap();
        assert_eq!(full.title.rendered, "Hello");
        assert!(full.origin().is_some());
        assert_eq!(transport.requests()[0].method, HttpMethod::Get);
        assert_eq!(transport.requests()[0].url.path(), "/wp-json/wp/v2/posts/12");
    }

    #[tokio::test]
    async fn post_term_create_posts_to_term_id() {
        let (transport, client) = setup();
        transport.respond(201, &[], r#"{"id":5,"name":"rust","taxonomy":"post_tag"}"#);
        let terms = client.posts().entity(12).terms().unwrap();

        let (term, _) = terms.tag().create(&Context::background(), 5).await.unwrap();
        assert_eq!(term.name, "rust");
        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url.path(), "/wp-json/wp/v2/posts/12/terms/tag/5");
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn revision_delete_is_always_forced() {
        let (transport, client) = setup();
        transport.respond(200, &[], r#"{"deleted":true,"previous":{"id":30,"parent":12}}"#);
        let revisions = client.posts().entity(12).revisions().unwrap();

        let (revision, _) = revisions.delete(&Context::background(), 30).await.unwrap();
        assert_eq!(revision.parent, 12);
        assert_eq!(transport.requests()[0].url.query(), Some("force=true"));
    }

    #[test]
    fn new_post_omits_zero_fields() {
        let post = Post {
            title: RenderedString::raw("Hello"),
            status: STATUS_DRAFT.to_string(),
            ..Post::default()
        };
        assert_eq!(
            serde_json::to_string(&post).unwrap(),
            r#"{"status":"draft","title":{"raw":"Hello"}}"#
        );
    }

    #[test]
    fn decodes_naive_and_offset_dates() {
        let post: Post = serde_json::from_str(
            r#"{"id":1,"date":"2017-12-25T09:54:42","date_gmt":"2017-12-25T09:54:42+00:00","type":"post"}"#,
        )
        .unwrap();
        assert_eq!(post.kind, "post");
        assert_eq!(post.date.unwrap().encode(), "2017-12-25T09:54:42");
        assert_eq!(post.date_gmt.unwrap().encode(), "2017-12-25T09:54:42");
    }

    #[test]
    fn list_options_encode_times_and_lists() {
        let options = PostListOptions {
            after: Some(Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap()),
            categories: vec![1, 2],
            list: ListOptions {
                page: 3,
                ..ListOptions::default()
            },
            ..PostListOptions::default()
        };
        assert_eq!(
            options.to_query_string(),
            "after=2017-01-01T00%3A00%3A00Z&categories%5B%5D=1&categories%5B%5D=2&page=3"
        );
    }
}
