//! Categories, tags and generic taxonomy terms, globally and per post.

use serde::{Deserialize, Serialize};

use super::common::is_default;
use crate::client::Client;
use crate::collection::{Collection, Resource};
use crate::context::Context;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::query::{ListOptions, Query, QueryOptions, QueryPairs};
use crate::response::Response;

/// A term of any taxonomy. Categories and tags share this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Term {
    #[serde(skip_serializing_if = "is_default")]
    pub id: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub count: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub taxonomy: String,
    /// Always zero for non-hierarchical taxonomies such as tags.
    #[serde(skip_serializing_if = "is_default")]
    pub parent: u64,
}

impl Resource for Term {}

pub type Category = Term;
pub type Tag = Term;

pub type Categories = Collection<Category>;
pub type Tags = Collection<Tag>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermListOptions {
    pub hide_empty: bool,
    /// Categories only.
    pub parent: u64,
    pub post: u64,
    pub slug: Vec<String>,
    pub list: ListOptions,
}

impl QueryOptions for TermListOptions {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs
            .flag("hide_empty", self.hide_empty)
            .number("parent", self.parent)
            .number("post", self.post)
            .texts("slug", &self.slug);
        self.list.encode(pairs);
    }
}

/// The `terms/<taxonomy>` endpoints.
#[derive(Debug, Clone)]
pub struct Terms {
    client: Client,
}

impl Terms {
    pub(crate) fn new(client: &Client) -> Self {
        Self { client: client.clone() }
    }

    pub async fn list<'q>(
        &self,
        ctx: &Context,
        taxonomy: &str,
        query: impl Into<Query<'q>>,
    ) -> Result<(Vec<Term>, Response)> {
        self.taxonomy(taxonomy).list(ctx, query).await
    }

    pub fn taxonomy(&self, taxonomy: &str) -> Collection<Term> {
        Collection::new(&self.client, format!("terms/{taxonomy}"))
    }

    pub fn tag(&self) -> Collection<Term> {
        self.taxonomy("tag")
    }

    pub fn category(&self) -> Collection<Term> {
        self.taxonomy("category")
    }
}

/// Terms assigned to one post, below `posts/<id>/terms`.
#[derive(Debug, Clone)]
pub struct PostTerms {
    client: Client,
    path: String,
}

impl PostTerms {
    pub(crate) fn new(client: &Client, path: String) -> Self {
        Self {
            client: client.clone(),
            path,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn list<'q>(
        &self,
        ctx: &Context,
        taxonomy: &str,
        query: impl Into<Query<'q>>,
    ) -> Result<(Vec<Term>, Response)> {
        self.taxonomy(taxonomy).list(ctx, query).await
    }

    pub fn taxonomy(&self, taxonomy: &str) -> PostTaxonomyTerms {
        PostTaxonomyTerms {
            inner: Collection::new(&self.client, format!("{}/{taxonomy}", self.path)),
        }
    }

    pub fn tag(&self) -> PostTaxonomyTerms {
        self.taxonomy("tag")
    }

    pub fn category(&self) -> PostTaxonomyTerms {
        self.taxonomy("category")
    }
}

/// Terms of one taxonomy assigned to one post.
#[derive(Debug, Clone)]
pub struct PostTaxonomyTerms {
    inner: Collection<Term>,
}

impl PostTaxonomyTerms {
    pub fn path(&self) -> &str {
        self.inner.path()
    }

    pub async fn list<'q>(&self, ctx: &Context, query: impl Into<Query<'q>>) -> Result<(Vec<Term>, Response)> {
        self.inner.list(ctx, query).await
    }

    /// Assign the existing term `id` to the post.
    pub async fn create(&self, ctx: &Context, id: u64) -> Result<(Term, Response)> {
        let client = self.inner.client();
        let request = client.new_request(HttpMethod::Post, &self.inner.item_path(id), Query::None)?;
        client.execute_json(ctx, request).await
    }

    pub async fn get<'q>(&self, ctx: &Context, id: u64, query: impl Into<Query<'q>>) -> Result<(Term, Response)> {
        self.inner.get(ctx, id, query).await
    }

    /// Remove the term `id` from the post.
    pub async fn delete<'q>(&self, ctx: &Context, id: u64, query: impl Into<Query<'q>>) -> Result<(Term, Response)> {
        self.inner.delete(ctx, id, query).await
    }
}
