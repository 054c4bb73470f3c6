//! One generic facade for every REST collection.
//!
//! # Design
//! A resource is a serde type plus a collection path. [`Collection<T>`] maps
//! the five verbs onto the client's generic dispatch and hands every returned
//! entity an [`Origin`], so nested collections (revisions, meta, post terms)
//! can be reached from the entity itself. The origin holds only a weak client
//! reference; entities never keep a client alive.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Weak;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::client::{Client, ClientInner};
use crate::context::Context;
use crate::error::Result;
use crate::query::Query;
use crate::response::Response;

/// A type served by a REST collection.
pub trait Resource: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Called on every entity a [`Collection`] returns.
    fn attach(&mut self, _origin: &Origin) {}
}

/// Where an entity came from: its client and its collection path.
#[derive(Clone)]
pub struct Origin {
    client: Weak<ClientInner>,
    collection: String,
}

impl Origin {
    pub(crate) fn new(client: &Client, collection: impl Into<String>) -> Self {
        Self {
            client: client.downgrade(),
            collection: collection.into(),
        }
    }

    /// The client, if it is still alive.
    pub fn client(&self) -> Option<Client> {
        Client::upgrade(&self.client)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Path of `child` below the item `id` of this collection.
    pub fn child_path(&self, id: u64, child: &str) -> String {
        format!("{}/{id}/{child}", self.collection)
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Origin")
            .field("collection", &self.collection)
            .field("live", &(self.client.strong_count() > 0))
            .finish()
    }
}

impl PartialEq for Origin {
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection && self.client.ptr_eq(&other.client)
    }
}

/// Resolve the live client behind `origin` for a nested accessor, logging when there is none.
pub(crate) fn parent<'a>(origin: Option<&'a Origin>, entity: &'static str) -> Option<(Client, &'a Origin)> {
    let found = origin.and_then(|origin| origin.client().map(|client| (client, origin)));
    if found.is_none() {
        warn!(entity, "missing parent collection, entity was not returned by the api");
    }
    found
}

/// Typed access to one collection path.
pub struct Collection<T> {
    client: Client,
    path: String,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection").field("path", &self.path).finish()
    }
}

impl<T: Resource> Collection<T> {
    pub fn new(client: &Client, path: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            path: path.into(),
            _resource: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn origin(&self) -> Origin {
        Origin::new(&self.client, self.path.clone())
    }

    pub(crate) fn item_path(&self, id: impl fmt::Display) -> String {
        format!("{}/{id}", self.path)
    }

    fn adopt(&self, mut item: T) -> T {
        item.attach(&self.origin());
        item
    }

    pub async fn list<'q>(&self, ctx: &Context, query: impl Into<Query<'q>>) -> Result<(Vec<T>, Response)> {
        let (items, response): (Vec<T>, _) = self.client.list(ctx, &self.path, query.into()).await?;
        let origin = self.origin();
        let items = items
            .into_iter()
            .map(|mut item| {
                item.attach(&origin);
                item
            })
            .collect();
        Ok((items, response))
    }

    pub async fn get<'q>(&self, ctx: &Context, id: u64, query: impl Into<Query<'q>>) -> Result<(T, Response)> {
        let (item, response) = self.client.get(ctx, &self.item_path(id), query.into()).await?;
        Ok((self.adopt(item), response))
    }

    pub async fn create(&self, ctx: &Context, item: &T) -> Result<(T, Response)> {
        let (item, response) = self.client.create(ctx, &self.path, item).await?;
        Ok((self.adopt(item), response))
    }

    pub async fn update(&self, ctx: &Context, id: u64, item: &T) -> Result<(T, Response)> {
        let (item, response) = self.client.update(ctx, &self.item_path(id), item).await?;
        Ok((self.adopt(item), response))
    }

    /// Move to the trash, or delete for good when the query forces it.
    pub async fn delete<'q>(&self, ctx: &Context, id: u64, query: impl Into<Query<'q>>) -> Result<(T, Response)> {
        let (item, response) = self.client.delete(ctx, &self.item_path(id), query.into()).await?;
        Ok((self.adopt(item), response))
    }
}

/// Read-only collection keyed by slug (statuses, types, taxonomies).
pub struct Catalog<T> {
    client: Client,
    path: String,
    _resource: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Catalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog").field("path", &self.path).finish()
    }
}

impl<T: DeserializeOwned + Default> Catalog<T> {
    pub fn new(client: &Client, path: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            path: path.into(),
            _resource: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Every entry, keyed by slug.
    pub async fn list<'q>(&self, ctx: &Context, query: impl Into<Query<'q>>) -> Result<(BTreeMap<String, T>, Response)> {
        self.client.list(ctx, &self.path, query.into()).await
    }

    pub async fn get<'q>(&self, ctx: &Context, slug: &str, query: impl Into<Query<'q>>) -> Result<(T, Response)> {
        self.client.get(ctx, &format!("{}/{slug}", self.path), query.into()).await
    }
}
