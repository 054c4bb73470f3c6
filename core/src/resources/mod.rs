//! Typed facades for every WordPress resource.

pub mod comments;
pub mod common;
pub mod media;
pub mod meta;
pub mod pages;
pub mod post_types;
pub mod posts;
pub mod revisions;
pub mod settings;
pub mod statuses;
pub mod taxonomies;
pub mod terms;
pub mod users;

use crate::client::Client;
use crate::collection::{Catalog, Collection};

pub use comments::{Comment, CommentListOptions, Comments};
pub use common::{AvatarUrls, RenderedString};
pub use media::{Media, MediaDetails, MediaLibrary, MediaListOptions, MediaSize, MediaUploadOptions};
pub use meta::{Meta, MetaCollection, MetaDeleted};
pub use pages::{Page, PageListOptions, Pages};
pub use post_types::{PostType, PostTypes};
pub use posts::{Post, PostListOptions, Posts};
pub use revisions::{Revision, Revisions};
pub use settings::{Settings, SettingsEndpoint};
pub use statuses::{Status, Statuses};
pub use taxonomies::{Taxonomies, Taxonomy};
pub use terms::{Categories, Category, PostTaxonomyTerms, PostTerms, Tag, Tags, Term, TermListOptions, Terms};
pub use users::{User, UserListOptions, Users};

impl Client {
    pub fn posts(&self) -> Posts {
        Collection::new(self, "posts")
    }

    pub fn pages(&self) -> Pages {
        Collection::new(self, "pages")
    }

    pub fn comments(&self) -> Comments {
        Collection::new(self, "comments")
    }

    pub fn media(&self) -> MediaLibrary {
        Collection::new(self, "media")
    }

    pub fn users(&self) -> Users {
        Collection::new(self, "users")
    }

    pub fn categories(&self) -> Categories {
        Collection::new(self, "categories")
    }

    pub fn tags(&self) -> Tags {
        Collection::new(self, "tags")
    }

    pub fn terms(&self) -> Terms {
        Terms::new(self)
    }

    pub fn taxonomies(&self) -> Taxonomies {
        Catalog::new(self, "taxonomies")
    }

    pub fn statuses(&self) -> Statuses {
        Catalog::new(self, "statuses")
    }

    pub fn types(&self) -> PostTypes {
        Catalog::new(self, "types")
    }

    pub fn settings(&self) -> SettingsEndpoint {
        SettingsEndpoint::new(self)
    }
}
