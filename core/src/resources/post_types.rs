//! Post types, keyed by slug.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collection::Catalog;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostType {
    pub description: String,
    pub hierarchical: bool,
    /// Admin UI strings (`singular_name`, `add_new_item`, ...). Values may be null.
    pub labels: BTreeMap<String, serde_json::Value>,
    pub name: String,
    pub rest_base: String,
    pub slug: String,
    pub taxonomies: Vec<String>,
}

pub type PostTypes = Catalog<PostType>;
