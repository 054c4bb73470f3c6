//! Registered taxonomies, keyed by slug.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collection::Catalog;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub description: String,
    pub hierarchical: bool,
    pub labels: BTreeMap<String, serde_json::Value>,
    pub name: String,
    pub rest_base: String,
    pub show_cloud: bool,
    pub slug: String,
    /// Post types the taxonomy applies to.
    pub types: Vec<String>,
}

pub type Taxonomies = Catalog<Taxonomy>;
