//! Post statuses, keyed by slug.

use serde::{Deserialize, Serialize};

use crate::collection::Catalog;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub name: String,
    pub private: bool,
    pub protected: bool,
    pub public: bool,
    pub queryable: bool,
    pub show_in_list: bool,
    pub slug: String,
}

pub type Statuses = Catalog<Status>;
