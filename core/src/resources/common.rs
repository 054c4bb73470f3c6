//! Field types shared by several resources.

use serde::{Deserialize, Serialize};

/// `skip_serializing_if` predicate: omit fields still at their zero value.
pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// A string the API returns both as stored and as rendered HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderedString {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rendered: String,
}

impl RenderedString {
    /// A value to send: only the raw form is writable.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            raw: text.into(),
            rendered: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.rendered.is_empty()
    }
}

/// Gravatar URLs by pixel size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarUrls {
    #[serde(rename = "24", skip_serializing_if = "String::is_empty")]
    pub size_24: String,
    #[serde(rename = "48", skip_serializing_if = "String::is_empty")]
    pub size_48: String,
    #[serde(rename = "96", skip_serializing_if = "String::is_empty")]
    pub size_96: String,
}
