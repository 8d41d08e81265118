//! Payload types for the remote data-source bindings.
//!
//! A select source answers `(search, initial, state)` with a list of
//! [`RemoteOption`]s. A tabulator source answers
//! `(page, size, filters, sorters, state)` with a [`RemoteData`] page.

use serde::{Deserialize, Serialize};

/// One entry offered by a remote select source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub divider: bool,
}

impl RemoteOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn divider() -> Self {
        Self {
            divider: true,
            ..Default::default()
        }
    }

    pub fn with_subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = Some(subtext.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// A filter applied by a tabulator source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFilter {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// A sort order requested from a tabulator source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSorter {
    pub field: String,
    pub dir: String,
}

impl RemoteSorter {
    pub fn is_descending(&self) -> bool {
        self.dir.eq_ignore_ascii_case("desc")
    }
}

/// One page of rows returned by a tabulator source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteData<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub last_page: i32,
}

impl<T> RemoteData<T> {
    pub fn new(data: Vec<T>, last_page: i32) -> Self {
        Self { data, last_page }
    }
}
