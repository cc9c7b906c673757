/// External directory collaborator interface
///
/// The search/connection mechanism itself belongs to the embedding system;
/// this crate only consumes its results as raw attribute sets.
use crate::error::UserDirResult;
use async_trait::async_trait;
use std::collections::HashMap;

/// Sparse set of named, single-valued directory attributes.
///
/// Attributes absent from the set are unset, not empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    attrs: HashMap<String, String>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the named attribute, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            attrs: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// Directory search backend trait
///
/// Implementations perform the actual directory query (network I/O).
#[async_trait]
pub trait DirectorySearch: Send + Sync {
    /// Query the directory for a single user record.
    ///
    /// `Ok(None)` is a clean no-match and is cached as such; `Err` is a
    /// transport-level failure and must never be cached.
    async fn search_for_user(&self, username: &str) -> UserDirResult<Option<AttributeSet>>;
}
