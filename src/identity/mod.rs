//! Owner identity and credential resolution
//!
//! The scheduling core never inspects credentials. Callers resolve an API key
//! (or any other credential) to an [`OwnerId`] through an [`IdentityResolver`]
//! and hand the result to the flashcard operations.

mod resolver;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use resolver::{IdentityError, IdentityResolver, KeyFileResolver, StaticResolver};

/// Opaque identity of the user that owns a flashcard
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
