//! Credential -> owner resolution
//!
//! Key file layout:
//! ```text
//! {data_dir}/keys.json   # { "<api-key>": "<owner-id>", ... }
//! {data_dir}/keys.lock   # Exclusive OS lock held while registering
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use super::OwnerId;
use crate::fsutil::{self, DirLock};

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Owner id must not be empty")]
    EmptyOwner,
}

pub type Result<T> = std::result::Result<T, IdentityError>;

/// Maps an opaque credential to the owner it belongs to.
///
/// Implementations are trusted: whatever they return is used as the
/// requesting identity without further checks.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, credential: &str) -> Option<OwnerId>;
}

/// In-memory resolver, useful when the host application already knows its users
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    keys: HashMap<String, OwnerId>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, credential: impl Into<String>, owner: OwnerId) -> Self {
        self.keys.insert(credential.into(), owner);
        self
    }
}

impl IdentityResolver for StaticResolver {
    fn resolve(&self, credential: &str) -> Option<OwnerId> {
        self.keys.get(credential).cloned()
    }
}

/// API keys persisted as a JSON map in the data directory
pub struct KeyFileResolver {
    path: PathBuf,
    lock_path: PathBuf,
}

impl KeyFileResolver {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join("keys.json"),
            lock_path: data_dir.join("keys.lock"),
        }
    }

    fn load(&self) -> Result<HashMap<String, OwnerId>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let keys: HashMap<String, OwnerId> = serde_json::from_str(&content)?;
        Ok(keys)
    }

    /// Issue a new API key for an owner
    pub fn register(&self, owner: OwnerId) -> Result<String> {
        if owner.as_str().trim().is_empty() {
            return Err(IdentityError::EmptyOwner);
        }

        // Held across the read and the rename so concurrent registrations all land
        let _guard = DirLock::acquire(&self.lock_path)?;

        let mut keys = self.load()?;
        let key = format!("rk_{}", Uuid::new_v4().simple());
        keys.insert(key.clone(), owner.clone());

        let content = serde_json::to_string_pretty(&keys)?;
        fsutil::write_atomic(&self.path, content.as_bytes())?;

        log::info!("Registered API key for owner {}", owner);
        Ok(key)
    }
}

impl IdentityResolver for KeyFileResolver {
    fn resolve(&self, credential: &str) -> Option<OwnerId> {
        match self.load() {
            Ok(keys) => keys.get(credential).cloned(),
            Err(e) => {
                log::warn!("Failed to read key file {:?}: {}", self.path, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_static_resolver() {
        let resolver = StaticResolver::new().with_key("secret", OwnerId::new("alice"));

        assert_eq!(resolver.resolve("secret"), Some(OwnerId::new("alice")));
        assert_eq!(resolver.resolve("other"), None);
    }

    #[test]
    fn test_register_and_resolve() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = KeyFileResolver::new(temp_dir.path().to_path_buf());

        let alice = resolver.register(OwnerId::new("alice")).unwrap();
        let bob = resolver.register(OwnerId::new("bob")).unwrap();

        assert_ne!(alice, bob);
        assert_eq!(resolver.resolve(&alice), Some(OwnerId::new("alice")));
        assert_eq!(resolver.resolve(&bob), Some(OwnerId::new("bob")));
        assert_eq!(resolver.resolve("rk_unknown"), None);
    }

    #[test]
    fn test_missing_key_file_resolves_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = KeyFileResolver::new(temp_dir.path().join("nested"));

        assert_eq!(resolver.resolve("anything"), None);
    }

    #[test]
    fn test_register_rejects_blank_owner() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = KeyFileResolver::new(temp_dir.path().to_path_buf());

        assert!(matches!(
            resolver.register(OwnerId::new("  ")),
            Err(IdentityError::EmptyOwner)
        ));
    }

    #[test]
    fn test_concurrent_registrations_all_resolve() {
        use std::thread;

        let temp_dir = TempDir::new().unwrap();

        // Separate resolvers, as separate CLI runs would have
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let resolver = KeyFileResolver::new(temp_dir.path().to_path_buf());
                thread::spawn(move || {
                    let owner = OwnerId::new(format!("owner-{}", i));
                    (resolver.register(owner.clone()).unwrap(), owner)
                })
            })
            .collect();
        let issued: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let resolver = KeyFileResolver::new(temp_dir.path().to_path_buf());
        for (key, owner) in &issued {
            assert_eq!(resolver.resolve(key).as_ref(), Some(owner));
        }

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
