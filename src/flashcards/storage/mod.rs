//! Flashcard persistence
//!
//! The scheduling core only needs get/put by id and a due-range query per
//! owner. Concurrent reviews of the same card are serialized with an
//! optimistic version counter: [`FlashcardStore::commit`] only succeeds when
//! the stored version still matches the version the caller read.

mod file;
mod memory;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::Flashcard;
use crate::identity::OwnerId;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Card {id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict { id: Uuid, expected: u64, found: u64 },

    #[error("Card {0} does not exist")]
    Missing(Uuid),

    #[error("Card already exists: {0}")]
    AlreadyExists(Uuid),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub trait FlashcardStore: Send + Sync {
    /// Fetch a card by id
    fn get(&self, id: Uuid) -> Result<Option<Flashcard>>;

    /// Persist a newly created card
    fn insert(&self, card: &Flashcard) -> Result<()>;

    /// Persist a batch of newly created cards
    fn insert_batch(&self, cards: &[Flashcard]) -> Result<()> {
        for card in cards {
            self.insert(card)?;
        }
        Ok(())
    }

    /// Atomically replace a card if its stored version is still `expected_version`.
    ///
    /// Returns the stored card with its version bumped.
    fn commit(&self, card: &Flashcard, expected_version: u64) -> Result<Flashcard>;

    /// All cards belonging to an owner, in no particular order
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Flashcard>>;

    /// Cards belonging to an owner with `next_review <= as_of`, in no particular order
    fn list_due(&self, owner: &OwnerId, as_of: DateTime<Utc>) -> Result<Vec<Flashcard>> {
        Ok(self
            .list_by_owner(owner)?
            .into_iter()
            .filter(|card| card.is_due(as_of))
            .collect())
    }
}
