//! JSON file store
//!
//! Directory structure:
//! ```text
//! {data_dir}/flashcards/
//! ├── .lock                # Exclusive OS lock held by writers
//! └── cards/
//!     └── {card-id}.json   # One file per card, schedule included
//! ```
//!
//! Files are replaced through a uniquely named temp file and a rename so
//! readers never see a half-written card. Writers, in this process or any
//! other, hold the `.lock` file across the version check and the rename.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{FlashcardStore, Result, StoreError};
use crate::flashcards::models::Flashcard;
use crate::fsutil::{self, DirLock};
use crate::identity::OwnerId;

pub struct FileStore {
    cards_dir: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the store under `data_dir`
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let flashcards_dir = data_dir.join("flashcards");
        let cards_dir = flashcards_dir.join("cards");
        fs::create_dir_all(&cards_dir)?;

        Ok(Self {
            cards_dir,
            lock_path: flashcards_dir.join(".lock"),
        })
    }

    /// Get the path for a specific card
    fn card_path(&self, id: Uuid) -> PathBuf {
        self.cards_dir.join(format!("{}.json", id))
    }

    fn lock(&self) -> Result<DirLock> {
        Ok(DirLock::acquire(&self.lock_path)?)
    }

    fn read_card(path: &Path) -> Result<Flashcard> {
        let content = fs::read_to_string(path)?;
        let card: Flashcard = serde_json::from_str(&content)?;
        Ok(card)
    }

    fn stage(&self, card: &Flashcard) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(card)?;
        Ok(fsutil::stage(&self.card_path(card.id), content.as_bytes())?)
    }

    fn publish(&self, card: &Flashcard, temp_path: &Path) -> Result<()> {
        if let Err(e) = fs::rename(temp_path, self.card_path(card.id)) {
            let _ = fs::remove_file(temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Rename staged files into place. On failure, nothing of the batch stays visible.
    /// Callers hold the lock and have checked that none of the cards existed.
    fn publish_all(&self, cards: &[Flashcard], staged: &[PathBuf]) -> Result<()> {
        for (index, (card, temp_path)) in cards.iter().zip(staged).enumerate() {
            if let Err(e) = self.publish(card, temp_path) {
                for published in &cards[..index] {
                    let _ = fs::remove_file(self.card_path(published.id));
                }
                for leftover in &staged[index + 1..] {
                    let _ = fs::remove_file(leftover);
                }
                log::warn!("Failed to insert batch of {} card(s): {}", cards.len(), e);
                return Err(e);
            }
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Flashcard>> {
        let mut cards = Vec::new();
        for entry in fs::read_dir(&self.cards_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                cards.push(Self::read_card(&path)?);
            }
        }
        Ok(cards)
    }
}

impl FlashcardStore for FileStore {
    fn get(&self, id: Uuid) -> Result<Option<Flashcard>> {
        let path = self.card_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_card(&path).map(Some)
    }

    fn insert(&self, card: &Flashcard) -> Result<()> {
        self.insert_batch(std::slice::from_ref(card))
    }

    fn insert_batch(&self, cards: &[Flashcard]) -> Result<()> {
        let _guard = self.lock()?;

        if let Some(existing) = cards.iter().find(|c| self.card_path(c.id).exists()) {
            return Err(StoreError::AlreadyExists(existing.id));
        }

        // Stage everything before publishing anything
        let mut staged = Vec::with_capacity(cards.len());
        for card in cards {
            match self.stage(card) {
                Ok(path) => staged.push(path),
                Err(e) => {
                    for path in &staged {
                        let _ = fs::remove_file(path);
                    }
                    return Err(e);
                }
            }
        }

        self.publish_all(cards, &staged)?;

        log::debug!("Inserted {} card(s) into {:?}", cards.len(), self.cards_dir);
        Ok(())
    }

    fn commit(&self, card: &Flashcard, expected_version: u64) -> Result<Flashcard> {
        let _guard = self.lock()?;

        let stored = self.get(card.id)?.ok_or(StoreError::Missing(card.id))?;
        if stored.version != expected_version {
            return Err(StoreError::Conflict {
                id: card.id,
                expected: expected_version,
                found: stored.version,
            });
        }

        let mut updated = card.clone();
        updated.version = expected_version + 1;

        let temp_path = self.stage(&updated)?;
        self.publish(&updated, &temp_path)?;
        Ok(updated)
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Flashcard>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|c| &c.owner == owner)
            .collect())
    }
}
