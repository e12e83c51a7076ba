//! In-process store backed by a mutex-guarded map

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{FlashcardStore, Result, StoreError};
use crate::flashcards::models::Flashcard;
use crate::identity::OwnerId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: Mutex<HashMap<Uuid, Flashcard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn cards(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Flashcard>>> {
        self.cards
            .lock()
            .map_err(|_| StoreError::Unavailable("card map lock poisoned".to_string()))
    }
}

impl FlashcardStore for MemoryStore {
    fn get(&self, id: Uuid) -> Result<Option<Flashcard>> {
        Ok(self.cards()?.get(&id).cloned())
    }

    fn insert(&self, card: &Flashcard) -> Result<()> {
        self.insert_batch(std::slice::from_ref(card))
    }

    fn insert_batch(&self, cards: &[Flashcard]) -> Result<()> {
        let mut map = self.cards()?;
        if let Some(existing) = cards.iter().find(|c| map.contains_key(&c.id)) {
            return Err(StoreError::AlreadyExists(existing.id));
        }
        for card in cards {
            map.insert(card.id, card.clone());
        }
        Ok(())
    }

    fn commit(&self, card: &Flashcard, expected_version: u64) -> Result<Flashcard> {
        let mut map = self.cards()?;
        let stored = map.get_mut(&card.id).ok_or(StoreError::Missing(card.id))?;

        if stored.version != expected_version {
            return Err(StoreError::Conflict {
                id: card.id,
                expected: expected_version,
                found: stored.version,
            });
        }

        let mut updated = card.clone();
        updated.version = expected_version + 1;
        *stored = updated.clone();
        Ok(updated)
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Flashcard>> {
        Ok(self
            .cards()?
            .values()
            .filter(|c| &c.owner == owner)
            .cloned()
            .collect())
    }

    fn list_due(&self, owner: &OwnerId, as_of: DateTime<Utc>) -> Result<Vec<Flashcard>> {
        Ok(self
            .cards()?
            .values()
            .filter(|c| &c.owner == owner && c.is_due(as_of))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::models::NewFlashcard;
    use chrono::Duration;

    fn card(owner: &str) -> Flashcard {
        Flashcard::new(OwnerId::new(owner), NewFlashcard::new("front", "back"), Utc::now())
    }

    #[test]
    fn test_insert_and_get() {
        let store = MemoryStore::new();
        let card = card("alice");

        store.insert(&card).unwrap();

        assert_eq!(store.get(card.id).unwrap(), Some(card.clone()));
        assert!(matches!(store.insert(&card), Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn test_batch_insert_is_all_or_nothing() {
        let store = MemoryStore::new();
        let existing = card("alice");
        store.insert(&existing).unwrap();

        let fresh = card("alice");
        let result = store.insert_batch(&[fresh.clone(), existing.clone()]);

        assert!(matches!(result, Err(StoreError::AlreadyExists(id)) if id == existing.id));
        assert_eq!(store.get(fresh.id).unwrap(), None);
    }

    #[test]
    fn test_commit_bumps_version() {
        let store = MemoryStore::new();
        let mut card = card("alice");
        store.insert(&card).unwrap();

        card.interval = 1;
        let stored = store.commit(&card, 0).unwrap();

        assert_eq!(stored.version, 1);
        assert_eq!(store.get(card.id).unwrap().unwrap().interval, 1);
    }

    #[test]
    fn test_stale_commit_conflicts() {
        let store = MemoryStore::new();
        let card = card("alice");
        store.insert(&card).unwrap();
        store.commit(&card, 0).unwrap();

        let result = store.commit(&card, 0);

        assert!(matches!(
            result,
            Err(StoreError::Conflict { expected: 0, found: 1, .. })
        ));
    }

    #[test]
    fn test_commit_unknown_card() {
        let store = MemoryStore::new();
        let card = card("alice");

        assert!(matches!(store.commit(&card, 0), Err(StoreError::Missing(_))));
    }

    #[test]
    fn test_list_due_filters_owner_and_time() {
        let store = MemoryStore::new();
        let due = card("alice");
        let now = Utc::now();
        let mut later = card("alice");
        later.next_review = now + Duration::days(3);
        let other = card("bob");

        store.insert_batch(&[due.clone(), later, other]).unwrap();

        let result = store.list_due(&OwnerId::new("alice"), now).unwrap();
        assert_eq!(result, vec![due]);
        assert_eq!(store.list_by_owner(&OwnerId::new("alice")).unwrap().len(), 2);
    }
}
