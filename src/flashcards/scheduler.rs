//! Review processing
//!
//! [`Scheduler::review`] is the only code path that writes a card's schedule.
//! It performs one read and one versioned commit. If another review of the
//! same card commits in between, the read is repeated and the schedule is
//! recomputed from the fresh state, so neither review is lost.

use std::sync::Arc;

use uuid::Uuid;

use super::algorithm::calculate_next_review;
use super::error::{FlashcardError, Result};
use super::models::{Flashcard, Quality, Rating, ScheduleState};
use super::storage::{FlashcardStore, StoreError};
use crate::clock::Clock;
use crate::identity::OwnerId;

pub struct Scheduler<S: FlashcardStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    max_commit_retries: u32,
}

impl<S: FlashcardStore> Scheduler<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            max_commit_retries: 3,
        }
    }

    pub fn with_max_commit_retries(mut self, retries: u32) -> Self {
        self.max_commit_retries = retries;
        self
    }

    /// Submit a raw SM-2 quality (0-5) for a card
    pub fn review(&self, requester: &OwnerId, card_id: Uuid, quality: i64) -> Result<Flashcard> {
        let quality = Quality::new(quality).ok_or_else(|| {
            FlashcardError::InvalidInput(format!("Quality must be 0-5, got {}", quality))
        })?;
        self.review_quality(requester, card_id, quality)
    }

    /// Submit one of the four review buttons for a card
    pub fn review_rating(
        &self,
        requester: &OwnerId,
        card_id: Uuid,
        rating: Rating,
    ) -> Result<Flashcard> {
        self.review_quality(requester, card_id, rating.into())
    }

    pub fn review_quality(
        &self,
        requester: &OwnerId,
        card_id: Uuid,
        quality: Quality,
    ) -> Result<Flashcard> {
        let mut attempt = 0;
        loop {
            let card = self.load_owned(requester, card_id)?;
            let updated = self.apply(&card, quality)?;

            match self.store.commit(&updated, card.version) {
                Ok(stored) => {
                    log::debug!(
                        "Reviewed card {} with quality {}: interval {}d, ease {:.2}, repetitions {}",
                        card_id,
                        quality.value(),
                        stored.interval,
                        stored.ease_factor,
                        stored.repetitions
                    );
                    return Ok(stored);
                }
                Err(StoreError::Conflict { .. }) if attempt < self.max_commit_retries => {
                    attempt += 1;
                    log::debug!(
                        "Concurrent review of card {}, retrying ({}/{})",
                        card_id,
                        attempt,
                        self.max_commit_retries
                    );
                }
                Err(StoreError::Missing(id)) => return Err(FlashcardError::NotFound(id)),
                Err(e) => {
                    log::warn!("Failed to commit review of card {}: {}", card_id, e);
                    return Err(e.into());
                }
            }
        }
    }

    /// Current schedule of a card the requester owns
    pub fn schedule_of(&self, requester: &OwnerId, card_id: Uuid) -> Result<ScheduleState> {
        Ok(self.load_owned(requester, card_id)?.schedule())
    }

    fn load_owned(&self, requester: &OwnerId, card_id: Uuid) -> Result<Flashcard> {
        let card = self
            .store
            .get(card_id)?
            .ok_or(FlashcardError::NotFound(card_id))?;

        if &card.owner != requester {
            return Err(FlashcardError::Forbidden(card_id));
        }
        Ok(card)
    }

    fn apply(&self, card: &Flashcard, quality: Quality) -> Result<Flashcard> {
        let result = calculate_next_review(card.schedule(), quality, self.clock.now())
            .ok_or(FlashcardError::OutOfRange(card.id))?;

        let mut updated = card.clone();
        updated.ease_factor = result.state.ease_factor;
        updated.interval = result.state.interval;
        updated.repetitions = result.state.repetitions;
        updated.next_review = result.next_review;
        updated.last_review = Some(result.reviewed_at);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::flashcards::algorithm::MIN_EASE_FACTOR;
    use crate::flashcards::models::NewFlashcard;
    use crate::flashcards::storage::MemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::thread;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap()
    }

    fn setup() -> (Scheduler<MemoryStore>, Arc<MemoryStore>, Arc<ManualClock>, Flashcard) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start()));
        let card = Flashcard::new(OwnerId::new("alice"), NewFlashcard::new("hola", "hello"), start());
        store.insert(&card).unwrap();

        let scheduler = Scheduler::new(Arc::clone(&store), clock.clone());
        (scheduler, store, clock, card)
    }

    fn alice() -> OwnerId {
        OwnerId::new("alice")
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_review_scenario() {
        let (scheduler, store, clock, card) = setup();

        let first = scheduler.review(&alice(), card.id, 5).unwrap();
        assert_eq!(first.repetitions, 1);
        assert_eq!(first.interval, 1);
        assert!(approx(first.ease_factor, 2.6));
        assert_eq!(first.next_review, start() + Duration::days(1));
        assert_eq!(first.last_review, Some(start()));

        clock.advance(Duration::days(1));
        let second = scheduler.review(&alice(), card.id, 5).unwrap();
        assert_eq!(second.repetitions, 2);
        assert_eq!(second.interval, 6);
        assert!(approx(second.ease_factor, 2.7));
        assert_eq!(second.next_review, clock.now() + Duration::days(6));

        clock.advance(Duration::days(6));
        let third = scheduler.review(&alice(), card.id, 1).unwrap();
        assert_eq!(third.repetitions, 0);
        assert_eq!(third.interval, 1);
        assert!(approx(third.ease_factor, 2.7));
        assert_eq!(third.next_review, clock.now() + Duration::days(1));

        let rejected = scheduler.review(&alice(), card.id, 6);
        assert!(matches!(rejected, Err(FlashcardError::InvalidInput(_))));
        assert_eq!(store.get(card.id).unwrap().unwrap(), third);
    }

    #[test]
    fn test_third_success_multiplies_previous_interval() {
        let (scheduler, _store, clock, card) = setup();

        for _ in 0..2 {
            scheduler.review(&alice(), card.id, 4).unwrap();
            clock.advance(Duration::days(1));
        }
        let third = scheduler.review(&alice(), card.id, 4).unwrap();

        // 6 * 2.5
        assert_eq!(third.interval, 15);
        assert_eq!(third.repetitions, 3);
    }

    #[test]
    fn test_next_review_matches_last_review_plus_interval() {
        let (scheduler, _store, clock, card) = setup();

        for q in [5, 3, 4, 0, 5, 5, 2, 4] {
            let updated = scheduler.review(&alice(), card.id, q).unwrap();
            let last_review = updated.last_review.unwrap();
            assert_eq!(
                updated.next_review,
                last_review + Duration::days(i64::from(updated.interval))
            );
            assert!(updated.ease_factor >= MIN_EASE_FACTOR);
            clock.advance(Duration::hours(13));
        }
    }

    #[test]
    fn test_out_of_range_quality_rejected_before_read() {
        let (scheduler, _store, _clock, _card) = setup();

        // Unknown id, but validation comes first
        let result = scheduler.review(&alice(), Uuid::new_v4(), -1);
        assert!(matches!(result, Err(FlashcardError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_card_not_found() {
        let (scheduler, _store, _clock, _card) = setup();
        let id = Uuid::new_v4();

        let result = scheduler.review(&alice(), id, 4);
        assert!(matches!(result, Err(FlashcardError::NotFound(found)) if found == id));
    }

    #[test]
    fn test_other_owner_forbidden() {
        let (scheduler, store, _clock, card) = setup();

        let result = scheduler.review(&OwnerId::new("mallory"), card.id, 5);

        assert!(matches!(result, Err(FlashcardError::Forbidden(_))));
        assert_eq!(store.get(card.id).unwrap().unwrap(), card);
    }

    #[test]
    fn test_review_rating() {
        let (scheduler, _store, _clock, card) = setup();

        let updated = scheduler.review_rating(&alice(), card.id, Rating::Hard).unwrap();

        assert_eq!(updated.repetitions, 1);
        assert!(approx(updated.ease_factor, 2.36));
    }

    #[test]
    fn test_schedule_of() {
        let (scheduler, _store, _clock, card) = setup();

        assert_eq!(scheduler.schedule_of(&alice(), card.id).unwrap(), ScheduleState::default());
        assert!(matches!(
            scheduler.schedule_of(&OwnerId::new("bob"), card.id),
            Err(FlashcardError::Forbidden(_))
        ));
    }

    /// Store that lets another writer sneak in before the first commit
    struct RacingStore {
        inner: MemoryStore,
        races_left: std::sync::Mutex<u32>,
    }

    impl FlashcardStore for RacingStore {
        fn get(&self, id: Uuid) -> crate::flashcards::storage::Result<Option<Flashcard>> {
            self.inner.get(id)
        }

        fn insert(&self, card: &Flashcard) -> crate::flashcards::storage::Result<()> {
            self.inner.insert(card)
        }

        fn commit(
            &self,
            card: &Flashcard,
            expected_version: u64,
        ) -> crate::flashcards::storage::Result<Flashcard> {
            let mut races = self.races_left.lock().unwrap();
            if *races > 0 {
                *races -= 1;
                let mut rival = self.inner.get(card.id)?.unwrap();
                rival.repetitions += 10;
                self.inner.commit(&rival, rival.version)?;
            }
            drop(races);
            self.inner.commit(card, expected_version)
        }

        fn list_by_owner(
            &self,
            owner: &OwnerId,
        ) -> crate::flashcards::storage::Result<Vec<Flashcard>> {
            self.inner.list_by_owner(owner)
        }
    }

    fn racing_setup(races: u32) -> (Arc<RacingStore>, Flashcard) {
        let store = Arc::new(RacingStore {
            inner: MemoryStore::new(),
            races_left: std::sync::Mutex::new(races),
        });
        let card = Flashcard::new(alice(), NewFlashcard::new("q", "a"), start());
        store.insert(&card).unwrap();
        (store, card)
    }

    #[test]
    fn test_conflict_recomputes_from_fresh_state() {
        let (store, card) = racing_setup(1);
        let scheduler = Scheduler::new(Arc::clone(&store), Arc::new(ManualClock::new(start())));

        let updated = scheduler.review(&alice(), card.id, 5).unwrap();

        // The rival's 10 repetitions are kept and this review builds on them
        assert_eq!(updated.repetitions, 11);
        assert_eq!(updated.version, 2);
    }

    #[test]
    fn test_conflict_surfaces_after_retries() {
        let (store, card) = racing_setup(5);
        let scheduler = Scheduler::new(Arc::clone(&store), Arc::new(ManualClock::new(start())))
            .with_max_commit_retries(2);

        let result = scheduler.review(&alice(), card.id, 5);

        assert!(matches!(
            result,
            Err(FlashcardError::Storage(StoreError::Conflict { .. }))
        ));
        // Only the rival writes landed
        assert_eq!(store.get(card.id).unwrap().unwrap().repetitions, 30);
    }

    #[test]
    fn test_concurrent_reviews_are_not_lost() {
        let (scheduler, store, _clock, card) = setup();
        let scheduler = Arc::new(scheduler.with_max_commit_retries(u32::MAX));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let scheduler = Arc::clone(&scheduler);
                thread::spawn(move || scheduler.review(&alice(), card.id, 4).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.get(card.id).unwrap().unwrap();
        assert_eq!(stored.repetitions, 8);
        assert_eq!(stored.version, 8);
    }

    #[test]
    fn test_unrepresentable_next_review_leaves_card_unchanged() {
        let (scheduler, store, _clock, mut card) = setup();
        card.ease_factor = 3.0;
        card.interval = u32::MAX / 2;
        card.repetitions = 30;
        let card = store.commit(&card, 0).unwrap();

        let result = scheduler.review(&alice(), card.id, 5);

        assert!(matches!(result, Err(FlashcardError::OutOfRange(id)) if id == card.id));
        assert_eq!(store.get(card.id).unwrap().unwrap(), card);
    }
}
