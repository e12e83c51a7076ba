//! Card creation
//!
//! Cards arrive from three places: manual entry, a learning moment flagged
//! during a session, and bulk upload of a whole session. Creators only supply
//! content. The initial schedule is always fixed here.

use std::sync::Arc;

use super::error::{FlashcardError, Result};
use super::models::{Flashcard, LearningMoment, NewFlashcard, SessionUpload};
use super::storage::FlashcardStore;
use crate::clock::Clock;
use crate::identity::OwnerId;

pub struct FlashcardIntake<S: FlashcardStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: FlashcardStore> FlashcardIntake<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create a single card
    pub fn create(&self, owner: &OwnerId, request: NewFlashcard) -> Result<Flashcard> {
        validate(&request)?;

        let card = Flashcard::new(owner.clone(), request, self.clock.now());
        self.store.insert(&card)?;

        log::info!("Created flashcard {} for {}", card.id, owner);
        Ok(card)
    }

    /// Create a card from a learning moment of one of the owner's sessions
    pub fn create_from_learning(
        &self,
        owner: &OwnerId,
        moment: &LearningMoment,
        mut request: NewFlashcard,
    ) -> Result<Flashcard> {
        // A moment from someone else's session is reported as missing
        if &moment.owner != owner {
            return Err(FlashcardError::NotFound(moment.id));
        }

        if request.category.as_deref().map_or(true, |c| c.trim().is_empty()) {
            request.category = Some(moment.kind.clone());
        }
        request.session_id = Some(moment.session_id);

        self.create(owner, request)
    }

    /// Create every card of an uploaded session in one batch
    pub fn ingest_session(&self, owner: &OwnerId, upload: SessionUpload) -> Result<Vec<Flashcard>> {
        for (index, request) in upload.flashcards.iter().enumerate() {
            validate(request).map_err(|e| match e {
                FlashcardError::InvalidInput(msg) => {
                    FlashcardError::InvalidInput(format!("card {}: {}", index, msg))
                }
                other => other,
            })?;
        }

        let now = self.clock.now();
        let cards: Vec<Flashcard> = upload
            .flashcards
            .into_iter()
            .map(|mut request| {
                request.session_id = upload.session_id.or(request.session_id);
                Flashcard::new(owner.clone(), request, now)
            })
            .collect();

        self.store.insert_batch(&cards)?;

        log::info!("Ingested {} flashcard(s) for {}", cards.len(), owner);
        Ok(cards)
    }
}

fn validate(request: &NewFlashcard) -> Result<()> {
    if request.front.trim().is_empty() {
        return Err(FlashcardError::InvalidInput("front must not be empty".to_string()));
    }
    if request.back.trim().is_empty() {
        return Err(FlashcardError::InvalidInput("back must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::flashcards::storage::MemoryStore;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn setup() -> (FlashcardIntake<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap(),
        ));
        (FlashcardIntake::new(Arc::clone(&store), clock), store)
    }

    fn alice() -> OwnerId {
        OwnerId::new("alice")
    }

    fn moment(owner: &str) -> LearningMoment {
        LearningMoment {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            owner: OwnerId::new(owner),
            kind: "vocabulary".to_string(),
        }
    }

    #[test]
    fn test_create_fixes_initial_schedule() {
        let (intake, store) = setup();

        let card = intake
            .create(&alice(), NewFlashcard::new("hola", "hello").with_category("greetings"))
            .unwrap();

        assert_eq!(card.ease_factor, 2.5);
        assert_eq!(card.interval, 0);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.next_review, card.created_at);
        assert_eq!(card.category.as_deref(), Some("greetings"));
        assert_eq!(store.get(card.id).unwrap(), Some(card));
    }

    #[test]
    fn test_create_rejects_blank_content() {
        let (intake, _store) = setup();

        assert!(matches!(
            intake.create(&alice(), NewFlashcard::new("  ", "hello")),
            Err(FlashcardError::InvalidInput(_))
        ));
        assert!(matches!(
            intake.create(&alice(), NewFlashcard::new("hola", "")),
            Err(FlashcardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_learning_defaults_category_and_session() {
        let (intake, _store) = setup();
        let moment = moment("alice");

        let card = intake
            .create_from_learning(&alice(), &moment, NewFlashcard::new("gato", "cat"))
            .unwrap();

        assert_eq!(card.category.as_deref(), Some("vocabulary"));
        assert_eq!(card.session_id, Some(moment.session_id));
    }

    #[test]
    fn test_from_learning_keeps_explicit_category() {
        let (intake, _store) = setup();

        let card = intake
            .create_from_learning(
                &alice(),
                &moment("alice"),
                NewFlashcard::new("gato", "cat").with_category("animals"),
            )
            .unwrap();

        assert_eq!(card.category.as_deref(), Some("animals"));
    }

    #[test]
    fn test_from_foreign_learning_not_found() {
        let (intake, store) = setup();
        let moment = moment("bob");

        let result = intake.create_from_learning(&alice(), &moment, NewFlashcard::new("q", "a"));

        assert!(matches!(result, Err(FlashcardError::NotFound(id)) if id == moment.id));
        assert!(store.list_by_owner(&alice()).unwrap().is_empty());
    }

    #[test]
    fn test_ingest_session() {
        let (intake, store) = setup();
        let session_id = Uuid::new_v4();
        let upload = SessionUpload {
            session_id: Some(session_id),
            flashcards: vec![
                NewFlashcard::new("uno", "one"),
                NewFlashcard::new("dos", "two").with_category("numbers"),
            ],
        };

        let cards = intake.ingest_session(&alice(), upload).unwrap();

        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.session_id == Some(session_id)));
        assert_eq!(cards[0].created_at, cards[1].created_at);
        assert_eq!(store.list_by_owner(&alice()).unwrap().len(), 2);
    }

    #[test]
    fn test_ingest_session_rejects_whole_batch() {
        let (intake, store) = setup();
        let upload = SessionUpload {
            session_id: None,
            flashcards: vec![NewFlashcard::new("uno", "one"), NewFlashcard::new("", "two")],
        };

        let result = intake.ingest_session(&alice(), upload);

        assert!(matches!(result, Err(FlashcardError::InvalidInput(msg)) if msg.starts_with("card 1")));
        assert!(store.list_by_owner(&alice()).unwrap().is_empty());
    }
}
