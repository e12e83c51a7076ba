//! Due queue selection and review statistics
//!
//! Read-only. Cards come back oldest `next_review` first; cards sharing a
//! `next_review` are ordered by id so repeated calls agree.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::{FlashcardError, Result};
use super::models::{Flashcard, ReviewStats};
use super::storage::FlashcardStore;
use crate::clock::Clock;
use crate::identity::OwnerId;

/// Interval (days) from which a card counts as mature
const MATURE_INTERVAL_DAYS: u32 = 21;

pub struct DueQueue<S: FlashcardStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    default_limit: usize,
}

impl<S: FlashcardStore> DueQueue<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            default_limit: 20,
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Cards of `owner` due at `as_of` (default: now), at most `limit` (default: 20)
    pub fn due_cards(
        &self,
        owner: &OwnerId,
        as_of: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<Flashcard>> {
        let limit = limit.unwrap_or(self.default_limit);
        if limit == 0 {
            return Err(FlashcardError::InvalidInput(
                "Limit must be a positive integer".to_string(),
            ));
        }
        let as_of = as_of.unwrap_or_else(|| self.clock.now());

        let mut cards: Vec<Flashcard> = self
            .store
            .list_due(owner, as_of)?
            .into_iter()
            .filter(|card| card.is_due(as_of))
            .collect();

        cards.sort_by(|a, b| a.next_review.cmp(&b.next_review).then(a.id.cmp(&b.id)));
        cards.truncate(limit);

        log::debug!("{} due card(s) for {} as of {}", cards.len(), owner, as_of);
        Ok(cards)
    }

    /// Card counts for an owner's dashboard
    pub fn stats(&self, owner: &OwnerId, as_of: Option<DateTime<Utc>>) -> Result<ReviewStats> {
        let as_of = as_of.unwrap_or_else(|| self.clock.now());
        let cards = self.store.list_by_owner(owner)?;

        let mut stats = ReviewStats {
            total_cards: cards.len(),
            ..ReviewStats::default()
        };

        for card in &cards {
            if card.is_due(as_of) {
                stats.due_cards += 1;
            }

            if card.last_review.is_none() {
                stats.new_cards += 1;
            } else if card.interval >= MATURE_INTERVAL_DAYS {
                stats.mature_cards += 1;
            } else {
                stats.learning_cards += 1;
            }
        }

        Ok(stats)
    }
}
