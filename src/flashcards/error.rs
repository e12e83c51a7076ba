use thiserror::Error;
use uuid::Uuid;

use super::storage::StoreError;

/// Errors returned by the flashcard operations.
///
/// None of them leave a partially updated card behind.
#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Flashcard not found: {0}")]
    NotFound(Uuid),

    #[error("Flashcard {0} belongs to another owner")]
    Forbidden(Uuid),

    /// The computed next review date is not representable. Raised after the
    /// card was read, so the card id is known and the card is unchanged.
    #[error("Next review of flashcard {0} falls outside the supported date range")]
    OutOfRange(Uuid),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, FlashcardError>;
