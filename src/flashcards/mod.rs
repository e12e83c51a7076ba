//! Flashcards and SM-2 spaced repetition
//!
//! This module provides:
//! - Flashcard creation (manual, from learning moments, bulk session upload)
//! - SM-2 scheduling of reviews
//! - Due queue selection and review statistics
//! - Versioned card storage (in-memory and JSON files)

pub mod algorithm;
mod error;
pub mod intake;
pub mod models;
pub mod queue;
pub mod scheduler;
pub mod storage;

pub use error::{FlashcardError, Result};
pub use intake::FlashcardIntake;
pub use models::*;
pub use queue::DueQueue;
pub use scheduler::Scheduler;
pub use storage::{FileStore, FlashcardStore, MemoryStore, StoreError};
