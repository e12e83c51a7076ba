//! Spaced repetition scheduling for flashcards.
//!
//! [`flashcards::Scheduler`] applies SM-2 to a review and is the only writer of
//! a card's schedule. [`flashcards::DueQueue`] lists what is due. Both work
//! over any [`flashcards::FlashcardStore`] and take the requesting owner as an
//! argument, resolved beforehand through an [`identity::IdentityResolver`].

pub mod clock;
pub mod config;
pub mod flashcards;
mod fsutil;
pub mod identity;
