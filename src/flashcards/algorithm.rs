//! SM-2 Spaced Repetition Algorithm
//!
//! Implementation of the SuperMemo 2 algorithm for calculating
//! review intervals based on self-reported recall quality.
//!
//! - Quality below 3 resets the repetition count and schedules the card for tomorrow.
//!   The ease factor is kept as is.
//! - Quality 3-5 grows the interval: 1 day, then 6 days, then the previous
//!   interval times the ease factor. The ease factor is then adjusted and
//!   floored at 1.3. There is no upper bound.

use chrono::{DateTime, Duration, Utc};

use super::models::{Quality, Rating, ScheduleState};

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor of a never-reviewed card
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Result of calculating the next review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub state: ScheduleState,
    pub next_review: DateTime<Utc>,
    pub reviewed_at: DateTime<Utc>,
}

/// Compute the scheduling state that follows a review of the given quality
pub fn next_state(state: ScheduleState, quality: Quality) -> ScheduleState {
    if !quality.is_pass() {
        return ScheduleState {
            ease_factor: state.ease_factor,
            interval: 1,
            repetitions: 0,
        };
    }

    let repetitions = state.repetitions.saturating_add(1);
    let interval = match repetitions {
        1 => 1,
        2 => 6,
        // Uses the ease factor from before this review
        _ => (f64::from(state.interval) * state.ease_factor).round() as u32,
    };

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
    let distance = f64::from(Quality::MAX - quality.value());
    let ease_factor =
        (state.ease_factor + (0.1 - distance * (0.08 + distance * 0.02))).max(MIN_EASE_FACTOR);

    ScheduleState {
        ease_factor,
        interval,
        repetitions,
    }
}

/// Calculate the full outcome of a review processed at `now`
///
/// Returns `None` when the next review date would fall outside the
/// representable calendar.
pub fn calculate_next_review(
    state: ScheduleState,
    quality: Quality,
    now: DateTime<Utc>,
) -> Option<ReviewResult> {
    let state = next_state(state, quality);
    let next_review = now.checked_add_signed(Duration::days(i64::from(state.interval)))?;

    Some(ReviewResult {
        state,
        next_review,
        reviewed_at: now,
    })
}

/// Interval each review button would produce
/// Used to show users what interval each rating would give
pub fn preview_intervals(state: ScheduleState) -> [(Rating, u32); 4] {
    Rating::ALL.map(|rating| (rating, next_state(state, rating.into()).interval))
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
