use chrono::{DateTime, Utc};

use recall_lib::flashcards::algorithm::format_interval;
use recall_lib::flashcards::Flashcard;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// Wrap text in a color code when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Truncate to `width` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let cut: String = single_line.chars().take(width.saturating_sub(1)).collect();
    format!("{}\u{2026}", cut)
}

/// How overdue a card is, e.g. "2d overdue" or "due now"
pub fn overdue_label(card: &Flashcard, as_of: DateTime<Utc>) -> String {
    let days = (as_of - card.next_review).num_days();
    if days <= 0 {
        "due now".to_string()
    } else {
        format!("{} overdue", format_interval(u32::try_from(days).unwrap_or(u32::MAX)))
    }
}

/// One-line schedule summary
pub fn schedule_line(card: &Flashcard, use_color: bool) -> String {
    format!(
        "interval {}  ease {:.2}  streak {}  next {}",
        paint(&format_interval(card.interval), Color::BOLD, use_color),
        card.ease_factor,
        card.repetitions,
        card.next_review.format("%Y-%m-%d %H:%M"),
    )
}
