//! Qualitative classification of actual-vs-target performance.

use serde::{Deserialize, Serialize};

/// Whether a higher or lower actual beats the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Income and profit: more is better.
    Maximize,
    /// Cost ratios: less is better.
    Minimize,
}

/// Performance tier, carrying both the display label and the stylesheet key
/// so no caller has to parse the label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Positive,
    Neutral,
    Caution,
    Warning,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Positive => "\u{2705} Positive",
            Status::Neutral => "\u{2796} Neutral",
            Status::Caution => "\u{26a0}\u{fe0f} Caution",
            Status::Warning => "\u{1f6a8} Warning",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Status::Positive => "positive",
            Status::Neutral => "neutral",
            Status::Caution => "caution",
            Status::Warning => "warning",
        }
    }
}

/// Maps an actual/target ratio onto a [`Status`] tier. Pure and total; the
/// band thresholds are fixed.
pub fn classify(actual: f64, target: f64, direction: Direction) -> Status {
    let ratio = if target > 0.0 { actual / target } else { 0.0 };

    match direction {
        Direction::Maximize => {
            if ratio >= 1.10 {
                Status::Positive
            } else if ratio >= 1.00 {
                Status::Neutral
            } else if ratio >= 0.85 {
                Status::Caution
            } else {
                Status::Warning
            }
        }
        Direction::Minimize => {
            if ratio <= 0.98 {
                Status::Positive
            } else if ratio <= 1.05 {
                Status::Neutral
            } else if ratio <= 1.30 {
                Status::Caution
            } else {
                Status::Warning
            }
        }
    }
}
