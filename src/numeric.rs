//! Coercion of heterogeneous cell values into canonical floats.
//!
//! Spreadsheet exports mix real numbers with currency strings, parenthesized
//! negatives, percent signs and assorted "not available" markers. Extraction
//! must never abort on one malformed cell, so every failure path here logs and
//! falls back to 0.0.

use calamine::Data;
use log::warn;

const EMPTY_MARKERS: [&str; 5] = ["", "nan", "none", "#n/a", "n/a"];

/// Normalizes a raw workbook cell to a finite float.
pub fn normalize_cell(value: &Data) -> f64 {
    match value {
        Data::Empty => 0.0,
        Data::Float(f) if f.is_finite() => *f,
        Data::Float(_) => 0.0,
        Data::Int(i) => *i as f64,
        Data::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Data::DateTime(dt) => dt.as_f64(),
        Data::Error(_) => 0.0,
        Data::String(s) => normalize_str(s),
        Data::DateTimeIso(s) | Data::DurationIso(s) => normalize_str(s),
    }
}

/// Normalizes a formatted string ("$1,234.50", "(500)", "12%") to a float.
pub fn normalize_str(value: &str) -> f64 {
    let trimmed = value.trim();

    if EMPTY_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
        return 0.0;
    }

    // Parentheses mark accounting-style negatives.
    let mut negative = trimmed.contains('(') && trimmed.contains(')');

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | '(' | ')') && !c.is_whitespace())
        .collect();

    let cleaned = match cleaned.strip_prefix('-') {
        Some(rest) => {
            negative = true;
            rest.to_string()
        }
        None => cleaned,
    };

    match cleaned.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => {
            if negative {
                -parsed.abs()
            } else {
                parsed
            }
        }
        _ => {
            warn!("Could not convert '{}' to numeric, returning 0.0", value);
            0.0
        }
    }
}
