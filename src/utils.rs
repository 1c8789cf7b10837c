use chrono::{Datelike, NaiveDate};

/// Formats a month as the label used throughout the report, e.g. "February 2025".
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Returns the first day of the month `offset` months before `date`'s month.
pub fn months_back(date: NaiveDate, offset: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month() as i32 - 1 - offset as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Labels for the `n` calendar months ending with `end`'s month, oldest first.
pub fn trailing_month_labels(end: NaiveDate, n: u32) -> Vec<String> {
    (0..n)
        .rev()
        .map(|offset| month_label(months_back(end, offset)))
        .collect()
}

/// Renders a dollar amount rounded to whole units with thousands separators,
/// e.g. `$1,234` / `$-73,790`.
pub fn fmt_money(value: f64) -> String {
    let rounded = value.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("${}{}", sign, group_thousands(rounded.unsigned_abs()))
}

/// Like [`fmt_money`] but with an explicit sign, e.g. `$+4,210`.
pub fn fmt_money_signed(value: f64) -> String {
    let rounded = value.round() as i64;
    let sign = if rounded < 0 { "-" } else { "+" };
    format!("${}{}", sign, group_thousands(rounded.unsigned_abs()))
}

pub fn fmt_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn fmt_pct_signed(value: f64) -> String {
    format!("{:+.1}%", value)
}

fn group_thousands(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut groups = Vec::new();
    while value > 0 {
        groups.push((value % 1000, value >= 1000));
        value /= 1000;
    }

    groups
        .iter()
        .rev()
        .map(|(g, padded)| {
            if *padded {
                format!("{:03}", g)
            } else {
                g.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
