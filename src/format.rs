//! Display formatting shared by the dashboard and the exported reports.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;

/// `1234.5` → `$1,234.50`, `-1.5` → `-$1.50`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{}${}.{}", sign, group_thousands(whole), fraction)
}

/// `0.68` → `+0.68%`, `-0.41` → `-0.41%`.
pub fn format_percentage(value: Decimal) -> String {
    let sign = if value >= Decimal::ZERO { "+" } else { "" };
    format!("{}{:.2}%", sign, value.round_dp(2))
}

pub fn format_optional_percentage(value: Option<Decimal>) -> String {
    value
        .map(format_percentage)
        .unwrap_or_else(|| String::from("n/a"))
}

pub fn format_date_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%b %-d, %Y %I:%M %p").to_string()
}

/// News timestamps arrive as `20241017T143000`; anything else is shown as is.
pub fn format_published(published_at: &str) -> String {
    NaiveDateTime::parse_from_str(published_at, "%Y%m%dT%H%M%S")
        .map(|naive| {
            Local
                .from_utc_datetime(&naive)
                .format("%b %-d, %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| published_at.to_string())
}

pub fn truncate(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let head: String = text.chars().take(length).collect();
    format!("{}...", head)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
