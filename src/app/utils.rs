use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
};
use rust_decimal::Decimal;

use crate::{
    models::Sentiment,
    services::{DataSource, Mood},
};

pub fn change_color(value: &Decimal) -> Color {
    if *value >= Decimal::ZERO {
        Color::Green
    } else {
        Color::Red
    }
}

pub fn sentiment_color(sentiment: &Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::Green,
        Sentiment::Negative => Color::Red,
        Sentiment::Neutral => Color::Gray,
    }
}

pub fn source_color(source: &DataSource) -> Color {
    match source {
        DataSource::Live => Color::Green,
        DataSource::Mixed => Color::Yellow,
        DataSource::Illustrative => Color::Red,
    }
}

pub fn mood_color(mood: &Mood) -> Color {
    match mood {
        Mood::Bullish => Color::Green,
        Mood::Bearish => Color::Red,
    }
}

/// A rectangle centred in `area`, sized as a percentage of it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
