use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

const POSITIVE_THRESHOLD: f64 = 0.15;
const NEGATIVE_THRESHOLD: f64 = -0.15;

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Thresholds are strict: a score of exactly 0.15 is neutral.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s > POSITIVE_THRESHOLD => Sentiment::Positive,
            Some(s) if s < NEGATIVE_THRESHOLD => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct NewsItem {
    title: String,
    source: String,
    summary: String,
    url: String,
    published_at: String,
    sentiment: Sentiment,
    sentiment_score: Option<f64>,
}

impl NewsItem {
    pub fn new(
        title: String,
        source: String,
        summary: String,
        url: String,
        published_at: String,
        sentiment_score: Option<f64>,
    ) -> Self {
        Self {
            title,
            source,
            summary,
            url,
            published_at,
            sentiment: Sentiment::from_score(sentiment_score),
            sentiment_score,
        }
    }
}
