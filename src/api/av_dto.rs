use std::collections::HashMap;

use derive_getters::Getters;
use serde::Deserialize;

use crate::{
    error::Failure,
    models::{NewsItem, Quote},
};

use super::utils::parse_decimal;

#[derive(Debug, Deserialize, Getters)]
pub struct AvGlobalQuoteDto {
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "07. latest trading day", default)]
    latest_trading_day: Option<String>,
    #[serde(rename = "09. change")]
    change: String,
    #[serde(rename = "10. change percent")]
    change_percent: String,
}

impl AvGlobalQuoteDto {
    pub fn to_quote(&self, symbol: &str) -> Result<Quote, Failure> {
        Ok(Quote::new(
            symbol.to_string(),
            None,
            parse_decimal(&self.price, "price")?,
            parse_decimal(&self.change, "change")?,
            parse_decimal(&self.change_percent, "change percent")?,
            self.latest_trading_day.clone(),
        ))
    }
}

#[derive(Debug, Deserialize, Getters)]
pub struct AvSectorDto {
    #[serde(rename = "Rank A: Real-Time Performance")]
    real_time: Option<HashMap<String, String>>,
    #[serde(rename = "Rank B: 1 Day Performance")]
    one_day: Option<HashMap<String, String>>,
    #[serde(rename = "Rank C: 5 Day Performance")]
    five_day: Option<HashMap<String, String>>,
    #[serde(rename = "Rank D: 1 Month Performance")]
    one_month: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct AvNewsItemDto {
    title: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    time_published: String,
    #[serde(default)]
    overall_sentiment_score: Option<f64>,
}

impl AvNewsItemDto {
    pub fn to_news_item(self) -> NewsItem {
        NewsItem::new(
            self.title,
            self.source,
            self.summary,
            self.url,
            self.time_published,
            self.overall_sentiment_score,
        )
    }
}
