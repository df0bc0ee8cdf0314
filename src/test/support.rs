use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    api::MarketDataSource,
    config::{Instrument, MarketDataConfig},
    error::Failure,
    models::{NewsItem, Quote, SectorPerformance},
};

/// A source answering from canned data. Anything not configured fails.
#[derive(Default)]
pub struct FakeSource {
    pub quotes: HashMap<String, Quote>,
    pub sectors: Option<Vec<SectorPerformance>>,
    pub news: Option<Vec<NewsItem>>,
}

impl FakeSource {
    pub fn with_quote(mut self, symbol: &str, change_percent: Decimal) -> Self {
        self.quotes
            .insert(symbol.to_string(), quote(symbol, change_percent));
        self
    }

    pub fn with_sectors(mut self, sectors: Vec<SectorPerformance>) -> Self {
        self.sectors = Some(sectors);
        self
    }

    pub fn with_news(mut self, news: Vec<NewsItem>) -> Self {
        self.news = Some(news);
        self
    }
}

#[async_trait]
impl MarketDataSource for FakeSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, Failure> {
        self.quotes.get(symbol).cloned().ok_or_else(|| {
            Failure::RateLimitedOrInvalid(format!("no quote for {}", symbol))
        })
    }

    async fn fetch_sector_performance(&self) -> Result<Vec<SectorPerformance>, Failure> {
        self.sectors
            .clone()
            .ok_or_else(|| Failure::MalformedResponse(String::from("no sectors")))
    }

    async fn fetch_market_news(&self) -> Result<Vec<NewsItem>, Failure> {
        self.news
            .clone()
            .ok_or_else(|| Failure::MalformedResponse(String::from("no news")))
    }
}

pub fn quote(symbol: &str, change_percent: Decimal) -> Quote {
    Quote::new(
        symbol.to_string(),
        None,
        Decimal::ONE_HUNDRED,
        change_percent,
        change_percent,
        None,
    )
}

pub fn config(indices: &[&str], stocks: &[&str]) -> MarketDataConfig {
    MarketDataConfig::default().with_instruments(instruments(indices), instruments(stocks))
}

fn instruments(symbols: &[&str]) -> Vec<Instrument> {
    symbols
        .iter()
        .map(|symbol| Instrument::new(symbol.to_string(), Some(format!("{} name", symbol))))
        .collect()
}
