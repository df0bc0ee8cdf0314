use chrono::Utc;
use derive_getters::Getters;
use derive_new::new;
use futures::future::join_all;
use log::{info, warn};
use rust_decimal::Decimal;
use strum_macros::Display;

use super::fallback;
use crate::{
    api::MarketDataSource,
    config::{Instrument, MarketDataConfig},
    error::Failure,
    models::{MarketSnapshot, NewsItem, Quote, SectorPerformance},
};

/// Fans requests out to a [`MarketDataSource`] and joins them into snapshots.
pub struct MarketDataService<S> {
    source: S,
    config: MarketDataConfig,
}

impl<S: MarketDataSource> MarketDataService<S> {
    pub fn new(source: S, config: MarketDataConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &MarketDataConfig {
        &self.config
    }

    pub async fn fetch_quote(&self, symbol: &str) -> Result<Quote, Failure> {
        self.source.fetch_quote(symbol).await
    }

    /// Quotes every instrument concurrently. Failed symbols are logged and
    /// left out, so the result may be shorter than the input.
    pub async fn fetch_multiple_quotes(&self, instruments: &[Instrument]) -> Vec<Quote> {
        let requests = instruments.iter().map(|instrument| async move {
            match self.source.fetch_quote(instrument.symbol()).await {
                Ok(quote) => Some(quote.with_name(instrument.name().clone())),
                Err(e) => {
                    warn!("Dropping quote for {}: {}", instrument.symbol(), e);
                    None
                }
            }
        });

        join_all(requests).await.into_iter().flatten().collect()
    }

    pub async fn fetch_sector_performance(&self) -> Result<Vec<SectorPerformance>, Failure> {
        self.source.fetch_sector_performance().await
    }

    pub async fn fetch_market_news(&self) -> Result<Vec<NewsItem>, Failure> {
        self.source.fetch_market_news().await
    }

    /// Runs all four fetches concurrently and keeps whatever succeeded. Never
    /// fails: when nothing succeeds every list is empty and the caller decides
    /// whether to fall back.
    pub async fn get_snapshot(&self) -> MarketSnapshot {
        let (indices, stocks, sectors, news) = tokio::join!(
            self.fetch_multiple_quotes(self.config.indices()),
            self.fetch_multiple_quotes(self.config.stocks()),
            self.fetch_sector_performance(),
            self.fetch_market_news(),
        );

        let sectors = sectors.unwrap_or_else(|e| {
            warn!("Sector performance unavailable: {}", e);
            Vec::new()
        });
        let news = news.unwrap_or_else(|e| {
            warn!("Market news unavailable: {}", e);
            Vec::new()
        });

        info!(
            "Fetched snapshot: {}/{} indices, {}/{} stocks, {} sectors, {} news items",
            indices.len(),
            self.config.indices().len(),
            stocks.len(),
            self.config.stocks().len(),
            sectors.len(),
            news.len()
        );

        MarketSnapshot::new(indices, stocks, sectors, news, Utc::now())
    }

    pub fn get_fallback_snapshot(&self) -> MarketSnapshot {
        fallback::fallback_snapshot()
    }
}

/// Splits stocks into gainers (best first) and losers (worst first), `n` each.
pub fn top_movers(stocks: &[Quote], n: usize) -> (Vec<Quote>, Vec<Quote>) {
    let mut gainers: Vec<Quote> = stocks.iter().filter(|q| q.is_gain()).cloned().collect();
    let mut losers: Vec<Quote> = stocks.iter().filter(|q| !q.is_gain()).cloned().collect();

    gainers.sort_by(|a, b| b.change_percent().cmp(a.change_percent()));
    losers.sort_by(|a, b| a.change_percent().cmp(b.change_percent()));
    gainers.truncate(n);
    losers.truncate(n);

    (gainers, losers)
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Mood {
    #[strum(serialize = "BULLISH")]
    Bullish,
    #[strum(serialize = "BEARISH")]
    Bearish,
}

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct MarketMood {
    mood: Mood,
    gainers: usize,
    losers: usize,
    sensex_change: Option<Decimal>,
    nifty_change: Option<Decimal>,
}

/// Reads the mood off the Sensex: a missing Sensex counts as bullish.
pub fn market_mood(snapshot: &MarketSnapshot) -> MarketMood {
    let sensex = find_index(snapshot.indices(), "SENSEX");
    let nifty = find_index(snapshot.indices(), "NIFTY");

    let mood = match sensex {
        Some(quote) if *quote.change() < Decimal::ZERO => Mood::Bearish,
        _ => Mood::Bullish,
    };
    let gainers = snapshot.stocks().iter().filter(|q| q.is_gain()).count();

    MarketMood::new(
        mood,
        gainers,
        snapshot.stocks().len() - gainers,
        sensex.map(|quote| *quote.change_percent()),
        nifty.map(|quote| *quote.change_percent()),
    )
}

fn find_index<'a>(indices: &'a [Quote], marker: &str) -> Option<&'a Quote> {
    indices
        .iter()
        .find(|quote| quote.symbol().to_uppercase().contains(marker))
}

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum StockFilter {
    #[default]
    All,
    Gainers,
    Losers,
}

/// Gainers then losers, narrowed by `filter` and a case-insensitive match of
/// `query` against the display name or symbol.
pub fn filter_stocks(stocks: &[Quote], query: &str, filter: StockFilter) -> Vec<Quote> {
    let (gainers, losers) = top_movers(stocks, stocks.len());
    let query = query.trim().to_lowercase();

    let selected = match filter {
        StockFilter::All => [gainers, losers].concat(),
        StockFilter::Gainers => gainers,
        StockFilter::Losers => losers,
    };

    selected
        .into_iter()
        .filter(|quote| {
            query.is_empty()
                || quote.label().to_lowercase().contains(&query)
                || quote.symbol().to_lowercase().contains(&query)
        })
        .collect()
}
