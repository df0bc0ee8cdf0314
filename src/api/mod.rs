pub mod av;
pub mod av_dto;
pub mod utils;

use async_trait::async_trait;

pub use av::AvApi;

use crate::{
    error::Failure,
    models::{NewsItem, Quote, SectorPerformance},
};

/// The three calls the dashboard makes against a quote/news provider.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, Failure>;

    async fn fetch_sector_performance(&self) -> Result<Vec<SectorPerformance>, Failure>;

    async fn fetch_market_news(&self) -> Result<Vec<NewsItem>, Failure>;
}
