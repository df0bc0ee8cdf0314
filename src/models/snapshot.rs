use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{NewsItem, Quote, SectorPerformance};

#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize, new)]
pub struct MarketSnapshot {
    indices: Vec<Quote>,
    stocks: Vec<Quote>,
    sectors: Vec<SectorPerformance>,
    news: Vec<NewsItem>,
    last_updated: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new(), Utc::now())
    }

    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (
        Vec<Quote>,
        Vec<Quote>,
        Vec<SectorPerformance>,
        Vec<NewsItem>,
        DateTime<Utc>,
    ) {
        (
            self.indices,
            self.stocks,
            self.sectors,
            self.news,
            self.last_updated,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
            && self.stocks.is_empty()
            && self.sectors.is_empty()
            && self.news.is_empty()
    }
}
