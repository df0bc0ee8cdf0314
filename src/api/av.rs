use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{
    MarketDataSource,
    av_dto::{AvGlobalQuoteDto, AvNewsItemDto, AvSectorDto},
    utils::{
        check_api_notice, make_request, parse_decimal, parse_response_array,
        parse_response_object,
    },
};
use crate::{
    config::MarketDataConfig,
    error::Failure,
    models::{NewsItem, Quote, SectorPerformance},
};

#[derive(Clone, Debug)]
pub struct AvApi {
    client: Client,
    base_url: String,
    api_key: String,
    news_topics: String,
    news_limit: u32,
}

impl AvApi {
    pub fn new(config: &MarketDataConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(*config.timeout())
            .build()
            .with_context(|| "Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            api_key: config.api_key().clone(),
            news_topics: config.news_topics().clone(),
            news_limit: *config.news_limit(),
        })
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value, Failure> {
        make_request(&self.client, &self.base_url, params, &self.api_key).await
    }
}

#[async_trait]
impl MarketDataSource for AvApi {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, Failure> {
        let data = self
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;
        parse_global_quote(symbol, &data)
    }

    async fn fetch_sector_performance(&self) -> Result<Vec<SectorPerformance>, Failure> {
        let data = self.query(&[("function", "SECTOR")]).await?;
        parse_sector_performance(&data)
    }

    async fn fetch_market_news(&self) -> Result<Vec<NewsItem>, Failure> {
        let limit = self.news_limit.to_string();
        let data = self
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("topics", self.news_topics.as_str()),
                ("limit", limit.as_str()),
            ])
            .await?;
        parse_market_news(&data)
    }
}

pub fn parse_global_quote(symbol: &str, data: &Value) -> Result<Quote, Failure> {
    check_api_notice(data)?;

    let global_quote = data
        .get("Global Quote")
        .filter(|quote| quote.is_object())
        .ok_or_else(|| {
            Failure::MalformedResponse(String::from(
                "Failed to find 'Global Quote' in the response",
            ))
        })?;

    if global_quote.get("05. price").is_none() {
        return Err(Failure::MalformedResponse(format!(
            "No price in quote for symbol {}",
            symbol
        )));
    }

    parse_response_object::<AvGlobalQuoteDto>(
        global_quote,
        &format!("Incomplete quote for symbol {}", symbol),
    )?
    .to_quote(symbol)
}

/// Sectors are taken from the real-time table, ordered by real-time
/// performance, best first.
pub fn parse_sector_performance(data: &Value) -> Result<Vec<SectorPerformance>, Failure> {
    check_api_notice(data)?;

    let sectors = parse_response_object::<AvSectorDto>(data, "Unexpected sector table")?;
    let real_time = sectors.real_time().as_ref().ok_or_else(|| {
        Failure::MalformedResponse(String::from(
            "Failed to find 'Rank A: Real-Time Performance' in the response",
        ))
    })?;

    let mut ranked: Vec<(Decimal, SectorPerformance)> = Vec::with_capacity(real_time.len());

    for (name, raw) in real_time {
        let real_time_performance = match parse_decimal(raw, name) {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping sector '{}': {}", name, e);
                continue;
            }
        };

        ranked.push((
            real_time_performance,
            SectorPerformance::new(
                name.clone(),
                bucket_value(sectors.one_day(), name).unwrap_or(real_time_performance),
                bucket_value(sectors.five_day(), name),
                bucket_value(sectors.one_month(), name),
            ),
        ));
    }

    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.name().cmp(b.1.name())));

    Ok(ranked.into_iter().map(|(_, sector)| sector).collect())
}

fn bucket_value(bucket: &Option<HashMap<String, String>>, name: &str) -> Option<Decimal> {
    bucket
        .as_ref()?
        .get(name)
        .and_then(|raw| parse_decimal(raw, name).ok())
}

pub fn parse_market_news(data: &Value) -> Result<Vec<NewsItem>, Failure> {
    check_api_notice(data)?;

    let feed = data.get("feed").and_then(Value::as_array).ok_or_else(|| {
        Failure::MalformedResponse(String::from("Failed to find 'feed' in the response"))
    })?;

    Ok(parse_response_array::<AvNewsItemDto>(feed)
        .into_iter()
        .map(AvNewsItemDto::to_news_item)
        .collect())
}
