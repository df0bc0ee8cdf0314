use chrono::Utc;
use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strum_macros::Display;

use crate::models::{MarketSnapshot, NewsItem, Quote, SectorPerformance};

/// Where the snapshot on screen came from.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum DataSource {
    Live,
    /// Live data with one or more empty sections filled from the fallback.
    Mixed,
    Illustrative,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FallbackPolicy {
    /// Live snapshots with fewer indices than this are discarded entirely.
    pub min_indices: usize,
    /// Replace empty live sections with the fallback's section.
    pub fill_missing_sections: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            min_indices: 1,
            fill_missing_sections: true,
        }
    }
}

#[derive(Clone, Debug, Getters, PartialEq, new)]
pub struct SnapshotChoice {
    snapshot: MarketSnapshot,
    source: DataSource,
}

impl SnapshotChoice {
    pub fn is_illustrative(&self) -> bool {
        self.source == DataSource::Illustrative
    }
}

pub fn choose_snapshot(
    live: MarketSnapshot,
    fallback: MarketSnapshot,
    policy: &FallbackPolicy,
) -> SnapshotChoice {
    if live.is_empty() || live.indices().len() < policy.min_indices {
        return SnapshotChoice::new(fallback, DataSource::Illustrative);
    }

    if !policy.fill_missing_sections {
        return SnapshotChoice::new(live, DataSource::Live);
    }

    let (indices, stocks, sectors, news, last_updated) = live.into_parts();
    let (fb_indices, fb_stocks, fb_sectors, fb_news, _) = fallback.into_parts();
    let mut substituted = false;

    let snapshot = MarketSnapshot::new(
        fill(indices, fb_indices, &mut substituted),
        fill(stocks, fb_stocks, &mut substituted),
        fill(sectors, fb_sectors, &mut substituted),
        fill(news, fb_news, &mut substituted),
        last_updated,
    );

    let source = if substituted {
        DataSource::Mixed
    } else {
        DataSource::Live
    };

    SnapshotChoice::new(snapshot, source)
}

fn fill<T>(live: Vec<T>, fallback: Vec<T>, substituted: &mut bool) -> Vec<T> {
    if live.is_empty() && !fallback.is_empty() {
        *substituted = true;
        fallback
    } else {
        live
    }
}

fn quote(
    symbol: &str,
    name: &str,
    price: Decimal,
    change: Decimal,
    change_percent: Decimal,
) -> Quote {
    Quote::new(
        symbol.to_string(),
        Some(name.to_string()),
        price,
        change,
        change_percent,
        None,
    )
}

/// Illustrative numbers shown when live data is unavailable.
pub fn fallback_snapshot() -> MarketSnapshot {
    let now = Utc::now();

    let indices = vec![
        quote("DIA", "Dow Jones", dec!(340.50), dec!(2.30), dec!(0.68)),
        quote("QQQ", "NASDAQ", dec!(367.20), dec!(-1.50), dec!(-0.41)),
        quote("BSE:SENSEX", "BSE Sensex", dec!(73840.45), dec!(245.67), dec!(0.33)),
        quote("NSE:NIFTY", "Nifty 50", dec!(22356.78), dec!(-89.23), dec!(-0.40)),
    ];

    let stocks = vec![
        quote("TCS.NS", "TCS", dec!(3456.78), dec!(45.23), dec!(1.32)),
        quote("INFY.NS", "Infosys", dec!(1567.89), dec!(-12.34), dec!(-0.78)),
        quote("RELIANCE.NS", "Reliance", dec!(2789.45), dec!(34.56), dec!(1.25)),
    ];

    let sectors = vec![
        SectorPerformance::new(
            String::from("Technology"),
            dec!(1.2),
            Some(dec!(2.3)),
            Some(dec!(5.6)),
        ),
        SectorPerformance::new(
            String::from("Healthcare"),
            dec!(0.8),
            Some(dec!(1.5)),
            Some(dec!(3.2)),
        ),
        SectorPerformance::new(
            String::from("Financial Services"),
            dec!(-0.5),
            Some(dec!(0.3)),
            Some(dec!(2.1)),
        ),
    ];

    let news = vec![NewsItem::new(
        String::from("Markets reach new highs on positive economic data"),
        String::from("Market News"),
        String::from("Stock markets continue their upward trajectory..."),
        String::from("#"),
        now.format("%Y%m%dT%H%M%S").to_string(),
        Some(0.35),
    )];

    MarketSnapshot::new(indices, stocks, sectors, news, now)
}
