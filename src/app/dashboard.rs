use std::time::{Duration, Instant};

use log::info;

use crate::{
    api::MarketDataSource,
    models::MarketSnapshot,
    services::{DataSource, FallbackPolicy, MarketDataService, SnapshotChoice, choose_snapshot},
};

const UNAVAILABLE_BANNER: &str =
    "Live market data unavailable. Showing illustrative data. Press F5 to retry.";
const OFFLINE_BANNER: &str = "Offline mode. Showing illustrative data.";

/// The snapshot on screen plus the refresh bookkeeping around it.
pub struct Dashboard<S> {
    service: MarketDataService<S>,
    policy: FallbackPolicy,
    offline: bool,
    current: Option<SnapshotChoice>,
    banner: Option<&'static str>,
    last_refresh: Option<Instant>,
}

impl<S: MarketDataSource> Dashboard<S> {
    pub fn new(service: MarketDataService<S>, policy: FallbackPolicy, offline: bool) -> Self {
        Self {
            service,
            policy,
            offline,
            current: None,
            banner: None,
            last_refresh: None,
        }
    }

    pub fn current(&self) -> Option<&SnapshotChoice> {
        self.current.as_ref()
    }

    pub fn snapshot(&self) -> Option<&MarketSnapshot> {
        self.current.as_ref().map(|choice| choice.snapshot())
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner
    }

    pub fn is_refresh_due(&self, interval: Duration) -> bool {
        self.last_refresh
            .is_none_or(|last_refresh| last_refresh.elapsed() >= interval)
    }

    /// Replaces the current snapshot wholesale.
    pub async fn refresh(&mut self) {
        let live = if self.offline {
            MarketSnapshot::empty()
        } else {
            self.service.get_snapshot().await
        };

        let choice = choose_snapshot(live, self.service.get_fallback_snapshot(), &self.policy);

        self.banner = match (self.offline, choice.source()) {
            (true, _) => Some(OFFLINE_BANNER),
            (false, DataSource::Illustrative) => Some(UNAVAILABLE_BANNER),
            (false, _) => None,
        };

        info!("Dashboard refreshed from {} data", choice.source());

        self.current = Some(choice);
        self.last_refresh = Some(Instant::now());
    }
}
