use std::{path::PathBuf, time::Duration};

use anyhow::{Result, bail};
use clap::Parser;
use derive_getters::Getters;
use derive_new::new;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REFRESH_MINUTES: u64 = 15;
pub const DEFAULT_NEWS_TOPICS: &str = "technology,finance,economy";
pub const DEFAULT_NEWS_LIMIT: u32 = 10;

#[derive(Debug, Parser)]
#[command(name = "orion-markets", version, about = "ORION market intelligence dashboard")]
pub struct Cli {
    /// Alpha Vantage API key
    #[arg(long, env = "ALPHA_VANTAGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "ALPHA_VANTAGE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Minutes between automatic refreshes
    #[arg(long, default_value_t = DEFAULT_REFRESH_MINUTES)]
    pub refresh_minutes: u64,

    /// JSON file backing the session and poll ledger
    #[arg(long, env = "ORION_STORAGE", default_value = "~/.orion/storage.json")]
    pub storage: String,

    /// Directory receiving exported reports
    #[arg(long, env = "ORION_EXPORT_DIR", default_value = ".")]
    pub export_dir: String,

    #[arg(long, env = "ORION_LOG_FILE", default_value = "orion-markets.log")]
    pub log_file: String,

    /// Skip the network and show illustrative data only
    #[arg(long)]
    pub offline: bool,
}

impl Cli {
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage).as_ref())
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.export_dir).as_ref())
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_file).as_ref())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_minutes.max(1) * 60)
    }

    pub fn market_data_config(&self) -> Result<MarketDataConfig> {
        let api_key = match (&self.api_key, self.offline) {
            (Some(key), _) => key.clone(),
            (None, true) => String::new(),
            (None, false) => bail!("Missing ALPHA_VANTAGE_API_KEY (set it or pass --offline)"),
        };

        Ok(MarketDataConfig {
            base_url: self.base_url.clone(),
            api_key,
            timeout: Duration::from_secs(self.timeout_secs),
            ..MarketDataConfig::default()
        })
    }
}

/// A symbol to quote, with the name shown on the dashboard.
#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct Instrument {
    symbol: String,
    name: Option<String>,
}

impl Instrument {
    fn named(symbol: &str, name: &str) -> Self {
        Self::new(symbol.to_string(), Some(name.to_string()))
    }
}

#[derive(Clone, Debug, Getters)]
pub struct MarketDataConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
    indices: Vec<Instrument>,
    stocks: Vec<Instrument>,
    news_topics: String,
    news_limit: u32,
}

impl MarketDataConfig {
    pub fn with_base_url(self, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn with_instruments(self, indices: Vec<Instrument>, stocks: Vec<Instrument>) -> Self {
        Self {
            indices,
            stocks,
            ..self
        }
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            indices: vec![
                Instrument::named("DIA", "Dow Jones"),
                Instrument::named("QQQ", "NASDAQ"),
                Instrument::named("BSE:SENSEX", "BSE Sensex"),
                Instrument::named("NSE:NIFTY", "Nifty 50"),
            ],
            stocks: vec![
                Instrument::named("TCS.NS", "TCS"),
                Instrument::named("INFY.NS", "Infosys"),
                Instrument::named("RELIANCE.NS", "Reliance"),
                Instrument::named("HDFCBANK.NS", "HDFC Bank"),
                Instrument::named("WIPRO.NS", "Wipro"),
            ],
            news_topics: DEFAULT_NEWS_TOPICS.to_string(),
            news_limit: DEFAULT_NEWS_LIMIT,
        }
    }
}
