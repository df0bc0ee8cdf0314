pub mod export_service;
pub mod fallback;
pub mod market_data_service;
pub mod poll_service;
pub mod session_service;
pub mod validation;

pub use export_service::ExportFormat;
pub use fallback::{DataSource, FallbackPolicy, SnapshotChoice, choose_snapshot};
pub use market_data_service::{
    MarketDataService, MarketMood, Mood, StockFilter, filter_stocks, market_mood, top_movers,
};
pub use poll_service::PollService;
pub use session_service::SessionService;
