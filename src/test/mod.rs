mod av;
mod fallback;
mod market_data_service;
mod support;
