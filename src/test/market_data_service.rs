#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use crate::{
        config::Instrument,
        models::{MarketSnapshot, NewsItem, Quote, SectorPerformance},
        services::{
            MarketDataService, Mood, StockFilter, filter_stocks, market_mood, top_movers,
        },
        test::support::{FakeSource, config, quote},
    };

    fn news() -> Vec<NewsItem> {
        vec![NewsItem::new(
            String::from("Rates on hold"),
            String::from("Reuters"),
            String::new(),
            String::new(),
            String::from("20241017T090000"),
            Some(0.05),
        )]
    }

    #[tokio::test]
    async fn fetch_multiple_quotes_drops_failures() {
        let source = FakeSource::default()
            .with_quote("DIA", dec!(0.68))
            .with_quote("NSE:NIFTY", dec!(-0.40));
        let service = MarketDataService::new(source, config(&[], &[]));

        let instruments = vec![
            Instrument::new(String::from("DIA"), Some(String::from("Dow Jones"))),
            Instrument::new(String::from("QQQ"), Some(String::from("NASDAQ"))),
            Instrument::new(String::from("NSE:NIFTY"), None),
        ];
        let quotes = service.fetch_multiple_quotes(&instruments).await;

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].symbol(), "DIA");
        assert_eq!(quotes[0].label(), "Dow Jones");
        assert_eq!(quotes[1].symbol(), "NSE:NIFTY");
        assert_eq!(quotes[1].label(), "NSE:NIFTY");
    }

    #[tokio::test]
    async fn get_snapshot_is_empty_when_everything_fails() {
        let service = MarketDataService::new(FakeSource::default(), config(&["DIA", "QQQ"], &["TCS.NS"]));

        let snapshot = service.get_snapshot().await;

        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn get_snapshot_keeps_partial_results() {
        let source = FakeSource::default()
            .with_quote("DIA", dec!(0.68))
            .with_quote("TCS.NS", dec!(1.32))
            .with_news(news());
        let service = MarketDataService::new(source, config(&["DIA", "QQQ"], &["TCS.NS", "INFY.NS"]));

        let snapshot = service.get_snapshot().await;

        assert_eq!(snapshot.indices().len(), 1);
        assert_eq!(snapshot.stocks().len(), 1);
        assert!(snapshot.sectors().is_empty());
        assert_eq!(snapshot.news().len(), 1);
        assert_eq!(snapshot.indices()[0].label(), "DIA name");
    }

    #[tokio::test]
    async fn get_snapshot_works() {
        let source = FakeSource::default()
            .with_quote("DIA", dec!(0.68))
            .with_quote("TCS.NS", dec!(1.32))
            .with_sectors(vec![SectorPerformance::new(
                String::from("Energy"),
                dec!(-0.85),
                None,
                None,
            )])
            .with_news(news());
        let service = MarketDataService::new(source, config(&["DIA"], &["TCS.NS"]));

        let snapshot = service.get_snapshot().await;

        assert_eq!(snapshot.indices().len(), 1);
        assert_eq!(snapshot.stocks().len(), 1);
        assert_eq!(snapshot.sectors().len(), 1);
        assert_eq!(snapshot.news().len(), 1);
    }

    #[test]
    fn fallback_snapshot_is_complete() {
        let service = MarketDataService::new(FakeSource::default(), config(&[], &[]));
        let fallback = service.get_fallback_snapshot();

        assert_eq!(fallback.indices().len(), 4);
        assert_eq!(fallback.stocks().len(), 3);
        assert_eq!(fallback.sectors().len(), 3);
        assert_eq!(fallback.news().len(), 1);

        let dia = &fallback.indices()[0];
        assert_eq!(dia.symbol(), "DIA");
        assert_eq!(*dia.price(), dec!(340.50));
        assert_eq!(*dia.change(), dec!(2.30));
        assert_eq!(*dia.change_percent(), dec!(0.68));
    }

    #[test]
    fn top_movers_works() {
        let stocks = vec![
            quote("TCS.NS", dec!(1.32)),
            quote("INFY.NS", dec!(-0.78)),
            quote("RELIANCE.NS", dec!(1.25)),
            quote("WIPRO.NS", dec!(-2.10)),
            quote("HDFCBANK.NS", dec!(0)),
        ];

        let (gainers, losers) = top_movers(&stocks, 5);
        let gainers: Vec<&str> = gainers.iter().map(|q| q.symbol().as_str()).collect();
        let losers: Vec<&str> = losers.iter().map(|q| q.symbol().as_str()).collect();

        assert_eq!(gainers, ["TCS.NS", "RELIANCE.NS", "HDFCBANK.NS"]);
        assert_eq!(losers, ["WIPRO.NS", "INFY.NS"]);
    }

    #[test]
    fn top_movers_truncates() {
        let stocks = vec![
            quote("A", dec!(3)),
            quote("B", dec!(2)),
            quote("C", dec!(1)),
        ];

        let (gainers, losers) = top_movers(&stocks, 2);

        assert_eq!(gainers.len(), 2);
        assert_eq!(*gainers[0].change_percent(), dec!(3));
        assert!(losers.is_empty());
    }

    fn snapshot(indices: Vec<Quote>, stocks: Vec<Quote>) -> MarketSnapshot {
        MarketSnapshot::new(indices, stocks, Vec::new(), Vec::new(), Utc::now())
    }

    fn watchlist() -> Vec<Quote> {
        vec![
            Quote::new(String::from("TCS.NS"), Some(String::from("TCS")), dec!(3842.15), dec!(49.95), dec!(1.32), None),
            Quote::new(String::from("INFY.NS"), Some(String::from("Infosys")), dec!(1456.30), dec!(-11.45), dec!(-0.78), None),
            Quote::new(String::from("RELIANCE.NS"), Some(String::from("Reliance")), dec!(2847.65), dec!(35.20), dec!(1.25), None),
            Quote::new(String::from("WIPRO.NS"), Some(String::from("Wipro")), dec!(452.10), dec!(-9.70), dec!(-2.10), None),
        ]
    }

    fn symbols(quotes: &[Quote]) -> Vec<&str> {
        quotes.iter().map(|q| q.symbol().as_str()).collect()
    }

    #[test]
    fn market_mood_follows_sensex() {
        let indices = vec![quote("BSE:SENSEX", dec!(0.33)), quote("NSE:NIFTY", dec!(-0.40))];

        let mood = market_mood(&snapshot(indices, watchlist()));

        assert_eq!(*mood.mood(), Mood::Bullish);
        assert_eq!(mood.mood().to_string(), "BULLISH");
        assert_eq!(*mood.gainers(), 2);
        assert_eq!(*mood.losers(), 2);
        assert_eq!(*mood.sensex_change(), Some(dec!(0.33)));
        assert_eq!(*mood.nifty_change(), Some(dec!(-0.40)));
    }

    #[test]
    fn market_mood_bearish_on_falling_sensex() {
        let indices = vec![quote("BSE:SENSEX", dec!(-1.05))];
        let stocks = vec![quote("TCS.NS", dec!(0)), quote("INFY.NS", dec!(-0.78))];

        let mood = market_mood(&snapshot(indices, stocks));

        assert_eq!(*mood.mood(), Mood::Bearish);
        assert_eq!(mood.mood().to_string(), "BEARISH");
        assert_eq!(*mood.gainers(), 1);
        assert_eq!(*mood.losers(), 1);
        assert_eq!(*mood.nifty_change(), None);
    }

    #[test]
    fn market_mood_without_sensex_is_bullish() {
        let mood = market_mood(&snapshot(vec![quote("DIA", dec!(-3))], Vec::new()));

        assert_eq!(*mood.mood(), Mood::Bullish);
        assert_eq!(*mood.gainers(), 0);
        assert_eq!(*mood.losers(), 0);
        assert_eq!(*mood.sensex_change(), None);
    }

    #[test]
    fn filter_stocks_all_lists_gainers_then_losers() {
        let stocks = filter_stocks(&watchlist(), "", StockFilter::All);

        assert_eq!(symbols(&stocks), ["TCS.NS", "RELIANCE.NS", "WIPRO.NS", "INFY.NS"]);
    }

    #[test]
    fn filter_stocks_by_direction() {
        let gainers = filter_stocks(&watchlist(), "", StockFilter::Gainers);
        let losers = filter_stocks(&watchlist(), "", StockFilter::Losers);

        assert_eq!(symbols(&gainers), ["TCS.NS", "RELIANCE.NS"]);
        assert_eq!(symbols(&losers), ["WIPRO.NS", "INFY.NS"]);
    }

    #[test]
    fn filter_stocks_matches_name_or_symbol() {
        let by_name = filter_stocks(&watchlist(), "  infos ", StockFilter::All);
        let by_symbol = filter_stocks(&watchlist(), "reliance.ns", StockFilter::Gainers);

        assert_eq!(symbols(&by_name), ["INFY.NS"]);
        assert_eq!(symbols(&by_symbol), ["RELIANCE.NS"]);
    }

    #[test]
    fn filter_stocks_can_come_up_empty() {
        assert!(filter_stocks(&watchlist(), "wipro", StockFilter::Gainers).is_empty());
        assert!(filter_stocks(&watchlist(), "HDFC", StockFilter::All).is_empty());
    }
}
