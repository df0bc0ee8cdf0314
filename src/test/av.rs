#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;
    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        sync::oneshot,
    };

    use crate::{
        api::{
            AvApi, MarketDataSource,
            av::{parse_global_quote, parse_market_news, parse_sector_performance},
        },
        config::MarketDataConfig,
        error::Failure,
        models::{Quote, Sentiment},
    };

    const DIA_QUOTE: &str = r#"{
        "Global Quote": {
            "01. symbol": "DIA",
            "02. open": "338.90",
            "05. price": "340.50",
            "07. latest trading day": "2024-10-17",
            "08. previous close": "338.20",
            "09. change": "2.30",
            "10. change percent": "0.68%"
        }
    }"#;

    /// Serves one canned HTTP response and hands back the request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        (format!("http://{}/query", addr), rx)
    }

    fn api(base_url: &str, timeout: Duration) -> AvApi {
        let config = MarketDataConfig::default()
            .with_base_url(base_url)
            .with_timeout(timeout);
        AvApi::new(&config).unwrap()
    }

    #[test]
    fn parse_global_quote_works() {
        let data = serde_json::from_str(DIA_QUOTE).unwrap();
        let quote = parse_global_quote("DIA", &data).unwrap();

        assert_eq!(
            quote,
            Quote::new(
                String::from("DIA"),
                None,
                dec!(340.50),
                dec!(2.30),
                dec!(0.68),
                Some(String::from("2024-10-17")),
            )
        );
    }

    #[test]
    fn parse_global_quote_handles_negative_change() {
        let data = json!({
            "Global Quote": {
                "05. price": "367.20",
                "09. change": "-1.50",
                "10. change percent": "-0.4100%"
            }
        });
        let quote = parse_global_quote("QQQ", &data).unwrap();

        assert_eq!(*quote.change(), dec!(-1.50));
        assert_eq!(*quote.change_percent(), dec!(-0.41));
        assert!(!quote.is_gain());
        assert_eq!(*quote.timestamp(), None);
    }

    #[test]
    fn parse_global_quote_accepts_leading_plus() {
        let data = json!({
            "Global Quote": {
                "05. price": "340.50",
                "09. change": "+2.30",
                "10. change percent": "+0.68%"
            }
        });
        let quote = parse_global_quote("DIA", &data).unwrap();

        assert_eq!(*quote.price(), dec!(340.50));
        assert_eq!(*quote.change(), dec!(2.30));
        assert_eq!(*quote.change_percent(), dec!(0.68));
        assert!(quote.is_gain());
    }

    #[test]
    fn parse_global_quote_rejects_missing_price() {
        let data = json!({ "Global Quote": { "01. symbol": "DIA" } });
        let result = parse_global_quote("DIA", &data);

        assert!(matches!(result, Err(Failure::MalformedResponse(_))));
    }

    #[test]
    fn parse_global_quote_rejects_empty_body() {
        let result = parse_global_quote("DIA", &json!({}));
        assert!(matches!(result, Err(Failure::MalformedResponse(_))));

        let result = parse_global_quote("DIA", &json!({ "Global Quote": {} }));
        assert!(matches!(result, Err(Failure::MalformedResponse(_))));
    }

    #[test]
    fn parse_global_quote_reports_rate_limit_notice() {
        let data = json!({ "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute." });

        match parse_global_quote("DIA", &data) {
            Err(Failure::RateLimitedOrInvalid(message)) => {
                assert!(message.starts_with("API rate limit exceeded"))
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let data = json!({ "Information": "Please subscribe to any of the premium plans." });
        assert!(matches!(
            parse_global_quote("DIA", &data),
            Err(Failure::RateLimitedOrInvalid(_))
        ));
    }

    #[test]
    fn parse_global_quote_reports_error_message() {
        let data = json!({ "Error Message": "Invalid API call." });

        assert_eq!(
            parse_global_quote("NOPE", &data),
            Err(Failure::RateLimitedOrInvalid(String::from("Invalid API call.")))
        );
    }

    #[test]
    fn parse_sector_performance_works() {
        let data = json!({
            "Meta Data": { "Information": "US Sector Performance (realtime & historical)" },
            "Rank A: Real-Time Performance": {
                "Energy": "-0.85%",
                "Information Technology": "1.20%",
                "Health Care": "0.40%"
            },
            "Rank B: 1 Day Performance": {
                "Energy": "-0.80%",
                "Information Technology": "1.10%"
            },
            "Rank C: 5 Day Performance": {
                "Information Technology": "2.30%"
            }
        });

        // "Meta Data" carries an "Information" key of its own; only top-level
        // notices count.
        let sectors = parse_sector_performance(&data).unwrap();
        let names: Vec<&str> = sectors.iter().map(|s| s.name().as_str()).collect();

        assert_eq!(names, ["Information Technology", "Health Care", "Energy"]);
        assert_eq!(*sectors[0].one_day(), dec!(1.10));
        assert_eq!(*sectors[0].five_day(), Some(dec!(2.30)));
        assert_eq!(*sectors[0].one_month(), None);
        assert_eq!(*sectors[1].one_day(), dec!(0.40));
        assert_eq!(*sectors[2].one_day(), dec!(-0.80));
    }

    #[test]
    fn parse_sector_performance_rejects_missing_table() {
        let data = json!({ "Meta Data": {} });
        assert!(matches!(
            parse_sector_performance(&data),
            Err(Failure::MalformedResponse(_))
        ));
    }

    #[test]
    fn parse_market_news_works() {
        let data = json!({
            "items": "4",
            "feed": [
                {
                    "title": "Chipmakers rally",
                    "source": "Reuters",
                    "summary": "Semiconductor stocks rose.",
                    "url": "https://example.com/a",
                    "time_published": "20241017T143000",
                    "overall_sentiment_score": 0.2
                },
                { "title": "Flat session", "overall_sentiment_score": 0.15 },
                { "title": "Banks slide", "overall_sentiment_score": -0.3 },
                { "headline": "No title here" }
            ]
        });

        let news = parse_market_news(&data).unwrap();

        assert_eq!(news.len(), 3);
        assert_eq!(news[0].source(), "Reuters");
        assert_eq!(news[0].published_at(), "20241017T143000");
        assert_eq!(*news[0].sentiment(), Sentiment::Positive);
        assert_eq!(*news[1].sentiment(), Sentiment::Neutral);
        assert_eq!(*news[2].sentiment(), Sentiment::Negative);
    }

    #[test]
    fn parse_market_news_rejects_missing_feed() {
        assert!(matches!(
            parse_market_news(&json!({ "items": "0" })),
            Err(Failure::MalformedResponse(_))
        ));
    }

    #[test]
    fn sentiment_thresholds_are_strict() {
        assert_eq!(Sentiment::from_score(Some(0.16)), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(Some(0.15)), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(Some(-0.15)), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(Some(-0.16)), Sentiment::Negative);
        assert_eq!(Sentiment::from_score(None), Sentiment::Neutral);
    }

    #[tokio::test]
    async fn fetch_quote_works() {
        let (url, request) = serve_once("200 OK", DIA_QUOTE).await;
        let api = api(&url, Duration::from_secs(5));

        let quote = api.fetch_quote("DIA").await.unwrap();
        let request = request.await.unwrap();

        assert_eq!(*quote.price(), dec!(340.50));
        assert_eq!(*quote.change(), dec!(2.30));
        assert_eq!(*quote.change_percent(), dec!(0.68));
        assert!(request.contains("function=GLOBAL_QUOTE"));
        assert!(request.contains("symbol=DIA"));
        assert!(request.contains("apikey="));
    }

    #[tokio::test]
    async fn fetch_quote_maps_bad_status() {
        let (url, _request) = serve_once("429 Too Many Requests", "{}").await;
        let api = api(&url, Duration::from_secs(5));

        assert!(matches!(
            api.fetch_quote("DIA").await,
            Err(Failure::RateLimitedOrInvalid(_))
        ));
    }

    #[tokio::test]
    async fn fetch_quote_maps_invalid_json() {
        let (url, _request) = serve_once("200 OK", "<html>maintenance</html>").await;
        let api = api(&url, Duration::from_secs(5));

        assert!(matches!(
            api.fetch_quote("DIA").await,
            Err(Failure::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn fetch_quote_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let api = api(&format!("http://{}/query", addr), Duration::from_millis(200));

        assert_eq!(
            api.fetch_quote("DIA").await,
            Err(Failure::RateLimitedOrInvalid(String::from("Request timed out")))
        );
    }

    #[tokio::test]
    async fn fetch_market_news_sends_topics() {
        let (url, request) = serve_once("200 OK", r#"{"feed": []}"#).await;
        let api = api(&url, Duration::from_secs(5));

        let news = api.fetch_market_news().await.unwrap();
        let request = request.await.unwrap();

        assert!(news.is_empty());
        assert!(request.contains("function=NEWS_SENTIMENT"));
        assert!(request.contains("limit=10"));
    }
}
