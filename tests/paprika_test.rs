use meme_radar::{paprika::CoinPaprikaAPI, QuoteAPI, QuoteSource};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_ticker() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickers/eth-ethereum"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "eth-ethereum",
            "name": "Ethereum",
            "symbol": "ETH",
            "quotes": {
                "USD": {
                    "price": 3150.25,
                    "volume_24h": 15000000000.0,
                    "market_cap": 380000000000.0,
                    "percent_change_24h": -1.4
                }
            }
        })))
        .mount(&server)
        .await;

    let api = CoinPaprikaAPI::with_base_url(&server.uri(), TIMEOUT).unwrap();
    let quote = api.get_quote("eth-ethereum").await.unwrap();
    assert_eq!(quote.symbol, "ETH");
    assert_eq!(quote.name, "Ethereum");
    assert_eq!(quote.price_usd, Some(3150.25));
    assert_eq!(quote.price_change_pct_24h, -1.4);
    assert_eq!(quote.volume_24h_usd, 15000000000.0);
    assert_eq!(quote.market_cap_usd, 380000000000.0);
    assert_eq!(quote.source, QuoteSource::CoinPaprika);
}

#[tokio::test]
async fn test_missing_optional_fields_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickers/ordi-ordi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "ORDI",
            "symbol": "ORDI",
            "quotes": { "USD": { "price": 38.1 } }
        })))
        .mount(&server)
        .await;

    let api = CoinPaprikaAPI::with_base_url(&server.uri(), TIMEOUT).unwrap();
    let quote = api.get_quote("ordi-ordi").await.unwrap();
    assert_eq!(quote.price_change_pct_24h, 0.0);
    assert_eq!(quote.volume_24h_usd, 0.0);
}

#[tokio::test]
async fn test_renamed_slug_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickers/matic-polygon"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "id not found" })),
        )
        .mount(&server)
        .await;

    let api = CoinPaprikaAPI::with_base_url(&server.uri(), TIMEOUT).unwrap();
    assert!(api.get_quote("matic-polygon").await.is_none());
}
