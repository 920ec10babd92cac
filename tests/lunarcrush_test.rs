use meme_radar::{lunarcrush::LunarCrushAPI, SocialAPI};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_assets() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2"))
        .and(query_param("data", "assets"))
        .and(query_param("key", "secret"))
        .and(query_param("symbol", "PEPE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "symbol": "PEPE",
                "social_volume": 48210,
                "galaxy_score": 66.5,
                "average_sentiment": 3.9,
                "alt_rank": 17
            }]
        })))
        .mount(&server)
        .await;

    let api = LunarCrushAPI::with_base_url(&server.uri(), "secret", TIMEOUT).unwrap();
    let social = api.get_social("pepe").await.unwrap();
    assert_eq!(social.social_volume, Some(48210.0));
    assert_eq!(social.social_score, Some(66.5));
    assert_eq!(social.sentiment, Some(3.9));
    assert_eq!(social.alt_rank, Some(17.0));
}

#[tokio::test]
async fn test_rejected_key_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let api = LunarCrushAPI::with_base_url(&server.uri(), "expired", TIMEOUT).unwrap();
    assert!(api.get_social("DOGE").await.is_none());
}
