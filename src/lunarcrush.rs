use crate::{
    error::{FetchError, FetchResult},
    http::{build_client, get_json, no_data_on_err, number, trim_base_url},
    NamedAPI, SocialAPI, SocialMetrics,
};
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const LUNARCRUSH_URL: &str = "https://api.lunarcrush.com";

pub struct LunarCrushAPI {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LunarCrushAPI {
    pub fn with_key(api_key: &str, timeout: Duration) -> Result<Self> {
        Self::with_base_url(LUNARCRUSH_URL, api_key, timeout)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base_url(base_url),
            api_key: api_key.to_owned(),
        })
    }

    async fn fetch_asset(&self, symbol: &str) -> FetchResult<SocialMetrics> {
        let builder = self.client.get(format!("{}/v2", self.base_url));
        let symbol = symbol.to_uppercase();
        let res = get_json(builder.query(&[
            ("data", "assets"),
            ("key", self.api_key.as_str()),
            ("symbol", symbol.as_str()),
        ]))
        .await?;
        debug!("LunarCrush response for {}: {:?}", symbol, res);
        parse_asset(&res)
    }
}

fn parse_asset(res: &Value) -> FetchResult<SocialMetrics> {
    let item = res["data"]
        .as_array()
        .and_then(|items| items.first())
        .ok_or(FetchError::FieldMissing("data"))?;
    let metrics = SocialMetrics {
        social_volume: number(&item["social_volume"]),
        social_score: number(&item["galaxy_score"]),
        sentiment: number(&item["average_sentiment"]),
        alt_rank: number(&item["alt_rank"]),
    };
    if metrics.is_empty() {
        return Err(FetchError::MalformedPayload("asset carries no metrics".to_owned()));
    }
    Ok(metrics)
}

#[async_trait]
impl SocialAPI for LunarCrushAPI {
    async fn get_social(&self, symbol: &str) -> Option<SocialMetrics> {
        let result = self.fetch_asset(symbol).await;
        no_data_on_err(&self.get_name(), symbol, result)
    }
}

impl NamedAPI for LunarCrushAPI {
    fn get_name(&self) -> String {
        "LunarCrush".to_owned()
    }
}
