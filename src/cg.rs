use crate::{
    error::{FetchError, FetchResult},
    http::{build_client, get_json, no_data_on_err, number, number_or_zero, trim_base_url},
    scanner::{ListedCoin, MarketCoin},
    CoinQuote, NamedAPI, QuoteAPI, QuoteSource,
};
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// Which CoinGecko endpoint backs `get_quote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinGeckoEndpoint {
    /// `/coins/{id}`: price, 24h change and volume.
    Detail,
    /// `/simple/price`: price and 24h change only, volume is always 0.
    SimplePrice,
}

#[derive(Clone)]
pub struct CoinGeckoAPI {
    client: Client,
    base_url: String,
    endpoint: CoinGeckoEndpoint,
}

impl CoinGeckoAPI {
    pub fn build(timeout: Duration) -> Result<Self> {
        Self::with_base_url(COINGECKO_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base_url(base_url),
            endpoint: CoinGeckoEndpoint::Detail,
        })
    }

    pub fn with_endpoint(mut self, endpoint: CoinGeckoEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// `/coins/{id}` quote, whichever endpoint backs `get_quote`.
    pub async fn get_detail(&self, id: &str) -> FetchResult<CoinQuote> {
        let builder = self.client.get(format!("{}/coins/{}", self.base_url, id));
        let res = get_json(builder.query(&[
            ("localization", "false"),
            ("tickers", "false"),
            ("community_data", "false"),
            ("developer_data", "false"),
        ]))
        .await?;
        debug!("CoinGecko detail response for {}: {:?}", id, res);
        parse_detail(id, &res)
    }

    async fn fetch_simple_price(&self, id: &str) -> FetchResult<CoinQuote> {
        let builder = self.client.get(format!("{}/simple/price", self.base_url));
        let res = get_json(builder.query(&[
            ("ids", id),
            ("vs_currencies", "usd"),
            ("include_24hr_change", "true"),
        ]))
        .await?;
        debug!("CoinGecko simple price response for {}: {:?}", id, res);
        parse_simple_price(id, &res)
    }

    /// Lists the first page of `/coins/markets` in USD.
    pub async fn get_markets(&self, order: &str, per_page: u32) -> FetchResult<Vec<MarketCoin>> {
        let builder = self.client.get(format!("{}/coins/markets", self.base_url));
        let per_page = per_page.to_string();
        let res = get_json(builder.query(&[
            ("vs_currency", "usd"),
            ("order", order),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("sparkline", "false"),
        ]))
        .await?;
        let coins: Vec<MarketCoin> = serde_json::from_value(res)
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
        info!("CoinGecko markets returned {} coins", coins.len());
        Ok(coins)
    }

    /// Every coin CoinGecko lists, in the order the API returns them.
    pub async fn get_coin_list(&self) -> FetchResult<Vec<ListedCoin>> {
        let builder = self.client.get(format!("{}/coins/list", self.base_url));
        let res = get_json(builder.query(&[("include_platform", "false")])).await?;
        let coins: Vec<ListedCoin> = serde_json::from_value(res)
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
        info!("CoinGecko lists {} coins", coins.len());
        Ok(coins)
    }
}

fn parse_detail(id: &str, res: &Value) -> FetchResult<CoinQuote> {
    let market = &res["market_data"];
    let price = number(&market["current_price"]["usd"])
        .filter(|p| *p > 0.0)
        .ok_or(FetchError::FieldMissing("market_data.current_price.usd"))?;
    let volume = number(&market["total_volumes"]["usd"])
        .or_else(|| number(&market["total_volume"]["usd"]))
        .unwrap_or(0.0);

    let symbol = res["symbol"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(id)
        .to_uppercase();
    let mut quote = CoinQuote::new(&symbol, QuoteSource::CoinGecko);
    if let Some(name) = res["name"].as_str().filter(|s| !s.is_empty()) {
        quote.name = name.to_owned();
    }
    quote.price_usd = Some(price);
    quote.price_change_pct_24h = number_or_zero(&market["price_change_percentage_24h"]);
    quote.volume_24h_usd = volume.max(0.0);
    quote.market_cap_usd = number_or_zero(&market["market_cap"]["usd"]).max(0.0);
    Ok(quote)
}

fn parse_simple_price(id: &str, res: &Value) -> FetchResult<CoinQuote> {
    let entry = res
        .get(id)
        .filter(|entry| entry.is_object())
        .ok_or_else(|| FetchError::MalformedPayload(format!("no entry for `{}`", id)))?;
    let price = number(&entry["usd"])
        .filter(|p| *p > 0.0)
        .ok_or(FetchError::FieldMissing("usd"))?;

    let mut quote = CoinQuote::new(&id.to_uppercase(), QuoteSource::CoinGecko);
    quote.name = capitalize(id);
    quote.price_usd = Some(price);
    quote.price_change_pct_24h = number_or_zero(&entry["usd_24h_change"]);
    Ok(quote)
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl QuoteAPI for CoinGeckoAPI {
    async fn get_quote(&self, id: &str) -> Option<CoinQuote> {
        let result = match self.endpoint {
            CoinGeckoEndpoint::Detail => self.get_detail(id).await,
            CoinGeckoEndpoint::SimplePrice => self.fetch_simple_price(id).await,
        };
        no_data_on_err(&self.get_name(), id, result)
    }
}

impl NamedAPI for CoinGeckoAPI {
    fn get_name(&self) -> String {
        "CoinGecko".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_defaults_missing_change_and_volume() {
        let res = json!({
            "id": "pepe",
            "symbol": "pepe",
            "name": "Pepe",
            "market_data": { "current_price": { "usd": 0.0000123 } }
        });
        let quote = parse_detail("pepe", &res).unwrap();
        assert_eq!(quote.symbol, "PEPE");
        assert_eq!(quote.name, "Pepe");
        assert_eq!(quote.price_usd, Some(0.0000123));
        assert_eq!(quote.price_change_pct_24h, 0.0);
        assert_eq!(quote.volume_24h_usd, 0.0);
    }

    #[test]
    fn detail_reads_either_volume_field() {
        let legacy = json!({
            "market_data": {
                "current_price": { "usd": 1.0 },
                "total_volumes": { "usd": 42.0 }
            }
        });
        let live = json!({
            "market_data": {
                "current_price": { "usd": 1.0 },
                "total_volume": { "usd": 43.0 }
            }
        });
        assert_eq!(parse_detail("x", &legacy).unwrap().volume_24h_usd, 42.0);
        assert_eq!(parse_detail("x", &live).unwrap().volume_24h_usd, 43.0);
    }

    #[test]
    fn detail_without_price_is_missing() {
        let res = json!({ "market_data": {} });
        assert!(matches!(
            parse_detail("x", &res),
            Err(FetchError::FieldMissing(_))
        ));
    }

    #[test]
    fn simple_price_names_from_id() {
        let res = json!({ "shiba-inu": { "usd": 0.00002, "usd_24h_change": -3.5 } });
        let quote = parse_simple_price("shiba-inu", &res).unwrap();
        assert_eq!(quote.name, "Shiba-inu");
        assert_eq!(quote.symbol, "SHIBA-INU");
        assert_eq!(quote.price_change_pct_24h, -3.5);
        assert_eq!(quote.volume_24h_usd, 0.0);
        assert!(parse_simple_price("bonk", &res).is_err());
    }
}
