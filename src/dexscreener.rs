use crate::{
    error::{FetchError, FetchResult},
    http::{build_client, get_json, no_data_on_err, number, trim_base_url},
    CoinQuote, NamedAPI, QuoteAPI, QuoteSource,
};
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const DEXSCREENER_URL: &str = "https://api.dexscreener.com";

/// How the id passed to `get_quote` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DexLookup {
    /// A pair address, optionally prefixed by its chain (`solana/8sLb...`).
    Pair,
    /// A ticker symbol, matched exactly against each pair's base token.
    Search,
}

#[derive(Clone)]
pub struct DexScreenerAPI {
    client: Client,
    base_url: String,
    lookup: DexLookup,
}

impl DexScreenerAPI {
    pub fn build(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEXSCREENER_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base_url(base_url),
            lookup: DexLookup::Search,
        })
    }

    pub fn with_lookup(mut self, lookup: DexLookup) -> Self {
        self.lookup = lookup;
        self
    }

    async fn fetch_pair(&self, pair: &str) -> FetchResult<CoinQuote> {
        let builder = self
            .client
            .get(format!("{}/latest/dex/pairs/{}", self.base_url, pair));
        let res = get_json(builder).await?;
        debug!("DexScreener pair response for {}: {:?}", pair, res);
        let entry = if res["pair"].is_object() {
            &res["pair"]
        } else {
            &res["pairs"][0]
        };
        if !entry.is_object() {
            return Err(FetchError::FieldMissing("pair"));
        }
        parse_pair(entry, None)
    }

    async fn search(&self, symbol: &str) -> FetchResult<CoinQuote> {
        let builder = self
            .client
            .get(format!("{}/latest/dex/search", self.base_url));
        let res = get_json(builder.query(&[("q", symbol.to_lowercase())])).await?;
        let pair = first_exact_match(&res, symbol)
            .ok_or_else(|| FetchError::MalformedPayload(format!("no pair for {}", symbol)))?;
        parse_pair(pair, Some(symbol))
    }
}

/// First pair whose base token symbol equals `symbol`, ignoring case.
fn first_exact_match<'a>(res: &'a Value, symbol: &str) -> Option<&'a Value> {
    res["pairs"].as_array()?.iter().find(|pair| {
        pair["baseToken"]["symbol"]
            .as_str()
            .map_or(false, |s| s.eq_ignore_ascii_case(symbol))
    })
}

/// A `priceChange`/`volume` field is either a bare number or keyed by window.
fn daily(value: &Value) -> f64 {
    number(value).or_else(|| number(&value["h24"])).unwrap_or(0.0)
}

fn parse_pair(pair: &Value, requested: Option<&str>) -> FetchResult<CoinQuote> {
    let price = number(&pair["priceUsd"])
        .filter(|p| *p > 0.0)
        .or_else(|| number(&pair["priceNative"]).filter(|p| *p > 0.0))
        .ok_or(FetchError::FieldMissing("priceUsd"))?;

    let base = &pair["baseToken"];
    let symbol = base["symbol"]
        .as_str()
        .filter(|s| !s.is_empty())
        .or(requested)
        .ok_or(FetchError::FieldMissing("baseToken.symbol"))?
        .to_uppercase();
    let mut quote = CoinQuote::new(&symbol, QuoteSource::DexScreener);
    if let Some(name) = base["name"].as_str().filter(|s| !s.is_empty()) {
        quote.name = name.to_owned();
    }
    quote.price_usd = Some(price);
    quote.price_change_pct_24h = daily(&pair["priceChange"]);
    quote.volume_24h_usd = daily(&pair["volume"]).max(0.0);
    quote.market_cap_usd = number(&pair["marketCap"])
        .or_else(|| number(&pair["fdv"]))
        .unwrap_or(0.0)
        .max(0.0);
    Ok(quote)
}

#[async_trait]
impl QuoteAPI for DexScreenerAPI {
    async fn get_quote(&self, id: &str) -> Option<CoinQuote> {
        let result = match self.lookup {
            DexLookup::Pair => self.fetch_pair(id).await,
            DexLookup::Search => self.search(id).await,
        };
        no_data_on_err(&self.get_name(), id, result)
    }
}

impl NamedAPI for DexScreenerAPI {
    fn get_name(&self) -> String {
        "DexScreener".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_skips_symbol_collisions() {
        let res = json!({
            "pairs": [
                { "baseToken": { "symbol": "PEPE2", "name": "Pepe 2.0" }, "priceUsd": "1.0" },
                { "baseToken": { "symbol": "pepe", "name": "Pepe" }, "priceUsd": "0.0000120" },
                { "baseToken": { "symbol": "PEPE", "name": "Pepe Clone" }, "priceUsd": "9.0" }
            ]
        });
        let pair = first_exact_match(&res, "PEPE").unwrap();
        assert_eq!(pair["baseToken"]["name"], "Pepe");
        assert!(first_exact_match(&res, "WIF").is_none());
        assert!(first_exact_match(&json!({ "pairs": null }), "PEPE").is_none());
    }

    #[test]
    fn pair_reads_windowed_fields() {
        let pair = json!({
            "baseToken": { "symbol": "WIF", "name": "dogwifhat" },
            "priceUsd": "2.51",
            "priceChange": { "h1": 0.4, "h24": -7.25 },
            "volume": { "h24": 150000000.5 },
            "fdv": 2500000000u64
        });
        let quote = parse_pair(&pair, None).unwrap();
        assert_eq!(quote.price_usd, Some(2.51));
        assert_eq!(quote.price_change_pct_24h, -7.25);
        assert_eq!(quote.volume_24h_usd, 150000000.5);
        assert_eq!(quote.market_cap_usd, 2500000000.0);
        assert_eq!(quote.source, QuoteSource::DexScreener);
    }

    #[test]
    fn pair_falls_back_to_native_price() {
        let pair = json!({
            "baseToken": { "symbol": "BONK" },
            "priceUsd": "0",
            "priceNative": "0.00000021",
            "priceChange": 12.5,
            "volume": 1000
        });
        let quote = parse_pair(&pair, None).unwrap();
        assert_eq!(quote.price_usd, Some(0.00000021));
        assert_eq!(quote.name, "BONK");
        assert_eq!(quote.price_change_pct_24h, 12.5);
        assert_eq!(quote.volume_24h_usd, 1000.0);
    }

    #[test]
    fn zero_price_is_no_data() {
        let pair = json!({ "baseToken": { "symbol": "MOG" }, "priceUsd": "0" });
        assert!(matches!(
            parse_pair(&pair, None),
            Err(FetchError::FieldMissing("priceUsd"))
        ));
    }
}
