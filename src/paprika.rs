use crate::{
    error::{FetchError, FetchResult},
    http::{build_client, get_json, no_data_on_err, number, number_or_zero, trim_base_url},
    CoinQuote, NamedAPI, QuoteAPI, QuoteSource,
};
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const COINPAPRIKA_URL: &str = "https://api.coinpaprika.com/v1";

/// CoinPaprika tickers, addressed by `symbol-name` slugs such as `btc-bitcoin`.
#[derive(Clone)]
pub struct CoinPaprikaAPI {
    client: Client,
    base_url: String,
}

impl CoinPaprikaAPI {
    pub fn build(timeout: Duration) -> Result<Self> {
        Self::with_base_url(COINPAPRIKA_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base_url(base_url),
        })
    }

    async fn fetch_ticker(&self, slug: &str) -> FetchResult<CoinQuote> {
        let builder = self
            .client
            .get(format!("{}/tickers/{}", self.base_url, slug));
        let res = get_json(builder).await?;
        debug!("CoinPaprika response for {}: {:?}", slug, res);
        parse_ticker(slug, &res)
    }
}

fn parse_ticker(slug: &str, res: &Value) -> FetchResult<CoinQuote> {
    let usd = &res["quotes"]["USD"];
    let price = number(&usd["price"])
        .filter(|p| *p > 0.0)
        .ok_or(FetchError::FieldMissing("quotes.USD.price"))?;

    let symbol = match res["symbol"].as_str().filter(|s| !s.is_empty()) {
        Some(symbol) => symbol.to_uppercase(),
        None => slug.split('-').next().unwrap_or(slug).to_uppercase(),
    };
    let mut quote = CoinQuote::new(&symbol, QuoteSource::CoinPaprika);
    if let Some(name) = res["name"].as_str().filter(|s| !s.is_empty()) {
        quote.name = name.to_owned();
    }
    quote.price_usd = Some(price);
    quote.price_change_pct_24h = number_or_zero(&usd["percent_change_24h"]);
    quote.volume_24h_usd = number_or_zero(&usd["volume_24h"]).max(0.0);
    quote.market_cap_usd = number_or_zero(&usd["market_cap"]).max(0.0);
    Ok(quote)
}

#[async_trait]
impl QuoteAPI for CoinPaprikaAPI {
    async fn get_quote(&self, id: &str) -> Option<CoinQuote> {
        let result = self.fetch_ticker(id).await;
        no_data_on_err(&self.get_name(), id, result)
    }
}

impl NamedAPI for CoinPaprikaAPI {
    fn get_name(&self) -> String {
        "CoinPaprika".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ticker_symbol_falls_back_to_slug() {
        let res = json!({ "quotes": { "USD": { "price": 64000.5 } } });
        let quote = parse_ticker("btc-bitcoin", &res).unwrap();
        assert_eq!(quote.symbol, "BTC");
        assert_eq!(quote.name, "BTC");
        assert_eq!(quote.volume_24h_usd, 0.0);
        assert_eq!(quote.market_cap_usd, 0.0);
    }

    #[test]
    fn ticker_without_usd_quote_is_missing() {
        let res = json!({ "name": "Bitcoin", "symbol": "BTC", "quotes": {} });
        assert!(parse_ticker("btc-bitcoin", &res).is_err());
    }
}
