use crate::{CoinQuote, NamedAPI, QuoteAPI};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub trait NamedQuoteAPI: NamedAPI + QuoteAPI + Send + Sync {}
impl<T: NamedAPI + QuoteAPI + Send + Sync> NamedQuoteAPI for T {}

/// An adapter endpoint a fallback chain can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "coingecko")]
    CoinGecko,
    #[serde(rename = "coingecko-simple")]
    CoinGeckoSimple,
    #[serde(rename = "dexscreener-pair")]
    DexScreenerPair,
    #[serde(rename = "dexscreener-search")]
    DexScreenerSearch,
    #[serde(rename = "coinpaprika")]
    CoinPaprika,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::CoinGecko => "coingecko",
            Provider::CoinGeckoSimple => "coingecko-simple",
            Provider::DexScreenerPair => "dexscreener-pair",
            Provider::DexScreenerSearch => "dexscreener-search",
            Provider::CoinPaprika => "coinpaprika",
        };
        f.write_str(name)
    }
}

/// One step of a fallback chain: which provider to ask, and under what id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStep {
    pub provider: Provider,
    pub id: String,
}

impl ChainStep {
    pub fn new(provider: Provider, id: &str) -> Self {
        Self {
            provider,
            id: id.to_owned(),
        }
    }
}

/// Walks a per-coin chain of providers until one yields a priced quote.
#[derive(Default)]
pub struct FallbackResolver {
    apis: HashMap<Provider, Box<dyn NamedQuoteAPI>>,
}

impl FallbackResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Provider, api: Box<dyn NamedQuoteAPI>) {
        self.apis.insert(provider, api);
    }

    pub fn with(mut self, provider: Provider, api: Box<dyn NamedQuoteAPI>) -> Self {
        self.register(provider, api);
        self
    }

    /// The returned quote carries `symbol`, whatever ticker the provider used.
    pub async fn resolve(&self, symbol: &str, chain: &[ChainStep]) -> Option<CoinQuote> {
        for step in chain {
            let api = match self.apis.get(&step.provider) {
                Some(api) => api,
                None => {
                    warn!("{}: no adapter registered for {}", symbol, step.provider);
                    continue;
                }
            };
            match api.get_quote(&step.id).await {
                Some(mut quote) if quote.has_price() => {
                    info!("{}: quoted by {}", symbol, api.get_name());
                    quote.symbol = symbol.to_owned();
                    return Some(quote);
                }
                _ => debug!("{}: {} had no data for {}", symbol, api.get_name(), step.id),
            }
        }
        warn!("{}: every provider in the chain failed", symbol);
        None
    }
}
