pub mod cache;
pub mod cg;
pub mod dexscreener;
pub mod error;
pub mod format;
pub mod lunarcrush;
pub mod paprika;
pub mod radar;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod scoring;
pub mod settings;

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider that turns a provider-specific coin id into a normalized quote.
///
/// Implementations never surface transport or payload errors: every failure
/// is reported as `None`.
#[async_trait]
pub trait QuoteAPI {
    async fn get_quote(&self, id: &str) -> Option<CoinQuote>;
}

#[async_trait]
pub trait SocialAPI {
    async fn get_social(&self, symbol: &str) -> Option<SocialMetrics>;
}

pub trait NamedAPI {
    fn get_name(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteSource {
    CoinGecko,
    DexScreener,
    CoinPaprika,
    LunarCrushSocial,
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuoteSource::CoinGecko => "CoinGecko",
            QuoteSource::DexScreener => "DexScreener",
            QuoteSource::CoinPaprika => "CoinPaprika",
            QuoteSource::LunarCrushSocial => "LunarCrush",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Meme,
    Crypto,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Meme => f.write_str("Meme Coins"),
            Category::Crypto => f.write_str("Hot Cryptos"),
        }
    }
}

/// Normalized snapshot of a coin's market data at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinQuote {
    pub symbol: String,
    pub name: String,
    /// `None` when no reliable price was found; such a quote is a failed fetch.
    pub price_usd: Option<f64>,
    pub price_change_pct_24h: f64,
    pub volume_24h_usd: f64,
    pub market_cap_usd: f64,
    pub source: QuoteSource,
}

impl CoinQuote {
    pub fn new(symbol: &str, source: QuoteSource) -> Self {
        Self {
            symbol: symbol.to_owned(),
            name: symbol.to_owned(),
            price_usd: None,
            price_change_pct_24h: 0.0,
            volume_24h_usd: 0.0,
            market_cap_usd: 0.0,
            source,
        }
    }

    pub fn has_price(&self) -> bool {
        self.price_usd.is_some()
    }
}

/// Social metrics from LunarCrush. Every field is `None` when unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialMetrics {
    pub social_volume: Option<f64>,
    pub social_score: Option<f64>,
    pub sentiment: Option<f64>,
    pub alt_rank: Option<f64>,
}

impl SocialMetrics {
    pub fn is_empty(&self) -> bool {
        self.social_volume.is_none()
            && self.social_score.is_none()
            && self.sentiment.is_none()
            && self.alt_rank.is_none()
    }
}
