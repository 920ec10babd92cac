use crate::CoinQuote;
use itertools::Itertools;
use serde::Deserialize;
use std::cmp::Ordering;

/// One row of CoinGecko's `/coins/markets` listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_volume: Option<f64>,
    pub market_cap_rank: Option<u32>,
}

/// One entry of CoinGecko's `/coins/list`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListedCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// How the market listing is ranked in the crypto view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    Gainers,
    Volume,
}

pub const MEME_KEYWORDS: [&str; 10] = [
    "dog", "elon", "shib", "pepe", "cat", "floki", "moon", "inu", "bonk", "wif",
];

pub const MEME_CANDIDATE_MIN_CHANGE: f64 = 50.0;
pub const MEME_CANDIDATE_MIN_VOLUME: f64 = 250_000.0;
/// How many of the most recent listings the new-coin scan looks at.
pub const NEW_COIN_WINDOW: usize = 50;

fn by_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(0.0)
        .partial_cmp(&a.unwrap_or(0.0))
        .unwrap_or(Ordering::Equal)
}

/// Coins whose known 24h change exceeds `min_change`, biggest gainers first.
pub fn hot_movers(coins: &[MarketCoin], min_change: f64, limit: usize) -> Vec<MarketCoin> {
    coins
        .iter()
        .filter(|coin| {
            coin.price_change_percentage_24h
                .map_or(false, |change| change > min_change)
        })
        .sorted_by(|a, b| by_desc(a.price_change_percentage_24h, b.price_change_percentage_24h))
        .take(limit)
        .cloned()
        .collect()
}

pub fn top_by_volume(coins: &[MarketCoin], limit: usize) -> Vec<MarketCoin> {
    coins
        .iter()
        .sorted_by(|a, b| by_desc(a.total_volume, b.total_volume))
        .take(limit)
        .cloned()
        .collect()
}

/// The last `count` listings; CoinGecko appends new coins to the end.
pub fn newest(coins: &[ListedCoin], count: usize) -> &[ListedCoin] {
    &coins[coins.len().saturating_sub(count)..]
}

pub fn has_meme_name(name: &str) -> bool {
    let name = name.to_lowercase();
    MEME_KEYWORDS.iter().any(|word| name.contains(word))
}

/// A new coin worth flagging: meme-sounding name, a large jump and more than
/// trivial volume.
pub fn is_meme_candidate(name: &str, change: f64, volume: f64) -> bool {
    has_meme_name(name)
        && change >= MEME_CANDIDATE_MIN_CHANGE
        && volume > MEME_CANDIDATE_MIN_VOLUME
}

pub fn meme_candidates(quotes: &[CoinQuote]) -> Vec<CoinQuote> {
    quotes
        .iter()
        .filter(|quote| {
            is_meme_candidate(&quote.name, quote.price_change_pct_24h, quote.volume_24h_usd)
        })
        .cloned()
        .collect()
}
