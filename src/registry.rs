use crate::{
    resolver::{ChainStep, Provider},
    Category,
};
use serde::{Deserialize, Serialize};

/// A coin the radar knows how to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownCoin {
    pub symbol: &'static str,
    pub category: Category,
    pub coingecko_id: &'static str,
    pub paprika_slug: &'static str,
}

const fn meme(
    symbol: &'static str,
    coingecko_id: &'static str,
    paprika_slug: &'static str,
) -> KnownCoin {
    KnownCoin {
        symbol,
        category: Category::Meme,
        coingecko_id,
        paprika_slug,
    }
}

const fn major(
    symbol: &'static str,
    coingecko_id: &'static str,
    paprika_slug: &'static str,
) -> KnownCoin {
    KnownCoin {
        symbol,
        category: Category::Crypto,
        coingecko_id,
        paprika_slug,
    }
}

pub static MEME_COINS: [KnownCoin; 15] = [
    meme("PEPE", "pepe", "pepe-pepe"),
    meme("SHIB", "shiba-inu", "shib-shiba-inu"),
    meme("DOGE", "dogecoin", "doge-dogecoin"),
    meme("FLOKI", "floki", "floki-floki-inu"),
    meme("BONK", "bonk", "bonk-bonk"),
    meme("WIF", "dogwifhat", "wif-dogwifcoin"),
    meme("LADYS", "milady-meme-coin", "ladys-milady-meme-coin"),
    meme("TURBO", "turbo", "turbo-turbo"),
    meme("PIT", "pitbull", "pit-pitbull"),
    meme("HOGE", "hoge-finance", "hoge-hoge-finance"),
    meme("SAMO", "samoyedcoin", "samo-samoyedcoin"),
    meme("VOLT", "volt-inu", "volt-volt-inu"),
    meme("MOG", "mog-coin", "mog-mog-coin"),
    meme("BORK", "bork", "bork-bork"),
    meme("KISHU", "kishu-inu", "kishu-kishu-inu"),
];

pub static CRYPTO_COINS: [KnownCoin; 15] = [
    major("BTC", "bitcoin", "btc-bitcoin"),
    major("ETH", "ethereum", "eth-ethereum"),
    major("SOL", "solana", "sol-solana"),
    major("XRP", "ripple", "xrp-xrp"),
    major("ADA", "cardano", "ada-cardano"),
    major("LINK", "chainlink", "link-chainlink"),
    major("TON", "the-open-network", "ton-toncoin"),
    major("ORDI", "ordinals", "ordi-ordi"),
    major("PIXEL", "pixels", "pixel-pixels"),
    major("AVAX", "avalanche-2", "avax-avalanche"),
    major("NEAR", "near", "near-near-protocol"),
    major("MATIC", "matic-network", "matic-polygon"),
    major("APT", "aptos", "apt-aptos"),
    major("OP", "optimism", "op-optimism"),
    major("INJ", "injective-protocol", "inj-injective"),
];

/// How many coins of each list are watched when nothing is configured.
pub const DEFAULT_SELECTION: usize = 6;

/// One tracked coin with its ordered fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinEntry {
    pub symbol: String,
    pub category: Category,
    pub chain: Vec<ChainStep>,
}

impl KnownCoin {
    pub fn entry(&self) -> CoinEntry {
        CoinEntry {
            symbol: self.symbol.to_owned(),
            category: self.category,
            chain: default_chain(self),
        }
    }
}

/// Meme coins are DEX-first, majors are aggregator-first.
pub fn default_chain(coin: &KnownCoin) -> Vec<ChainStep> {
    match coin.category {
        Category::Meme => vec![
            ChainStep::new(Provider::DexScreenerSearch, coin.symbol),
            ChainStep::new(Provider::CoinGeckoSimple, coin.coingecko_id),
        ],
        Category::Crypto => vec![
            ChainStep::new(Provider::CoinPaprika, coin.paprika_slug),
            ChainStep::new(Provider::CoinGeckoSimple, coin.coingecko_id),
            ChainStep::new(Provider::DexScreenerSearch, coin.symbol),
        ],
    }
}

pub fn known_coins(category: Category) -> &'static [KnownCoin] {
    match category {
        Category::Meme => &MEME_COINS,
        Category::Crypto => &CRYPTO_COINS,
    }
}

pub fn lookup(symbol: &str) -> Option<&'static KnownCoin> {
    MEME_COINS
        .iter()
        .chain(CRYPTO_COINS.iter())
        .find(|coin| coin.symbol.eq_ignore_ascii_case(symbol))
}

/// The watch list for `category`: the named symbols when given, otherwise the
/// default selection. Unknown or off-category symbols are returned separately.
pub fn watch_list(
    category: Category,
    symbols: Option<&[String]>,
) -> (Vec<CoinEntry>, Vec<String>) {
    match symbols {
        None => (
            known_coins(category)
                .iter()
                .take(DEFAULT_SELECTION)
                .map(KnownCoin::entry)
                .collect(),
            vec![],
        ),
        Some(symbols) => {
            let mut entries = vec![];
            let mut unknown = vec![];
            for symbol in symbols {
                match lookup(symbol).filter(|coin| coin.category == category) {
                    Some(coin) => entries.push(coin.entry()),
                    None => unknown.push(symbol.to_uppercase()),
                }
            }
            (entries, unknown)
        }
    }
}
