use crate::{
    cg::{CoinGeckoAPI, CoinGeckoEndpoint},
    dexscreener::{DexLookup, DexScreenerAPI},
    lunarcrush::LunarCrushAPI,
    paprika::CoinPaprikaAPI,
    registry::CoinEntry,
    resolver::{FallbackResolver, Provider},
    http::no_data_on_err,
    scanner::{self, MarketCoin, NEW_COIN_WINDOW},
    scoring::{ScoreResult, ScoreTable},
    settings::Settings,
    Category, CoinQuote, NamedAPI, SocialAPI, SocialMetrics,
};
use anyhow::{Context, Result};
use futures::future;
use log::{debug, info, warn};

pub trait NamedSocialAPI: NamedAPI + SocialAPI + Send + Sync {}
impl<T: NamedAPI + SocialAPI + Send + Sync> NamedSocialAPI for T {}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarEntry {
    pub quote: CoinQuote,
    pub social: Option<SocialMetrics>,
    pub score: ScoreResult,
}

/// Result of one refresh pass, in watch-list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub category: Category,
    pub entries: Vec<RadarEntry>,
    /// Symbols for which every provider came back empty.
    pub missing: Vec<String>,
}

pub struct Radar {
    resolver: FallbackResolver,
    social: Option<Box<dyn NamedSocialAPI>>,
    markets: Option<CoinGeckoAPI>,
    table: ScoreTable,
}

impl Radar {
    pub fn new(resolver: FallbackResolver) -> Self {
        Self {
            resolver,
            social: None,
            markets: None,
            table: ScoreTable::SOCIAL,
        }
    }

    /// Wires every public provider with the timeout from `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = settings.http_timeout();
        let coingecko = CoinGeckoAPI::build(timeout).context("Building CoinGecko client")?;
        let dexscreener = DexScreenerAPI::build(timeout).context("Building DexScreener client")?;
        let resolver = FallbackResolver::new()
            .with(Provider::CoinGecko, Box::new(coingecko.clone()))
            .with(
                Provider::CoinGeckoSimple,
                Box::new(coingecko.clone().with_endpoint(CoinGeckoEndpoint::SimplePrice)),
            )
            .with(
                Provider::DexScreenerPair,
                Box::new(dexscreener.clone().with_lookup(DexLookup::Pair)),
            )
            .with(
                Provider::DexScreenerSearch,
                Box::new(dexscreener.with_lookup(DexLookup::Search)),
            )
            .with(
                Provider::CoinPaprika,
                Box::new(CoinPaprikaAPI::build(timeout).context("Building CoinPaprika client")?),
            );

        let mut radar = Self::new(resolver).with_markets(coingecko);
        match settings.lunarcrush_api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => {
                let api = LunarCrushAPI::with_key(key, timeout)
                    .context("Building LunarCrush client")?;
                radar = radar.with_social(Box::new(api));
            }
            None => info!("No LunarCrush key configured, social metrics disabled"),
        }
        Ok(radar)
    }

    pub fn with_social(mut self, social: Box<dyn NamedSocialAPI>) -> Self {
        self.social = Some(social);
        self
    }

    pub fn with_markets(mut self, markets: CoinGeckoAPI) -> Self {
        self.markets = Some(markets);
        self
    }

    pub fn with_table(mut self, table: ScoreTable) -> Self {
        self.table = table;
        self
    }

    /// Fetches, scores and collects every coin. Coins are fetched
    /// concurrently; the snapshot keeps the order of `coins`.
    pub async fn refresh(&self, category: Category, coins: &[CoinEntry]) -> Snapshot {
        let pending = coins.iter().map(|coin| self.fetch_coin(coin));
        let results = future::join_all(pending).await;

        let mut snapshot = Snapshot {
            category,
            entries: vec![],
            missing: vec![],
        };
        for (coin, entry) in coins.iter().zip(results) {
            match entry {
                Some(entry) => snapshot.entries.push(entry),
                None => snapshot.missing.push(coin.symbol.clone()),
            }
        }
        info!(
            "{} refresh: {} quoted, {} without data",
            category,
            snapshot.entries.len(),
            snapshot.missing.len()
        );
        snapshot
    }

    async fn fetch_coin(&self, coin: &CoinEntry) -> Option<RadarEntry> {
        let social = async {
            match &self.social {
                Some(api) => api.get_social(&coin.symbol).await,
                None => None,
            }
        };
        let (quote, social) =
            future::join(self.resolver.resolve(&coin.symbol, &coin.chain), social).await;
        let quote = quote?;
        let score = self.table.score(&quote, coin.category, social.as_ref())?;
        Some(RadarEntry {
            quote,
            social,
            score,
        })
    }

    /// Biggest 24h gainers among the top coins by market cap.
    pub async fn hot_movers(&self, min_change: f64, limit: usize) -> Vec<MarketCoin> {
        match self.markets(500).await {
            Some(coins) => scanner::hot_movers(&coins, min_change, limit),
            None => vec![],
        }
    }

    /// Highest 24h volume among the top coins by market cap.
    pub async fn top_by_volume(&self, limit: usize) -> Vec<MarketCoin> {
        match self.markets(500).await {
            Some(coins) => scanner::top_by_volume(&coins, limit),
            None => vec![],
        }
    }

    /// Looks through the newest CoinGecko listings for meme-named coins that
    /// jumped at least 50% on real volume. Only meme-named listings are
    /// fetched in detail.
    pub async fn meme_candidates(&self) -> Vec<CoinQuote> {
        let api = match &self.markets {
            Some(api) => api,
            None => return vec![],
        };
        let listed = match api.get_coin_list().await {
            Ok(listed) => listed,
            Err(error) => {
                warn!("CoinGecko coin list unavailable: {}", error);
                return vec![];
            }
        };
        let details = scanner::newest(&listed, NEW_COIN_WINDOW)
            .iter()
            .filter(|coin| scanner::has_meme_name(&coin.name))
            .map(|coin| async move {
                no_data_on_err(&api.get_name(), &coin.id, api.get_detail(&coin.id).await)
            });
        let quotes: Vec<CoinQuote> = future::join_all(details)
            .await
            .into_iter()
            .flatten()
            .collect();
        debug!("New coin scan: {} meme-named listings quoted", quotes.len());
        scanner::meme_candidates(&quotes)
    }

    async fn markets(&self, per_page: u32) -> Option<Vec<MarketCoin>> {
        let api = self.markets.as_ref()?;
        match api.get_markets("market_cap_desc", per_page).await {
            Ok(coins) => Some(coins),
            Err(error) => {
                warn!("CoinGecko markets unavailable: {}", error);
                None
            }
        }
    }
}
