use crate::{
    registry::{self, CoinEntry},
    scanner::RankMode,
    Category,
};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

const MIN_REFRESH_MINS: u64 = 5;
const MAX_REFRESH_MINS: u64 = 60;

/// Runtime settings, layered from defaults, an optional `Radar.toml` (or
/// `.json`) and `RADAR_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_view")]
    pub view: Category,
    #[serde(default = "default_refresh_interval_mins")]
    pub refresh_interval_mins: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub lunarcrush_api_key: Option<String>,
    /// Symbols to watch instead of the default selection; a list, or a comma
    /// separated string when set from the environment.
    #[serde(default, deserialize_with = "symbol_list")]
    pub coins: Option<Vec<String>>,
    /// Coins outside the built-in registry, with their own fallback chains.
    #[serde(default)]
    pub custom_coins: Vec<CoinEntry>,
    #[serde(default = "default_hot_min_change")]
    pub hot_min_change: f64,
    #[serde(default = "default_hot_limit")]
    pub hot_limit: usize,
    /// Ranking of the market listing shown with the crypto view.
    #[serde(default = "default_rank_mode")]
    pub rank_mode: RankMode,
    #[serde(default)]
    pub once: bool,
}

fn default_view() -> Category {
    Category::Meme
}

fn default_refresh_interval_mins() -> u64 {
    30
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_hot_min_change() -> f64 {
    3.0
}

fn default_hot_limit() -> usize {
    10
}

fn default_rank_mode() -> RankMode {
    RankMode::Gainers
}

fn symbol_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Symbols {
        List(Vec<String>),
        Csv(String),
    }

    let symbols = match Option::<Symbols>::deserialize(deserializer)? {
        Some(Symbols::List(list)) => list,
        Some(Symbols::Csv(csv)) => csv.split(',').map(str::to_owned).collect(),
        None => return Ok(None),
    };
    let symbols: Vec<String> = symbols
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    Ok(if symbols.is_empty() { None } else { Some(symbols) })
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view: default_view(),
            refresh_interval_mins: default_refresh_interval_mins(),
            http_timeout_secs: default_http_timeout_secs(),
            lunarcrush_api_key: None,
            coins: None,
            custom_coins: vec![],
            hot_min_change: default_hot_min_change(),
            hot_limit: default_hot_limit(),
            rank_mode: default_rank_mode(),
            once: false,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let mut cfg = Config::default();
        cfg.merge(File::with_name("Radar").required(false))
            .context("Reading Radar config file")?;
        cfg.merge(Environment::with_prefix("RADAR"))
            .context("Reading RADAR_* environment")?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: Config) -> Result<Self> {
        cfg.try_into().context("Parsing radar settings")
    }

    /// The refresh interval, kept within 5 to 60 minutes.
    pub fn refresh_interval(&self) -> Duration {
        let mins = self
            .refresh_interval_mins
            .max(MIN_REFRESH_MINS)
            .min(MAX_REFRESH_MINS);
        Duration::from_secs(mins * 60)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    /// Coins to track for the configured view, plus symbols that could not
    /// be resolved against the registry.
    pub fn watch_list(&self) -> (Vec<CoinEntry>, Vec<String>) {
        let (mut entries, unknown) = registry::watch_list(self.view, self.coins.as_deref());
        entries.extend(
            self.custom_coins
                .iter()
                .filter(|coin| coin.category == self.view)
                .cloned(),
        );
        (entries, unknown)
    }
}
