use anyhow::{Context, Result};
use itertools::join;
use meme_radar::{
    cache::RadarCache,
    format::{format_change, format_price, format_volume},
    radar::{Radar, Snapshot},
    scanner::{MarketCoin, RankMode},
    scoring::{ScoreLabel, LABEL_THRESHOLDS},
    settings::Settings,
    Category, CoinQuote,
};
use std::time::Duration;

fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = format!("== {} ==\n", snapshot.category);
    for entry in &snapshot.entries {
        let quote = &entry.quote;
        out.push_str(&format!(
            "{} ({}) {} | score {:.1} -> {}\n",
            quote.symbol,
            quote.name,
            format_price(quote.price_usd),
            entry.score.value,
            entry.score.label
        ));
        out.push_str(&format!(
            "    24h {} | volume {} | source {}\n",
            format_change(quote.price_change_pct_24h),
            format_volume(quote.volume_24h_usd),
            quote.source
        ));
        if quote.market_cap_usd > 0.0 {
            out.push_str(&format!("    market cap {}\n", format_volume(quote.market_cap_usd)));
        }
        if let Some(social) = &entry.social {
            let show = |v: Option<f64>| v.map_or_else(|| "N/A".to_owned(), |v| format!("{}", v));
            out.push_str(&format!(
                "    social volume {} | social score {} | alt rank {}\n",
                show(social.social_volume),
                show(social.social_score),
                show(social.alt_rank)
            ));
        }
    }
    for symbol in &snapshot.missing {
        out.push_str(&format!("{}: no data available\n", symbol));
    }
    out
}

fn render_movers(title: &str, movers: &[MarketCoin]) -> String {
    let lines = movers.iter().map(|coin| {
        format!(
            "{} {} | {} | vol {}",
            coin.name,
            format_change(coin.price_change_percentage_24h.unwrap_or(0.0)),
            format_price(coin.current_price),
            format_volume(coin.total_volume.unwrap_or(0.0))
        )
    });
    format!("== {} ==\n{}\n", title, join(lines, "\n"))
}

fn render_candidates(candidates: &[CoinQuote]) -> String {
    let lines = candidates.iter().map(|quote| {
        format!(
            "NEW COIN: {} +{} | {} | vol {}",
            quote.name,
            format_change(quote.price_change_pct_24h),
            format_price(quote.price_usd),
            format_volume(quote.volume_24h_usd)
        )
    });
    format!("== New meme coin scan ==\n{}\n", join(lines, "\n"))
}

fn render_legend() -> String {
    let lines = LABEL_THRESHOLDS
        .iter()
        .map(|(bound, label)| format!("{} ({}+): {}", label, bound, label.meaning()));
    format!(
        "{}\n{} (below {}): {}",
        join(lines, "\n"),
        ScoreLabel::Sell,
        LABEL_THRESHOLDS[LABEL_THRESHOLDS.len() - 1].0,
        ScoreLabel::Sell.meaning()
    )
}

async fn refresh_once(radar: &Radar, cache: &RadarCache, settings: &Settings) {
    let (coins, unknown) = settings.watch_list();
    for symbol in &unknown {
        log::warn!("{} is not a known {} symbol, skipping", symbol, settings.view);
    }
    if cache.is_due(false) {
        let snapshot = radar.refresh(settings.view, &coins).await;
        cache.commit(snapshot);
    }

    match cache.get(settings.view) {
        Some(snapshot) => println!("{}", render_snapshot(&snapshot)),
        None => println!("No {} data available yet.", settings.view),
    }
    if settings.view == Category::Crypto {
        let (title, movers) = match settings.rank_mode {
            RankMode::Gainers => (
                "Top gainers",
                radar.hot_movers(settings.hot_min_change, settings.hot_limit).await,
            ),
            RankMode::Volume => ("Top volume", radar.top_by_volume(settings.hot_limit).await),
        };
        if !movers.is_empty() {
            println!("{}", render_movers(title, &movers));
        }
    } else {
        let candidates = radar.meme_candidates().await;
        if candidates.is_empty() {
            println!("No hot new meme coins found.");
        } else {
            println!("{}", render_candidates(&candidates));
        }
    }
    if let Some(at) = cache.last_refresh() {
        println!("Last updated {}s ago", at.elapsed().as_secs());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = dotenv::dotenv() {
        eprintln!("No .env loaded: {}", error);
    }
    env_logger::init();
    log::info!("Starting meme radar...");

    let settings = Settings::load().context("Loading settings")?;
    let radar = Radar::from_settings(&settings).context("Building radar")?;
    let cache = RadarCache::new(settings.refresh_interval());
    println!("{}\n", render_legend());

    loop {
        refresh_once(&radar, &cache, &settings).await;
        if settings.once {
            break;
        }
        tokio::time::sleep(cache.refresh_interval() + Duration::from_secs(1)).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meme_radar::{radar::RadarEntry, scoring, QuoteSource};

    fn snapshot(market_cap: f64) -> Snapshot {
        let mut quote = CoinQuote::new("BTC", QuoteSource::CoinPaprika);
        quote.name = "Bitcoin".to_owned();
        quote.price_usd = Some(64000.0);
        quote.volume_24h_usd = 3.0e10;
        quote.market_cap_usd = market_cap;
        let score = scoring::score(&quote, Category::Crypto, None).unwrap();
        Snapshot {
            category: Category::Crypto,
            entries: vec![RadarEntry {
                quote,
                social: None,
                score,
            }],
            missing: vec!["ORDI".to_owned()],
        }
    }

    #[test]
    fn card_shows_known_market_cap() {
        let card = render_snapshot(&snapshot(1.25e12));
        assert!(card.contains("market cap $1,250,000,000,000"), "{}", card);
        assert!(card.contains("ORDI: no data available"));
        assert!(!render_snapshot(&snapshot(0.0)).contains("market cap"));
    }
}
