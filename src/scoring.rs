//! Heuristic momentum score for a quote.
//!
//! The score adds up a price-change tier, a volume tier, optional social
//! bonuses and a meme-coin bonus, then maps the total onto one of six labels.
//! Two point tables are kept: [`ScoreTable::SOCIAL`] is the one [`score`]
//! uses, [`ScoreTable::CLASSIC`] is the earlier table without social bonuses.

use crate::{Category, CoinQuote, SocialMetrics};
use std::fmt;

/// `points` are awarded when the input is strictly greater than `above`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub above: f64,
    pub points: f64,
}

const fn tier(above: f64, points: f64) -> Tier {
    Tier { above, points }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocialBonus {
    pub social_score_above: f64,
    pub social_score_points: f64,
    pub social_volume_above: f64,
    pub social_volume_points: f64,
    pub alt_rank_below: f64,
    pub alt_rank_points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTable {
    /// Checked in order; the first matching tier wins.
    pub change_tiers: [Tier; 5],
    pub volume_tiers: [Tier; 4],
    pub social: Option<SocialBonus>,
    /// Meme coins whose running score exceeds this get `meme_bonus` on top.
    pub meme_bonus_above: f64,
    pub meme_bonus: f64,
}

pub const VOLUME_TIERS: [Tier; 4] = [
    tier(1_000_000_000.0, 5.0),
    tier(500_000_000.0, 4.0),
    tier(100_000_000.0, 3.0),
    tier(10_000_000.0, 2.0),
];

impl ScoreTable {
    pub const SOCIAL: ScoreTable = ScoreTable {
        change_tiers: [
            tier(20.0, 10.0),
            tier(10.0, 8.0),
            tier(5.0, 6.0),
            tier(0.0, 4.0),
            tier(-5.0, 2.0),
        ],
        volume_tiers: VOLUME_TIERS,
        social: Some(SocialBonus {
            social_score_above: 60.0,
            social_score_points: 3.0,
            social_volume_above: 10_000.0,
            social_volume_points: 2.0,
            alt_rank_below: 30.0,
            alt_rank_points: 2.0,
        }),
        meme_bonus_above: 9.0,
        meme_bonus: 1.0,
    };

    pub const CLASSIC: ScoreTable = ScoreTable {
        change_tiers: [
            tier(20.0, 9.0),
            tier(10.0, 7.0),
            tier(5.0, 5.0),
            tier(0.0, 3.0),
            tier(-5.0, 1.0),
        ],
        volume_tiers: VOLUME_TIERS,
        social: None,
        meme_bonus_above: 8.0,
        meme_bonus: 1.0,
    };

    /// Scores a quote; `None` when the quote carries no price.
    pub fn score(
        &self,
        quote: &CoinQuote,
        category: Category,
        social: Option<&SocialMetrics>,
    ) -> Option<ScoreResult> {
        quote.price_usd?;

        let mut total = tier_points(&self.change_tiers, finite_or_zero(quote.price_change_pct_24h))
            + tier_points(&self.volume_tiers, finite_or_zero(quote.volume_24h_usd));

        if let (Some(bonus), Some(metrics)) = (self.social.as_ref(), social) {
            if metrics.social_score.map_or(false, |s| s > bonus.social_score_above) {
                total += bonus.social_score_points;
            }
            if metrics.social_volume.map_or(false, |v| v > bonus.social_volume_above) {
                total += bonus.social_volume_points;
            }
            if metrics.alt_rank.map_or(false, |r| r < bonus.alt_rank_below) {
                total += bonus.alt_rank_points;
            }
        }

        if category == Category::Meme && total > self.meme_bonus_above {
            total += self.meme_bonus;
        }

        let value = (total * 10.0).round() / 10.0;
        Some(ScoreResult {
            value,
            label: label_for(value),
        })
    }
}

fn tier_points(tiers: &[Tier], input: f64) -> f64 {
    tiers
        .iter()
        .find(|t| input > t.above)
        .map_or(0.0, |t| t.points)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Scores `quote` with the canonical [`ScoreTable::SOCIAL`] table.
pub fn score(
    quote: &CoinQuote,
    category: Category,
    social: Option<&SocialMetrics>,
) -> Option<ScoreResult> {
    ScoreTable::SOCIAL.score(quote, category, social)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLabel {
    StrongBuy,
    Buy,
    PossibleBuy,
    Hold,
    PossibleSell,
    Sell,
}

/// Inclusive lower bounds, highest first.
pub static LABEL_THRESHOLDS: [(f64, ScoreLabel); 5] = [
    (13.0, ScoreLabel::StrongBuy),
    (10.0, ScoreLabel::Buy),
    (7.0, ScoreLabel::PossibleBuy),
    (4.0, ScoreLabel::Hold),
    (2.0, ScoreLabel::PossibleSell),
];

pub fn label_for(value: f64) -> ScoreLabel {
    LABEL_THRESHOLDS
        .iter()
        .find(|(bound, _)| value >= *bound)
        .map_or(ScoreLabel::Sell, |(_, label)| *label)
}

impl ScoreLabel {
    /// One-line explanation shown next to the legend.
    pub fn meaning(&self) -> &'static str {
        match self {
            ScoreLabel::StrongBuy => "major price, volume and social momentum",
            ScoreLabel::Buy => "high potential to rise further",
            ScoreLabel::PossibleBuy => "trending positively, early movement",
            ScoreLabel::Hold => "stable or unclear signals",
            ScoreLabel::PossibleSell => "weak activity or early dip",
            ScoreLabel::Sell => "negative signals or downtrend",
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ScoreLabel::StrongBuy => "Strong Buy",
            ScoreLabel::Buy => "Buy",
            ScoreLabel::PossibleBuy => "Possible Buy",
            ScoreLabel::Hold => "Hold",
            ScoreLabel::PossibleSell => "Possible Sell",
            ScoreLabel::Sell => "Sell",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub value: f64,
    pub label: ScoreLabel,
}
