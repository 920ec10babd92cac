use crate::{radar::Snapshot, Category};
use log::{info, warn};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

/// Last-known-good snapshots per category, owned by the presentation layer.
///
/// A refresh only replaces what is stored when it produced at least one
/// quote, so a provider outage keeps the previous cards on screen.
pub struct RadarCache {
    state: Mutex<CacheState>,
    refresh_interval: Duration,
}

struct CacheState {
    snapshots: HashMap<Category, Arc<Snapshot>>,
    last_refresh: Option<Instant>,
}

impl RadarCache {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                snapshots: HashMap::new(),
                last_refresh: None,
            }),
            refresh_interval,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Whether a refresh should run now.
    pub fn is_due(&self, manual: bool) -> bool {
        if manual {
            return true;
        }
        match self.state.lock().last_refresh {
            Some(at) => at.elapsed() > self.refresh_interval,
            None => true,
        }
    }

    /// Stores `snapshot` unless it is empty. Returns whether it was stored.
    pub fn commit(&self, snapshot: Snapshot) -> bool {
        self.commit_at(snapshot, Instant::now())
    }

    pub(crate) fn commit_at(&self, snapshot: Snapshot, now: Instant) -> bool {
        if snapshot.entries.is_empty() {
            warn!(
                "{}: refresh returned no quotes, keeping last known data",
                snapshot.category
            );
            return false;
        }
        info!(
            "{}: storing {} quotes ({} without data)",
            snapshot.category,
            snapshot.entries.len(),
            snapshot.missing.len()
        );
        let mut state = self.state.lock();
        state.snapshots.insert(snapshot.category, Arc::new(snapshot));
        state.last_refresh = Some(now);
        true
    }

    pub fn get(&self, category: Category) -> Option<Arc<Snapshot>> {
        self.state.lock().snapshots.get(&category).cloned()
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.state.lock().last_refresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{radar::RadarEntry, scoring, CoinQuote, QuoteSource};

    fn entry(symbol: &str, price: f64) -> RadarEntry {
        let mut quote = CoinQuote::new(symbol, QuoteSource::CoinPaprika);
        quote.price_usd = Some(price);
        let score = scoring::score(&quote, Category::Crypto, None).unwrap();
        RadarEntry {
            quote,
            social: None,
            score,
        }
    }

    fn snapshot(entries: Vec<RadarEntry>, missing: &[&str]) -> Snapshot {
        Snapshot {
            category: Category::Crypto,
            entries,
            missing: missing.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn empty_refresh_keeps_last_known_good() {
        let cache = RadarCache::new(Duration::from_secs(60));
        assert!(cache.commit(snapshot(vec![entry("BTC", 64000.0)], &[])));
        let stamped = cache.last_refresh();

        assert!(!cache.commit(snapshot(vec![], &["BTC"])));
        let kept = cache.get(Category::Crypto).unwrap();
        assert_eq!(kept.entries[0].quote.symbol, "BTC");
        assert_eq!(kept.entries[0].quote.price_usd, Some(64000.0));
        assert_eq!(cache.last_refresh(), stamped);
    }

    #[test]
    fn non_empty_refresh_replaces() {
        let cache = RadarCache::new(Duration::from_secs(60));
        cache.commit(snapshot(vec![entry("BTC", 1.0)], &[]));
        cache.commit(snapshot(vec![entry("ETH", 2.0)], &["BTC"]));
        let stored = cache.get(Category::Crypto).unwrap();
        assert_eq!(stored.entries.len(), 1);
        assert_eq!(stored.entries[0].quote.symbol, "ETH");
        assert_eq!(stored.missing, vec!["BTC".to_owned()]);
        assert!(cache.get(Category::Meme).is_none());
    }

    #[test]
    fn due_when_never_refreshed_or_stale() {
        let cache = RadarCache::new(Duration::from_secs(60));
        assert!(cache.is_due(false));

        cache.commit(snapshot(vec![entry("BTC", 1.0)], &[]));
        assert!(!cache.is_due(false));
        assert!(cache.is_due(true));

        let stale = Instant::now()
            .checked_sub(Duration::from_secs(120))
            .unwrap_or_else(Instant::now);
        cache.commit_at(snapshot(vec![entry("BTC", 1.0)], &[]), stale);
        if stale.elapsed() > Duration::from_secs(60) {
            assert!(cache.is_due(false));
        }
    }
}
