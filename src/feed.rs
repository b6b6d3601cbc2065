//! Synthetic market data for the dashboard widgets.
//!
//! Widgets never generate prices themselves; they read from a [`FeedCache`]
//! wrapping whatever [`MarketFeed`] the application was built with.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
    pub updated_at: DateTime<Utc>,
}

/// Source of quotes for a fixed set of symbols.
pub trait MarketFeed: Send {
    fn name(&self) -> &str;
    fn poll(&mut self) -> Vec<Quote>;
}

const PRICE_FLOOR: f64 = 0.01;
const MAX_STEP_PCT: f64 = 1.5;

/// Bounded random walk per symbol, reproducible from its seed.
pub struct RandomWalkFeed {
    rng: StdRng,
    symbols: Vec<(String, f64, f64)>,
}

impl RandomWalkFeed {
    pub fn new(symbols: &[String], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let symbols = symbols
            .iter()
            .map(|s| {
                let open = rng.gen_range(20.0..500.0);
                (s.clone(), open, open)
            })
            .collect();
        Self { rng, symbols }
    }
}

impl MarketFeed for RandomWalkFeed {
    fn name(&self) -> &str {
        "random-walk"
    }

    fn poll(&mut self) -> Vec<Quote> {
        let now = Utc::now();
        let mut out = Vec::with_capacity(self.symbols.len());
        for (symbol, open, price) in &mut self.symbols {
            let step = self.rng.gen_range(-MAX_STEP_PCT..=MAX_STEP_PCT) / 100.0;
            *price = (*price * (1.0 + step)).max(PRICE_FLOOR);
            out.push(Quote {
                symbol: symbol.clone(),
                price: *price,
                change_pct: (*price - *open) / *open * 100.0,
                updated_at: now,
            });
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct TimedCache<T> {
    pub data: T,
    pub last_refresh: Option<Instant>,
    pub interval: Duration,
}

impl<T> TimedCache<T> {
    pub fn new(data: T, interval: Duration) -> Self {
        Self {
            data,
            last_refresh: None,
            interval,
        }
    }

    pub fn should_refresh(&self) -> bool {
        self.last_refresh.map_or(true, |at| at.elapsed() >= self.interval)
    }

    pub fn refresh(&mut self, update: impl FnOnce(&mut T)) {
        update(&mut self.data);
        self.last_refresh = Some(Instant::now());
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn invalidate(&mut self) {
        self.last_refresh = None;
    }
}

/// Rate-limits polling of a [`MarketFeed`].
pub struct FeedCache {
    feed: Box<dyn MarketFeed>,
    cache: TimedCache<Vec<Quote>>,
}

impl FeedCache {
    pub fn new(feed: Box<dyn MarketFeed>, interval: Duration) -> Self {
        Self {
            feed,
            cache: TimedCache::new(Vec::new(), interval),
        }
    }

    /// Current quotes, polling the feed first when the interval has elapsed.
    pub fn quotes(&mut self) -> &[Quote] {
        if self.cache.should_refresh() {
            let feed = &mut self.feed;
            self.cache.refresh(|data| *data = feed.poll());
            tracing::trace!(
                feed = self.feed.name(),
                quotes = self.cache.data.len(),
                "feed refreshed"
            );
        }
        &self.cache.data
    }

    /// Last quotes without polling.
    pub fn cached(&self) -> &[Quote] {
        &self.cache.data
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.cache.set_interval(interval);
    }

    pub fn interval(&self) -> Duration {
        self.cache.interval
    }
}
