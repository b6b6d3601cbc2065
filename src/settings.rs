use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";

fn default_storage_path() -> String {
    "dashboard_storage.json".into()
}

fn default_layout_key() -> String {
    crate::dashboard::layout::LAYOUT_STORAGE_KEY.into()
}

fn default_feed_refresh() -> f32 {
    2.0
}

fn default_feed_seed() -> u64 {
    7
}

fn default_watch_symbols() -> Vec<String> {
    ["AAPL", "MSFT", "NVDA", "AMZN", "BTC-USD", "EUR-USD"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// File backing the local key-value store.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Key under which the widget layout is persisted.
    #[serde(default = "default_layout_key")]
    pub layout_key: String,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Interval in seconds between market feed refreshes.
    #[serde(default = "default_feed_refresh")]
    pub feed_refresh: f32,
    #[serde(default = "default_feed_seed")]
    pub feed_seed: u64,
    #[serde(default = "default_watch_symbols")]
    pub watch_symbols: Vec<String>,
    /// Last known window size. If absent, a default size is used.
    #[serde(default)]
    pub window_size: Option<(f32, f32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            layout_key: default_layout_key(),
            debug_logging: false,
            feed_refresh: default_feed_refresh(),
            feed_seed: default_feed_seed(),
            watch_symbols: default_watch_symbols(),
            window_size: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Feed refresh interval, clamped to something a UI timer can honour.
    pub fn feed_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f32(self.feed_refresh.clamp(0.25, 300.0))
    }
}
