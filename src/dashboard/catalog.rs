use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WidgetSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl WidgetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetSize::Small => "small",
            WidgetSize::Medium => "medium",
            WidgetSize::Large => "large",
        }
    }

    /// Preferred body height in points for the GUI.
    pub fn body_height(&self) -> f32 {
        match self {
            WidgetSize::Small => 60.0,
            WidgetSize::Medium => 120.0,
            WidgetSize::Large => 200.0,
        }
    }
}

/// Static description of a widget the dashboard can host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDescriptor {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    pub size: WidgetSize,
    pub category: String,
    pub component_name: String,
}

impl WidgetDescriptor {
    pub fn new(id: &str, title: &str, icon: &str, component_name: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            description: String::new(),
            size: WidgetSize::default(),
            category: "general".to_string(),
            component_name: component_name.to_string(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_size(mut self, size: WidgetSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }
}

/// Registry of available widgets, kept in registration order so the picker
/// lists them the way they were declared.
#[derive(Debug, Clone, Default)]
pub struct WidgetCatalog {
    entries: Vec<WidgetDescriptor>,
    index: HashMap<String, usize>,
    defaults: Vec<String>,
}

impl WidgetCatalog {
    pub fn with_defaults() -> Self {
        let mut cat = Self::default();
        cat.register_default(
            WidgetDescriptor::new("portfolio-summary", "Portfolio Summary", "💼", "PortfolioSummary")
                .with_description("Total value, daily change and cash balance.")
                .with_size(WidgetSize::Large)
                .with_category("portfolio"),
        );
        cat.register_default(
            WidgetDescriptor::new("watchlist", "Watchlist", "👁", "Watchlist")
                .with_description("Quotes for the symbols you follow.")
                .with_size(WidgetSize::Medium)
                .with_category("market"),
        );
        cat.register_default(
            WidgetDescriptor::new("market-overview", "Market Overview", "📈", "MarketOverview")
                .with_description("Top movers across the tracked instruments.")
                .with_size(WidgetSize::Medium)
                .with_category("market"),
        );
        cat.register_default(
            WidgetDescriptor::new(
                "recent-transactions",
                "Recent Transactions",
                "🧾",
                "RecentTransactions",
            )
            .with_description("Latest simulated fills and transfers.")
            .with_size(WidgetSize::Medium)
            .with_category("portfolio"),
        );
        cat.register(
            WidgetDescriptor::new("quick-trade", "Quick Trade", "⚡", "QuickTrade")
                .with_description("Simulated order ticket.")
                .with_size(WidgetSize::Small)
                .with_category("trading"),
        );
        cat.register(
            WidgetDescriptor::new("news-feed", "News Feed", "📰", "NewsFeed")
                .with_description("Headlines related to your holdings.")
                .with_size(WidgetSize::Medium)
                .with_category("research"),
        );
        cat.register(
            WidgetDescriptor::new(
                "economic-calendar",
                "Economic Calendar",
                "📅",
                "EconomicCalendar",
            )
            .with_description("Upcoming macro releases.")
            .with_size(WidgetSize::Small)
            .with_category("research"),
        );
        cat
    }

    /// Register a descriptor. Re-registering an id replaces the descriptor in
    /// place and keeps its position.
    pub fn register(&mut self, descriptor: WidgetDescriptor) {
        if let Some(&idx) = self.index.get(&descriptor.id) {
            self.entries[idx] = descriptor;
            return;
        }
        self.index.insert(descriptor.id.clone(), self.entries.len());
        self.entries.push(descriptor);
    }

    /// Register a descriptor that is also part of the default layout.
    pub fn register_default(&mut self, descriptor: WidgetDescriptor) {
        let id = descriptor.id.clone();
        self.register(descriptor);
        if !self.defaults.contains(&id) {
            self.defaults.push(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&WidgetDescriptor> {
        self.index.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn descriptors(&self) -> &[WidgetDescriptor] {
        &self.entries
    }

    pub fn by_category(&self, category: &str) -> Vec<&WidgetDescriptor> {
        self.entries
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for d in &self.entries {
            if !out.contains(&d.category) {
                out.push(d.category.clone());
            }
        }
        out
    }

    /// Widget ids shown before the user customizes anything.
    pub fn default_layout(&self) -> Vec<String> {
        self.defaults.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_registered_in_order() {
        let cat = WidgetCatalog::with_defaults();
        let ids: Vec<&str> = cat.descriptors().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids[0], "portfolio-summary");
        assert_eq!(ids[1], "watchlist");
        assert_eq!(
            cat.default_layout(),
            vec![
                "portfolio-summary",
                "watchlist",
                "market-overview",
                "recent-transactions"
            ]
        );
        for id in cat.default_layout() {
            assert!(cat.contains(&id));
        }
    }

    #[test]
    fn reregister_replaces_in_place() {
        let mut cat = WidgetCatalog::default();
        cat.register(WidgetDescriptor::new("a", "A", "", "A"));
        cat.register(WidgetDescriptor::new("b", "B", "", "B"));
        cat.register(WidgetDescriptor::new("a", "Alpha", "", "A"));
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.descriptors()[0].title, "Alpha");
        assert_eq!(cat.get("a").map(|d| d.title.as_str()), Some("Alpha"));
    }

    #[test]
    fn filters_by_category() {
        let cat = WidgetCatalog::with_defaults();
        let market: Vec<&str> = cat
            .by_category("market")
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(market, vec!["watchlist", "market-overview"]);
        assert!(cat.categories().contains(&"research".to_string()));
        assert!(cat.get("missing").is_none());
    }

    #[test]
    fn new_descriptor_is_medium_general() {
        let d = WidgetDescriptor::new("x", "X", "", "X");
        assert_eq!(d.size, WidgetSize::Medium);
        assert_eq!(d.size.as_str(), "medium");
        assert_eq!(d.category, "general");
    }
}
