use crate::dashboard::catalog::WidgetCatalog;
use crate::dashboard::view::BoardView;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

pub const LAYOUT_STORAGE_KEY: &str = "dashboard_layout";

/// One persisted widget placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutEntry {
    #[serde(rename = "id")]
    pub widget_id: String,
    #[serde(default)]
    pub minimized: bool,
}

impl LayoutEntry {
    pub fn new(widget_id: &str, minimized: bool) -> Self {
        Self {
            widget_id: widget_id.to_string(),
            minimized,
        }
    }
}

/// Current board order with per-widget flags.
pub fn snapshot(view: &dyn BoardView) -> Vec<LayoutEntry> {
    view.widget_ids()
        .into_iter()
        .map(|id| {
            let minimized = view.is_minimized(&id).unwrap_or(false);
            LayoutEntry {
                widget_id: id,
                minimized,
            }
        })
        .collect()
}

/// Persists the board order and minimized flags under a single key.
pub struct LayoutStore<S: KeyValueStore> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> LayoutStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, LAYOUT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Write the current board layout, reporting whether it reached storage.
    /// Failures are logged.
    pub fn save(&mut self, view: &dyn BoardView) -> bool {
        let entries = snapshot(view);
        let json = match serde_json::to_string(&entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize dashboard layout: {e}");
                return false;
            }
        };
        match self.storage.set(&self.key, &json) {
            Ok(()) => {
                tracing::debug!(widgets = entries.len(), "dashboard layout saved");
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "failed to save dashboard layout: {e}");
                false
            }
        }
    }

    /// Parsed stored layout, `None` when absent or unreadable.
    pub fn stored_entries(&self) -> Option<Vec<LayoutEntry>> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, "failed to read dashboard layout: {e}");
                return None;
            }
        };
        match serde_json::from_str::<Vec<LayoutEntry>>(&raw) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(key = %self.key, "ignoring corrupt dashboard layout: {e}");
                None
            }
        }
    }

    /// Restore the stored layout onto `view`. Returns `false` and leaves the
    /// view untouched when nothing usable is stored.
    pub fn load(&self, view: &mut dyn BoardView, catalog: &WidgetCatalog) -> bool {
        let Some(entries) = self.stored_entries() else {
            return false;
        };
        apply_layout(view, &entries, catalog);
        true
    }

    /// Forget the stored layout.
    pub fn reset(&mut self) {
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, "failed to clear dashboard layout: {e}");
        }
    }
}

/// Make `view` match `entries`. The stored layout wins: nodes it does not
/// mention are removed, and ids it mentions but the view lacks are created
/// when the catalog knows them.
pub fn apply_layout(view: &mut dyn BoardView, entries: &[LayoutEntry], catalog: &WidgetCatalog) {
    for id in view.widget_ids() {
        if !entries.iter().any(|e| e.widget_id == id) {
            view.remove(&id);
        }
    }
    for entry in entries {
        if !view.contains(&entry.widget_id) {
            if !catalog.contains(&entry.widget_id) {
                tracing::debug!(widget = %entry.widget_id, "stored widget has no descriptor; skipped");
                continue;
            }
            view.append(&entry.widget_id);
        }
        view.move_before(&entry.widget_id, None);
        view.set_minimized(&entry.widget_id, entry.minimized);
    }
    view.rebuild_drop_zones();
}
