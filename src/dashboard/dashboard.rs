use crate::dashboard::catalog::{WidgetCatalog, WidgetDescriptor};
use crate::dashboard::drag::{DragController, DropEffect, DropOutcome, DropTarget};
use crate::dashboard::layout::LayoutStore;
use crate::dashboard::view::BoardView;
use crate::storage::KeyValueStore;

/// Synchronous yes/no gate for destructive actions.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Owns the board view, its persistence and the drag state.
pub struct Dashboard<V: BoardView, S: KeyValueStore> {
    view: V,
    store: LayoutStore<S>,
    drag: DragController,
    catalog: WidgetCatalog,
    initialized: bool,
    // Set by user customizations, cleared once the layout is written or reset.
    dirty: bool,
}

impl<V: BoardView, S: KeyValueStore> Dashboard<V, S> {
    pub fn new(view: V, storage: S, catalog: WidgetCatalog) -> Self {
        Self::with_store(view, LayoutStore::new(storage), catalog)
    }

    pub fn with_store(view: V, store: LayoutStore<S>, catalog: WidgetCatalog) -> Self {
        Self {
            view,
            store,
            drag: DragController::new(),
            catalog,
            initialized: false,
            dirty: false,
        }
    }

    /// Restore any persisted layout over the default one.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        if self.store.load(&mut self.view, &self.catalog) {
            tracing::info!(widgets = self.view.len(), "restored saved dashboard layout");
        } else {
            self.view.rebuild_drop_zones();
            tracing::info!(widgets = self.view.len(), "using default dashboard layout");
        }
        self.initialized = true;
    }

    /// Cancel any drag in flight and flush unsaved customizations.
    ///
    /// An untouched or freshly reset board is never written, so the stored
    /// key only exists after the user changed something.
    pub fn teardown(&mut self) {
        if !self.initialized {
            return;
        }
        if self.drag.is_dragging() {
            self.drag.on_drag_end(&mut self.view);
        }
        if self.dirty {
            self.persist();
        }
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True while a customization has not reached the store.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    fn persist(&mut self) {
        self.dirty = !self.store.save(&self.view);
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn catalog(&self) -> &WidgetCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &LayoutStore<S> {
        &self.store
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn on_drag_start(&mut self, widget_id: &str) -> bool {
        self.drag.on_drag_start(&mut self.view, widget_id)
    }

    pub fn on_drag_over(&mut self, target: DropTarget) -> DropEffect {
        self.drag.on_drag_over(&mut self.view, target)
    }

    pub fn on_drop(&mut self, target: DropTarget) -> DropOutcome {
        let outcome = self.drag.on_drop(&mut self.view, target);
        if let DropOutcome::Moved { .. } = outcome {
            self.dirty = true;
            self.persist();
        }
        outcome
    }

    pub fn on_drag_end(&mut self) {
        self.drag.on_drag_end(&mut self.view);
    }

    /// Flip the minimized flag, returning the new state.
    pub fn toggle_minimized(&mut self, widget_id: &str) -> Option<bool> {
        let minimized = !self.view.is_minimized(widget_id)?;
        self.view.set_minimized(widget_id, minimized);
        self.dirty = true;
        self.persist();
        Some(minimized)
    }

    pub fn remove_widget(&mut self, widget_id: &str, prompt: &mut dyn ConfirmPrompt) -> bool {
        if !self.view.contains(widget_id) {
            return false;
        }
        let title = self
            .catalog
            .get(widget_id)
            .map(|d| d.title.as_str())
            .unwrap_or(widget_id);
        if !prompt.confirm(&format!("Remove the '{title}' widget from the dashboard?")) {
            return false;
        }
        if self.drag.session().map(|s| s.widget_id.as_str()) == Some(widget_id) {
            self.drag.on_drag_end(&mut self.view);
        }
        self.view.remove(widget_id);
        self.view.rebuild_drop_zones();
        self.dirty = true;
        self.persist();
        tracing::info!(widget = %widget_id, "widget removed");
        true
    }

    /// Append a placeholder for a catalog widget at the end of the board.
    pub fn add_widget(&mut self, widget_id: &str) -> bool {
        if !self.catalog.contains(widget_id) {
            tracing::warn!(widget = %widget_id, "cannot add widget missing from catalog");
            return false;
        }
        if !self.view.append(widget_id) {
            return false;
        }
        self.view.rebuild_drop_zones();
        self.dirty = true;
        self.persist();
        tracing::info!(widget = %widget_id, "widget added");
        true
    }

    /// Clear the stored layout and re-render the default one.
    pub fn reset(&mut self, prompt: &mut dyn ConfirmPrompt) -> bool {
        if !prompt.confirm("Reset the dashboard to its default layout?") {
            return false;
        }
        if self.drag.is_dragging() {
            self.drag.on_drag_end(&mut self.view);
        }
        self.store.reset();
        self.dirty = false;
        self.view.clear();
        for id in self.catalog.default_layout() {
            self.view.append(&id);
        }
        self.view.rebuild_drop_zones();
        tracing::info!("dashboard layout reset");
        true
    }

    /// Widgets from the catalog that are not on the board yet.
    pub fn available_widgets(&self) -> Vec<&WidgetDescriptor> {
        self.catalog
            .descriptors()
            .iter()
            .filter(|d| !self.view.contains(&d.id))
            .collect()
    }
}
