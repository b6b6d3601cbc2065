use crate::dashboard::{
    BoardView, Dashboard, DropTarget, DropZone, LayoutStore, WidgetBoard, WidgetCatalog,
    WidgetDescriptor, WidgetNode,
};
use crate::feed::{FeedCache, Quote, RandomWalkFeed};
use crate::settings::Settings;
use crate::storage::JsonFileStore;
use eframe::egui;

pub type AppDashboard = Dashboard<WidgetBoard, JsonFileStore>;

/// Units held per watched symbol in the simulated portfolio.
const HOLDING_UNITS: f64 = 10.0;
const ZONE_IDLE_HEIGHT: f32 = 4.0;
const ZONE_ACTIVE_HEIGHT: f32 = 18.0;

enum PanelAction {
    DragStarted(String),
    DragStopped,
    ToggleMinimized(String),
    RequestRemove(String),
}

pub struct DashboardApp {
    dashboard: AppDashboard,
    feed: FeedCache,
    confirm_remove: Option<String>,
    confirm_reset: bool,
    picker_open: bool,
}

impl DashboardApp {
    pub fn new(mut dashboard: AppDashboard, feed: FeedCache) -> Self {
        dashboard.init();
        Self {
            dashboard,
            feed,
            confirm_remove: None,
            confirm_reset: false,
            picker_open: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let catalog = WidgetCatalog::with_defaults();
        let board = WidgetBoard::from_ids(catalog.default_layout());
        let store = LayoutStore::with_key(
            JsonFileStore::new(&settings.storage_path),
            &settings.layout_key,
        );
        let feed = FeedCache::new(
            Box::new(RandomWalkFeed::new(&settings.watch_symbols, settings.feed_seed)),
            settings.feed_interval(),
        );
        Self::new(Dashboard::with_store(board, store, catalog), feed)
    }

    pub fn dashboard(&self) -> &AppDashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut AppDashboard {
        &mut self.dashboard
    }

    pub fn request_remove(&mut self, widget_id: &str) {
        if self.dashboard.view().contains(widget_id) {
            self.confirm_remove = Some(widget_id.to_string());
        }
    }

    pub fn pending_remove(&self) -> Option<&str> {
        self.confirm_remove.as_deref()
    }

    /// Answer the open remove confirmation.
    pub fn resolve_remove(&mut self, confirmed: bool) -> bool {
        let Some(id) = self.confirm_remove.take() else {
            return false;
        };
        self.dashboard.remove_widget(&id, &mut |_: &str| confirmed)
    }

    pub fn open_picker(&mut self) {
        self.picker_open = true;
    }

    pub fn picker_open(&self) -> bool {
        self.picker_open
    }

    /// Flush unsaved layout changes before the window closes.
    pub fn shutdown(&mut self) {
        self.confirm_remove = None;
        self.confirm_reset = false;
        self.dashboard.teardown();
    }

    pub fn request_reset(&mut self) {
        self.confirm_reset = true;
    }

    pub fn reset_pending(&self) -> bool {
        self.confirm_reset
    }

    /// Answer the open reset confirmation.
    pub fn resolve_reset(&mut self, confirmed: bool) -> bool {
        if !std::mem::take(&mut self.confirm_reset) {
            return false;
        }
        self.dashboard.reset(&mut |_: &str| confirmed)
    }

    fn title_of(&self, widget_id: &str) -> String {
        self.dashboard
            .catalog()
            .get(widget_id)
            .map(|d| d.title.clone())
            .unwrap_or_else(|| widget_id.to_string())
    }

    /// Render one frame of the whole application.
    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .drag_to_scroll(false)
                .show(ui, |ui| self.board_ui(ui));
        });
        self.picker_ui(ctx);
        self.confirm_ui(ctx);
        ctx.request_repaint_after(self.feed.interval());
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Market Dashboard");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reset layout").clicked() {
                    self.request_reset();
                }
                if ui.button("Add widget").clicked() {
                    self.picker_open = !self.picker_open;
                }
            });
        });
    }

    fn board_ui(&mut self, ui: &mut egui::Ui) {
        let quotes = self.feed.quotes().to_vec();
        let nodes: Vec<WidgetNode> = self.dashboard.view().nodes().to_vec();
        let zones = self.dashboard.view().drop_zones();
        let mut zone_rects: Vec<(usize, egui::Rect)> = Vec::with_capacity(zones.len());
        let mut actions = Vec::new();

        if nodes.is_empty() {
            ui.weak("No widgets on the dashboard. Use \"Add widget\" to place one.");
        }
        for (i, node) in nodes.iter().enumerate() {
            if let Some(zone) = zones.get(i) {
                zone_rects.push((zone.index, drop_strip(ui, zone)));
            }
            let descriptor = self.dashboard.catalog().get(&node.id);
            widget_panel(ui, node, descriptor, &quotes, &mut actions);
        }
        if let Some(zone) = zones.get(nodes.len()) {
            zone_rects.push((zone.index, drop_strip(ui, zone)));
        }

        let target = drop_target_at(ui.ctx().pointer_interact_pos(), &zone_rects);

        for action in actions {
            match action {
                PanelAction::DragStarted(id) => {
                    self.dashboard.on_drag_start(&id);
                }
                PanelAction::DragStopped => {
                    self.dashboard.on_drop(target);
                    self.dashboard.on_drag_end();
                }
                PanelAction::ToggleMinimized(id) => {
                    self.dashboard.toggle_minimized(&id);
                }
                PanelAction::RequestRemove(id) => self.request_remove(&id),
            }
        }

        if self.dashboard.drag().is_dragging() {
            self.dashboard.on_drag_over(target);
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }
    }

    fn picker_ui(&mut self, ctx: &egui::Context) {
        if !self.picker_open {
            return;
        }
        let mut open = true;
        let mut add = None;
        egui::Window::new("Add widget")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                for category in self.dashboard.catalog().categories() {
                    ui.label(egui::RichText::new(&category).strong());
                    for d in self.dashboard.catalog().by_category(&category) {
                        let on_board = self.dashboard.view().contains(&d.id);
                        ui.horizontal(|ui| {
                            ui.label(format!("{} {}", d.icon, d.title));
                            ui.weak(d.size.as_str());
                            if ui
                                .add_enabled(!on_board, egui::Button::new("Add"))
                                .on_disabled_hover_text("Already on the dashboard")
                                .clicked()
                            {
                                add = Some(d.id.clone());
                            }
                        });
                        if !d.description.is_empty() {
                            ui.small(&d.description);
                        }
                    }
                    ui.separator();
                }
            });
        if let Some(id) = add {
            self.dashboard.add_widget(&id);
        }
        self.picker_open = open;
    }

    fn confirm_ui(&mut self, ctx: &egui::Context) {
        if let Some(id) = self.confirm_remove.clone() {
            let title = self.title_of(&id);
            let mut open = true;
            let mut decision = None;
            egui::Window::new("Confirm remove")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(format!("Remove the '{title}' widget from the dashboard?"));
                    ui.horizontal(|ui| {
                        if ui.button("Remove").clicked() {
                            decision = Some(true);
                        }
                        if ui.button("Cancel").clicked() {
                            decision = Some(false);
                        }
                    });
                });
            match decision {
                Some(confirmed) => {
                    self.resolve_remove(confirmed);
                }
                None if !open => {
                    self.resolve_remove(false);
                }
                None => {}
            }
        }

        if self.confirm_reset {
            let mut open = true;
            let mut decision = None;
            egui::Window::new("Confirm reset")
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label("Reset the dashboard to its default layout?");
                    ui.horizontal(|ui| {
                        if ui.button("Reset").clicked() {
                            decision = Some(true);
                        }
                        if ui.button("Cancel").clicked() {
                            decision = Some(false);
                        }
                    });
                });
            match decision {
                Some(confirmed) => {
                    self.resolve_reset(confirmed);
                }
                None if !open => {
                    self.resolve_reset(false);
                }
                None => {}
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}

/// Map the pointer onto the drop strip under it.
pub fn drop_target_at(pointer: Option<egui::Pos2>, zones: &[(usize, egui::Rect)]) -> DropTarget {
    pointer
        .and_then(|pos| zones.iter().find(|(_, rect)| rect.contains(pos)))
        .map(|(index, _)| DropTarget::Zone(*index))
        .unwrap_or(DropTarget::Other)
}

fn drop_strip(ui: &mut egui::Ui, zone: &DropZone) -> egui::Rect {
    let height = if zone.visible {
        ZONE_ACTIVE_HEIGHT
    } else {
        ZONE_IDLE_HEIGHT
    };
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), height),
        egui::Sense::hover(),
    );
    if zone.visible {
        let visuals = ui.visuals();
        let fill = if zone.highlighted {
            visuals.selection.bg_fill
        } else {
            visuals.faint_bg_color
        };
        ui.painter().rect_filled(rect.shrink2(egui::vec2(0.0, 3.0)), 3.0, fill);
    }
    rect
}

fn widget_panel(
    ui: &mut egui::Ui,
    node: &WidgetNode,
    descriptor: Option<&WidgetDescriptor>,
    quotes: &[Quote],
    actions: &mut Vec<PanelAction>,
) {
    let stroke = if node.dragging {
        egui::Stroke::new(2.0, ui.visuals().selection.bg_fill)
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke
    };
    let (icon, title) = descriptor
        .map(|d| (d.icon.as_str(), d.title.as_str()))
        .unwrap_or(("", node.id.as_str()));

    egui::Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            let handle = ui
                .add(egui::Label::new("⠿").sense(egui::Sense::drag()))
                .on_hover_text("Drag to reorder");
            if handle.drag_started() {
                actions.push(PanelAction::DragStarted(node.id.clone()));
            }
            if handle.drag_stopped() {
                actions.push(PanelAction::DragStopped);
            }
            ui.label(egui::RichText::new(format!("{icon} {title}")).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✕").on_hover_text("Remove").clicked() {
                    actions.push(PanelAction::RequestRemove(node.id.clone()));
                }
                let (label, hint) = if node.minimized {
                    ("▢", "Restore")
                } else {
                    ("—", "Minimize")
                };
                if ui.small_button(label).on_hover_text(hint).clicked() {
                    actions.push(PanelAction::ToggleMinimized(node.id.clone()));
                }
            });
        });
        if node.minimized {
            return;
        }
        ui.separator();
        let height = descriptor
            .map(|d| d.size.body_height())
            .unwrap_or(ZONE_ACTIVE_HEIGHT * 3.0);
        ui.set_min_height(height);
        widget_body(ui, node, descriptor, quotes);
    });
}

fn widget_body(
    ui: &mut egui::Ui,
    node: &WidgetNode,
    descriptor: Option<&WidgetDescriptor>,
    quotes: &[Quote],
) {
    let Some(descriptor) = descriptor else {
        ui.weak("This widget is no longer available.");
        return;
    };
    match descriptor.component_name.as_str() {
        "Watchlist" => quote_grid(ui, &node.id, quotes),
        "MarketOverview" => {
            let mut movers: Vec<&Quote> = quotes.iter().collect();
            movers.sort_by(|a, b| b.change_pct.abs().total_cmp(&a.change_pct.abs()));
            movers.truncate(3);
            let movers: Vec<Quote> = movers.into_iter().cloned().collect();
            quote_grid(ui, &node.id, &movers);
        }
        "PortfolioSummary" => {
            let value: f64 = quotes.iter().map(|q| q.price * HOLDING_UNITS).sum();
            let open: f64 = quotes
                .iter()
                .map(|q| q.price / (1.0 + q.change_pct / 100.0) * HOLDING_UNITS)
                .sum();
            let change = value - open;
            ui.label(egui::RichText::new(format!("${value:.2}")).heading());
            ui.colored_label(change_color(change), format!("{change:+.2} today"));
            ui.weak(format!("{} positions", quotes.len()));
        }
        _ => {
            ui.label(&descriptor.description);
            ui.weak("Placeholder widget");
        }
    }
}

fn quote_grid(ui: &mut egui::Ui, id: &str, quotes: &[Quote]) {
    if quotes.is_empty() {
        ui.weak("Waiting for market data…");
        return;
    }
    egui::Grid::new(("quotes", id))
        .striped(true)
        .num_columns(4)
        .show(ui, |ui| {
            for header in ["Symbol", "Price", "Change", "Updated"] {
                ui.label(egui::RichText::new(header).strong());
            }
            ui.end_row();
            for q in quotes {
                ui.label(&q.symbol);
                ui.label(format!("{:.2}", q.price));
                ui.colored_label(change_color(q.change_pct), format!("{:+.2}%", q.change_pct));
                ui.weak(q.updated_at.format("%H:%M:%S").to_string());
                ui.end_row();
            }
        });
}

fn change_color(change: f64) -> egui::Color32 {
    if change >= 0.0 {
        egui::Color32::from_rgb(0x2e, 0xa0, 0x43)
    } else {
        egui::Color32::from_rgb(0xd0, 0x3b, 0x3b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strips() -> Vec<(usize, egui::Rect)> {
        (0..3)
            .map(|i| {
                let top = i as f32 * 100.0;
                let rect = egui::Rect::from_min_max(
                    egui::pos2(0.0, top),
                    egui::pos2(400.0, top + ZONE_ACTIVE_HEIGHT),
                );
                (i, rect)
            })
            .collect()
    }

    #[test]
    fn pointer_over_strip_targets_its_zone() {
        let zones = strips();
        assert_eq!(
            drop_target_at(Some(egui::pos2(50.0, 105.0)), &zones),
            DropTarget::Zone(1)
        );
        assert_eq!(
            drop_target_at(Some(egui::pos2(10.0, 210.0)), &zones),
            DropTarget::Zone(2)
        );
    }

    #[test]
    fn pointer_between_strips_targets_nothing() {
        let zones = strips();
        assert_eq!(
            drop_target_at(Some(egui::pos2(50.0, 60.0)), &zones),
            DropTarget::Other
        );
        assert_eq!(drop_target_at(None, &zones), DropTarget::Other);
        assert_eq!(
            drop_target_at(Some(egui::pos2(50.0, 5.0)), &[]),
            DropTarget::Other
        );
    }
}
