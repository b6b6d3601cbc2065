use eframe::egui;
use market_dashboard::gui::DashboardApp;
use market_dashboard::logging;
use market_dashboard::settings::{Settings, SETTINGS_FILE};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging);
    tracing::debug!(?settings, "settings loaded");

    let app = DashboardApp::from_settings(&settings);
    let (width, height) = settings.window_size.unwrap_or((960.0, 720.0));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Market Dashboard",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
