use std::path::PathBuf;

use brew_lens::app::BrewLensApp;
use brew_lens::config::{self, AnalysisConfig};
use brew_lens::state::AppState;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config_path = config::default_path();
    let config = config::load(&config_path).unwrap_or_else(|e| {
        log::error!("Failed to load config: {e:#}; using defaults");
        AnalysisConfig::default()
    });

    let mut state = AppState::new(config);
    // Optional brew log to open at start.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.open_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Brew Lens – Brew Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(BrewLensApp::new(state)))),
    )
}
