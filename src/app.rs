use eframe::egui;

use crate::state::AppState;
use crate::ui::{list, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BrewLensApp {
    pub state: AppState,
}

impl BrewLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for BrewLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: brew list / summaries ----
        if self.state.dataset.is_some() {
            egui::TopBottomPanel::bottom("list_panel")
                .default_height(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    list::list_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::rating_plot(ui, &self.state);
        });
    }
}
