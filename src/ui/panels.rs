use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::analysis::Axis;
use crate::data::filter::SortKey;
use crate::data::model::Facet;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – search, sort, filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Brews");
    ui.separator();

    let Some(log) = &state.dataset else {
        ui.label("No brew log loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let facet_values = log.facet_values.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Search");
            let mut search = state.search.clone();
            if ui
                .add(egui::TextEdit::singleline(&mut search).hint_text("name, bean, notes…"))
                .changed()
            {
                state.set_search(search);
            }

            ui.strong("Sort by");
            egui::ComboBox::from_id_salt("sort_by")
                .selected_text(state.sort.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for key in SortKey::ALL {
                        if ui.selectable_label(state.sort == key, key.label()).clicked() {
                            state.set_sort(key);
                        }
                    }
                });

            ui.strong("Color by");
            let current = state.color_facet.map(Facet::label).unwrap_or("—");
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    for facet in Facet::ALL {
                        if ui
                            .selectable_label(state.color_facet == Some(facet), facet.label())
                            .clicked()
                        {
                            state.set_color_facet(facet);
                        }
                    }
                });
            if let Some(cm) = &state.color_map {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    for (label, color) in cm.legend_entries() {
                        ui.label(RichText::new(format!("● {label}")).color(color));
                    }
                });
            }
            ui.separator();

            // ---- Per-facet filter widgets (collapsible) ----
            for (facet, all_values) in &facet_values {
                let facet = *facet;
                let n_selected = state.filters.get(&facet).map_or(0, |s| s.len());
                let header_text = format!("{facet}  ({n_selected}/{})", all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(facet.label())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(facet);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(facet);
                            }
                        });

                        for val in all_values {
                            let mut checked = state
                                .filters
                                .get(&facet)
                                .is_some_and(|s| s.contains(val));

                            // Colour swatch if this is the colour facet
                            let mut text = RichText::new(val.to_string());
                            if let Some(cm) = state.color_map.as_ref().filter(|cm| cm.facet == facet) {
                                text = text.color(cm.color_for(val));
                            }

                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(facet, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for axis in Axis::ALL {
            if ui.selectable_label(state.axis == axis, axis.label()).clicked() {
                state.set_axis(axis);
            }
        }

        ui.separator();

        if let Some(log) = &state.dataset {
            ui.label(format!(
                "{} brews loaded, {} visible",
                log.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(analysis) = &state.analysis {
            let (lo, hi) = analysis.band();
            ui.separator();
            ui.label(format!(
                "Target {:.2}  (band {lo:.2} – {hi:.2}, {} rated)",
                analysis.target.target,
                analysis.points.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open brew log")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
