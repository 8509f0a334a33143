use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::catalog::{self, SummarySort};
use crate::data::model::Facet;
use crate::state::{AppState, ListTab};

const ROW_HEIGHT: f32 = 18.0;

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    v.map(|v| format!("{v:.decimals$}")).unwrap_or_else(|| "–".into())
}

// ---------------------------------------------------------------------------
// Bottom panel – brew list and bean / bag summaries
// ---------------------------------------------------------------------------

pub fn list_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.list_tab, ListTab::Brews, "Brews");
        ui.selectable_value(&mut state.list_tab, ListTab::Beans, "Beans");
        ui.selectable_value(&mut state.list_tab, ListTab::Bags, "Bags");
    });
    ui.separator();

    match state.list_tab {
        ListTab::Brews => brew_table(ui, state),
        ListTab::Beans => summary_table(ui, state, Facet::Bean),
        ListTab::Bags => summary_table(ui, state, Facet::Bag),
    }
}

fn brew_table(ui: &mut Ui, state: &AppState) {
    let Some(log) = &state.dataset else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(70.0), 6)
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["Name", "Bean", "Barista", "Dose", "Yield", "Ratio", "Time", "Rating"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let brew = &log.brews[state.visible_indices[row.index()]];
                let cells = [
                    brew.name.clone(),
                    brew.bean.clone().unwrap_or_default(),
                    brew.barista.clone().unwrap_or_default(),
                    fmt_opt(brew.dose, 1),
                    fmt_opt(brew.yield_, 1),
                    fmt_opt(brew.ratio(), 2),
                    fmt_opt(brew.brew_time, 1),
                    fmt_opt(brew.rating, 1),
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

fn summary_table(ui: &mut Ui, state: &mut AppState, facet: Facet) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search");
        ui.text_edit_singleline(&mut state.summary_search);
        egui::ComboBox::from_id_salt("summary_sort")
            .selected_text(state.summary_sort.label())
            .show_ui(ui, |ui: &mut Ui| {
                for key in SummarySort::ALL {
                    ui.selectable_value(&mut state.summary_sort, key, key.label());
                }
            });
    });

    let Some(log) = &state.dataset else {
        return;
    };
    let all = catalog::summarize(log, &state.visible_indices, facet);
    let mut rows = catalog::search(&all, &state.summary_search);
    catalog::sort(&mut rows, state.summary_sort);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(80.0), 6)
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            let titles = [
                facet.label(),
                "Roaster",
                "Roast",
                "Grinder",
                "Brews",
                "Mean",
                "Best",
                "Ratio",
            ];
            for title in titles {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let s = &rows[row.index()];
                let cells = [
                    s.label(),
                    s.roaster.clone().unwrap_or_default(),
                    s.roast_level.map(|l| l.to_string()).unwrap_or_default(),
                    s.grinder.clone().unwrap_or_default(),
                    s.brews.to_string(),
                    fmt_opt(s.mean_rating, 1),
                    fmt_opt(s.best_rating, 1),
                    fmt_opt(s.median_ratio, 2),
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
