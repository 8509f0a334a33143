use std::collections::BTreeMap;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points, Polygon, VLine};

use crate::analysis::series::brew_point;
use crate::data::model::FacetValue;
use crate::state::AppState;

const BAND_FILL: Color32 = Color32::from_rgba_premultiplied(40, 90, 40, 60);
const TARGET_LINE: Color32 = Color32::from_rgb(90, 200, 90);

// ---------------------------------------------------------------------------
// Rating scatter (central panel)
// ---------------------------------------------------------------------------

/// Render rating vs the active axis with the target band.
pub fn rating_plot(ui: &mut Ui, state: &AppState) {
    let (Some(log), Some(analysis)) = (&state.dataset, &state.analysis) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a brew log to start  (File → Open…)");
        });
        return;
    };

    let axis = analysis.axis;
    let facet = state.color_facet;

    // One series per colour-facet value so the legend lists them.
    let mut series: BTreeMap<FacetValue, Vec<[f64; 2]>> = BTreeMap::new();
    for &idx in &state.visible_indices {
        let Some(brew) = log.brews.get(idx) else {
            continue;
        };
        let Some(point) = brew_point(brew, axis) else {
            continue;
        };
        let key = facet.map(|f| f.value_of(brew)).unwrap_or(FacetValue::Missing);
        series.entry(key).or_default().push([point.x, point.y]);
    }

    let y_top = analysis
        .points
        .iter()
        .map(|p| p.y)
        .fold(10.0_f64, f64::max);
    let (lo, hi) = analysis.band();

    Plot::new("rating_plot")
        .legend(Legend::default())
        .x_axis_label(axis.label())
        .y_axis_label("Rating")
        .include_y(0.0)
        .include_y(y_top)
        .include_x(lo)
        .include_x(hi)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let band = PlotPoints::new(vec![[lo, 0.0], [hi, 0.0], [hi, y_top], [lo, y_top]]);
            plot_ui.polygon(
                Polygon::new(band)
                    .name("Target band")
                    .fill_color(BAND_FILL)
                    .stroke(Stroke::NONE),
            );
            plot_ui.vline(
                VLine::new(analysis.target.target)
                    .name(format!("Target {:.2}", analysis.target.target))
                    .color(TARGET_LINE)
                    .width(2.0),
            );

            for (value, pts) in series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&value))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(pts)
                        .name(value.to_string())
                        .color(color)
                        .radius(4.0),
                );
            }
        });
}
