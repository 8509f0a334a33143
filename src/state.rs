use std::collections::BTreeSet;
use std::path::Path;

use crate::analysis::series::{Analysis, analyze};
use crate::analysis::Axis;
use crate::color::ColorMap;
use crate::config::AnalysisConfig;
use crate::data::catalog::SummarySort;
use crate::data::filter::{FilterState, SortKey, init_filter_state, visible_indices};
use crate::data::loader::load_file;
use crate::data::model::{BrewLog, Facet, FacetValue};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which list the bottom panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListTab {
    #[default]
    Brews,
    Beans,
    Bags,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AnalysisConfig,

    /// Loaded brew log (None until user loads a file).
    pub dataset: Option<BrewLog>,

    /// Per-facet filter selections.
    pub filters: FilterState,

    /// Free-text brew search.
    pub search: String,

    pub sort: SortKey,

    /// Indices of brews passing the current filters, in sort order (cached).
    pub visible_indices: Vec<usize>,

    /// Brew parameter on the x axis.
    pub axis: Axis,

    /// Points and target for `visible_indices` on `axis` (cached).
    pub analysis: Option<Analysis>,

    /// Which facet is used for colouring.
    pub color_facet: Option<Facet>,

    pub color_map: Option<ColorMap>,

    pub list_tab: ListTab,
    pub summary_search: String,
    pub summary_sort: SummarySort,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            axis: config.default_axis,
            config,
            dataset: None,
            filters: FilterState::default(),
            search: String::new(),
            sort: SortKey::default(),
            visible_indices: Vec::new(),
            analysis: None,
            color_facet: None,
            color_map: None,
            list_tab: ListTab::default(),
            summary_search: String::new(),
            summary_sort: SummarySort::default(),
            status_message: None,
        }
    }

    /// Load `path` and, on success, replace the current dataset.
    pub fn open_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(brews) => {
                if brews.is_empty() {
                    log::warn!("{} contains no brews", path.display());
                }
                log::info!("Loaded {} brews from {}", brews.len(), path.display());
                self.set_dataset(brews);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded log, initialise filters and colour.
    pub fn set_dataset(&mut self, log: BrewLog) {
        self.filters = init_filter_state(&log);
        self.color_facet = Some(Facet::Bean);
        self.color_map = log
            .facet_values
            .get(&Facet::Bean)
            .map(|vals| ColorMap::new(Facet::Bean, vals));

        self.dataset = Some(log);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and the analysis after any change.
    pub fn refilter(&mut self) {
        let Some(log) = &self.dataset else {
            self.visible_indices.clear();
            self.analysis = None;
            return;
        };
        self.visible_indices = visible_indices(log, &self.filters, &self.search, self.sort);
        self.analysis = Some(analyze(log, &self.visible_indices, self.axis, &self.config));
    }

    pub fn set_axis(&mut self, axis: Axis) {
        if self.axis != axis {
            self.axis = axis;
            self.refilter();
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.sort != sort {
            self.sort = sort;
            self.refilter();
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.refilter();
    }

    /// Set colour facet and rebuild the map.
    pub fn set_color_facet(&mut self, facet: Facet) {
        self.color_facet = Some(facet);
        self.color_map = self
            .dataset
            .as_ref()
            .and_then(|log| log.facet_values.get(&facet))
            .map(|vals| ColorMap::new(facet, vals));
    }

    /// Toggle a single value in a facet's filter.
    pub fn toggle_filter_value(&mut self, facet: Facet, value: &FacetValue) {
        let selected = self.filters.entry(facet).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select all values of a facet.
    pub fn select_all(&mut self, facet: Facet) {
        if let Some(all) = self.dataset.as_ref().and_then(|log| log.facet_values.get(&facet)) {
            self.filters.insert(facet, all.clone());
            self.refilter();
        }
    }

    /// Deselect all values of a facet.
    pub fn select_none(&mut self, facet: Facet) {
        self.filters.insert(facet, BTreeSet::new());
        self.refilter();
    }
}
