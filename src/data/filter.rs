use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::model::{Brew, BrewLog, Facet, FacetValue};

// ---------------------------------------------------------------------------
// Facet predicate: which values are selected per facet
// ---------------------------------------------------------------------------

/// Per-facet selection state: maps facet → set of selected values.
/// If a facet is absent it is unconstrained; an empty set hides everything.
pub type FilterState = BTreeMap<Facet, BTreeSet<FacetValue>>;

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(log: &BrewLog) -> FilterState {
    log.facet_values.clone()
}

/// Whether `brew` passes every facet filter.
///
/// A brew passes a facet filter when:
/// * The facet is not present in `filters` → passes (no constraint)
/// * The selection for that facet is empty → nothing selected → fails
/// * Every known value is selected → passes
/// * The brew's value for that facet is in the selected set → passes
pub fn passes_filters(log: &BrewLog, brew: &Brew, filters: &FilterState) -> bool {
    filters.iter().all(|(facet, selected)| {
        if selected.is_empty() {
            return false;
        }
        if let Some(all_vals) = log.facet_values.get(facet) {
            if selected.len() == all_vals.len() {
                return true;
            }
        }
        selected.contains(&facet.value_of(brew))
    })
}

// ---------------------------------------------------------------------------
// Text search
// ---------------------------------------------------------------------------

/// Case-insensitive substring match over name, bean, roaster, bag and
/// tasting notes. A blank query matches every brew.
pub fn matches_search(brew: &Brew, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    std::iter::once(Some(brew.name.as_str()))
        .chain([
            brew.bean.as_deref(),
            brew.roaster.as_deref(),
            brew.bag.as_deref(),
            brew.tasting_notes.as_deref(),
        ])
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Timestamp as a UTC instant, latest first.
    #[default]
    Newest,
    /// Rating, best first.
    Rating,
    /// Ratio, shortest first.
    Ratio,
    /// Name, A–Z.
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Newest, SortKey::Rating, SortKey::Ratio, SortKey::Name];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::Rating => "Rating",
            SortKey::Ratio => "Ratio",
            SortKey::Name => "Name",
        }
    }

    /// Compare two brews; missing keys always sort last.
    pub fn compare(self, a: &Brew, b: &Brew) -> Ordering {
        match self {
            SortKey::Newest => missing_last(a.brewed_at(), b.brewed_at(), |x, y| y.cmp(&x)),
            SortKey::Rating => missing_last(a.rating, b.rating, |x, y| y.total_cmp(&x)),
            SortKey::Ratio => missing_last(a.ratio(), b.ratio(), |x, y| x.total_cmp(&y)),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of brew indices by `key`.
pub fn sort_indices(log: &BrewLog, indices: &mut [usize], key: SortKey) {
    indices.sort_by(|&a, &b| key.compare(&log.brews[a], &log.brews[b]));
}

// ---------------------------------------------------------------------------
// Combined query
// ---------------------------------------------------------------------------

/// Return indices of brews passing all filters and the search, in `sort` order.
pub fn visible_indices(
    log: &BrewLog,
    filters: &FilterState,
    search: &str,
    sort: SortKey,
) -> Vec<usize> {
    let mut indices: Vec<usize> = log
        .brews
        .iter()
        .enumerate()
        .filter(|(_, brew)| passes_filters(log, brew, filters) && matches_search(brew, search))
        .map(|(i, _)| i)
        .collect();
    sort_indices(log, &mut indices, sort);
    indices
}
