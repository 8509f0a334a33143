use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::analysis::target::median;

use super::model::{BrewLog, Facet, FacetValue, RoastLevel};

// ---------------------------------------------------------------------------
// Summary – one bean / bag / barista … aggregated over its brews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub value: FacetValue,
    /// Roaster shared by every brew in the group, if consistent.
    pub roaster: Option<String>,
    /// Roast level shared by every brew in the group, if consistent.
    pub roast_level: Option<RoastLevel>,
    /// Grinder used on the most brews; ties go to the first name A–Z.
    pub grinder: Option<String>,
    pub brews: usize,
    /// Mean over rated brews only.
    pub mean_rating: Option<f64>,
    pub best_rating: Option<f64>,
    pub median_ratio: Option<f64>,
}

impl Summary {
    pub fn label(&self) -> String {
        self.value.to_string()
    }
}

#[derive(Default)]
struct Group {
    roasters: Vec<Option<String>>,
    levels: Vec<Option<RoastLevel>>,
    grinders: BTreeMap<String, usize>,
    ratings: Vec<f64>,
    ratios: Vec<f64>,
    brews: usize,
}

fn most_used(counts: &BTreeMap<String, usize>) -> Option<String> {
    counts
        .iter()
        .max_by(|(a, na), (b, nb)| na.cmp(nb).then_with(|| b.cmp(a)))
        .map(|(name, _)| name.clone())
}

fn consistent<T: Clone + PartialEq>(values: &[Option<T>]) -> Option<T> {
    let first = values.first()?.clone()?;
    values
        .iter()
        .all(|v| v.as_ref() == Some(&first))
        .then_some(first)
}

/// Group the brews at `indices` by their `facet` value, ordered by value.
pub fn summarize(log: &BrewLog, indices: &[usize], facet: Facet) -> Vec<Summary> {
    let mut groups: BTreeMap<FacetValue, Group> = BTreeMap::new();

    for &idx in indices {
        let brew = &log.brews[idx];
        let group = groups.entry(facet.value_of(brew)).or_default();
        group.brews += 1;
        group.roasters.push(brew.roaster.clone());
        group.levels.push(brew.roast_level);
        if let Some(g) = brew.grinder.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            *group.grinders.entry(g.to_string()).or_default() += 1;
        }
        if let Some(r) = brew.rating.filter(|r| r.is_finite()) {
            group.ratings.push(r);
        }
        if let Some(r) = brew.ratio().filter(|r| r.is_finite()) {
            group.ratios.push(r);
        }
    }

    groups
        .into_iter()
        .map(|(value, g)| Summary {
            value,
            roaster: consistent(&g.roasters),
            roast_level: consistent(&g.levels),
            grinder: most_used(&g.grinders),
            brews: g.brews,
            mean_rating: (!g.ratings.is_empty())
                .then(|| g.ratings.iter().sum::<f64>() / g.ratings.len() as f64),
            best_rating: g.ratings.iter().copied().reduce(f64::max),
            median_ratio: median(&g.ratios),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Search / sort
// ---------------------------------------------------------------------------

/// Keep summaries whose label or roaster contains `query` (case-insensitive).
pub fn search(summaries: &[Summary], query: &str) -> Vec<Summary> {
    let needle = query.trim().to_lowercase();
    summaries
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.label().to_lowercase().contains(&needle)
                || s
                    .roaster
                    .as_deref()
                    .is_some_and(|r| r.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummarySort {
    #[default]
    Name,
    Rating,
    Brews,
}

impl SummarySort {
    pub const ALL: [SummarySort; 3] = [SummarySort::Name, SummarySort::Rating, SummarySort::Brews];

    pub fn label(self) -> &'static str {
        match self {
            SummarySort::Name => "Name",
            SummarySort::Rating => "Rating",
            SummarySort::Brews => "Brews",
        }
    }
}

pub fn sort(summaries: &mut [Summary], key: SummarySort) {
    summaries.sort_by(|a, b| match key {
        SummarySort::Name => a.label().to_lowercase().cmp(&b.label().to_lowercase()),
        SummarySort::Rating => match (a.mean_rating, b.mean_rating) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SummarySort::Brews => b.brews.cmp(&a.brews),
    });
}
