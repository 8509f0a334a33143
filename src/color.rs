use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Facet, FacetValue};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.75, 0.55).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: facet value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of a chosen facet to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub facet: Facet,
    mapping: BTreeMap<FacetValue, Color32>,
    default_color: Color32,
    has_missing: bool,
}

impl ColorMap {
    pub fn new(facet: Facet, values: &BTreeSet<FacetValue>) -> Self {
        // Missing values stay grey so they don't take a hue.
        let named: Vec<&FacetValue> = values
            .iter()
            .filter(|v| **v != FacetValue::Missing)
            .collect();
        let mapping = named
            .iter()
            .zip(generate_palette(named.len()))
            .map(|(v, c)| ((*v).clone(), c))
            .collect();

        ColorMap {
            facet,
            mapping,
            default_color: Color32::GRAY,
            has_missing: values.contains(&FacetValue::Missing),
        }
    }

    pub fn color_for(&self, value: &FacetValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Label and colour per value in facet order, with the grey
    /// `<none>` entry last when some brews lack the facet.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        let mut entries: Vec<(String, Color32)> = self
            .mapping
            .iter()
            .map(|(v, c): (&FacetValue, &Color32)| (v.to_string(), *c))
            .collect();
        if self.has_missing {
            entries.push((FacetValue::Missing.to_string(), self.default_color));
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 4);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_missing_and_unknown_are_grey() {
        let values: BTreeSet<FacetValue> = [
            FacetValue::Missing,
            FacetValue::Text("Huila".into()),
            FacetValue::Text("Kochere".into()),
        ]
        .into();
        let map = ColorMap::new(Facet::Bean, &values);

        assert_eq!(map.color_for(&FacetValue::Missing), Color32::GRAY);
        assert_eq!(map.color_for(&FacetValue::Text("Other".into())), Color32::GRAY);
        assert_ne!(map.color_for(&FacetValue::Text("Huila".into())), Color32::GRAY);
        assert_ne!(
            map.color_for(&FacetValue::Text("Huila".into())),
            map.color_for(&FacetValue::Text("Kochere".into()))
        );
    }

    #[test]
    fn test_legend_lists_named_values_then_missing() {
        let values: BTreeSet<FacetValue> = [
            FacetValue::Text("Kochere".into()),
            FacetValue::Missing,
            FacetValue::Text("Huila".into()),
        ]
        .into();
        let map = ColorMap::new(Facet::Bean, &values);
        let legend = map.legend_entries();

        let labels: Vec<&str> = legend.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Huila", "Kochere", "<none>"]);
        assert_eq!(legend[0].1, map.color_for(&FacetValue::Text("Huila".into())));
        assert_eq!(legend[2].1, Color32::GRAY);

        let complete: BTreeSet<FacetValue> = [FacetValue::Text("Huila".into())].into();
        assert_eq!(ColorMap::new(Facet::Bean, &complete).legend_entries().len(), 1);
    }
}
