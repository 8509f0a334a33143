use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// RoastLevel
// ---------------------------------------------------------------------------

/// Roast level of a bean, darkest first.
///
/// Serializes as the display label; deserializes through [`FromStr`] so
/// every loader accepts the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum RoastLevel {
    Dark,
    #[serde(rename = "Medium Dark")]
    MediumDark,
    Medium,
    #[serde(rename = "Medium Light")]
    MediumLight,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown roast level: '{0}'")]
pub struct ParseRoastLevelError(pub String);

impl RoastLevel {
    pub fn label(self) -> &'static str {
        match self {
            RoastLevel::Dark => "Dark",
            RoastLevel::MediumDark => "Medium Dark",
            RoastLevel::Medium => "Medium",
            RoastLevel::MediumLight => "Medium Light",
            RoastLevel::Light => "Light",
        }
    }
}

impl fmt::Display for RoastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RoastLevel {
    type Err = ParseRoastLevelError;

    /// Accepts the display labels in any case, with `_` or `-` for the space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "dark" => Ok(RoastLevel::Dark),
            "mediumdark" => Ok(RoastLevel::MediumDark),
            "medium" => Ok(RoastLevel::Medium),
            "mediumlight" => Ok(RoastLevel::MediumLight),
            "light" => Ok(RoastLevel::Light),
            _ => Err(ParseRoastLevelError(s.to_string())),
        }
    }
}

impl TryFrom<String> for RoastLevel {
    type Error = ParseRoastLevelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Brew – one row of the log
// ---------------------------------------------------------------------------

/// A single logged brew. Bean, bag and equipment are carried by name so an
/// exported log is self-contained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brew {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub bean: Option<String>,
    #[serde(default)]
    pub roaster: Option<String>,
    #[serde(default)]
    pub bag: Option<String>,
    #[serde(default)]
    pub barista: Option<String>,
    #[serde(default)]
    pub machine: Option<String>,
    #[serde(default)]
    pub grinder: Option<String>,
    #[serde(default)]
    pub roast_level: Option<RoastLevel>,
    /// Seconds.
    #[serde(default)]
    pub brew_time: Option<f64>,
    /// Grams in.
    #[serde(default)]
    pub dose: Option<f64>,
    /// Grams out.
    #[serde(default, rename = "yield")]
    pub yield_: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// ISO-8601 timestamp as written in the log; see [`Brew::brewed_at`].
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub tasting_notes: Option<String>,
    #[serde(default)]
    pub reflections: Option<String>,
}

impl Brew {
    /// Brew ratio `x` in 1:x, i.e. yield over dose.
    pub fn ratio(&self) -> Option<f64> {
        let dose = self.dose.filter(|d| d.is_finite() && *d > 0.0)?;
        let out = self.yield_.filter(|y| y.is_finite())?;
        Some(out / dose)
    }

    /// The timestamp as a UTC instant.
    ///
    /// Accepts RFC 3339 with any offset, or a naive date-time / date which is
    /// taken as UTC. Unparseable text gives `None`.
    pub fn brewed_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        Some(date.and_hms_opt(0, 0, 0)?.and_utc())
    }
}

// ---------------------------------------------------------------------------
// Facets – categorical columns used for filtering and colouring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    Bean,
    Roaster,
    Bag,
    Barista,
    Machine,
    Grinder,
    RoastLevel,
}

impl Facet {
    pub const ALL: [Facet; 7] = [
        Facet::Bean,
        Facet::Roaster,
        Facet::Bag,
        Facet::Barista,
        Facet::Machine,
        Facet::Grinder,
        Facet::RoastLevel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Facet::Bean => "Bean",
            Facet::Roaster => "Roaster",
            Facet::Bag => "Bag",
            Facet::Barista => "Barista",
            Facet::Machine => "Machine",
            Facet::Grinder => "Grinder",
            Facet::RoastLevel => "Roast level",
        }
    }

    /// The brew's value for this facet.
    pub fn value_of(self, brew: &Brew) -> FacetValue {
        let text = match self {
            Facet::Bean => &brew.bean,
            Facet::Roaster => &brew.roaster,
            Facet::Bag => &brew.bag,
            Facet::Barista => &brew.barista,
            Facet::Machine => &brew.machine,
            Facet::Grinder => &brew.grinder,
            Facet::RoastLevel => {
                return brew
                    .roast_level
                    .map(FacetValue::Level)
                    .unwrap_or(FacetValue::Missing);
            }
        };
        match text.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => FacetValue::Text(s.to_string()),
            _ => FacetValue::Missing,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single cell in a facet column. Ordered so it can key `BTreeSet`s.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacetValue {
    Missing,
    Level(RoastLevel),
    Text(String),
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Missing => write!(f, "<none>"),
            FacetValue::Level(l) => write!(f, "{l}"),
            FacetValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// BrewLog – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All loaded brews with a pre-computed index of facet values.
#[derive(Debug, Clone, Default)]
pub struct BrewLog {
    pub brews: Vec<Brew>,
    /// For each facet the sorted set of values present in the log.
    pub facet_values: BTreeMap<Facet, BTreeSet<FacetValue>>,
}

impl BrewLog {
    pub fn from_brews(brews: Vec<Brew>) -> Self {
        let mut facet_values: BTreeMap<Facet, BTreeSet<FacetValue>> = BTreeMap::new();
        for brew in &brews {
            for facet in Facet::ALL {
                facet_values
                    .entry(facet)
                    .or_default()
                    .insert(facet.value_of(brew));
            }
        }
        BrewLog {
            brews,
            facet_values,
        }
    }

    pub fn len(&self) -> usize {
        self.brews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brews.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roast_level_parsing() {
        assert_eq!("Medium Dark".parse::<RoastLevel>(), Ok(RoastLevel::MediumDark));
        assert_eq!("medium_light".parse::<RoastLevel>(), Ok(RoastLevel::MediumLight));
        assert_eq!(" LIGHT ".parse::<RoastLevel>(), Ok(RoastLevel::Light));
        assert_eq!(
            "charcoal".parse::<RoastLevel>(),
            Err(ParseRoastLevelError("charcoal".into()))
        );
    }

    #[test]
    fn test_roast_level_serde_labels() {
        let json = serde_json::to_string(&RoastLevel::MediumDark).unwrap();
        assert_eq!(json, "\"Medium Dark\"");
        let back: RoastLevel = serde_json::from_str("\"Medium Light\"").unwrap();
        assert_eq!(back, RoastLevel::MediumLight);
        let loose: RoastLevel = serde_json::from_str("\"MEDIUM_DARK\"").unwrap();
        assert_eq!(loose, RoastLevel::MediumDark);
        assert!(serde_json::from_str::<RoastLevel>("\"charcoal\"").is_err());
    }

    #[test]
    fn test_brewed_at_normalises_offsets() {
        let at = |ts: &str| {
            Brew {
                timestamp: Some(ts.into()),
                ..Brew::default()
            }
            .brewed_at()
        };
        // 08:30+02:00 is 06:30Z, earlier than 07:00Z despite sorting later as text.
        let eastern = at("2024-03-01T08:30:00+02:00").unwrap();
        let utc = at("2024-03-01T07:00:00Z").unwrap();
        assert!(eastern < utc);

        assert_eq!(at("2024-03-01T07:00:00"), Some(utc));
        assert_eq!(at("2024-03-01 07:00:00"), Some(utc));
        assert!(at("2024-03-01").is_some());
        assert_eq!(at("yesterday"), None);
        assert_eq!(Brew::default().brewed_at(), None);
    }

    #[test]
    fn test_ratio() {
        let brew = Brew {
            dose: Some(18.0),
            yield_: Some(36.0),
            ..Brew::default()
        };
        assert_eq!(brew.ratio(), Some(2.0));

        let no_dose = Brew {
            dose: Some(0.0),
            yield_: Some(36.0),
            ..Brew::default()
        };
        assert_eq!(no_dose.ratio(), None);
        assert_eq!(Brew::default().ratio(), None);
    }

    #[test]
    fn test_facet_values_index() {
        let brews = vec![
            Brew {
                name: "a".into(),
                bean: Some("Yirgacheffe".into()),
                roast_level: Some(RoastLevel::Light),
                ..Brew::default()
            },
            Brew {
                name: "b".into(),
                bean: Some("  ".into()),
                ..Brew::default()
            },
        ];
        let log = BrewLog::from_brews(brews);
        let beans = &log.facet_values[&Facet::Bean];
        assert!(beans.contains(&FacetValue::Text("Yirgacheffe".into())));
        assert!(beans.contains(&FacetValue::Missing));
        assert_eq!(beans.len(), 2);
        let levels = &log.facet_values[&Facet::RoastLevel];
        assert!(levels.contains(&FacetValue::Level(RoastLevel::Light)));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_missing_sorts_first() {
        let mut set = BTreeSet::new();
        set.insert(FacetValue::Text("z".into()));
        set.insert(FacetValue::Missing);
        assert_eq!(set.iter().next(), Some(&FacetValue::Missing));
    }
}
