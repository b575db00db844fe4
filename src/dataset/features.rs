//! Categorical features derived from cleaned trip fields.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_REGION: &str = "Unknown";
pub const OTHER_REGION: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeSegment {
    #[serde(rename = "18-25")]
    UpTo25,
    #[serde(rename = "26-40")]
    From26To40,
    #[serde(rename = "40+")]
    Over40,
}

impl AgeSegment {
    pub fn label(self) -> &'static str {
        match self {
            AgeSegment::UpTo25 => "18-25",
            AgeSegment::From26To40 => "26-40",
            AgeSegment::Over40 => "40+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CostRange {
    Low,
    Medium,
    High,
}

impl CostRange {
    pub fn label(self) -> &'static str {
        match self {
            CostRange::Low => "Low",
            CostRange::Medium => "Medium",
            CostRange::High => "High",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        })*
    };
}

display_via_label!(Season, AgeSegment, CostRange);

/// Missing months fall through to winter.
pub fn get_season(month: Option<u32>) -> Season {
    match month {
        Some(3..=5) => Season::Spring,
        Some(6..=8) => Season::Summer,
        Some(9..=11) => Season::Autumn,
        _ => Season::Winter,
    }
}

pub fn get_age_segment(age: f64) -> AgeSegment {
    if age <= 25.0 {
        AgeSegment::UpTo25
    } else if age <= 40.0 {
        AgeSegment::From26To40
    } else {
        AgeSegment::Over40
    }
}

pub fn get_cost_range(total_cost: f64) -> CostRange {
    if total_cost <= 1000.0 {
        CostRange::Low
    } else if total_cost <= 3000.0 {
        CostRange::Medium
    } else {
        CostRange::High
    }
}

/// One named region and the lower-case keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered keyword table; the first rule with a matching keyword wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTable {
    pub regions: Vec<RegionRule>,
}

impl Default for RegionTable {
    fn default() -> Self {
        let rule = |name: &str, keywords: &[&str]| RegionRule {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };

        Self {
            regions: vec![
                rule("Europe", &["uk", "france", "germany", "italy", "spain"]),
                rule("North America", &["usa", "canada", "mexico"]),
                rule(
                    "Asia",
                    &["thailand", "indonesia", "japan", "korea", "china"],
                ),
                rule("Oceania", &["australia", "new zealand"]),
            ],
        }
    }
}

impl RegionTable {
    /// Loads a table from a TOML file of `[[regions]]` entries.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read region table {}", path.display()))?;
        let table: RegionTable = toml::from_str(&raw)
            .with_context(|| format!("{}: invalid region table", path.display()))?;
        Ok(table.normalized())
    }

    /// Lower-cases and trims every keyword so matching is case-insensitive.
    pub fn normalized(mut self) -> Self {
        for rule in &mut self.regions {
            rule.name = rule.name.trim().to_string();
            rule.keywords = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.regions.is_empty(),
            "region table must define at least one region"
        );
        for rule in &self.regions {
            ensure!(!rule.name.is_empty(), "region names must not be empty");
            ensure!(
                !rule.keywords.is_empty(),
                "region '{}' has no keywords",
                rule.name
            );
        }
        Ok(())
    }
}

pub fn get_region(destination: Option<&str>, table: &RegionTable) -> String {
    let Some(destination) = destination.map(str::trim).filter(|d| !d.is_empty()) else {
        return UNKNOWN_REGION.to_string();
    };
    let destination = destination.to_lowercase();

    table
        .regions
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| destination.contains(k.as_str())))
        .map(|rule| rule.name.clone())
        .unwrap_or_else(|| OTHER_REGION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_month_maps_to_one_season() {
        for month in 1..=12 {
            let expected = match month {
                3 | 4 | 5 => Season::Spring,
                6 | 7 | 8 => Season::Summer,
                9 | 10 | 11 => Season::Autumn,
                _ => Season::Winter,
            };
            assert_eq!(get_season(Some(month)), expected, "month {month}");
        }
        assert_eq!(get_season(None), Season::Winter);
        assert_eq!(get_season(Some(13)), Season::Winter);
    }

    #[test]
    fn age_boundaries_fall_in_lower_segment() {
        assert_eq!(get_age_segment(18.0), AgeSegment::UpTo25);
        assert_eq!(get_age_segment(25.0), AgeSegment::UpTo25);
        assert_eq!(get_age_segment(25.5), AgeSegment::From26To40);
        assert_eq!(get_age_segment(40.0), AgeSegment::From26To40);
        assert_eq!(get_age_segment(41.0), AgeSegment::Over40);
        assert_eq!(get_age_segment(40.0).to_string(), "26-40");
    }

    #[test]
    fn cost_range_boundaries() {
        assert_eq!(get_cost_range(0.0), CostRange::Low);
        assert_eq!(get_cost_range(1000.0), CostRange::Low);
        assert_eq!(get_cost_range(1000.5), CostRange::Medium);
        assert_eq!(get_cost_range(3000.0), CostRange::Medium);
        assert_eq!(get_cost_range(3001.0), CostRange::High);
    }

    #[test]
    fn region_matches_keywords_in_table_order() {
        let table = RegionTable::default();
        assert_eq!(get_region(Some("London, UK"), &table), "Europe");
        assert_eq!(get_region(Some("Tokyo, Japan"), &table), "Asia");
        assert_eq!(get_region(Some("Sydney, AUSTRALIA"), &table), "Oceania");
        assert_eq!(get_region(Some("New York, USA"), &table), "North America");
        assert_eq!(get_region(Some("Cairo, Egypt"), &table), OTHER_REGION);
        assert_eq!(get_region(None, &table), UNKNOWN_REGION);
        assert_eq!(get_region(Some("  "), &table), UNKNOWN_REGION);
    }

    #[test]
    fn custom_table_is_normalized_before_matching() {
        let table = RegionTable {
            regions: vec![RegionRule {
                name: " Africa ".to_string(),
                keywords: vec![" Egypt".to_string(), "".to_string()],
            }],
        }
        .normalized();

        table.validate().unwrap();
        assert_eq!(table.regions[0].keywords, vec!["egypt".to_string()]);
        assert_eq!(get_region(Some("Cairo, Egypt"), &table), "Africa");
    }

    #[test]
    fn region_table_parses_from_toml() {
        let raw = r#"
            [[regions]]
            name = "South America"
            keywords = ["Brazil", "peru"]
        "#;
        let table: RegionTable = toml::from_str(raw).unwrap();
        let table = table.normalized();

        assert_eq!(get_region(Some("Rio de Janeiro, Brazil"), &table), "South America");
        assert_eq!(get_region(Some("London, UK"), &table), OTHER_REGION);
    }

    #[test]
    fn empty_table_fails_validation() {
        let table = RegionTable { regions: vec![] };
        assert!(table.validate().is_err());
    }
}
