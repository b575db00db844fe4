//! Mean trip duration grouped by traveler and trip attributes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::dataset::{load_cleaned_table, TravelRecord};
use crate::error::PipelineError;

/// Optional season/region filters; blank values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationFilter {
    pub season: Option<String>,
    pub region: Option<String>,
}

impl AggregationFilter {
    pub fn new(season: Option<String>, region: Option<String>) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            season: clean(season),
            region: clean(region),
        }
    }

    fn matches(&self, record: &TravelRecord) -> bool {
        let season_ok = self
            .season
            .as_deref()
            .map_or(true, |s| record.season.label() == s);
        let region_ok = self
            .region
            .as_deref()
            .map_or(true, |r| record.region == r);
        season_ok && region_ok
    }
}

/// Chart-ready pairs, labels in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationBreakdown {
    pub gender: ChartSeries,
    pub age_segment: ChartSeries,
    pub cost_range: ChartSeries,
    pub region: ChartSeries,
    pub season: ChartSeries,
    /// Distinct seasons in the full table, in order of first appearance.
    pub all_seasons: Vec<String>,
    /// Distinct regions in the full table, in order of first appearance.
    pub all_regions: Vec<String>,
    pub filter: AggregationFilter,
}

pub struct AggregationReporter {
    cleaned_table: PathBuf,
}

impl AggregationReporter {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            cleaned_table: config.cleaned_table.clone(),
        }
    }

    pub fn report(&self, filter: &AggregationFilter) -> Result<DurationBreakdown, PipelineError> {
        let records = load_cleaned_table(&self.cleaned_table)?;
        Ok(summarize(&records, filter))
    }
}

/// Five independent single-column group-bys over the filtered records.
pub fn summarize(records: &[TravelRecord], filter: &AggregationFilter) -> DurationBreakdown {
    let filtered: Vec<&TravelRecord> = records.iter().filter(|r| filter.matches(r)).collect();
    debug!(
        total = records.len(),
        selected = filtered.len(),
        "aggregating trip durations"
    );

    DurationBreakdown {
        gender: mean_duration_by(&filtered, |r| r.gender.clone()),
        age_segment: mean_duration_by(&filtered, |r| r.age_segment.label().to_string()),
        cost_range: mean_duration_by(&filtered, |r| r.cost_range.label().to_string()),
        region: mean_duration_by(&filtered, |r| r.region.clone()),
        season: mean_duration_by(&filtered, |r| r.season.label().to_string()),
        all_seasons: distinct(records, |r| r.season.label().to_string()),
        all_regions: distinct(records, |r| r.region.clone()),
        filter: filter.clone(),
    }
}

fn mean_duration_by<F>(records: &[&TravelRecord], key: F) -> ChartSeries
where
    F: Fn(&TravelRecord) -> String,
{
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key(record)).or_insert((0.0, 0));
        entry.0 += record.duration;
        entry.1 += 1;
    }

    let mut series = ChartSeries::default();
    for (label, (sum, count)) in groups {
        series.labels.push(label);
        series.values.push(round2(sum / count as f64));
    }
    series
}

fn distinct<F>(records: &[TravelRecord], key: F) -> Vec<String>
where
    F: Fn(&TravelRecord) -> String,
{
    let mut seen = Vec::new();
    for record in records {
        let value = key(record);
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
