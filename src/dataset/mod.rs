pub mod clean;
pub mod features;
pub mod record;
mod table;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

use clean::{clean_cost, non_missing, parse_date, RawCost, DEFAULT_DATE_FORMAT};
use features::{get_age_segment, get_cost_range, get_region, get_season, RegionTable};
use record::{
    RawTravelRow, ACCOMMODATION_COST_COLUMN, AGE_COLUMN, CORE_COLUMNS, DURATION_COLUMN,
    GENDER_COLUMN, TRANSPORTATION_COST_COLUMN, TRIP_ID_COLUMN,
};

pub use record::TravelRecord;
pub use table::{load_cleaned_table, write_cleaned_table, CLEANED_COLUMNS};

/// Why a raw row did not make it into the cleaned table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    MissingField(&'static str),
    MissingTripId,
    DuplicateTripId(i64),
    NotNumeric(&'static str),
    NonPositive(&'static str),
    Negative(&'static str),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingField(column) => write!(f, "'{}' is missing", column),
            DropReason::MissingTripId => write!(f, "'{}' is missing", TRIP_ID_COLUMN),
            DropReason::DuplicateTripId(id) => write!(f, "trip id {} already seen", id),
            DropReason::NotNumeric(column) => write!(f, "'{}' is not numeric", column),
            DropReason::NonPositive(column) => write!(f, "'{}' must be positive", column),
            DropReason::Negative(column) => write!(f, "'{}' must not be negative", column),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    /// 1-based data row index (header excluded).
    pub row: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDataset {
    pub records: Vec<TravelRecord>,
    pub dropped: Vec<DroppedRow>,
}

/// Number of cleaned rows shown in a preview.
pub const PREVIEW_ROWS: usize = 10;

/// Outcome of an ingest run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildSummary {
    pub cleaned_table: PathBuf,
    pub kept: usize,
    pub dropped: usize,
    /// First cleaned rows, in table order.
    pub preview: Vec<TravelRecord>,
}

/// Head of the persisted cleaned table plus its row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPreview {
    pub total_count: usize,
    pub preview: Vec<TravelRecord>,
}

/// Turns raw travel rows into the cleaned, feature-enriched table.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    cleaned_table: PathBuf,
    regions: RegionTable,
    date_format: String,
}

impl DatasetBuilder {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            cleaned_table: config.cleaned_table.clone(),
            regions: config.regions.clone(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Reads `raw_path`, cleans every row and replaces the persisted cleaned table.
    pub fn ingest(&self, raw_path: &Path) -> Result<BuildSummary, PipelineError> {
        let rows = read_raw_rows(raw_path)?;
        let dataset = self.build(rows);

        write_cleaned_table(&self.cleaned_table, &dataset.records)?;
        info!(
            raw = %raw_path.display(),
            cleaned = %self.cleaned_table.display(),
            kept = dataset.records.len(),
            dropped = dataset.dropped.len(),
            "cleaned table written"
        );

        let kept = dataset.records.len();
        let mut preview = dataset.records;
        preview.truncate(PREVIEW_ROWS);

        Ok(BuildSummary {
            cleaned_table: self.cleaned_table.clone(),
            kept,
            dropped: dataset.dropped.len(),
            preview,
        })
    }

    /// Previews the existing cleaned table. An absent table previews as empty.
    pub fn preview(&self) -> Result<DataPreview, PipelineError> {
        if !self.cleaned_table.exists() {
            debug!(cleaned = %self.cleaned_table.display(), "no cleaned table to preview");
            return Ok(DataPreview {
                total_count: 0,
                preview: Vec::new(),
            });
        }

        let mut records = load_cleaned_table(&self.cleaned_table)?;
        let total_count = records.len();
        records.truncate(PREVIEW_ROWS);
        Ok(DataPreview {
            total_count,
            preview: records,
        })
    }

    /// Cleans rows in order; rejected rows are reported, never kept with gaps.
    pub fn build<I>(&self, rows: I) -> CleanedDataset
    where
        I: IntoIterator<Item = RawTravelRow>,
    {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut dropped = Vec::new();

        for (idx, row) in rows.into_iter().enumerate() {
            let outcome = self.clean_row(&row).and_then(|record| {
                if seen.insert(record.trip_id) {
                    Ok(record)
                } else {
                    Err(DropReason::DuplicateTripId(record.trip_id))
                }
            });

            match outcome {
                Ok(record) => records.push(record),
                Err(reason) => {
                    debug!(row = idx + 1, %reason, "dropping raw row");
                    dropped.push(DroppedRow {
                        row: idx + 1,
                        reason,
                    });
                }
            }
        }

        if !dropped.is_empty() {
            warn!(dropped = dropped.len(), "raw rows dropped during cleaning");
        }

        CleanedDataset { records, dropped }
    }

    pub fn clean_row(&self, row: &RawTravelRow) -> Result<TravelRecord, DropReason> {
        let core = [
            &row.duration,
            &row.age,
            &row.gender,
            &row.accommodation_cost,
            &row.transportation_cost,
        ];
        for (column, value) in CORE_COLUMNS.into_iter().zip(core) {
            if present(value).is_none() {
                return Err(DropReason::MissingField(column));
            }
        }

        let trip_id = parse_trip_id(present(&row.trip_id).ok_or(DropReason::MissingTripId)?)
            .ok_or(DropReason::NotNumeric(TRIP_ID_COLUMN))?;

        let duration = positive_number(&row.duration, DURATION_COLUMN)?;
        let age = positive_number(&row.age, AGE_COLUMN)?;
        let gender = present(&row.gender)
            .ok_or(DropReason::MissingField(GENDER_COLUMN))?
            .to_string();

        let accommodation_cost = cost(&row.accommodation_cost, ACCOMMODATION_COST_COLUMN)?;
        let transportation_cost = cost(&row.transportation_cost, TRANSPORTATION_COST_COLUMN)?;

        let start_date = parse_date(present(&row.start_date), &self.date_format);
        let end_date = parse_date(present(&row.end_date), &self.date_format);
        let month = start_date.map(|date| date.month());
        let total_cost = accommodation_cost + transportation_cost;
        let destination = present(&row.destination).map(str::to_string);
        let region = get_region(destination.as_deref(), &self.regions);

        Ok(TravelRecord {
            trip_id,
            destination,
            start_date,
            end_date,
            duration,
            traveler_name: present(&row.traveler_name).map(str::to_string),
            age,
            gender,
            nationality: present(&row.nationality).map(str::to_string),
            accommodation_type: present(&row.accommodation_type).map(str::to_string),
            accommodation_cost,
            transportation_type: present(&row.transportation_type).map(str::to_string),
            transportation_cost,
            month,
            season: get_season(month),
            age_segment: get_age_segment(age),
            total_cost,
            cost_range: get_cost_range(total_cost),
            region,
        })
    }
}

fn read_raw_rows(raw_path: &Path) -> Result<Vec<RawTravelRow>, PipelineError> {
    if !raw_path.exists() {
        return Err(PipelineError::DataUnavailable(format!(
            "raw dataset '{}' does not exist",
            raw_path.display()
        )));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(raw_path)
        .map_err(|err| PipelineError::format(raw_path, err))?;

    let headers = reader
        .headers()
        .map_err(|err| PipelineError::format(raw_path, err))?
        .iter()
        .map(|h| h.to_string())
        .collect::<HashSet<_>>();

    for column in std::iter::once(TRIP_ID_COLUMN).chain(CORE_COLUMNS) {
        if !headers.contains(column) {
            return Err(PipelineError::MissingInput(format!(
                "column '{}' not found in {} header",
                column,
                raw_path.display()
            )));
        }
    }

    let mut rows = Vec::new();
    for (row_idx, row) in reader.deserialize::<RawTravelRow>().enumerate() {
        let row = row.map_err(|err| {
            PipelineError::format(raw_path, format!("row {}: {}", row_idx + 2, err))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn present(value: &Option<String>) -> Option<&str> {
    non_missing(value.as_deref())
}

fn parse_trip_id(raw: &str) -> Option<i64> {
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    // Integer ids exported through a float column ("12.0").
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

fn positive_number(value: &Option<String>, column: &'static str) -> Result<f64, DropReason> {
    let number = present(value)
        .ok_or(DropReason::MissingField(column))?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(DropReason::NotNumeric(column))?;
    if number > 0.0 {
        Ok(number)
    } else {
        Err(DropReason::NonPositive(column))
    }
}

fn cost(value: &Option<String>, column: &'static str) -> Result<f64, DropReason> {
    let cleaned = clean_cost(&RawCost::from_field(value.as_deref()));
    if cleaned < 0.0 {
        Err(DropReason::Negative(column))
    } else {
        Ok(cleaned)
    }
}
