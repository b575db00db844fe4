use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::features::{AgeSegment, CostRange, Season};

pub const TRIP_ID_COLUMN: &str = "Trip ID";
pub const DURATION_COLUMN: &str = "Duration (days)";
pub const AGE_COLUMN: &str = "Traveler age";
pub const GENDER_COLUMN: &str = "Traveler gender";
pub const ACCOMMODATION_COST_COLUMN: &str = "Accommodation cost";
pub const TRANSPORTATION_COST_COLUMN: &str = "Transportation cost";

/// Columns a row must carry to survive cleaning.
pub const CORE_COLUMNS: [&str; 5] = [
    DURATION_COLUMN,
    AGE_COLUMN,
    GENDER_COLUMN,
    ACCOMMODATION_COST_COLUMN,
    TRANSPORTATION_COST_COLUMN,
];

/// One row of the raw travel dataset; every cell is optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTravelRow {
    #[serde(rename = "Trip ID")]
    pub trip_id: Option<String>,
    #[serde(rename = "Destination")]
    pub destination: Option<String>,
    #[serde(rename = "Start date")]
    pub start_date: Option<String>,
    #[serde(rename = "End date")]
    pub end_date: Option<String>,
    #[serde(rename = "Duration (days)")]
    pub duration: Option<String>,
    #[serde(rename = "Traveler name")]
    pub traveler_name: Option<String>,
    #[serde(rename = "Traveler age")]
    pub age: Option<String>,
    #[serde(rename = "Traveler gender")]
    pub gender: Option<String>,
    #[serde(rename = "Traveler nationality")]
    pub nationality: Option<String>,
    #[serde(rename = "Accommodation type")]
    pub accommodation_type: Option<String>,
    #[serde(rename = "Accommodation cost")]
    pub accommodation_cost: Option<String>,
    #[serde(rename = "Transportation type")]
    pub transportation_type: Option<String>,
    #[serde(rename = "Transportation cost")]
    pub transportation_cost: Option<String>,
}

/// A cleaned trip with its derived features. Column order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRecord {
    #[serde(rename = "Trip ID")]
    pub trip_id: i64,
    #[serde(rename = "Destination")]
    pub destination: Option<String>,
    #[serde(rename = "Start date")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "End date")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "Duration (days)")]
    pub duration: f64,
    #[serde(rename = "Traveler name")]
    pub traveler_name: Option<String>,
    #[serde(rename = "Traveler age")]
    pub age: f64,
    #[serde(rename = "Traveler gender")]
    pub gender: String,
    #[serde(rename = "Traveler nationality")]
    pub nationality: Option<String>,
    #[serde(rename = "Accommodation type")]
    pub accommodation_type: Option<String>,
    #[serde(rename = "Accommodation cost")]
    pub accommodation_cost: f64,
    #[serde(rename = "Transportation type")]
    pub transportation_type: Option<String>,
    #[serde(rename = "Transportation cost")]
    pub transportation_cost: f64,
    #[serde(rename = "Month")]
    pub month: Option<u32>,
    #[serde(rename = "Season")]
    pub season: Season,
    #[serde(rename = "Age segment")]
    pub age_segment: AgeSegment,
    #[serde(rename = "Total cost")]
    pub total_cost: f64,
    #[serde(rename = "Cost range")]
    pub cost_range: CostRange,
    #[serde(rename = "Region")]
    pub region: String,
}
