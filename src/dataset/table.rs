use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};

use super::record::TravelRecord;
use crate::error::PipelineError;
use crate::storage::write_atomically;

/// Column order of the cleaned table.
pub const CLEANED_COLUMNS: [&str; 19] = [
    "Trip ID",
    "Destination",
    "Start date",
    "End date",
    "Duration (days)",
    "Traveler name",
    "Traveler age",
    "Traveler gender",
    "Traveler nationality",
    "Accommodation type",
    "Accommodation cost",
    "Transportation type",
    "Transportation cost",
    "Month",
    "Season",
    "Age segment",
    "Total cost",
    "Cost range",
    "Region",
];

/// Replaces the cleaned table at `path` with `records`.
pub fn write_cleaned_table(path: &Path, records: &[TravelRecord]) -> Result<(), PipelineError> {
    write_atomically(path, |out| {
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
        if records.is_empty() {
            writer
                .write_record(CLEANED_COLUMNS)
                .map_err(|err| PipelineError::format(path, err))?;
        }
        for record in records {
            writer
                .serialize(record)
                .map_err(|err| PipelineError::format(path, err))?;
        }
        writer.flush().map_err(|err| PipelineError::io(path, err))
    })
}

pub fn load_cleaned_table(path: &Path) -> Result<Vec<TravelRecord>, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::DataUnavailable(format!(
            "cleaned table '{}' does not exist; run `prepare` first",
            path.display()
        )));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|err| PipelineError::format(path, err))?;

    let mut records = Vec::new();
    for (row_idx, row) in reader.deserialize::<TravelRecord>().enumerate() {
        let record = row.map_err(|err| {
            PipelineError::format(path, format!("row {}: {}", row_idx + 2, err))
        })?;
        records.push(record);
    }
    Ok(records)
}
