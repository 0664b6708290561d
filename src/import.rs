use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{BleedingIntensity, DailyRecord, PeriodRecord, PeriodSymptoms};

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Loads period history from a `.csv` export or a JSON array.
pub fn load_period_records(path: &Path) -> anyhow::Result<Loaded<PeriodRecord>> {
    let loaded = if is_csv(path) {
        period_records_from_csv(path)?
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        json_array(&text).with_context(|| format!("failed to parse {}", path.display()))?
    };

    info!(
        path = %path.display(),
        loaded = loaded.records.len(),
        skipped = loaded.skipped,
        "loaded period history"
    );
    Ok(loaded)
}

pub fn load_daily_records(path: &Path) -> anyhow::Result<Loaded<DailyRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let loaded: Loaded<DailyRecord> =
        json_array(&text).with_context(|| format!("failed to parse {}", path.display()))?;

    info!(
        path = %path.display(),
        loaded = loaded.records.len(),
        skipped = loaded.skipped,
        "loaded daily records"
    );
    Ok(loaded)
}

/// Parses a JSON array element by element so one bad entry does not sink
/// the rest of the export.
pub fn json_array<T>(text: &str) -> anyhow::Result<Loaded<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let values: Vec<serde_json::Value> =
        serde_json::from_str(text).context("expected a JSON array of records")?;

    let mut records = Vec::with_capacity(values.len());
    let mut skipped = 0usize;
    for (position, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(position, error = %err, "skipping malformed record");
                skipped += 1;
            }
        }
    }

    Ok(Loaded { records, skipped })
}

fn period_records_from_csv(path: &Path) -> anyhow::Result<Loaded<PeriodRecord>> {
    #[derive(Deserialize)]
    struct CsvRow {
        start_date: String,
        bleeding: Option<String>,
        memo: Option<String>,
        cramps: Option<bool>,
        back_pain: Option<bool>,
        headache: Option<bool>,
        bloating: Option<bool>,
        fatigue: Option<bool>,
        mood_swings: Option<bool>,
        breast_tenderness: Option<bool>,
        acne: Option<bool>,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (position, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!(position, error = %err, "skipping malformed csv row");
                skipped += 1;
                continue;
            }
        };

        let bleeding = match row.bleeding.as_deref().unwrap_or("").parse::<BleedingIntensity>() {
            Ok(bleeding) => bleeding,
            Err(err) => {
                warn!(position, error = %err, "skipping csv row with unknown bleeding");
                skipped += 1;
                continue;
            }
        };

        records.push(PeriodRecord {
            start_date: row.start_date,
            bleeding,
            symptoms: PeriodSymptoms {
                cramps: row.cramps.unwrap_or(false),
                back_pain: row.back_pain.unwrap_or(false),
                headache: row.headache.unwrap_or(false),
                bloating: row.bloating.unwrap_or(false),
                fatigue: row.fatigue.unwrap_or(false),
                mood_swings: row.mood_swings.unwrap_or(false),
                breast_tenderness: row.breast_tenderness.unwrap_or(false),
                acne: row.acne.unwrap_or(false),
            },
            memo: row.memo.filter(|memo| !memo.trim().is_empty()),
        });
    }

    Ok(Loaded { records, skipped })
}
