use std::collections::BTreeMap;

use crate::models::{DailyRecord, Severity, Symptom, SymptomRank};

pub const FULL_SCORE: i32 = 100;

/// Flat per-answer deduction for the day-to-day score. Deliberately coarser
/// than the SMI table.
pub fn penalty(severity: Severity) -> i32 {
    match severity {
        Severity::Intense => 15,
        Severity::Moderate => 10,
        Severity::Mild => 5,
        Severity::None => 0,
    }
}

/// Day score in 0..=100. Only the ten symptom keys are read, so temperature,
/// bleeding and the visit/medication/blood-test notes never count.
pub fn daily_score(record: &DailyRecord) -> u32 {
    let deducted: i32 = Symptom::ALL
        .iter()
        .filter_map(|symptom| record.severity(*symptom))
        .map(penalty)
        .sum();

    (FULL_SCORE - deducted).max(0) as u32
}

/// Weight used only to rank symptoms against each other.
pub fn ranking_weight(severity: Severity) -> u32 {
    match severity {
        Severity::Intense => 3,
        Severity::Moderate => 2,
        Severity::Mild => 1,
        Severity::None => 0,
    }
}

pub fn accumulate_symptom_weights<'a, I>(records: I) -> BTreeMap<Symptom, u32>
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    let mut totals = BTreeMap::new();
    for record in records {
        for symptom in Symptom::ALL {
            if let Some(severity) = record.severity(symptom) {
                *totals.entry(symptom).or_insert(0) += ranking_weight(severity);
            }
        }
    }
    totals
}

/// Heaviest symptoms first. Ties keep questionnaire order and symptoms that
/// never weighed anything are left out.
pub fn rank_symptoms(weights: &BTreeMap<Symptom, u32>, limit: usize) -> Vec<SymptomRank> {
    let mut ranked: Vec<SymptomRank> = weights
        .iter()
        .filter(|(_, weight)| **weight > 0)
        .map(|(symptom, weight)| SymptomRank {
            symptom: *symptom,
            weight: *weight,
        })
        .collect();

    ranked.sort_by(|a, b| b.weight.cmp(&a.weight));
    ranked.truncate(limit);
    ranked
}

pub fn worst_symptom(record: &DailyRecord) -> Option<(Symptom, Severity)> {
    let mut worst: Option<(Symptom, Severity)> = None;
    for symptom in Symptom::ALL {
        let Some(severity) = record.severity(symptom) else {
            continue;
        };
        if severity == Severity::None {
            continue;
        }
        if worst.map_or(true, |(_, current)| severity > current) {
            worst = Some((symptom, severity));
        }
    }
    worst
}
