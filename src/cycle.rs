use chrono::{Duration, Local, NaiveDate};

use crate::models::{CyclePhase, CycleStats, PeriodRecord, PhaseInfo, PredictionResult};

pub const DEFAULT_CYCLE_LENGTH: i64 = 28;

/// Knobs for cycle-length estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionConfig {
    /// Used when there is no usable gap in the history.
    pub default_cycle_length: i64,
    /// Gaps outside `min_gap_days..=max_gap_days` are treated as entry
    /// mistakes or skipped cycles and left out of the average.
    pub min_gap_days: i64,
    pub max_gap_days: i64,
    /// Only this many of the most recent gaps are considered.
    pub max_gaps: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            default_cycle_length: DEFAULT_CYCLE_LENGTH,
            min_gap_days: 20,
            max_gap_days: 45,
            max_gaps: 6,
        }
    }
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parsed start dates, newest first. Records whose date does not parse are
/// dropped; the caller's slice is left untouched.
fn starts_newest_first(history: &[PeriodRecord]) -> Vec<NaiveDate> {
    let mut starts: Vec<NaiveDate> = history
        .iter()
        .filter_map(|record| {
            let start = record.start();
            if start.is_none() {
                tracing::debug!(
                    start_date = %record.start_date,
                    "skipping period with invalid start date"
                );
            }
            start
        })
        .collect();
    starts.sort_by(|a, b| b.cmp(a));
    starts
}

fn gaps(starts_desc: &[NaiveDate]) -> Vec<i64> {
    starts_desc
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_days())
        .collect()
}

fn estimate_from_starts(starts_desc: &[NaiveDate], config: &PredictionConfig) -> i64 {
    let usable: Vec<i64> = gaps(starts_desc)
        .into_iter()
        .take(config.max_gaps)
        .filter(|gap| (config.min_gap_days..=config.max_gap_days).contains(gap))
        .collect();

    if usable.is_empty() {
        return config.default_cycle_length;
    }

    let mean = usable.iter().sum::<i64>() as f64 / usable.len() as f64;
    mean.round() as i64
}

pub fn estimate_cycle_length(history: &[PeriodRecord], config: &PredictionConfig) -> i64 {
    estimate_from_starts(&starts_newest_first(history), config)
}

pub fn predict_next_period(
    history: &[PeriodRecord],
    config: &PredictionConfig,
    today: NaiveDate,
) -> PredictionResult {
    let starts = starts_newest_first(history);
    let Some(latest) = starts.first().copied() else {
        return PredictionResult {
            next_period_date: None,
            days_until_next: None,
            estimated_cycle_length: config.default_cycle_length,
        };
    };

    let estimated_cycle_length = estimate_from_starts(&starts, config);
    let next = add_days(latest, estimated_cycle_length);
    if next.is_none() {
        tracing::debug!(
            cycle_length = estimated_cycle_length,
            "predicted date out of calendar range"
        );
    }

    PredictionResult {
        next_period_date: next,
        days_until_next: next.map(|date| (date - today).num_days()),
        estimated_cycle_length,
    }
}

/// `date + days`, or `None` when the result leaves chrono's calendar range.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// Record with the most recent parseable start date.
pub fn latest_period(history: &[PeriodRecord]) -> Option<&PeriodRecord> {
    history
        .iter()
        .filter_map(|record| record.start().map(|start| (start, record)))
        .max_by_key(|(start, _)| *start)
        .map(|(_, record)| record)
}

pub fn latest_start(history: &[PeriodRecord]) -> Option<NaiveDate> {
    latest_period(history).and_then(PeriodRecord::start)
}

/// Phase for a 1-based day of the cycle. Bands assume ovulation 14 days
/// before the next period, so very short cycle lengths leave some bands
/// empty.
pub fn phase_for_day(day_in_cycle: i64, cycle_length: i64) -> CyclePhase {
    if day_in_cycle < 1 {
        return CyclePhase::Unknown;
    }
    if day_in_cycle <= 5 {
        CyclePhase::Menstrual
    } else if day_in_cycle <= cycle_length.saturating_sub(16) {
        CyclePhase::Follicular
    } else if (cycle_length.saturating_sub(15)..=cycle_length.saturating_sub(12))
        .contains(&day_in_cycle)
    {
        CyclePhase::Ovulatory
    } else if day_in_cycle >= cycle_length.saturating_sub(11) {
        CyclePhase::Luteal
    } else {
        CyclePhase::Unknown
    }
}

pub fn cycle_phase(
    last_start: Option<NaiveDate>,
    cycle_length: i64,
    today: NaiveDate,
) -> PhaseInfo {
    let Some(start) = last_start else {
        return PhaseInfo {
            phase: CyclePhase::Unknown,
            day_in_cycle: 0,
        };
    };

    let day_in_cycle = (today - start).num_days().saturating_add(1);
    PhaseInfo {
        phase: phase_for_day(day_in_cycle, cycle_length),
        day_in_cycle,
    }
}

/// Raw gap statistics over the whole history, without the outlier filter.
pub fn cycle_stats(history: &[PeriodRecord]) -> CycleStats {
    let starts = starts_newest_first(history);
    let gaps = gaps(&starts);

    let average = if gaps.is_empty() {
        None
    } else {
        let mean = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        Some((mean * 100.0).round() / 100.0)
    };

    CycleStats {
        periods: starts.len(),
        shortest: gaps.iter().copied().min(),
        longest: gaps.iter().copied().max(),
        average,
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn history(starts: &[&str]) -> Vec<PeriodRecord> {
        starts.iter().map(|start| PeriodRecord::new(start)).collect()
    }

    #[test]
    fn empty_history_gives_defaults() {
        let result = predict_next_period(&[], &PredictionConfig::default(), day("2024-03-01"));
        assert_eq!(
            result,
            PredictionResult {
                next_period_date: None,
                days_until_next: None,
                estimated_cycle_length: 28,
            }
        );
    }

    #[test]
    fn two_records_use_their_gap() {
        let periods = history(&["2024-01-01", "2024-01-29"]);
        let result = predict_next_period(&periods, &PredictionConfig::default(), day("2024-02-20"));
        assert_eq!(result.estimated_cycle_length, 28);
        assert_eq!(result.next_period_date, Some(day("2024-02-26")));
        assert_eq!(result.days_until_next, Some(6));
    }

    #[test]
    fn single_record_uses_default_length() {
        let periods = history(&["2024-01-10"]);
        let result = predict_next_period(&periods, &PredictionConfig::default(), day("2024-01-10"));
        assert_eq!(result.estimated_cycle_length, 28);
        assert_eq!(result.next_period_date, Some(day("2024-02-07")));
        assert_eq!(result.days_until_next, Some(28));
    }

    #[test]
    fn overdue_prediction_goes_negative() {
        let periods = history(&["2024-01-01", "2024-01-29"]);
        let result = predict_next_period(&periods, &PredictionConfig::default(), day("2024-03-01"));
        assert_eq!(result.days_until_next, Some(-4));

        let due = predict_next_period(&periods, &PredictionConfig::default(), day("2024-02-26"));
        assert_eq!(due.days_until_next, Some(0));
    }

    #[test]
    fn prediction_is_idempotent_and_leaves_input_alone() {
        let periods = history(&["2024-03-01", "2024-01-01", "2024-01-30"]);
        let before = periods.clone();
        let config = PredictionConfig::default();
        let first = predict_next_period(&periods, &config, day("2024-03-10"));
        let second = predict_next_period(&periods, &config, day("2024-03-10"));
        assert_eq!(first, second);
        assert_eq!(periods, before);
        // gaps 31 and 29
        assert_eq!(first.estimated_cycle_length, 30);
        assert_eq!(first.next_period_date, Some(day("2024-03-31")));
    }

    #[test]
    fn outlier_gaps_are_ignored() {
        // gaps newest first: 30, 10, 60, 26
        let periods = history(&[
            "2023-10-01",
            "2023-10-27",
            "2023-12-26",
            "2024-01-05",
            "2024-02-04",
        ]);
        assert_eq!(estimate_cycle_length(&periods, &PredictionConfig::default()), 28);
    }

    #[test]
    fn only_recent_six_gaps_count() {
        // six recent 30-day gaps after an older 40-day gap
        let mut start = day("2023-01-01");
        let mut periods = vec![PeriodRecord::new(&start.to_string())];
        start += Duration::days(40);
        periods.push(PeriodRecord::new(&start.to_string()));
        for _ in 0..6 {
            start += Duration::days(30);
            periods.push(PeriodRecord::new(&start.to_string()));
        }
        assert_eq!(estimate_cycle_length(&periods, &PredictionConfig::default()), 30);
    }

    #[test]
    fn all_gaps_filtered_keeps_default() {
        let periods = history(&["2024-01-01", "2024-01-05"]);
        let config = PredictionConfig {
            default_cycle_length: 31,
            ..PredictionConfig::default()
        };
        let result = predict_next_period(&periods, &config, day("2024-01-05"));
        assert_eq!(result.estimated_cycle_length, 31);
        assert_eq!(result.next_period_date, Some(day("2024-02-05")));
    }

    #[test]
    fn invalid_dates_are_skipped() {
        let periods = history(&["not-a-date", "2024-01-01", "2024-01-29", ""]);
        let result = predict_next_period(&periods, &PredictionConfig::default(), day("2024-02-01"));
        assert_eq!(result.next_period_date, Some(day("2024-02-26")));
        assert_eq!(latest_start(&periods), Some(day("2024-01-29")));
    }

    #[test]
    fn rounding_goes_to_nearest_day() {
        // gaps 29 and 30 average 29.5
        let periods = history(&["2024-01-01", "2024-01-31", "2024-02-29"]);
        assert_eq!(estimate_cycle_length(&periods, &PredictionConfig::default()), 30);
    }

    #[test]
    fn no_start_means_unknown_phase() {
        assert_eq!(
            cycle_phase(None, 28, day("2024-03-01")),
            PhaseInfo {
                phase: CyclePhase::Unknown,
                day_in_cycle: 0
            }
        );
    }

    #[test]
    fn third_day_is_menstrual() {
        let info = cycle_phase(Some(day("2024-02-28")), 28, day("2024-03-01"));
        assert_eq!(info.day_in_cycle, 3);
        assert_eq!(info.phase, CyclePhase::Menstrual);
    }

    #[test]
    fn default_cycle_band_edges() {
        assert_eq!(phase_for_day(1, 28), CyclePhase::Menstrual);
        assert_eq!(phase_for_day(5, 28), CyclePhase::Menstrual);
        assert_eq!(phase_for_day(6, 28), CyclePhase::Follicular);
        assert_eq!(phase_for_day(12, 28), CyclePhase::Follicular);
        assert_eq!(phase_for_day(13, 28), CyclePhase::Ovulatory);
        assert_eq!(phase_for_day(16, 28), CyclePhase::Ovulatory);
        assert_eq!(phase_for_day(17, 28), CyclePhase::Luteal);
        assert_eq!(phase_for_day(28, 28), CyclePhase::Luteal);
        assert_eq!(phase_for_day(0, 28), CyclePhase::Unknown);
        assert_eq!(phase_for_day(-4, 28), CyclePhase::Unknown);
    }

    #[test]
    fn future_start_is_unknown() {
        let info = cycle_phase(Some(day("2024-03-05")), 28, day("2024-03-01"));
        assert_eq!(info.day_in_cycle, -3);
        assert_eq!(info.phase, CyclePhase::Unknown);
    }

    #[test]
    fn short_cycle_skips_empty_follicular_band() {
        // follicular would be 6..=2, ovulatory 3..=6
        assert_eq!(phase_for_day(6, 18), CyclePhase::Ovulatory);
        assert_eq!(phase_for_day(7, 18), CyclePhase::Luteal);
    }

    #[test]
    fn out_of_range_default_length_degrades_to_no_date() {
        let periods = history(&["2024-01-01"]);
        for default_cycle_length in [1_000_000_000, i64::MAX] {
            let config = PredictionConfig {
                default_cycle_length,
                ..PredictionConfig::default()
            };
            let result = predict_next_period(&periods, &config, day("2024-01-01"));
            assert_eq!(result.next_period_date, None);
            assert_eq!(result.days_until_next, None);
            assert_eq!(result.estimated_cycle_length, default_cycle_length);
        }
    }

    #[test]
    fn extreme_cycle_lengths_do_not_overflow_bands() {
        assert_eq!(phase_for_day(3, i64::MIN), CyclePhase::Menstrual);
        assert_eq!(phase_for_day(10, i64::MIN), CyclePhase::Luteal);
        assert_eq!(phase_for_day(10, i64::MAX), CyclePhase::Follicular);
    }

    #[test]
    fn latest_period_skips_bad_dates() {
        let periods = history(&["2024-02-01", "junk", "2024-03-01", "2024-01-01"]);
        let latest = latest_period(&periods).map(|p| p.start_date.as_str());
        assert_eq!(latest, Some("2024-03-01"));
        assert_eq!(latest_period(&history(&["junk"])), None);
    }

    #[test]
    fn stats_cover_every_gap() {
        let periods = history(&["2024-01-01", "2024-01-11", "2024-02-08"]);
        let stats = cycle_stats(&periods);
        assert_eq!(stats.periods, 3);
        assert_eq!(stats.gaps, vec![28, 10]);
        assert_eq!(stats.shortest, Some(10));
        assert_eq!(stats.longest, Some(28));
        assert_eq!(stats.average, Some(19.0));

        let empty = cycle_stats(&[]);
        assert_eq!(empty.average, None);
        assert_eq!(empty.periods, 0);
    }
}
