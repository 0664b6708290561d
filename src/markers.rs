use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::cycle::{self, DEFAULT_CYCLE_LENGTH};
use crate::models::{CalendarMarker, PeriodRecord};

pub const DEFAULT_PERIOD_LENGTH: i64 = 5;

/// Longest run of bleeding days marked per period. Larger configured
/// lengths are clamped to it.
pub const MAX_PERIOD_LENGTH: i64 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerConfig {
    pub cycle_length: i64,
    /// Bleeding days marked from each start date, at most
    /// [`MAX_PERIOD_LENGTH`].
    pub period_length: i64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            period_length: DEFAULT_PERIOD_LENGTH,
        }
    }
}

/// Sparse calendar annotations. Flags from overlapping periods are OR'd
/// together; dates without any flag are absent, and so are dates that fall
/// outside the representable calendar.
pub fn build_marker_map(
    history: &[PeriodRecord],
    config: &MarkerConfig,
) -> BTreeMap<NaiveDate, CalendarMarker> {
    let mut starts: Vec<NaiveDate> = history.iter().filter_map(PeriodRecord::start).collect();
    starts.sort();

    let mut markers: BTreeMap<NaiveDate, CalendarMarker> = BTreeMap::new();

    let period_length = config.period_length.clamp(0, MAX_PERIOD_LENGTH);

    for start in starts.iter() {
        for offset in 0..period_length {
            let Some(date) = cycle::add_days(*start, offset) else {
                break;
            };
            let marker = markers.entry(date).or_default();
            marker.is_period = true;
            if offset == 0 {
                marker.is_start = true;
            }
        }
    }

    let predicted = starts
        .last()
        .and_then(|latest| cycle::add_days(*latest, config.cycle_length));
    if let Some(date) = predicted {
        markers.entry(date).or_default().is_next_predicted = true;
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn single_period_marks_five_days_and_prediction() {
        let map = build_marker_map(&[PeriodRecord::new("2024-01-01")], &MarkerConfig::default());

        let period_days: Vec<NaiveDate> = map
            .iter()
            .filter(|(_, marker)| marker.is_period)
            .map(|(date, _)| *date)
            .collect();
        assert_eq!(
            period_days,
            vec![
                day("2024-01-01"),
                day("2024-01-02"),
                day("2024-01-03"),
                day("2024-01-04"),
                day("2024-01-05"),
            ]
        );

        let starts: Vec<&NaiveDate> = map
            .iter()
            .filter(|(_, m)| m.is_start)
            .map(|(d, _)| d)
            .collect();
        assert_eq!(starts, vec![&day("2024-01-01")]);

        let predicted: Vec<&NaiveDate> = map
            .iter()
            .filter(|(_, m)| m.is_next_predicted)
            .map(|(d, _)| d)
            .collect();
        assert_eq!(predicted, vec![&day("2024-01-29")]);
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn overlapping_prediction_unions_flags() {
        let config = MarkerConfig {
            cycle_length: 3,
            period_length: 5,
        };
        let map = build_marker_map(&[PeriodRecord::new("2024-01-01")], &config);
        assert_eq!(
            map[&day("2024-01-04")],
            CalendarMarker {
                is_start: false,
                is_period: true,
                is_next_predicted: true,
            }
        );
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn overlapping_periods_keep_start_flags() {
        let history = vec![PeriodRecord::new("2024-01-04"), PeriodRecord::new("2024-01-01")];
        let map = build_marker_map(&history, &MarkerConfig::default());

        assert!(map[&day("2024-01-01")].is_start);
        assert!(map[&day("2024-01-04")].is_start);
        assert!(map[&day("2024-01-05")].is_period);
        assert!(map[&day("2024-01-08")].is_period);
        // prediction comes from the latest start only
        assert!(map[&day("2024-02-01")].is_next_predicted);
        assert!(!map.contains_key(&day("2024-01-29")));
    }

    #[test]
    fn out_of_range_lengths_degrade_quietly() {
        let history = [PeriodRecord::new("2024-01-01")];
        let config = MarkerConfig {
            cycle_length: i64::MAX,
            period_length: i64::MAX,
        };
        let map = build_marker_map(&history, &config);

        assert_eq!(map.len(), MAX_PERIOD_LENGTH as usize);
        assert!(map.values().all(|marker| marker.is_period));
        assert!(map.values().all(|marker| !marker.is_next_predicted));

        let negative = MarkerConfig {
            cycle_length: 28,
            period_length: -3,
        };
        let map = build_marker_map(&history, &negative);
        assert_eq!(map.len(), 1);
        assert!(map[&day("2024-01-29")].is_next_predicted);
    }

    #[test]
    fn empty_or_invalid_history_is_empty_map() {
        assert!(build_marker_map(&[], &MarkerConfig::default()).is_empty());
        assert!(
            build_marker_map(&[PeriodRecord::new("2024/01/01")], &MarkerConfig::default())
                .is_empty()
        );
    }
}
