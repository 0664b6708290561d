use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{
    DailyRecord, DayMark, MonthlyDay, MonthlyReport, TemperatureStats, Trend, TrendingSymptom,
    WeeklyReport,
};
use crate::wellness;

pub const TOP_SYMPTOMS: usize = 3;

/// Records keyed by their date. Unparseable dates are skipped and a later
/// record for the same day replaces an earlier one.
pub fn index_by_day(records: &[DailyRecord]) -> BTreeMap<NaiveDate, &DailyRecord> {
    let mut by_day = BTreeMap::new();
    for record in records {
        match record.day() {
            Some(day) => {
                by_day.insert(day, record);
            }
            None => tracing::debug!(date = %record.date, "skipping daily record with invalid date"),
        }
    }
    by_day
}

/// Monday and Sunday of the week containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// Every date of the calendar month containing `day`.
pub fn month_days(day: NaiveDate) -> Vec<NaiveDate> {
    let first = day - Duration::days(day.day0() as i64);
    first
        .iter_days()
        .take_while(|date| date.month() == first.month())
        .collect()
}

fn average_score<'a, I>(records: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    let scores: Vec<u32> = records.into_iter().map(wellness::daily_score).collect();
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<u32>() as f64 / scores.len() as f64;
    Some(mean.round() as u32)
}

fn records_in<'a>(
    by_day: &BTreeMap<NaiveDate, &'a DailyRecord>,
    days: &[NaiveDate],
) -> Vec<&'a DailyRecord> {
    days.iter().filter_map(|day| by_day.get(day).copied()).collect()
}

pub fn weekly_report(records: &[DailyRecord], today: NaiveDate) -> WeeklyReport {
    let (week_start, week_end) = week_bounds(today);
    let by_day = index_by_day(records);
    let dates: Vec<NaiveDate> = week_start.iter_days().take(7).collect();

    let days = dates
        .iter()
        .map(|date| {
            let record = by_day.get(date).copied();
            DayMark {
                date: *date,
                is_period: record.is_some_and(|r| r.is_period),
                hospital_visit: record.is_some_and(DailyRecord::hospital_visit),
                medication_change: record.is_some_and(DailyRecord::medication_change),
                has_record: record.is_some(),
            }
        })
        .collect();

    let window = records_in(&by_day, &dates);
    let weights = wellness::accumulate_symptom_weights(window.iter().copied());

    WeeklyReport {
        week_start,
        week_end,
        days,
        top_symptoms: wellness::rank_symptoms(&weights, TOP_SYMPTOMS),
        average_score: average_score(window.iter().copied()),
        recorded_days: window.len(),
    }
}

pub fn temperature_stats(values: &[f64]) -> TemperatureStats {
    if values.is_empty() {
        return TemperatureStats::default();
    }

    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    TemperatureStats {
        count: values.len(),
        max: Some(max),
        min: Some(min),
        average: Some((mean * 100.0).round() / 100.0),
    }
}

fn trend(current: u32, previous: u32) -> Trend {
    match current.cmp(&previous) {
        std::cmp::Ordering::Greater => Trend::Up,
        std::cmp::Ordering::Less => Trend::Down,
        std::cmp::Ordering::Equal => Trend::Same,
    }
}

pub fn monthly_report(records: &[DailyRecord], today: NaiveDate) -> MonthlyReport {
    let by_day = index_by_day(records);
    let dates = month_days(today);
    let month_start = dates[0];
    let previous_dates = month_days(month_start - Duration::days(1));

    let days: Vec<MonthlyDay> = dates
        .iter()
        .map(|date| {
            let record = by_day.get(date).copied();
            MonthlyDay {
                date: *date,
                score: record.map(wellness::daily_score),
                temperature: record.and_then(DailyRecord::temperature),
                is_period: record.is_some_and(|r| r.is_period),
                hospital_visit: record.is_some_and(DailyRecord::hospital_visit),
                medication_change: record.is_some_and(DailyRecord::medication_change),
                blood_test_note: record
                    .and_then(DailyRecord::blood_test_note)
                    .map(str::to_string),
            }
        })
        .collect();

    let current = records_in(&by_day, &dates);
    let previous = records_in(&by_day, &previous_dates);

    let average = average_score(current.iter().copied());
    let previous_average = average_score(previous.iter().copied());

    let temperatures: Vec<f64> = days.iter().filter_map(|day| day.temperature).collect();

    let current_weights = wellness::accumulate_symptom_weights(current.iter().copied());
    let previous_weights = wellness::accumulate_symptom_weights(previous.iter().copied());
    let top_symptoms = wellness::rank_symptoms(&current_weights, TOP_SYMPTOMS)
        .into_iter()
        .map(|rank| {
            let previous_weight = previous_weights.get(&rank.symptom).copied().unwrap_or(0);
            TrendingSymptom {
                symptom: rank.symptom,
                weight: rank.weight,
                previous_weight,
                trend: trend(rank.weight, previous_weight),
            }
        })
        .collect();

    MonthlyReport {
        month_start,
        average_score: average,
        previous_average_score: previous_average,
        score_change: average
            .zip(previous_average)
            .map(|(now, before)| now as i64 - before as i64),
        temperature: temperature_stats(&temperatures),
        top_symptoms,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Symptom;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(week_bounds(day("2024-05-15")), (day("2024-05-13"), day("2024-05-19")));
        assert_eq!(week_bounds(day("2024-05-13")), (day("2024-05-13"), day("2024-05-19")));
        assert_eq!(week_bounds(day("2024-05-19")), (day("2024-05-13"), day("2024-05-19")));
    }

    #[test]
    fn month_days_cover_leap_february() {
        let days = month_days(day("2024-02-17"));
        assert_eq!(days.len(), 29);
        assert_eq!(days[0], day("2024-02-01"));
        assert_eq!(days[28], day("2024-02-29"));
        assert_eq!(month_days(day("2023-12-31")).len(), 31);
    }

    #[test]
    fn headache_leads_weekly_ranking() {
        let records = vec![
            DailyRecord::new("2024-05-13").with_answer("headache", "intense"),
            DailyRecord::new("2024-05-14"),
            DailyRecord::new("2024-05-15").with_answer("headache", "intense"),
            DailyRecord::new("2024-05-17").with_answer("headache", "intense"),
        ];
        let report = weekly_report(&records, day("2024-05-16"));

        assert_eq!(report.top_symptoms.len(), 1);
        assert_eq!(report.top_symptoms[0].symptom, Symptom::Headache);
        assert_eq!(report.top_symptoms[0].weight, 9);
        assert_eq!(report.recorded_days, 4);
        // (85 + 100 + 85 + 85) / 4 = 88.75
        assert_eq!(report.average_score, Some(89));
    }

    #[test]
    fn weekly_timeline_flags() {
        let mut period_day = DailyRecord::new("2024-05-14").with_answer("hospitalVisit", "yes");
        period_day.is_period = true;
        let records = vec![
            period_day,
            DailyRecord::new("2024-05-18").with_answer("medicationChange", true),
            DailyRecord::new("2024-05-20").with_answer("headache", "intense"),
            DailyRecord::new("garbage").with_answer("headache", "intense"),
        ];
        let report = weekly_report(&records, day("2024-05-13"));

        assert_eq!(report.days.len(), 7);
        assert!(!report.days[0].has_record);
        assert!(report.days[1].is_period);
        assert!(report.days[1].hospital_visit);
        assert!(report.days[5].medication_change);
        assert_eq!(report.recorded_days, 2);
        assert!(report.top_symptoms.is_empty());
        assert_eq!(report.average_score, Some(100));
    }

    #[test]
    fn empty_week_has_no_average() {
        let report = weekly_report(&[], day("2024-05-13"));
        assert_eq!(report.average_score, None);
        assert!(report.days.iter().all(|d| !d.has_record));
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let records = vec![
            DailyRecord::new("2024-05-13").with_answer("pain", "intense"),
            DailyRecord::new("2024-05-13").with_answer("pain", "mild"),
        ];
        let report = weekly_report(&records, day("2024-05-13"));
        assert_eq!(report.average_score, Some(95));
    }

    #[test]
    fn temperature_stats_ignore_bad_values() {
        let records = vec![
            DailyRecord::new("2024-05-01").with_answer("temperature", "36.5"),
            DailyRecord::new("2024-05-02").with_answer("temperature", 36.8),
            DailyRecord::new("2024-05-03").with_answer("temperature", "n/a"),
            DailyRecord::new("2024-05-04").with_answer("temperature", "37.1"),
        ];
        let report = monthly_report(&records, day("2024-05-20"));

        assert_eq!(report.temperature.count, 3);
        assert_eq!(report.temperature.max, Some(37.1));
        assert_eq!(report.temperature.min, Some(36.5));
        assert_eq!(report.temperature.average, Some(36.8));
        assert_eq!(report.days[2].temperature, None);
        assert_eq!(report.days[2].score, Some(100));
        assert_eq!(report.days[10].score, None);
    }

    #[test]
    fn blood_test_notes_carry_into_month_days() {
        let records = vec![
            DailyRecord::new("2024-05-07").with_answer("bloodTestNote", "FSH 42"),
            DailyRecord::new("2024-05-08").with_answer("bloodTestNote", "  "),
        ];
        let report = monthly_report(&records, day("2024-05-20"));
        assert_eq!(report.days[6].blood_test_note.as_deref(), Some("FSH 42"));
        assert_eq!(report.days[7].blood_test_note, None);
        assert_eq!(report.days[7].score, Some(100));
    }

    #[test]
    fn monthly_compares_with_previous_month() {
        let records = vec![
            DailyRecord::new("2024-04-10")
                .with_answer("sleep", "intense")
                .with_answer("mood", "mild"),
            DailyRecord::new("2024-04-11").with_answer("pain", "mild"),
            DailyRecord::new("2024-05-02")
                .with_answer("sleep", "mild")
                .with_answer("mood", "intense"),
            DailyRecord::new("2024-05-03").with_answer("pain", "mild"),
            DailyRecord::new("2024-06-01").with_answer("pain", "intense"),
        ];
        let report = monthly_report(&records, day("2024-05-31"));

        assert_eq!(report.month_start, day("2024-05-01"));
        assert_eq!(report.days.len(), 31);
        // May: 80 and 95; April: 80 and 95
        assert_eq!(report.average_score, Some(88));
        assert_eq!(report.previous_average_score, Some(88));
        assert_eq!(report.score_change, Some(0));

        let ranked: Vec<(Symptom, Trend)> = report
            .top_symptoms
            .iter()
            .map(|entry| (entry.symptom, entry.trend))
            .collect();
        assert_eq!(
            ranked,
            vec![
                (Symptom::Mood, Trend::Up),
                (Symptom::Sleep, Trend::Down),
                (Symptom::Pain, Trend::Same),
            ]
        );
        assert_eq!(report.top_symptoms[0].previous_weight, 1);
    }

    #[test]
    fn month_without_records_has_empty_summary() {
        let report = monthly_report(&[], day("2024-01-15"));
        assert_eq!(report.average_score, None);
        assert_eq!(report.previous_average_score, None);
        assert_eq!(report.score_change, None);
        assert_eq!(report.temperature, TemperatureStats::default());
        assert!(report.top_symptoms.is_empty());
        assert_eq!(report.days.len(), 31);
    }
}
