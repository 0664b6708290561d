use std::fmt::Write;

use crate::models::{
    CycleStats, MonthlyReport, PeriodRecord, PhaseInfo, PredictionResult, Trend, WeeklyReport,
};

fn score_label(score: Option<u32>) -> String {
    score.map_or_else(|| "-".to_string(), |value| value.to_string())
}

pub fn build_weekly_report(report: &WeeklyReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Weekly Check-in Report");
    let _ = writeln!(
        output,
        "Week of {} to {} ({} days recorded)",
        report.week_start, report.week_end, report.recorded_days
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "Average score: {}", score_label(report.average_score));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Days");

    for day in report.days.iter() {
        let mut flags = Vec::new();
        if day.is_period {
            flags.push("period");
        }
        if day.hospital_visit {
            flags.push("hospital visit");
        }
        if day.medication_change {
            flags.push("medication change");
        }
        let status = if !day.has_record {
            "no record".to_string()
        } else if flags.is_empty() {
            "recorded".to_string()
        } else {
            flags.join(", ")
        };
        let _ = writeln!(output, "- {} ({}): {}", day.date, day.date.format("%a"), status);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Symptoms");

    if report.top_symptoms.is_empty() {
        let _ = writeln!(output, "No symptoms recorded this week.");
    } else {
        for (rank, entry) in report.top_symptoms.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} (weight {})",
                rank + 1,
                entry.symptom,
                entry.weight
            );
        }
    }

    output
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "up",
        Trend::Down => "down",
        Trend::Same => "same",
    }
}

pub fn build_monthly_report(report: &MonthlyReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Monthly Check-in Report");
    let _ = writeln!(output, "Month of {}", report.month_start.format("%B %Y"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Scores");
    let _ = writeln!(output, "- This month: {}", score_label(report.average_score));
    let _ = writeln!(
        output,
        "- Last month: {}",
        score_label(report.previous_average_score)
    );
    if let Some(change) = report.score_change {
        let _ = writeln!(output, "- Change: {:+}", change);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Temperature");
    let stats = &report.temperature;
    match (stats.min, stats.max, stats.average) {
        (Some(min), Some(max), Some(average)) => {
            let _ = writeln!(
                output,
                "{} readings, min {:.1}, max {:.1}, average {:.2}",
                stats.count, min, max, average
            );
        }
        _ => {
            let _ = writeln!(output, "No temperature readings this month.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Symptoms");

    if report.top_symptoms.is_empty() {
        let _ = writeln!(output, "No symptoms recorded this month.");
    } else {
        for (rank, entry) in report.top_symptoms.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. {} (weight {}, last month {}, {})",
                rank + 1,
                entry.symptom,
                entry.weight,
                entry.previous_weight,
                trend_arrow(entry.trend)
            );
        }
    }

    let flagged: Vec<String> = report
        .days
        .iter()
        .filter(|day| {
            day.hospital_visit || day.medication_change || day.blood_test_note.is_some()
        })
        .map(|day| {
            let mut notes = Vec::new();
            if day.hospital_visit {
                notes.push("hospital visit".to_string());
            }
            if day.medication_change {
                notes.push("medication change".to_string());
            }
            if let Some(note) = &day.blood_test_note {
                notes.push(format!("blood test: {note}"));
            }
            format!("- {}: {}", day.date, notes.join(", "))
        })
        .collect();

    let _ = writeln!(output);
    let _ = writeln!(output, "## Visits and Medication");
    if flagged.is_empty() {
        let _ = writeln!(output, "None this month.");
    } else {
        for line in flagged {
            let _ = writeln!(output, "{line}");
        }
    }

    output
}

pub fn build_cycle_summary(
    prediction: &PredictionResult,
    phase: &PhaseInfo,
    stats: &CycleStats,
    latest: Option<&PeriodRecord>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Cycle Summary");
    match (prediction.next_period_date, prediction.days_until_next) {
        (Some(date), Some(days)) if days < 0 => {
            let _ = writeln!(output, "Next period expected {} ({} days overdue)", date, -days);
        }
        (Some(date), Some(0)) => {
            let _ = writeln!(output, "Next period expected today ({})", date);
        }
        (Some(date), Some(days)) => {
            let _ = writeln!(output, "Next period expected {} (in {} days)", date, days);
        }
        _ => {
            let _ = writeln!(output, "No period history yet.");
        }
    }
    let _ = writeln!(
        output,
        "Estimated cycle length: {} days",
        prediction.estimated_cycle_length
    );
    if phase.day_in_cycle > 0 {
        let _ = writeln!(
            output,
            "Current phase: {} (day {})",
            phase.phase, phase.day_in_cycle
        );
    } else {
        let _ = writeln!(output, "Current phase: {}", phase.phase);
    }

    if let Some(period) = latest {
        let symptoms = period.symptoms.active();
        let _ = writeln!(
            output,
            "Last period: {} ({} flow{})",
            period.start_date,
            period.bleeding.label(),
            if symptoms.is_empty() {
                String::new()
            } else {
                format!("; {}", symptoms.join(", "))
            }
        );
    }

    if let (Some(shortest), Some(longest), Some(average)) =
        (stats.shortest, stats.longest, stats.average)
    {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "{} periods logged, gaps {}-{} days (average {:.1})",
            stats.periods, shortest, longest, average
        );
    }

    output
}
