use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cyclecare_insights::cycle::{self, PredictionConfig};
use cyclecare_insights::markers::{self, MarkerConfig};
use cyclecare_insights::models::{Severity, SmiAnswer, Symptom};
use cyclecare_insights::smi::{self, SmiBand};
use cyclecare_insights::{aggregate, import, report};

const MAX_CYCLE_LENGTH: i64 = 365;

#[derive(Parser)]
#[command(name = "cyclecare")]
#[command(about = "Cycle prediction and symptom reports from exported tracker history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a menopause index questionnaire and list the daily follow-up questions
    Smi {
        /// Ten comma-separated labels in questionnaire order, `-` for unanswered
        #[arg(long, value_delimiter = ',')]
        answers: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Predict the next period from a period history export
    Predict {
        #[arg(long)]
        periods: PathBuf,
        #[arg(
            long,
            default_value_t = cycle::DEFAULT_CYCLE_LENGTH,
            value_parser = clap::value_parser!(i64).range(1..=MAX_CYCLE_LENGTH)
        )]
        default_cycle_length: i64,
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Show the current cycle phase
    #[command(group(
        ArgGroup::new("source")
            .args(["periods", "last_start"])
            .required(true)
            .multiple(false)
    ))]
    Phase {
        #[arg(long)]
        periods: Option<PathBuf>,
        #[arg(long)]
        last_start: Option<NaiveDate>,
        /// Defaults to the estimate from `--periods`, or 28 days
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_CYCLE_LENGTH))]
        cycle_length: Option<i64>,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print the calendar marker map as JSON
    Markers {
        #[arg(long)]
        periods: PathBuf,
        #[arg(
            long,
            default_value_t = cycle::DEFAULT_CYCLE_LENGTH,
            value_parser = clap::value_parser!(i64).range(1..=MAX_CYCLE_LENGTH)
        )]
        cycle_length: i64,
        #[arg(
            long,
            default_value_t = markers::DEFAULT_PERIOD_LENGTH,
            value_parser = clap::value_parser!(i64).range(1..=markers::MAX_PERIOD_LENGTH)
        )]
        period_length: i64,
    },
    /// Generate the weekly check-in report
    Weekly {
        #[arg(long)]
        daily: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Generate the monthly check-in report
    Monthly {
        #[arg(long)]
        daily: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_answers(raw: &[String]) -> anyhow::Result<Vec<Option<Severity>>> {
    raw.iter()
        .map(|label| match label.trim() {
            "" | "-" => Ok(None),
            other => other
                .parse::<Severity>()
                .map(Some)
                .with_context(|| format!("invalid answer {other:?}")),
        })
        .collect()
}

fn emit(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Smi { answers, json } => {
            let levels = parse_answers(&answers)?;
            if levels.len() != smi::QUESTION_COUNT {
                tracing::warn!(
                    given = levels.len(),
                    expected = smi::QUESTION_COUNT,
                    "answer count mismatch, total scores as 0"
                );
            }
            let total = smi::total_score(&levels);
            let band = SmiBand::from_score(total);
            let labelled: Vec<SmiAnswer> = Symptom::ALL
                .iter()
                .zip(levels.iter())
                .map(|(id, severity)| SmiAnswer {
                    id: *id,
                    severity: *severity,
                })
                .collect();
            let clusters = smi::classify_clusters(&labelled);
            let questions = smi::daily_questions(&clusters);

            if json {
                let value = serde_json::json!({
                    "totalScore": total,
                    "band": band,
                    "advice": band.advice(),
                    "clusters": clusters,
                    "dailyQuestions": questions,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            println!("SMI total: {total} / {}", smi::max_total_score());
            println!("{}", band.advice());
            println!("Daily questions:");
            for question in questions.iter() {
                println!("- {} ({})", question.label, question.id);
            }
        }
        Commands::Predict {
            periods,
            default_cycle_length,
            today,
            json,
        } => {
            let history = import::load_period_records(&periods)?.records;
            let today = today.unwrap_or_else(cycle::today);
            let config = PredictionConfig {
                default_cycle_length,
                ..PredictionConfig::default()
            };
            let prediction = cycle::predict_next_period(&history, &config, today);

            if json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
                return Ok(());
            }

            let phase = cycle::cycle_phase(
                cycle::latest_start(&history),
                prediction.estimated_cycle_length,
                today,
            );
            print!(
                "{}",
                report::build_cycle_summary(
                    &prediction,
                    &phase,
                    &cycle::cycle_stats(&history),
                    cycle::latest_period(&history),
                )
            );
        }
        Commands::Phase {
            periods,
            last_start,
            cycle_length,
            today,
        } => {
            let today = today.unwrap_or_else(cycle::today);
            let (start, estimated) = match periods {
                Some(path) => {
                    let history = import::load_period_records(&path)?.records;
                    (
                        cycle::latest_start(&history),
                        cycle::estimate_cycle_length(&history, &PredictionConfig::default()),
                    )
                }
                None => (last_start, cycle::DEFAULT_CYCLE_LENGTH),
            };
            let info = cycle::cycle_phase(start, cycle_length.unwrap_or(estimated), today);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Markers {
            periods,
            cycle_length,
            period_length,
        } => {
            let history = import::load_period_records(&periods)?.records;
            let config = MarkerConfig {
                cycle_length,
                period_length,
            };
            let map = markers::build_marker_map(&history, &config);
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Commands::Weekly {
            daily,
            today,
            out,
            json,
        } => {
            let records = import::load_daily_records(&daily)?.records;
            let weekly = aggregate::weekly_report(&records, today.unwrap_or_else(cycle::today));
            let text = if json {
                serde_json::to_string_pretty(&weekly)? + "\n"
            } else {
                report::build_weekly_report(&weekly)
            };
            emit(out.as_deref(), &text)?;
        }
        Commands::Monthly {
            daily,
            today,
            out,
            json,
        } => {
            let records = import::load_daily_records(&daily)?.records;
            let monthly = aggregate::monthly_report(&records, today.unwrap_or_else(cycle::today));
            let text = if json {
                serde_json::to_string_pretty(&monthly)? + "\n"
            } else {
                report::build_monthly_report(&monthly)
            };
            emit(out.as_deref(), &text)?;
        }
    }

    Ok(())
}
