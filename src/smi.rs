use serde::Serialize;

use crate::models::{Choice, ClusterResult, DailyQuestion, Severity, SmiAnswer, Symptom};

/// Simplified Menopausal Index weights. Rows follow `Symptom::ALL`, columns
/// follow `Severity::COLUMNS` (intense, moderate, mild, none).
pub const SCORE_TABLE: [[u32; 4]; 10] = [
    [10, 6, 3, 0],
    [10, 6, 3, 0],
    [14, 9, 5, 0],
    [12, 8, 4, 0],
    [14, 9, 5, 0],
    [12, 8, 4, 0],
    [7, 5, 3, 0],
    [7, 5, 3, 0],
    [7, 4, 2, 0],
    [7, 5, 3, 0],
];

pub const QUESTION_COUNT: usize = Symptom::ALL.len();

const VASOMOTOR_THRESHOLD: u32 = 10;
const PHYSICAL_THRESHOLD: u32 = 14;
const MENTAL_THRESHOLD: u32 = 7;
const COLD_THRESHOLD: u32 = 7;
const HEADACHE_THRESHOLD: u32 = 7;

pub fn weight(symptom: Symptom, severity: Severity) -> u32 {
    SCORE_TABLE[symptom.index()][severity.index()]
}

/// Worst possible total, the sum of each row's largest weight.
pub fn max_total_score() -> u32 {
    SCORE_TABLE
        .iter()
        .map(|row| row.iter().copied().max().unwrap_or(0))
        .sum()
}

/// SMI total over answers given in `Symptom::ALL` order. Anything other
/// than exactly ten entries scores 0.
pub fn total_score(answers: &[Option<Severity>]) -> u32 {
    if answers.len() != QUESTION_COUNT {
        return 0;
    }

    Symptom::ALL
        .iter()
        .zip(answers)
        .filter_map(|(symptom, answer)| answer.map(|severity| weight(*symptom, severity)))
        .sum()
}

/// Same as [`total_score`] for callers holding raw column indices. An index
/// outside 0..=3 makes the whole array malformed.
pub fn total_score_from_indices(answers: &[Option<i64>]) -> u32 {
    let mut levels = Vec::with_capacity(answers.len());
    for answer in answers {
        match answer {
            Some(index) => match Severity::from_index(*index) {
                Some(severity) => levels.push(Some(severity)),
                None => {
                    tracing::debug!(
                        index = *index,
                        "severity index out of range, scoring as malformed"
                    );
                    return 0;
                }
            },
            None => levels.push(None),
        }
    }
    total_score(&levels)
}

fn answered_weight(answers: &[SmiAnswer], symptom: Symptom) -> u32 {
    answers
        .iter()
        .find(|answer| answer.id == symptom)
        .and_then(|answer| answer.severity)
        .map(|severity| weight(symptom, severity))
        .unwrap_or(0)
}

fn cluster_weight(answers: &[SmiAnswer], symptoms: &[Symptom]) -> u32 {
    symptoms
        .iter()
        .map(|symptom| answered_weight(answers, *symptom))
        .sum()
}

pub fn classify_clusters(answers: &[SmiAnswer]) -> ClusterResult {
    let vasomotor = cluster_weight(answers, &[Symptom::Hotflash, Symptom::Sweat]);
    let physical = cluster_weight(
        answers,
        &[
            Symptom::Cold,
            Symptom::Palpitation,
            Symptom::Headache,
            Symptom::Fatigue,
            Symptom::Pain,
        ],
    );
    let mental = cluster_weight(
        answers,
        &[Symptom::Sleep, Symptom::Irritability, Symptom::Mood],
    );

    ClusterResult {
        vasomotor_strong: vasomotor >= VASOMOTOR_THRESHOLD,
        physical_strong: physical >= PHYSICAL_THRESHOLD,
        mental_strong: mental >= MENTAL_THRESHOLD,
        cold_strong: answered_weight(answers, Symptom::Cold) >= COLD_THRESHOLD,
        headache_strong: answered_weight(answers, Symptom::Headache) >= HEADACHE_THRESHOLD,
    }
}

pub const SEVERITY_CHOICES: [Choice; 4] = [
    Choice {
        value: "intense",
        label: "Intense",
    },
    Choice {
        value: "moderate",
        label: "Moderate",
    },
    Choice {
        value: "mild",
        label: "Mild",
    },
    Choice {
        value: "none",
        label: "None",
    },
];

pub const BLEEDING_CHOICES: [Choice; 4] = [
    Choice {
        value: "none",
        label: "None",
    },
    Choice {
        value: "light",
        label: "Light",
    },
    Choice {
        value: "normal",
        label: "Normal",
    },
    Choice {
        value: "heavy",
        label: "Heavy",
    },
];

pub fn bleeding_question() -> DailyQuestion {
    DailyQuestion {
        id: "bleeding",
        label: "Any bleeding today?",
        choices: &BLEEDING_CHOICES,
    }
}

pub fn symptom_question(symptom: Symptom) -> DailyQuestion {
    DailyQuestion {
        id: symptom.key(),
        label: symptom.description(),
        choices: &SEVERITY_CHOICES,
    }
}

const FALLBACK_SYMPTOMS: [Symptom; 3] = [Symptom::Fatigue, Symptom::Sleep, Symptom::Mood];

/// Follow-up questions for the daily check-in, bleeding first, each symptom
/// asked at most once.
pub fn daily_questions(clusters: &ClusterResult) -> Vec<DailyQuestion> {
    let mut wanted: Vec<Symptom> = Vec::new();

    if clusters.vasomotor_strong {
        wanted.extend([Symptom::Hotflash, Symptom::Sweat, Symptom::Sleep]);
    }
    if clusters.physical_strong {
        wanted.extend([Symptom::Fatigue, Symptom::Pain, Symptom::Palpitation]);
        if clusters.cold_strong {
            wanted.push(Symptom::Cold);
        }
        if clusters.headache_strong {
            wanted.push(Symptom::Headache);
        }
    }
    if clusters.mental_strong {
        wanted.extend([Symptom::Mood, Symptom::Irritability, Symptom::Sleep]);
    }
    if wanted.is_empty() {
        wanted.extend(FALLBACK_SYMPTOMS);
    }

    let mut questions = vec![bleeding_question()];
    for symptom in wanted {
        if questions.iter().all(|question| question.id != symptom.key()) {
            questions.push(symptom_question(symptom));
        }
    }
    questions
}

/// Interpretation bands of the SMI total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SmiBand {
    Managing,
    LifestyleCare,
    SeeDoctor,
    PlannedTreatment,
    SpecialistExam,
}

impl SmiBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=25 => Self::Managing,
            26..=50 => Self::LifestyleCare,
            51..=65 => Self::SeeDoctor,
            66..=80 => Self::PlannedTreatment,
            _ => Self::SpecialistExam,
        }
    }

    pub const fn advice(self) -> &'static str {
        match self {
            Self::Managing => "Symptoms are well managed.",
            Self::LifestyleCare => "Pay attention to diet and exercise.",
            Self::SeeDoctor => "Consider seeing a doctor about menopause symptoms.",
            Self::PlannedTreatment => "A long-term, planned course of treatment is advised.",
            Self::SpecialistExam => "Get a thorough examination from the relevant specialists.",
        }
    }
}
