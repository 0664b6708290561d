use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_day(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ParseError::InvalidDate {
        value: value.to_string(),
    })
}

/// Four-point ordinal answer scale shared by the questionnaire and the
/// daily check-in. Ordering follows severity, so `Intense` is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Intense,
}

impl Severity {
    /// Column order of the score table.
    pub const COLUMNS: [Severity; 4] = [
        Severity::Intense,
        Severity::Moderate,
        Severity::Mild,
        Severity::None,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::Intense => 0,
            Self::Moderate => 1,
            Self::Mild => 2,
            Self::None => 3,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::COLUMNS.get(i).copied())
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Intense => "intense",
            Self::Moderate => "moderate",
            Self::Mild => "mild",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "intense" => Ok(Self::Intense),
            "moderate" => Ok(Self::Moderate),
            "mild" => Ok(Self::Mild),
            "none" => Ok(Self::None),
            other => Err(ParseError::UnknownSeverity(other.to_string())),
        }
    }
}

/// The ten menopause index items. Daily check-ins reuse the same keys, and
/// anything outside this list is never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symptom {
    Hotflash,
    Sweat,
    Cold,
    Palpitation,
    Sleep,
    Irritability,
    Mood,
    Headache,
    Fatigue,
    Pain,
}

impl Symptom {
    /// Row order of the score table.
    pub const ALL: [Symptom; 10] = [
        Symptom::Hotflash,
        Symptom::Sweat,
        Symptom::Cold,
        Symptom::Palpitation,
        Symptom::Sleep,
        Symptom::Irritability,
        Symptom::Mood,
        Symptom::Headache,
        Symptom::Fatigue,
        Symptom::Pain,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Hotflash => "hotflash",
            Self::Sweat => "sweat",
            Self::Cold => "cold",
            Self::Palpitation => "palpitation",
            Self::Sleep => "sleep",
            Self::Irritability => "irritability",
            Self::Mood => "mood",
            Self::Headache => "headache",
            Self::Fatigue => "fatigue",
            Self::Pain => "pain",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Hotflash => "Hot flashes or facial flushing",
            Self::Sweat => "Sweating easily",
            Self::Cold => "Cold hands, feet or lower back",
            Self::Palpitation => "Shortness of breath or palpitations",
            Self::Sleep => "Trouble falling or staying asleep",
            Self::Irritability => "Irritability or quick temper",
            Self::Mood => "Low mood or worrying",
            Self::Headache => "Headache, dizziness or nausea",
            Self::Fatigue => "Tiring easily",
            Self::Pain => "Stiff shoulders, back or joint pain",
        }
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Symptom {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|symptom| symptom.key() == s.trim())
            .ok_or_else(|| ParseError::UnknownSymptom(s.to_string()))
    }
}

/// Daily bleeding answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bleeding {
    None,
    Light,
    Normal,
    Heavy,
}

impl FromStr for Bleeding {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" => Ok(Self::None),
            "light" => Ok(Self::Light),
            "normal" => Ok(Self::Normal),
            "heavy" => Ok(Self::Heavy),
            other => Err(ParseError::UnknownBleeding(other.to_string())),
        }
    }
}

/// Flow recorded against a whole period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BleedingIntensity {
    Light,
    #[default]
    Normal,
    Heavy,
}

impl BleedingIntensity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Normal => "normal",
            Self::Heavy => "heavy",
        }
    }
}

impl FromStr for BleedingIntensity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "normal" | "" => Ok(Self::Normal),
            "heavy" => Ok(Self::Heavy),
            other => Err(ParseError::UnknownBleeding(other.to_string())),
        }
    }
}

/// A single answer value as stored by the app. Severity labels and free
/// text arrive as strings, temperatures as strings or numbers, yes/no
/// items sometimes as booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Number(value) => *value != 0.0,
            Self::Text(text) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "yes" | "true" | "1"
            ),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Severity> for AnswerValue {
    fn from(value: Severity) -> Self {
        Self::Text(value.label().to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: String,
    #[serde(default)]
    pub answers: BTreeMap<String, Option<AnswerValue>>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub is_period: bool,
}

impl DailyRecord {
    pub fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            ..Self::default()
        }
    }

    pub fn with_answer(mut self, key: &str, value: impl Into<AnswerValue>) -> Self {
        self.answers.insert(key.to_string(), Some(value.into()));
        self
    }

    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date).ok()
    }

    fn answer(&self, key: &str) -> Option<&AnswerValue> {
        self.answers.get(key).and_then(Option::as_ref)
    }

    /// Severity recorded for a symptom; unknown labels count as unanswered.
    pub fn severity(&self, symptom: Symptom) -> Option<Severity> {
        self.answer(symptom.key())
            .and_then(AnswerValue::as_text)
            .and_then(|label| label.parse().ok())
    }

    pub fn bleeding(&self) -> Option<Bleeding> {
        self.answer("bleeding")
            .and_then(AnswerValue::as_text)
            .and_then(|label| label.parse().ok())
    }

    /// Body temperature, only when it is a finite number.
    pub fn temperature(&self) -> Option<f64> {
        let value = match self.answer("temperature")? {
            AnswerValue::Number(value) => *value,
            AnswerValue::Text(text) => text.trim().parse::<f64>().ok()?,
            AnswerValue::Flag(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn hospital_visit(&self) -> bool {
        self.answer("hospitalVisit").is_some_and(AnswerValue::is_truthy)
    }

    pub fn medication_change(&self) -> bool {
        self.answer("medicationChange")
            .is_some_and(AnswerValue::is_truthy)
    }

    pub fn blood_test_note(&self) -> Option<&str> {
        self.answer("bloodTestNote")
            .and_then(AnswerValue::as_text)
            .filter(|note| !note.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodSymptoms {
    pub cramps: bool,
    pub back_pain: bool,
    pub headache: bool,
    pub bloating: bool,
    pub fatigue: bool,
    pub mood_swings: bool,
    pub breast_tenderness: bool,
    pub acne: bool,
}

impl PeriodSymptoms {
    pub fn active(&self) -> Vec<&'static str> {
        [
            (self.cramps, "cramps"),
            (self.back_pain, "back pain"),
            (self.headache, "headache"),
            (self.bloating, "bloating"),
            (self.fatigue, "fatigue"),
            (self.mood_swings, "mood swings"),
            (self.breast_tenderness, "breast tenderness"),
            (self.acne, "acne"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRecord {
    pub start_date: String,
    #[serde(default)]
    pub bleeding: BleedingIntensity,
    #[serde(default)]
    pub symptoms: PeriodSymptoms,
    #[serde(default)]
    pub memo: Option<String>,
}

impl PeriodRecord {
    pub fn new(start_date: &str) -> Self {
        Self {
            start_date: start_date.to_string(),
            ..Self::default()
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_day(&self.start_date).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmiAnswer {
    pub id: Symptom,
    #[serde(default, alias = "severityLabel")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
    pub vasomotor_strong: bool,
    pub physical_strong: bool,
    pub mental_strong: bool,
    pub cold_strong: bool,
    pub headache_strong: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyQuestion {
    pub id: &'static str,
    pub label: &'static str,
    pub choices: &'static [Choice],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub next_period_date: Option<NaiveDate>,
    pub days_until_next: Option<i64>,
    pub estimated_cycle_length: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulatory,
    Luteal,
    Unknown,
}

impl CyclePhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Menstrual => "menstrual",
            Self::Follicular => "follicular",
            Self::Ovulatory => "ovulatory",
            Self::Luteal => "luteal",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseInfo {
    pub phase: CyclePhase,
    pub day_in_cycle: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub periods: usize,
    pub gaps: Vec<i64>,
    pub shortest: Option<i64>,
    pub longest: Option<i64>,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMarker {
    pub is_start: bool,
    pub is_period: bool,
    pub is_next_predicted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMark {
    pub date: NaiveDate,
    pub is_period: bool,
    pub hospital_visit: bool,
    pub medication_change: bool,
    pub has_record: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymptomRank {
    pub symptom: Symptom,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DayMark>,
    pub top_symptoms: Vec<SymptomRank>,
    pub average_score: Option<u32>,
    pub recorded_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDay {
    pub date: NaiveDate,
    pub score: Option<u32>,
    pub temperature: Option<f64>,
    pub is_period: bool,
    pub hospital_visit: bool,
    pub medication_change: bool,
    pub blood_test_note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub count: usize,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingSymptom {
    pub symptom: Symptom,
    pub weight: u32,
    pub previous_weight: u32,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month_start: NaiveDate,
    pub days: Vec<MonthlyDay>,
    pub average_score: Option<u32>,
    pub previous_average_score: Option<u32>,
    pub score_change: Option<i64>,
    pub temperature: TemperatureStats,
    pub top_symptoms: Vec<TrendingSymptom>,
}
