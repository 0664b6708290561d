//! Parse errors for the typed labels callers hand in as strings.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown severity label: {0}")]
    UnknownSeverity(String),

    #[error("unknown symptom key: {0}")]
    UnknownSymptom(String),

    #[error("unknown bleeding label: {0}")]
    UnknownBleeding(String),

    #[error("invalid date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { value: String },
}
