//! Validation errors raised while expanding activities.

/// An activity (or the reference date) was rejected.
///
/// Every variant names the offending activity so the caller can point the
/// user at the rule that needs fixing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Activity '{activity}' is missing required field '{field}'")]
    MissingField {
        activity: String,
        field: &'static str,
    },

    #[error("Invalid time format '{value}' for activity '{activity}', use HH:MM")]
    BadTime { activity: String, value: String },

    #[error("Invalid day '{value}' in activity '{activity}', use Monday..Sunday")]
    BadDay { activity: String, value: String },

    #[error("Invalid repetition '{value}' in activity '{activity}', use weekly/monthly/one-time")]
    BadRepetition { activity: String, value: String },

    #[error("Invalid reference date '{value}', use YYYY-MM-DD")]
    BadReferenceDate { value: String },
}

impl ValidationError {
    /// Name of the rejected activity, if the error concerns one.
    pub fn activity(&self) -> Option<&str> {
        match self {
            Self::MissingField { activity, .. }
            | Self::BadTime { activity, .. }
            | Self::BadDay { activity, .. }
            | Self::BadRepetition { activity, .. } => Some(activity.as_str()),
            Self::BadReferenceDate { .. } => None,
        }
    }

    /// The field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. } => *field,
            Self::BadTime { .. } => "time",
            Self::BadDay { .. } => "days",
            Self::BadRepetition { .. } => "repetition",
            Self::BadReferenceDate { .. } => "reference_date",
        }
    }
}
