use thiserror::Error;

use crate::i18n::{TemplateArgs, TemplateKey, Translator};
use crate::store::StoreError;
use crate::types::{MealSlot, Weekday};

/// Local precondition failures. Detected before any external call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Calendar name cannot be empty")]
    EmptyCalendarName,

    #[error("A calendar named \"{0}\" already exists")]
    DuplicateCalendarName(String),

    #[error("No active profile selected")]
    NoActiveProfile,

    #[error("Rating {0} is out of range (1-5)")]
    RatingOutOfRange(i64),

    #[error("Profile name cannot be empty")]
    EmptyProfileName,

    #[error("At most {max} profiles can exist")]
    TooManyProfiles { max: usize },

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Unknown calendar: {0}")]
    UnknownCalendar(String),

    #[error("No meal planned for {day:?} {slot:?}")]
    SlotNotPlanned { day: Weekday, slot: MealSlot },

    #[error("{day:?} {slot:?} is already being updated")]
    SlotBusy { day: Weekday, slot: MealSlot },
}

/// Error surfaced by every planner operation.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Generation service is not configured: {0}")]
    Configuration(String),

    #[error("Rate limit exceeded while {context}")]
    RateLimitExceeded { context: String },

    #[error("Empty response while {context}")]
    EmptyResponse { context: String },

    #[error("Malformed response while {context}: {detail}")]
    MalformedResponse { context: String, detail: String },

    #[error("Transport failure while {context}: {cause}")]
    Transport { context: String, cause: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl PlannerError {
    pub fn malformed(context: impl Into<String>, detail: impl ToString) -> Self {
        PlannerError::MalformedResponse {
            context: context.into(),
            detail: detail.to_string(),
        }
    }

    pub fn transport(context: impl Into<String>, cause: impl ToString) -> Self {
        PlannerError::Transport {
            context: context.into(),
            cause: cause.to_string(),
        }
    }

    /// Whether retrying the same operation later may succeed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            PlannerError::Configuration(_) | PlannerError::Validation(_)
        )
    }

    /// Human-readable message in the translator's language.
    pub fn localized(&self, translator: &dyn Translator) -> String {
        match self {
            PlannerError::Configuration(_) => {
                translator.render(TemplateKey::ApiKeyMissing, &TemplateArgs::new())
            }
            PlannerError::RateLimitExceeded { .. } => {
                translator.render(TemplateKey::RateLimitError, &TemplateArgs::new())
            }
            PlannerError::EmptyResponse { context } => translator.render(
                TemplateKey::EmptyResponseError,
                &TemplateArgs::new().with("context", context),
            ),
            PlannerError::MalformedResponse { context, .. }
            | PlannerError::Transport { context, .. } => translator.render(
                TemplateKey::GenericApiError,
                &TemplateArgs::new().with("context", context),
            ),
            PlannerError::Validation(err) => localized_validation(err, translator),
            PlannerError::Storage(_) => {
                translator.render(TemplateKey::StorageError, &TemplateArgs::new())
            }
        }
    }
}

fn localized_validation(err: &ValidationError, translator: &dyn Translator) -> String {
    let (key, args) = match err {
        ValidationError::EmptyCalendarName => (TemplateKey::CalendarNameEmpty, TemplateArgs::new()),
        ValidationError::DuplicateCalendarName(name) => (
            TemplateKey::CalendarNameExists,
            TemplateArgs::new().with("name", name),
        ),
        ValidationError::NoActiveProfile => (TemplateKey::NoActiveProfile, TemplateArgs::new()),
        ValidationError::RatingOutOfRange(value) => (
            TemplateKey::RatingOutOfRange,
            TemplateArgs::new().with("value", value),
        ),
        ValidationError::EmptyProfileName => (TemplateKey::ProfileNameEmpty, TemplateArgs::new()),
        ValidationError::TooManyProfiles { max } => (
            TemplateKey::TooManyProfiles,
            TemplateArgs::new().with("max", max),
        ),
        ValidationError::UnknownProfile(_) => (TemplateKey::UnknownProfile, TemplateArgs::new()),
        ValidationError::UnknownCalendar(_) => (TemplateKey::UnknownCalendar, TemplateArgs::new()),
        ValidationError::SlotNotPlanned { .. } | ValidationError::SlotBusy { .. } => {
            (TemplateKey::SlotUnavailable, TemplateArgs::new())
        }
    };
    translator.render(key, &args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::BuiltinTranslator;
    use crate::types::Language;

    #[test]
    fn test_localized_rate_limit() {
        let err = PlannerError::RateLimitExceeded {
            context: "generating the weekly menu".to_string(),
        };
        let en = err.localized(&BuiltinTranslator::new(Language::En));
        let es = err.localized(&BuiltinTranslator::new(Language::Es));
        assert!(en.contains("request limit"));
        assert!(es.contains("límite"));
    }

    #[test]
    fn test_localized_duplicate_name() {
        let err: PlannerError = ValidationError::DuplicateCalendarName("Week A".to_string()).into();
        let message = err.localized(&BuiltinTranslator::new(Language::En));
        assert!(message.contains("\"Week A\""));
        assert!(!err.is_recoverable());
    }
}
