use std::fmt;

use twilight_model::application::interaction::application_command::CommandOptionValue;

/// Why a validator rejected an option value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub message: String,
    /// Machine readable reason, when the validator provides one
    pub code: Option<String>,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationFailure {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// A [`ValidationFailure`] attached to the field it was reported for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub failure: ValidationFailure,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.failure)
    }
}

impl std::error::Error for ValidationError {}

/// Checks a raw option value before it is placed in a body.
///
/// Validators should be cheap and free of side effects: they run inline while
/// an interaction is decoded.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &CommandOptionValue) -> Result<(), ValidationFailure>;
}

impl<F> Validator for F
where
    F: Fn(&CommandOptionValue) -> Result<(), ValidationFailure> + Send + Sync,
{
    fn validate(&self, value: &CommandOptionValue) -> Result<(), ValidationFailure> {
        self(value)
    }
}

/// Renders the ephemeral reply sent back when a command receives invalid input.
pub fn input_error_message(errors: &[ValidationError]) -> String {
    let messages = errors
        .iter()
        .map(|error| error.failure.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("There was an error with your input: {messages}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(value: &CommandOptionValue) -> Result<(), ValidationFailure> {
        match value {
            CommandOptionValue::String(s) if s.chars().all(|c| c.is_ascii_digit()) => Ok(()),
            _ => Err(ValidationFailure::new("must be numeric").with_code("not_numeric")),
        }
    }

    #[test]
    fn functions_are_validators() {
        let validator: &dyn Validator = &numeric;
        assert!(validator.validate(&CommandOptionValue::String("123".into())).is_ok());

        let failure = validator
            .validate(&CommandOptionValue::String("abc".into()))
            .unwrap_err();
        assert_eq!(failure.message, "must be numeric");
        assert_eq!(failure.code.as_deref(), Some("not_numeric"));
    }

    #[test]
    fn input_error_message_joins_messages() {
        let errors = vec![
            ValidationError {
                field: "to".into(),
                failure: ValidationFailure::new("invalid user id"),
            },
            ValidationError {
                field: "amount".into(),
                failure: ValidationFailure::new("too large"),
            },
        ];
        assert_eq!(
            input_error_message(&errors),
            "There was an error with your input: invalid user id, too large"
        );
    }

    #[test]
    fn validation_error_display_names_field() {
        let error = ValidationError {
            field: "to".into(),
            failure: ValidationFailure::new("invalid user id"),
        };
        assert_eq!(error.to_string(), "to: invalid user id");
    }
}
