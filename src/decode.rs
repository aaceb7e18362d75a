//! Decoding of the option list sent with an interaction.

use std::collections::HashMap;

use anyhow::{Context, Result};
use twilight_model::application::{
    command::CommandOptionType,
    interaction::application_command::{CommandDataOption, CommandOptionValue},
};

use crate::{
    arguments::{CommandOptions, OptionalArgumentConverter},
    naming::to_field_name,
    validation::ValidationError,
};

/// Raw option values of one interaction, keyed by field name.
///
/// Options the user left out are absent; no defaults are filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    values: HashMap<String, CommandOptionValue>,
}

impl Body {
    pub fn get(&self, field: &str) -> Option<&CommandOptionValue> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandOptionValue)> {
        self.values
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    /// Converts a field into a Rust type. Use `Option<T>` for optional fields.
    pub fn parse<T: OptionalArgumentConverter>(&self, field: &str) -> Result<T> {
        T::convert(self.values.get(field)).with_context(|| format!("option `{field}`"))
    }

    fn insert(&mut self, field: String, value: CommandOptionValue) {
        self.values.insert(field, value);
    }
}

impl FromIterator<(String, CommandOptionValue)> for Body {
    fn from_iter<I: IntoIterator<Item = (String, CommandOptionValue)>>(iter: I) -> Self {
        Body {
            values: iter.into_iter().collect(),
        }
    }
}

/// Result of decoding: the accepted values plus every rejected field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub body: Body,
    /// In the order the rejected options were received
    pub errors: Vec<ValidationError>,
}

/// The interaction does not match the declared options.
///
/// This means the registered schema and the running code disagree, it is
/// never reported to the user as invalid input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("received option `{0}` which the command does not declare")]
    UnknownOption(String),
    #[error("option `{field}` was declared as {expected:?} but received {received:?}")]
    KindMismatch {
        field: String,
        expected: CommandOptionType,
        received: CommandOptionType,
    },
    #[error("option `{0}` carries an autocomplete value")]
    Focused(String),
}

/// Decodes the options of an interaction against the declared options.
///
/// Subcommand and subcommand group values are flattened into the same body.
/// Validation failures are collected rather than returned early so the caller
/// can report every invalid field at once.
pub fn decode(
    options: &CommandOptions,
    incoming: &[CommandDataOption],
) -> Result<Decoded, DecodeError> {
    let mut decoded = Decoded::default();
    decode_into(options, incoming, &mut decoded)?;

    if !decoded.errors.is_empty() {
        tracing::debug!(
            errors = decoded.errors.len(),
            "interaction options failed validation"
        );
    }
    Ok(decoded)
}

fn decode_into(
    options: &CommandOptions,
    incoming: &[CommandDataOption],
    decoded: &mut Decoded,
) -> Result<(), DecodeError> {
    for option in incoming {
        let value = match &option.value {
            CommandOptionValue::SubCommand(nested) | CommandOptionValue::SubCommandGroup(nested) => {
                decode_into(options, nested, decoded)?;
                continue;
            }
            CommandOptionValue::Focused(..) => {
                return Err(DecodeError::Focused(option.name.clone()));
            }
            value => value,
        };

        let field = to_field_name(&option.name);
        let Some(schema) = options.get(&field) else {
            return Err(DecodeError::UnknownOption(option.name.clone()));
        };

        if schema.kind != value.kind() {
            return Err(DecodeError::KindMismatch {
                field,
                expected: schema.kind,
                received: value.kind(),
            });
        }

        if let Some(validator) = &schema.validator
            && let Err(failure) = validator.validate(value)
        {
            decoded.errors.push(ValidationError { field, failure });
            continue;
        }

        decoded.body.insert(field, value.clone());
    }
    Ok(())
}
