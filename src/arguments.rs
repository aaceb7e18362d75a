use std::{fmt, sync::Arc};

use anyhow::{Result, anyhow};
use twilight_model::{
    application::{
        command::{
            CommandOptionChoice, CommandOptionChoiceValue, CommandOptionType,
            CommandOptionValue as CommandOptionBound,
        },
        interaction::application_command::CommandOptionValue,
    },
    channel::ChannelType,
};

use crate::validation::Validator;

/// Declarative description of a single command input.
#[derive(Clone)]
pub struct OptionSchema {
    pub autocomplete: Option<bool>,
    pub channel_types: Option<Vec<ChannelType>>,
    pub choices: Option<Vec<CommandOptionChoice>>,
    pub description: Option<String>,
    pub kind: CommandOptionType,
    pub max_length: Option<u16>,
    pub max_value: Option<CommandOptionBound>,
    pub min_length: Option<u16>,
    pub min_value: Option<CommandOptionBound>,
    pub required: bool,
    pub validator: Option<Arc<dyn Validator>>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid type for command argument")]
    InvalidType,
    #[error("Command argument is out of range")]
    OutOfRange,
    #[error("Missing value for command argument")]
    Missing,
}

pub trait ToOption {
    fn to_option() -> OptionSchema;
}

pub trait OptionalArgumentConverter: Sized {
    fn convert(data: Option<&CommandOptionValue>) -> Result<Self>;
}

pub trait ArgumentConverter: Sized {
    fn convert(data: &CommandOptionValue) -> Result<Self>;
}

impl<T: OptionalArgumentConverter> OptionalArgumentConverter for Option<T> {
    fn convert(data: Option<&CommandOptionValue>) -> Result<Self> {
        match data {
            Some(_) => Ok(Some(T::convert(data)?)),
            None => Ok(None),
        }
    }
}

impl<T: ArgumentConverter> OptionalArgumentConverter for T {
    fn convert(data: Option<&CommandOptionValue>) -> Result<Self> {
        if let Some(value) = data {
            T::convert(value)
        } else {
            Err(anyhow!(Error::Missing))
        }
    }
}

/// Values usable as the value of a [`CommandOptionChoice`].
pub trait IntoChoiceValue {
    fn into_choice_value(self) -> CommandOptionChoiceValue;
}

impl IntoChoiceValue for &str {
    fn into_choice_value(self) -> CommandOptionChoiceValue {
        CommandOptionChoiceValue::String(self.to_string())
    }
}

impl IntoChoiceValue for String {
    fn into_choice_value(self) -> CommandOptionChoiceValue {
        CommandOptionChoiceValue::String(self)
    }
}

impl IntoChoiceValue for i64 {
    fn into_choice_value(self) -> CommandOptionChoiceValue {
        CommandOptionChoiceValue::Integer(self)
    }
}

impl IntoChoiceValue for f64 {
    fn into_choice_value(self) -> CommandOptionChoiceValue {
        CommandOptionChoiceValue::Number(self)
    }
}

impl OptionSchema {
    /// Creates an optional input of the given kind.
    pub fn new(kind: CommandOptionType) -> Self {
        OptionSchema {
            autocomplete: None,
            channel_types: None,
            choices: None,
            description: None,
            kind,
            max_length: None,
            max_value: None,
            min_length: None,
            min_value: None,
            required: false,
            validator: None,
        }
    }

    pub fn string() -> Self {
        Self::new(CommandOptionType::String)
    }

    pub fn number() -> Self {
        Self::new(CommandOptionType::Number)
    }

    pub fn integer() -> Self {
        Self::new(CommandOptionType::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(CommandOptionType::Boolean)
    }

    pub fn user() -> Self {
        Self::new(CommandOptionType::User)
    }

    pub fn role() -> Self {
        Self::new(CommandOptionType::Role)
    }

    pub fn channel() -> Self {
        Self::new(CommandOptionType::Channel)
    }

    pub fn mentionable() -> Self {
        Self::new(CommandOptionType::Mentionable)
    }

    pub fn attachment() -> Self {
        Self::new(CommandOptionType::Attachment)
    }

    pub fn autocomplete(mut self, autocomplete: bool) -> Self {
        self.autocomplete = Some(autocomplete);
        self
    }

    pub fn channel_types(mut self, channel_types: Vec<ChannelType>) -> Self {
        self.channel_types = Some(channel_types);
        self
    }

    pub fn channel_type(mut self, channel_type: ChannelType) -> Self {
        match &mut self.channel_types {
            Some(types) => types.push(channel_type),
            None => self.channel_types = Some(vec![channel_type]),
        }
        self
    }

    pub fn choices(mut self, choices: Vec<CommandOptionChoice>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Appends a single choice shown to the user as `name`.
    pub fn choice(mut self, name: &str, value: impl IntoChoiceValue) -> Self {
        let choice = CommandOptionChoice {
            name: name.to_string(),
            name_localizations: None,
            value: value.into_choice_value(),
        };
        match &mut self.choices {
            Some(choices) => choices.push(choice),
            None => self.choices = Some(vec![choice]),
        }
        self
    }

    pub fn max_length(mut self, max_length: u16) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn max_value(mut self, max_value: CommandOptionBound) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn min_length(mut self, min_length: u16) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn min_value(mut self, min_value: CommandOptionBound) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for OptionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSchema")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("choices", &self.choices)
            .field("channel_types", &self.channel_types)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: ToOption> ToOption for Option<T> {
    fn to_option() -> OptionSchema {
        T::to_option().required(false)
    }
}

/// Options of one command keyed by field name, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    entries: Vec<(String, OptionSchema)>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option, replacing an earlier one declared under the same field name.
    pub fn option(mut self, field: &str, schema: OptionSchema) -> Self {
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some(entry) => entry.1 = schema,
            None => self.entries.push((field.to_string(), schema)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&OptionSchema> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, schema)| schema)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSchema)> {
        self.entries
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
