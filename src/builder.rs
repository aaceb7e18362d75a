//! Turns declared [`CommandOptions`] into the schema Discord registers.

use twilight_model::application::{
    command::{Command, CommandOption, CommandOptionChoiceValue, CommandOptionType, CommandType},
    interaction::InteractionContextType,
};
use twilight_util::builder::command::{CommandBuilder, SubCommandBuilder};

use crate::{
    arguments::{CommandOptions, OptionSchema},
    naming::to_wire_name,
};

// Discord caps both choices per option and options per command at 25.
const MAX_CHOICES: usize = 25;
const MAX_OPTIONS: usize = 25;
const MAX_NAME_LENGTH: usize = 32;

pub(crate) const DEFAULT_DESCRIPTION: &str = "No description provided";

/// A mistake in a command declaration, reported when the schema is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("option `{field}` uses unsupported kind {kind:?}")]
    UnsupportedKind {
        field: String,
        kind: CommandOptionType,
    },
    #[error("option `{field}` declares choices, which {kind:?} options cannot have")]
    ChoicesNotAllowed {
        field: String,
        kind: CommandOptionType,
    },
    #[error("option `{field}` declares an empty choice list")]
    EmptyChoices { field: String },
    #[error("option `{field}` has choice `{choice}` whose value does not match {kind:?}")]
    ChoiceKindMismatch {
        field: String,
        choice: String,
        kind: CommandOptionType,
    },
    #[error("option `{field}` declares {count} choices, at most {max} are allowed", max = MAX_CHOICES)]
    TooManyChoices { field: String, count: usize },
    #[error("`{name}` declares {count} options, at most {max} are allowed", max = MAX_OPTIONS)]
    TooManyOptions { name: String, count: usize },
    #[error(
        "name `{0}` must be 1 to {max} lowercase letters, digits, `-` or `_`",
        max = MAX_NAME_LENGTH
    )]
    InvalidName(String),
    #[error("`{0}` is declared more than once")]
    DuplicateName(String),
    #[error("option `{0}` restricts channel types but is not a channel option")]
    ChannelTypesNotAllowed(String),
}

/// Builds the wire options for a set of declared options.
///
/// Required options are moved in front of optional ones, keeping the declared
/// order inside each group, because Discord rejects a required option that
/// follows an optional one.
pub fn build_options(options: &CommandOptions) -> Result<Vec<CommandOption>, SchemaError> {
    let (required, optional): (Vec<_>, Vec<_>) =
        options.iter().partition(|(_, schema)| schema.required);

    let mut seen = Vec::with_capacity(options.len());
    required
        .into_iter()
        .chain(optional)
        .map(|(field, schema)| {
            let wire = to_wire_name(field);
            check_name(&wire)?;
            if seen.contains(&wire) {
                return Err(SchemaError::DuplicateName(wire));
            }
            seen.push(wire.clone());
            wire_option(field, wire, schema)
        })
        .collect()
}

/// Builds a basic chat input command.
pub fn build_command(
    name: &str,
    description: &str,
    options: &CommandOptions,
) -> Result<Command, SchemaError> {
    check_name(name)?;
    check_option_count(name, options.len())?;

    let mut command = chat_input(name, description);
    for option in build_options(options)? {
        command = command.option(option);
    }
    Ok(command.build())
}

/// Builds one subcommand of a grouped command.
pub fn build_subcommand(
    name: &str,
    description: &str,
    options: &CommandOptions,
) -> Result<CommandOption, SchemaError> {
    check_name(name)?;
    check_option_count(name, options.len())?;

    let mut subcommand = SubCommandBuilder::new(name, description);
    for option in build_options(options)? {
        subcommand = subcommand.option(option);
    }
    Ok(subcommand.build())
}

/// Builds a command whose options are all subcommands.
pub(crate) fn build_grouped_command(
    name: &str,
    description: &str,
    subcommands: Vec<CommandOption>,
) -> Result<Command, SchemaError> {
    check_name(name)?;
    check_option_count(name, subcommands.len())?;

    let mut command = chat_input(name, description);
    for subcommand in subcommands {
        command = command.option(subcommand);
    }
    Ok(command.build())
}

fn chat_input(name: &str, description: &str) -> CommandBuilder {
    CommandBuilder::new(name, description, CommandType::ChatInput).contexts(vec![
        InteractionContextType::Guild,
        InteractionContextType::BotDm,
        InteractionContextType::PrivateChannel,
    ])
}

/// Chat input names are lowercase: letters without a lowercase form
/// (e.g. CJK) pass, uppercase letters, spaces and punctuation other than
/// `-` and `_` do not.
fn check_name(name: &str) -> Result<(), SchemaError> {
    let length = name.chars().count();
    let valid_chars = name.chars().all(|c| {
        c == '-' || c == '_' || c.is_numeric() || (c.is_alphabetic() && !c.is_uppercase())
    });
    if length == 0 || length > MAX_NAME_LENGTH || !valid_chars {
        return Err(SchemaError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn check_option_count(name: &str, count: usize) -> Result<(), SchemaError> {
    if count > MAX_OPTIONS {
        return Err(SchemaError::TooManyOptions {
            name: name.to_string(),
            count,
        });
    }
    Ok(())
}

fn wire_option(
    field: &str,
    wire: String,
    schema: &OptionSchema,
) -> Result<CommandOption, SchemaError> {
    match schema.kind {
        CommandOptionType::String
        | CommandOptionType::Number
        | CommandOptionType::Integer
        | CommandOptionType::Boolean
        | CommandOptionType::User
        | CommandOptionType::Role
        | CommandOptionType::Channel
        | CommandOptionType::Mentionable
        | CommandOptionType::Attachment => {}
        kind => {
            return Err(SchemaError::UnsupportedKind {
                field: field.to_string(),
                kind,
            });
        }
    }

    check_choices(field, schema)?;

    if schema.channel_types.is_some() && schema.kind != CommandOptionType::Channel {
        return Err(SchemaError::ChannelTypesNotAllowed(field.to_string()));
    }

    Ok(CommandOption {
        autocomplete: schema.autocomplete,
        channel_types: schema.channel_types.clone(),
        choices: schema.choices.clone(),
        name: wire,
        description: schema
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        kind: schema.kind,
        max_length: schema.max_length,
        max_value: schema.max_value.clone(),
        min_length: schema.min_length,
        min_value: schema.min_value.clone(),
        required: Some(schema.required),
        description_localizations: None,
        name_localizations: None,
        options: None,
    })
}

fn check_choices(field: &str, schema: &OptionSchema) -> Result<(), SchemaError> {
    let Some(choices) = &schema.choices else {
        return Ok(());
    };

    if !matches!(
        schema.kind,
        CommandOptionType::String | CommandOptionType::Number | CommandOptionType::Integer
    ) {
        return Err(SchemaError::ChoicesNotAllowed {
            field: field.to_string(),
            kind: schema.kind,
        });
    }
    if choices.is_empty() {
        return Err(SchemaError::EmptyChoices {
            field: field.to_string(),
        });
    }
    if choices.len() > MAX_CHOICES {
        return Err(SchemaError::TooManyChoices {
            field: field.to_string(),
            count: choices.len(),
        });
    }

    for choice in choices {
        let matches = matches!(
            (schema.kind, &choice.value),
            (CommandOptionType::String, CommandOptionChoiceValue::String(_))
                | (CommandOptionType::Number, CommandOptionChoiceValue::Number(_))
                | (CommandOptionType::Integer, CommandOptionChoiceValue::Integer(_))
        );
        if !matches {
            return Err(SchemaError::ChoiceKindMismatch {
                field: field.to_string(),
                choice: choice.name.clone(),
                kind: schema.kind,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use twilight_model::channel::ChannelType;

    use super::*;

    fn names(options: &[CommandOption]) -> Vec<&str> {
        options.iter().map(|option| option.name.as_str()).collect()
    }

    #[test]
    fn required_options_come_first_in_declared_order() {
        let options = CommandOptions::new()
            .option("a", OptionSchema::string())
            .option("b", OptionSchema::string().required(true))
            .option("c", OptionSchema::string())
            .option("d", OptionSchema::string().required(true));

        let built = build_options(&options).unwrap();
        assert_eq!(names(&built), ["b", "d", "a", "c"]);
        assert_eq!(built[0].required, Some(true));
        assert_eq!(built[3].required, Some(false));
    }

    #[test]
    fn option_names_use_wire_convention() {
        let options = CommandOptions::new().option(
            "userId",
            OptionSchema::user().description("Who to mention"),
        );

        let built = build_options(&options).unwrap();
        assert_eq!(built[0].name, "user-id");
        assert_eq!(built[0].description, "Who to mention");
        assert_eq!(built[0].kind, CommandOptionType::User);
    }

    #[test]
    fn missing_description_uses_default() {
        let options = CommandOptions::new().option("flag", OptionSchema::boolean());
        let built = build_options(&options).unwrap();
        assert_eq!(built[0].description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn choices_are_copied_to_the_wire() {
        let options = CommandOptions::new().option(
            "line",
            OptionSchema::number()
                .required(true)
                .choice("1 time", 1.0)
                .choice("2 times", 2.0),
        );

        let built = build_options(&options).unwrap();
        let choices = built[0].choices.as_ref().unwrap();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[1].value, CommandOptionChoiceValue::Number(2.0));
    }

    #[test]
    fn choice_value_must_match_kind() {
        let options = CommandOptions::new()
            .option("line", OptionSchema::integer().choice("one", "1"));

        let err = build_options(&options).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ChoiceKindMismatch {
                field: "line".into(),
                choice: "one".into(),
                kind: CommandOptionType::Integer,
            }
        );
    }

    #[test]
    fn choices_are_rejected_on_other_kinds() {
        let options = CommandOptions::new().option("who", OptionSchema::user().choice("me", "1"));
        assert!(matches!(
            build_options(&options),
            Err(SchemaError::ChoicesNotAllowed { .. })
        ));
    }

    #[test]
    fn empty_choices_are_rejected() {
        let options =
            CommandOptions::new().option("pick", OptionSchema::string().choices(Vec::new()));
        assert!(matches!(
            build_options(&options),
            Err(SchemaError::EmptyChoices { .. })
        ));
    }

    #[test]
    fn too_many_choices_are_rejected() {
        let schema = (0..26).fold(OptionSchema::integer(), |schema, i| {
            schema.choice(&i.to_string(), i as i64)
        });
        let options = CommandOptions::new().option("pick", schema);
        assert!(matches!(
            build_options(&options),
            Err(SchemaError::TooManyChoices { count: 26, .. })
        ));
    }

    #[test]
    fn subcommand_kinds_are_unsupported_as_fields() {
        let options = CommandOptions::new()
            .option("nested", OptionSchema::new(CommandOptionType::SubCommand));
        assert!(matches!(
            build_options(&options),
            Err(SchemaError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn channel_types_require_channel_kind() {
        let options = CommandOptions::new().option(
            "where",
            OptionSchema::string().channel_type(ChannelType::GuildText),
        );
        assert_eq!(
            build_options(&options).unwrap_err(),
            SchemaError::ChannelTypesNotAllowed("where".into())
        );

        let options = CommandOptions::new().option(
            "where",
            OptionSchema::channel().channel_type(ChannelType::GuildText),
        );
        let built = build_options(&options).unwrap();
        assert_eq!(built[0].channel_types, Some(vec![ChannelType::GuildText]));
    }

    #[test]
    fn colliding_wire_names_are_rejected() {
        let options = CommandOptions::new()
            .option("userId", OptionSchema::user())
            .option("user-id", OptionSchema::user());
        assert_eq!(
            build_options(&options).unwrap_err(),
            SchemaError::DuplicateName("user-id".into())
        );
    }

    #[test]
    fn long_names_are_rejected() {
        let options = CommandOptions::new().option(&"x".repeat(33), OptionSchema::string());
        assert!(matches!(
            build_options(&options),
            Err(SchemaError::InvalidName(_))
        ));
        assert!(build_command("", "empty", &CommandOptions::new()).is_err());
    }

    #[test]
    fn names_must_be_lowercase_without_spaces() {
        for name in ["Ping Me", "Ping", "ping me", "ping!"] {
            assert_eq!(
                build_command(name, "bad", &CommandOptions::new()).unwrap_err(),
                SchemaError::InvalidName(name.into()),
            );
        }

        let options = CommandOptions::new().option("my field", OptionSchema::string());
        assert_eq!(
            build_options(&options).unwrap_err(),
            SchemaError::InvalidName("my field".into())
        );

        for name in ["ping", "repeat-count", "set_2", "über"] {
            assert!(build_command(name, "ok", &CommandOptions::new()).is_ok(), "{name}");
        }
    }

    #[test]
    fn build_command_is_chat_input_with_ordered_options() {
        let options = CommandOptions::new()
            .option("message", OptionSchema::string().description("Message to echo back"))
            .option("line", OptionSchema::number().required(true));

        let command = build_command("ping", "Ping!", &options).unwrap();
        assert_eq!(command.name, "ping");
        assert_eq!(command.description, "Ping!");
        assert_eq!(command.kind, CommandType::ChatInput);
        assert_eq!(names(&command.options), ["line", "message"]);
    }

    #[test]
    fn build_is_deterministic() {
        let options = CommandOptions::new()
            .option("message", OptionSchema::string())
            .option("line", OptionSchema::integer().required(true));

        let first = build_command("ping", "Ping!", &options).unwrap();
        let second = build_command("ping", "Ping!", &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn build_subcommand_nests_options() {
        let options = CommandOptions::new().option("key", OptionSchema::string().required(true));
        let subcommand = build_subcommand("get", "Read a value", &options).unwrap();
        assert_eq!(subcommand.kind, CommandOptionType::SubCommand);
        assert_eq!(names(subcommand.options.as_deref().unwrap()), ["key"]);
    }
}
