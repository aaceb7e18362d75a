use twilight_model::{
    application::{
        command::{CommandOptionChoiceValue, CommandOptionType},
        interaction::application_command::{CommandDataOption, CommandOptionValue},
    },
    channel::ChannelType,
    id::{Id, marker::ChannelMarker},
};
use twilight_slash::{
    Choices, CommandBody,
    arguments::{ArgumentConverter, ToOption},
    builder::build_options,
    commands::{CommandBody, FromBody},
    decode::decode,
    validation::ValidationFailure,
};

#[derive(Debug, Clone, Copy, PartialEq, Choices)]
enum Greeting {
    Hello,
    #[choice(name = "The World", value = "world")]
    World,
}

fn numeric(value: &CommandOptionValue) -> Result<(), ValidationFailure> {
    match value {
        CommandOptionValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            Ok(())
        }
        _ => Err(ValidationFailure::new("Invalid user id")),
    }
}

#[derive(Debug, PartialEq, CommandBody)]
struct Deliver {
    #[option(description = "Who to send to", validate = "numeric")]
    to: String,
    #[option(description = "Greeting to send")]
    greeting: Option<Greeting>,
    #[option(name = "repeatCount")]
    repeat_count: Option<i64>,
    #[option(channel_types(GuildText, GuildAnnouncement))]
    channel: Option<Id<ChannelMarker>>,
}

#[derive(Debug, CommandBody)]
struct Ping;

fn option(name: &str, value: CommandOptionValue) -> CommandDataOption {
    CommandDataOption {
        name: name.to_string(),
        value,
    }
}

#[test]
fn derived_options_follow_field_declarations() {
    let options = Deliver::options();
    let names = options.iter().map(|(name, _)| name).collect::<Vec<_>>();
    assert_eq!(names, ["to", "greeting", "repeatCount", "channel"]);

    let to = options.get("to").unwrap();
    assert!(to.required);
    assert!(to.validator.is_some());
    assert_eq!(to.description.as_deref(), Some("Who to send to"));

    let greeting = options.get("greeting").unwrap();
    assert!(!greeting.required);
    assert_eq!(greeting.kind, CommandOptionType::String);

    let channel = options.get("channel").unwrap();
    assert_eq!(
        channel.channel_types,
        Some(vec![ChannelType::GuildText, ChannelType::GuildAnnouncement])
    );
}

#[test]
fn derived_options_build_wire_names() {
    let built = build_options(&Deliver::options()).unwrap();
    let names = built.iter().map(|o| o.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["to", "greeting", "repeat-count", "channel"]);
}

#[test]
fn choices_enum_lists_its_variants() {
    let schema = Greeting::to_option();
    let choices = schema.choices.unwrap();
    assert_eq!(choices.len(), 2);
    assert_eq!(choices[0].name, "Hello");
    assert_eq!(choices[0].value, CommandOptionChoiceValue::String("hello".into()));
    assert_eq!(choices[1].name, "The World");
    assert_eq!(choices[1].value, CommandOptionChoiceValue::String("world".into()));
    assert_eq!(Greeting::World.value(), "world");
}

#[test]
fn choices_enum_converts_known_values_only() {
    let world = CommandOptionValue::String("world".into());
    assert_eq!(Greeting::convert(&world).unwrap(), Greeting::World);

    let unknown = CommandOptionValue::String("mars".into());
    assert!(Greeting::convert(&unknown).is_err());
}

#[test]
fn derived_body_reads_decoded_values() {
    let decoded = decode(
        &Deliver::options(),
        &[
            option("to", CommandOptionValue::String("80351110224678912".into())),
            option("greeting", CommandOptionValue::String("hello".into())),
            option("repeat-count", CommandOptionValue::Integer(3)),
        ],
    )
    .unwrap();
    assert!(decoded.errors.is_empty());

    let body = Deliver::from_body(&decoded.body).unwrap();
    assert_eq!(
        body,
        Deliver {
            to: "80351110224678912".into(),
            greeting: Some(Greeting::Hello),
            repeat_count: Some(3),
            channel: None,
        }
    );
}

#[test]
fn derived_validator_rejects_input() {
    let decoded = decode(
        &Deliver::options(),
        &[option("to", CommandOptionValue::String("abc".into()))],
    )
    .unwrap();

    assert_eq!(decoded.errors.len(), 1);
    assert_eq!(decoded.errors[0].field, "to");
    assert!(Deliver::from_body(&decoded.body).is_err());
}

#[test]
fn unit_bodies_have_no_options() {
    assert!(Ping::options().is_empty());
    let decoded = decode(&Ping::options(), &[]).unwrap();
    assert!(Ping::from_body(&decoded.body).is_ok());
}
