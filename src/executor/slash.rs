use std::{collections::HashMap, fmt::Debug, future::Future, marker::PhantomData};

use anyhow::Result;
use tracing::Instrument;
use twilight_model::application::{
    command::Command,
    interaction::application_command::{CommandData, CommandDataOption, CommandOptionValue},
};

use super::context::{BoxFuture, InteractionReply, ephemeral};
use crate::{
    arguments::CommandOptions,
    builder::{self, SchemaError},
    commands::{CommandBody, FromBody},
    decode::{Decoded, decode},
    validation::input_error_message,
};

type HandlerResult = Result<()>;

trait AsyncHandler<C>: Send + Sync {
    fn handle(
        &self,
        ctx: C,
        options: &CommandOptions,
        interaction_data: &[CommandDataOption],
    ) -> BoxFuture<'static, HandlerResult>;
}

struct TypedAsyncHandler<T, C, F, Fut>
where
    T: FromBody,
    C: InteractionReply,
    F: Fn(C, T) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    handler: F,
    _phantom: PhantomData<fn(C, T)>,
}

impl<T, C, F, Fut> AsyncHandler<C> for TypedAsyncHandler<T, C, F, Fut>
where
    T: FromBody,
    C: InteractionReply,
    F: Fn(C, T) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle(
        &self,
        ctx: C,
        options: &CommandOptions,
        interaction_data: &[CommandDataOption],
    ) -> BoxFuture<'static, HandlerResult> {
        let Decoded { body, errors } = match decode(options, interaction_data) {
            Ok(decoded) => decoded,
            Err(e) => return Box::pin(async move { Err::<(), _>(anyhow::Error::from(e)) }),
        };

        if !errors.is_empty() {
            return ctx.reply(ephemeral(input_error_message(&errors)));
        }

        let body = match T::from_body(&body) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = ?e, "failed to convert command body");
                return ctx.reply(ephemeral("Failed to parse command data."));
            }
        };

        Box::pin((self.handler)(ctx, body))
    }
}

/// The options of a runnable command together with its handler.
pub struct Handler<C> {
    options: CommandOptions,
    run: Box<dyn AsyncHandler<C>>,
}

impl<C: InteractionReply> Handler<C> {
    fn new<T, F, Fut>(options: CommandOptions, handler: F) -> Self
    where
        T: FromBody,
        F: Fn(C, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Handler {
            options,
            run: Box::new(TypedAsyncHandler {
                handler,
                _phantom: PhantomData,
            }),
        }
    }

    pub fn options(&self) -> &CommandOptions {
        &self.options
    }

    /// Decodes `interaction_data` and starts the handler.
    ///
    /// Invalid input is answered with an ephemeral message instead of running
    /// the handler. A [`DecodeError`](crate::decode::DecodeError) is returned
    /// from the future.
    pub fn invoke(
        &self,
        ctx: C,
        interaction_data: &[CommandDataOption],
    ) -> BoxFuture<'static, HandlerResult> {
        self.run.handle(ctx, &self.options, interaction_data)
    }
}

/// One entry of a [`SlashCommand::Subcommands`] command.
pub struct Subcommand<C> {
    name: String,
    description: String,
    handler: Handler<C>,
}

impl<C: InteractionReply> Subcommand<C> {
    pub fn new<T, F, Fut>(name: &str, description: &str, options: CommandOptions, handler: F) -> Self
    where
        T: FromBody,
        F: Fn(C, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Subcommand {
            name: name.to_string(),
            description: description.to_string(),
            handler: Handler::new(options, handler),
        }
    }

    /// Creates a subcommand whose options come from its body type.
    pub fn with_body<T, F, Fut>(name: &str, description: &str, handler: F) -> Self
    where
        T: CommandBody,
        F: Fn(C, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::new(name, description, T::options(), handler)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A top level slash command.
pub enum SlashCommand<C> {
    /// A single handler with flat options
    Basic {
        name: String,
        description: String,
        handler: Handler<C>,
    },
    /// A command that selects one of its subcommands by name
    Subcommands {
        name: String,
        description: String,
        subcommands: Vec<Subcommand<C>>,
    },
}

impl<C: InteractionReply> SlashCommand<C> {
    pub fn basic<T, F, Fut>(name: &str, description: &str, options: CommandOptions, handler: F) -> Self
    where
        T: FromBody,
        F: Fn(C, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        SlashCommand::Basic {
            name: name.to_string(),
            description: description.to_string(),
            handler: Handler::new(options, handler),
        }
    }

    /// Creates a basic command whose options come from its body type.
    pub fn basic_with<T, F, Fut>(name: &str, description: &str, handler: F) -> Self
    where
        T: CommandBody,
        F: Fn(C, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::basic(name, description, T::options(), handler)
    }

    pub fn subcommands(
        name: &str,
        description: Option<&str>,
        subcommands: impl IntoIterator<Item = Subcommand<C>>,
    ) -> Self {
        SlashCommand::Subcommands {
            name: name.to_string(),
            description: description
                .unwrap_or(builder::DEFAULT_DESCRIPTION)
                .to_string(),
            subcommands: subcommands.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SlashCommand::Basic { name, .. } | SlashCommand::Subcommands { name, .. } => name,
        }
    }

    /// Builds the schema registered with Discord for this command.
    pub fn build(&self) -> Result<Command, SchemaError> {
        match self {
            SlashCommand::Basic {
                name,
                description,
                handler,
            } => builder::build_command(name, description, &handler.options),
            SlashCommand::Subcommands {
                name,
                description,
                subcommands,
            } => {
                let mut seen = Vec::with_capacity(subcommands.len());
                let mut options = Vec::with_capacity(subcommands.len());
                for subcommand in subcommands {
                    if seen.contains(&subcommand.name.as_str()) {
                        return Err(SchemaError::DuplicateName(subcommand.name.clone()));
                    }
                    seen.push(subcommand.name.as_str());
                    options.push(builder::build_subcommand(
                        &subcommand.name,
                        &subcommand.description,
                        &subcommand.handler.options,
                    )?);
                }
                builder::build_grouped_command(name, description, options)
            }
        }
    }

    fn handler(&self, subcommand: Option<&str>) -> Option<&Handler<C>> {
        match self {
            SlashCommand::Basic { handler, .. } => Some(handler),
            SlashCommand::Subcommands { subcommands, .. } => {
                let subcommand = subcommand?;
                subcommands
                    .iter()
                    .find(|candidate| candidate.name == subcommand)
                    .map(|candidate| &candidate.handler)
            }
        }
    }
}

/// The parts of an incoming chat input interaction needed for routing.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub name: String,
    pub subcommand: Option<String>,
    pub options: Vec<CommandDataOption>,
}

impl Invocation {
    pub fn new(name: &str, subcommand: Option<&str>, options: Vec<CommandDataOption>) -> Self {
        Invocation {
            name: name.to_string(),
            subcommand: subcommand.map(str::to_string),
            options,
        }
    }

    pub fn from_command_data(data: &CommandData) -> Self {
        Invocation {
            name: data.name.clone(),
            subcommand: subcommand_name(&data.options),
            options: data.options.clone(),
        }
    }
}

fn subcommand_name(options: &[CommandDataOption]) -> Option<String> {
    options.iter().find_map(|option| match option.value {
        CommandOptionValue::SubCommand(_) => Some(option.name.clone()),
        _ => None,
    })
}

/// Routes interactions to registered commands.
///
/// Routing keeps no state between interactions; `C` is whatever context the
/// caller hands each handler.
pub struct CommandRouter<C> {
    commands: Vec<SlashCommand<C>>,
    index: HashMap<String, usize>,
}

impl<C: InteractionReply> CommandRouter<C> {
    pub fn new() -> Self {
        CommandRouter {
            commands: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Registers a command, replacing one previously registered under the same name.
    pub fn register(&mut self, command: SlashCommand<C>) -> &mut Self {
        match self.index.get(command.name()) {
            Some(&position) => self.commands[position] = command,
            None => {
                self.index
                    .insert(command.name().to_string(), self.commands.len());
                self.commands.push(command);
            }
        }
        self
    }

    /// Finds the handler for a command name and, for grouped commands, a subcommand name.
    pub fn route(&self, name: &str, subcommand: Option<&str>) -> Option<&Handler<C>> {
        let command = &self.commands[*self.index.get(name)?];
        command.handler(subcommand)
    }

    /// Starts the handler for an invocation without waiting for it.
    ///
    /// Returns `None` when nothing is registered for the invocation. Discord can
    /// still deliver commands that are no longer registered, so this is not an
    /// error.
    pub fn dispatch(&self, invocation: Invocation, ctx: C) -> Option<BoxFuture<'static, HandlerResult>> {
        let Some(handler) = self.route(&invocation.name, invocation.subcommand.as_deref()) else {
            tracing::debug!(
                name = %invocation.name,
                subcommand = ?invocation.subcommand,
                "no command registered, ignoring interaction"
            );
            return None;
        };

        let span = tracing::info_span!(
            "command",
            name = %invocation.name,
            subcommand = ?invocation.subcommand
        );
        let future = span.in_scope(|| handler.invoke(ctx, &invocation.options));
        Some(Box::pin(future.instrument(span)))
    }

    /// Realizes the registered commands into `Command`s for registration with Discord
    pub fn build_commands(&self) -> Result<Vec<Command>, SchemaError> {
        self.commands.iter().map(SlashCommand::build).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<C: InteractionReply> Default for CommandRouter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Debug for CommandRouter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for command in &self.commands {
            match command {
                SlashCommand::Basic { name, .. } => {
                    list.entry(name);
                }
                SlashCommand::Subcommands {
                    name, subcommands, ..
                } => {
                    for subcommand in subcommands {
                        list.entry(&format!("{} {}", name, subcommand.name));
                    }
                }
            }
        }
        list.finish()
    }
}
