//! A minimal single shard bot that serves a [`CommandRouter`].

mod config;
mod context;
pub mod logging;
mod registrar;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Notify;
use twilight_gateway::{CloseFrame, Event, EventTypeFlags, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::{
    application::{
        command::CommandType,
        interaction::{InteractionData, InteractionType},
    },
    user::CurrentUser,
};

pub use config::{BotConfig, ConfigError};
pub use context::CommandContext;
pub use logging::{LogFormat, init_logging};
pub use registrar::{CommandRegistrar, HttpRegistrar, RegistrationTarget, register_commands};

use crate::executor::{CommandRouter, Invocation, SlashCommand};

type ReadyHook = Box<dyn Fn(&CurrentUser) + Send + Sync>;
type ShutdownHook = Box<dyn Fn() + Send + Sync>;

/// Asks a running [`DiscordBot::listen`] loop to stop.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<Notify>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.notify_one();
    }

    /// Resolves once [`shutdown`](Self::shutdown) has been called, including
    /// calls made before waiting started.
    pub async fn wait(&self) {
        self.0.notified().await;
    }
}

pub struct DiscordBot<S> {
    config: BotConfig,
    http: Arc<Client>,
    router: CommandRouter<CommandContext<S>>,
    state: Arc<S>,
    shutdown: ShutdownHandle,
    on_ready: Option<ReadyHook>,
    on_shutdown: Option<ShutdownHook>,
}

impl<S: Send + Sync + 'static> DiscordBot<S> {
    pub fn new(config: BotConfig, router: CommandRouter<CommandContext<S>>, state: S) -> Self {
        let http = Arc::new(Client::new(config.token.clone()));
        DiscordBot {
            config,
            http,
            router,
            state: Arc::new(state),
            shutdown: ShutdownHandle::default(),
            on_ready: None,
            on_shutdown: None,
        }
    }

    /// Runs once the gateway session is ready.
    pub fn on_ready(mut self, hook: impl Fn(&CurrentUser) + Send + Sync + 'static) -> Self {
        self.on_ready = Some(Box::new(hook));
        self
    }

    /// Runs after the shard has been closed by [`shutdown`](Self::shutdown).
    pub fn on_shutdown(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_shutdown = Some(Box::new(hook));
        self
    }

    pub fn register(&mut self, command: SlashCommand<CommandContext<S>>) -> &mut Self {
        self.router.register(command);
        self
    }

    pub fn http(&self) -> &Arc<Client> {
        &self.http
    }

    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Publishes the router's commands to the configured target.
    ///
    /// Clearing before publishing only happens for a development guild.
    pub async fn register_commands(&self) -> Result<usize> {
        let target = self.config.registration_target();
        let clear_first =
            self.config.refresh_commands && matches!(target, RegistrationTarget::Guild(_));
        let registrar = HttpRegistrar::new(Arc::clone(&self.http), self.config.application_id);
        register_commands(&self.router, &registrar, target, clear_first).await
    }

    /// Registers commands, then serves interactions until [`shutdown`](Self::shutdown).
    pub async fn listen(&self) -> Result<()> {
        self.register_commands().await?;

        let mut shard = Shard::new(ShardId::ONE, self.config.token.clone(), self.config.intents);
        // GatewayClose is always yielded regardless of flags
        let flags = EventTypeFlags::READY | EventTypeFlags::INTERACTION_CREATE;
        let mut closing = false;

        tracing::info!(commands = self.router.len(), "connecting to gateway");
        loop {
            tokio::select! {
                _ = self.shutdown.wait(), if !closing => {
                    tracing::info!("shutting down");
                    closing = true;
                    shard.close(CloseFrame::NORMAL);
                }
                item = shard.next_event(flags) => {
                    let event = match item {
                        Some(Ok(event)) => event,
                        Some(Err(source)) => {
                            tracing::warn!(?source, "error receiving event");
                            continue;
                        }
                        None => break,
                    };
                    if closing && matches!(event, Event::GatewayClose(_)) {
                        break;
                    }
                    self.handle_event(event);
                }
            }
        }

        if let Some(hook) = &self.on_shutdown {
            hook();
        }
        tracing::info!("shard closed");
        Ok(())
    }

    fn handle_event(&self, event: Event) {
        match event {
            Event::Ready(ready) => {
                tracing::info!(user = %ready.user.name, "gateway ready");
                if let Some(hook) = &self.on_ready {
                    hook(&ready.user);
                }
            }
            Event::InteractionCreate(interaction) => {
                let Some(invocation) =
                    chat_input_invocation(interaction.0.kind, interaction.0.data.as_ref())
                else {
                    return;
                };
                let ctx = CommandContext::new(
                    interaction.0,
                    Arc::clone(&self.http),
                    Arc::clone(&self.state),
                );
                if let Some(future) = self.router.dispatch(invocation, ctx) {
                    tokio::spawn(async move {
                        if let Err(error) = future.await {
                            tracing::error!(?error, "command failed");
                        }
                    });
                }
            }
            Event::GatewayClose(frame) => {
                tracing::debug!(?frame, "gateway connection closed");
            }
            _ => {}
        }
    }
}

/// Extracts the routing information of a chat input command interaction.
///
/// Autocomplete interactions carry the same command data and are dropped.
fn chat_input_invocation(
    kind: InteractionType,
    data: Option<&InteractionData>,
) -> Option<Invocation> {
    if kind != InteractionType::ApplicationCommand {
        return None;
    }
    match data {
        Some(InteractionData::ApplicationCommand(data)) if data.kind == CommandType::ChatInput => {
            Some(Invocation::from_command_data(data))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use twilight_model::{
        application::{
            command::CommandOptionType,
            interaction::application_command::{
                CommandData, CommandDataOption, CommandOptionValue,
            },
        },
        id::Id,
    };

    use super::*;

    fn command_data(kind: CommandType, value: CommandOptionValue) -> InteractionData {
        InteractionData::ApplicationCommand(Box::new(CommandData {
            guild_id: None,
            id: Id::new(1),
            name: "ping".to_string(),
            kind,
            options: vec![CommandDataOption {
                name: "message".to_string(),
                value,
            }],
            resolved: None,
            target_id: None,
        }))
    }

    #[test]
    fn chat_input_commands_are_routed() {
        let data = command_data(
            CommandType::ChatInput,
            CommandOptionValue::String("hello".into()),
        );
        let invocation =
            chat_input_invocation(InteractionType::ApplicationCommand, Some(&data)).unwrap();
        assert_eq!(invocation.name, "ping");
        assert_eq!(invocation.subcommand, None);
        assert_eq!(invocation.options.len(), 1);
    }

    #[test]
    fn autocomplete_interactions_are_dropped() {
        let data = command_data(
            CommandType::ChatInput,
            CommandOptionValue::Focused("he".into(), CommandOptionType::String),
        );
        assert!(
            chat_input_invocation(InteractionType::ApplicationCommandAutocomplete, Some(&data))
                .is_none()
        );
    }

    #[test]
    fn other_command_kinds_are_dropped() {
        let data = command_data(CommandType::User, CommandOptionValue::Boolean(true));
        assert!(chat_input_invocation(InteractionType::ApplicationCommand, Some(&data)).is_none());
        assert!(chat_input_invocation(InteractionType::ApplicationCommand, None).is_none());
    }

    #[tokio::test]
    async fn shutdown_before_wait_is_not_lost() {
        let handle = ShutdownHandle::default();
        handle.clone().shutdown();
        tokio::time::timeout(Duration::from_secs(1), handle.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn shutdown_wakes_a_waiting_task() {
        let handle = ShutdownHandle::default();
        let waiter = tokio::spawn({
            let handle = handle.clone();
            async move { handle.wait().await }
        });
        tokio::task::yield_now().await;
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
