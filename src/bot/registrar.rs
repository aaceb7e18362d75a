use std::sync::Arc;

use anyhow::Result;
use twilight_http::Client;
use twilight_model::{
    application::command::Command,
    id::{
        Id,
        marker::{ApplicationMarker, GuildMarker},
    },
};

use crate::executor::{BoxFuture, CommandRouter, InteractionReply};

/// Where a set of commands is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationTarget {
    Global,
    Guild(Id<GuildMarker>),
}

/// Publishes built command schemas to Discord.
pub trait CommandRegistrar: Send + Sync {
    /// Replaces the commands registered for `target` with `commands`.
    ///
    /// With `clear_first` the existing commands are removed before the new
    /// ones are published.
    fn publish<'a>(
        &'a self,
        commands: &'a [Command],
        target: RegistrationTarget,
        clear_first: bool,
    ) -> BoxFuture<'a, Result<()>>;
}

/// A [`CommandRegistrar`] backed by the Discord REST API.
#[derive(Debug, Clone)]
pub struct HttpRegistrar {
    http: Arc<Client>,
    application_id: Id<ApplicationMarker>,
}

impl HttpRegistrar {
    pub fn new(http: Arc<Client>, application_id: Id<ApplicationMarker>) -> Self {
        HttpRegistrar {
            http,
            application_id,
        }
    }

    async fn set(&self, commands: &[Command], target: RegistrationTarget) -> Result<()> {
        let interaction = self.http.interaction(self.application_id);
        match target {
            RegistrationTarget::Global => {
                interaction.set_global_commands(commands).await?;
            }
            RegistrationTarget::Guild(guild_id) => {
                interaction.set_guild_commands(guild_id, commands).await?;
            }
        }
        Ok(())
    }
}

impl CommandRegistrar for HttpRegistrar {
    fn publish<'a>(
        &'a self,
        commands: &'a [Command],
        target: RegistrationTarget,
        clear_first: bool,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if clear_first {
                tracing::debug!(?target, "clearing registered commands");
                self.set(&[], target).await?;
            }
            self.set(commands, target).await
        })
    }
}

/// Builds every command known to `router` and publishes them to `target`.
///
/// A schema error aborts before anything is sent. Returns the number of
/// commands published.
pub async fn register_commands<C, R>(
    router: &CommandRouter<C>,
    registrar: &R,
    target: RegistrationTarget,
    clear_first: bool,
) -> Result<usize>
where
    C: InteractionReply,
    R: CommandRegistrar + ?Sized,
{
    let commands = router.build_commands()?;
    registrar.publish(&commands, target, clear_first).await?;
    tracing::info!(count = commands.len(), ?target, "registered slash commands");
    Ok(commands.len())
}
