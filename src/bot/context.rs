use std::sync::Arc;

use twilight_http::Client;
use twilight_model::{
    application::interaction::Interaction, http::interaction::InteractionResponse,
};

use crate::executor::{BoxFuture, InteractionReply};

/// What a handler gets alongside its decoded body.
pub struct CommandContext<S> {
    pub interaction: Arc<Interaction>,
    pub http: Arc<Client>,
    pub state: Arc<S>,
}

impl<S> CommandContext<S> {
    pub fn new(interaction: Interaction, http: Arc<Client>, state: Arc<S>) -> Self {
        CommandContext {
            interaction: Arc::new(interaction),
            http,
            state,
        }
    }
}

impl<S> Clone for CommandContext<S> {
    fn clone(&self) -> Self {
        CommandContext {
            interaction: Arc::clone(&self.interaction),
            http: Arc::clone(&self.http),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: Send + Sync + 'static> InteractionReply for CommandContext<S> {
    fn reply(&self, response: InteractionResponse) -> BoxFuture<'static, anyhow::Result<()>> {
        let http = Arc::clone(&self.http);
        let interaction = Arc::clone(&self.interaction);
        Box::pin(async move {
            http.interaction(interaction.application_id)
                .create_response(interaction.id, &interaction.token, &response)
                .await?;
            Ok(())
        })
    }
}
