pub mod context;
pub mod slash;

pub use context::{BoxFuture, InteractionReply, ephemeral, message};
pub use slash::{CommandRouter, Handler, Invocation, SlashCommand, Subcommand};
