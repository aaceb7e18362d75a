use std::{future::Future, pin::Pin};

use twilight_model::{
    channel::message::MessageFlags,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The reply capability handed to handlers along with their body.
///
/// Implemented by whatever wraps the live interaction. The router only uses it
/// to answer interactions it refuses to run.
pub trait InteractionReply: Send + Sync + 'static {
    fn reply(&self, response: InteractionResponse) -> BoxFuture<'static, anyhow::Result<()>>;
}

/// A message visible to everyone in the channel.
pub fn message(content: impl Into<String>) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(InteractionResponseData {
            content: Some(content.into()),
            ..Default::default()
        }),
    }
}

/// A message only the invoking user can see.
pub fn ephemeral(content: impl Into<String>) -> InteractionResponse {
    InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(InteractionResponseData {
            content: Some(content.into()),
            flags: Some(MessageFlags::EPHEMERAL),
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_sets_flag() {
        let response = ephemeral("only you");
        let data = response.data.unwrap();
        assert_eq!(data.content.as_deref(), Some("only you"));
        assert_eq!(data.flags, Some(MessageFlags::EPHEMERAL));
    }

    #[test]
    fn message_has_no_flags() {
        let response = message("everyone");
        assert_eq!(response.kind, InteractionResponseType::ChannelMessageWithSource);
        assert!(response.data.unwrap().flags.is_none());
    }
}
