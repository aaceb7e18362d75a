use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;
use twilight_gateway::Intents;
use twilight_slash::{
    CommandBody,
    arguments::{CommandOptions, OptionSchema},
    bot::{BotConfig, CommandContext, DiscordBot, init_logging},
    decode::Body,
    executor::{CommandRouter, InteractionReply, SlashCommand, Subcommand, ephemeral, message},
};

#[derive(Default)]
struct Settings {
    values: Mutex<HashMap<String, String>>,
}

type Context = CommandContext<Settings>;

async fn ping(ctx: Context, body: Body) -> Result<()> {
    let line: f64 = body.parse("line")?;
    let text: Option<String> = body.parse("message")?;
    let single = match text {
        Some(text) => format!("Pong! {text}"),
        None => "Pong!".to_string(),
    };

    tracing::info!(line, "replying to ping");
    let content = vec![single; line as usize].join("\n");
    ctx.reply(message(content)).await
}

#[derive(CommandBody)]
struct SetValue {
    #[option(description = "Setting to change")]
    key: String,
    #[option(description = "New value")]
    value: String,
}

#[derive(CommandBody)]
struct GetValue {
    #[option(description = "Setting to read")]
    key: String,
}

async fn set_value(ctx: Context, body: SetValue) -> Result<()> {
    ctx.state
        .values
        .lock()
        .await
        .insert(body.key.clone(), body.value.clone());
    ctx.reply(ephemeral(format!("`{}` is now `{}`", body.key, body.value)))
        .await
}

async fn get_value(ctx: Context, body: GetValue) -> Result<()> {
    let current = ctx.state.values.lock().await.get(&body.key).cloned();
    let content = match current {
        Some(value) => format!("`{}` is `{}`", body.key, value),
        None => format!("`{}` is not set", body.key),
    };
    ctx.reply(ephemeral(content)).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = BotConfig::from_env()?.intents(Intents::GUILDS | Intents::GUILD_MESSAGES);
    init_logging(&config.log_level, config.log_format);

    let mut router = CommandRouter::new();
    router
        .register(SlashCommand::basic(
            "ping",
            "Ping!",
            CommandOptions::new()
                .option(
                    "message",
                    OptionSchema::string()
                        .description("Message to echo back")
                        .choice("Hello", "hello")
                        .choice("World", "world"),
                )
                .option(
                    "line",
                    OptionSchema::number()
                        .description("Number of times to echo back")
                        .required(true)
                        .choice("1 time", 1.0)
                        .choice("2 times", 2.0),
                ),
            ping,
        ))
        .register(SlashCommand::subcommands(
            "config",
            Some("Change bot settings"),
            [
                Subcommand::with_body("set", "Change a setting", set_value),
                Subcommand::with_body("get", "Read a setting", get_value),
            ],
        ));

    let bot = DiscordBot::new(config, router, Settings::default())
        .on_ready(|user| tracing::info!(user = %user.name, "try the /ping command"))
        .on_shutdown(|| tracing::info!("bot is shutting down"));

    let shutdown = bot.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.shutdown();
        }
    });

    bot.listen().await
}
