use std::{fmt, str::FromStr};

use twilight_gateway::Intents;
use twilight_model::id::{
    Id,
    marker::{ApplicationMarker, GuildMarker},
};

use super::{logging::LogFormat, registrar::RegistrationTarget};

const TOKEN: &str = "DISCORD_TOKEN";
const CLIENT_ID: &str = "DISCORD_CLIENT_ID";
const DEVELOPMENT_GUILD_ID: &str = "DISCORD_DEVELOPMENT_GUILD_ID";
const REFRESH_COMMANDS: &str = "DISCORD_REFRESH_COMMANDS";
const LOG_LEVEL: &str = "LOG_LEVEL";
const LOG_FORMAT: &str = "LOG_FORMAT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{key} has invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

/// Settings of a [`DiscordBot`](super::DiscordBot).
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub application_id: Id<ApplicationMarker>,
    pub intents: Intents,
    /// When set, commands are only registered in this guild
    pub development_guild_id: Option<Id<GuildMarker>>,
    /// Clear the development guild's commands before registering them
    pub refresh_commands: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl BotConfig {
    pub fn new(token: impl Into<String>, application_id: Id<ApplicationMarker>) -> Self {
        BotConfig {
            token: token.into(),
            application_id,
            intents: Intents::GUILDS,
            development_guild_id: None,
            refresh_commands: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }

    /// Reads the configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded environment file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(TOKEN)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing(TOKEN))?;
        let application_id = lookup(CLIENT_ID).ok_or(ConfigError::Missing(CLIENT_ID))?;
        let application_id = parse_id(CLIENT_ID, &application_id)?;

        let mut config = BotConfig::new(token, application_id);

        if let Some(guild_id) = lookup(DEVELOPMENT_GUILD_ID).filter(|id| !id.is_empty()) {
            config.development_guild_id = Some(parse_id(DEVELOPMENT_GUILD_ID, &guild_id)?);
        }
        if let Some(refresh) = lookup(REFRESH_COMMANDS) {
            config.refresh_commands = parse_flag(REFRESH_COMMANDS, &refresh)?;
        }
        if let Some(level) = lookup(LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(format) = lookup(LOG_FORMAT) {
            config.log_format = LogFormat::from_str(&format).map_err(|_| ConfigError::Invalid {
                key: LOG_FORMAT,
                value: format,
            })?;
        }
        Ok(config)
    }

    pub fn intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }

    pub fn development_guild_id(mut self, guild_id: Id<GuildMarker>) -> Self {
        self.development_guild_id = Some(guild_id);
        self
    }

    pub fn refresh_commands(mut self, refresh_commands: bool) -> Self {
        self.refresh_commands = refresh_commands;
        self
    }

    /// Where commands get registered: the development guild if set, otherwise globally.
    pub fn registration_target(&self) -> RegistrationTarget {
        match self.development_guild_id {
            Some(guild_id) => RegistrationTarget::Guild(guild_id),
            None => RegistrationTarget::Global,
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("intents", &self.intents)
            .field("development_guild_id", &self.development_guild_id)
            .field("refresh_commands", &self.refresh_commands)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse_id<T>(key: &'static str, value: &str) -> Result<Id<T>, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
