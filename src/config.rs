use teloxide::types::ChatId;

pub const DEFAULT_DATABASE_PATH: &str = "./database.db";
pub const DEFAULT_LOCALE: &str = "en";
const SUPPORTED_LOCALES: &[&str] = &["en", "ru"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub admin: AdminConfig,
    pub storage: StorageConfig,
    pub locale: String,
}

#[derive(Clone)]
pub struct TelegramConfig(pub String);

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TelegramConfig(***)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminConfig {
    pub chat_id: ChatId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageConfig {
    Local { path: String },
    Remote { url: String, token: String },
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => warn!("Failed to load .env file: {}", e),
        }

        build_config(|key| std::env::var(key).ok())
    }
}

pub fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    info!("Building AppConfig...");
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

    let admin_chat_id = get("ADMIN_CHAT_ID")
        .ok_or(ConfigError::Missing("ADMIN_CHAT_ID"))?
        .trim()
        .parse::<i64>()
        .map_err(|e| ConfigError::Invalid {
            key: "ADMIN_CHAT_ID",
            reason: e.to_string(),
        })?;

    let storage = match (get("TURSO_URL"), get("TURSO_TOKEN")) {
        (Some(url), Some(token)) => StorageConfig::Remote { url, token },
        (Some(_), None) => return Err(ConfigError::Missing("TURSO_TOKEN")),
        (None, Some(_)) => return Err(ConfigError::Missing("TURSO_URL")),
        (None, None) => StorageConfig::Local {
            path: get("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
        },
    };

    let locale = get("BOT_LOCALE")
        .map(|locale| locale.trim().to_lowercase())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    if !SUPPORTED_LOCALES.contains(&locale.as_str()) {
        return Err(ConfigError::Invalid {
            key: "BOT_LOCALE",
            reason: format!("unsupported locale {:?}", locale),
        });
    }

    let config = AppConfig {
        telegram: TelegramConfig(token),
        admin: AdminConfig {
            chat_id: ChatId(admin_chat_id),
        },
        storage,
        locale,
    };
    info!("AppConfig built");

    Ok(config)
}
