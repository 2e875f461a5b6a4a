use crate::error::{Result, WeatherWatchError};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub location: LocationConfig,
    pub telegram: TelegramConfig,
    pub gemini: Option<GeminiConfig>,
    #[serde(default)]
    pub open_meteo: OpenMeteoConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "Europe/Berlin".into()
}

#[derive(Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(deserialize_with = "deserialize_chat_id")]
    pub chat_id: i64,
    #[serde(default = "default_telegram_base")]
    pub api_base: String,
}

fn default_telegram_base() -> String {
    "https://api.telegram.org".into()
}

/// Chat ids are usually injected through `${TELEGRAM_CHAT_ID}`, which
/// substitutes as a string, so accept both forms.
fn deserialize_chat_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse::<i64>().map_err(|_| {
            D::Error::custom(format!(
                "invalid chat_id '{}' - ensure TELEGRAM_CHAT_ID environment variable is set",
                s
            ))
        }),
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_gemini_base")]
    pub api_base: String,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("enabled", &self.enabled)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenMeteoConfig {
    #[serde(default = "default_open_meteo_base")]
    pub api_base: String,
}

fn default_open_meteo_base() -> String {
    "https://api.open-meteo.com".into()
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            api_base: default_open_meteo_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_alert_interval")]
    pub alert_interval_minutes: u64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_alert_interval() -> u64 {
    180
}

fn default_poll_interval() -> u64 {
    1
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            alert_interval_minutes: default_alert_interval(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl ScheduleConfig {
    pub fn alert_interval(&self) -> Duration {
        Duration::from_secs(self.alert_interval_minutes.max(1) * 60)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(WeatherWatchError::Config(format!(
                "Config file not found at {:?}. Run `weatherwatch init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| WeatherWatchError::Config(format!("Failed to read config: {}", e)))?;

        Self::parse(&config_str)
    }

    /// Parse YAML after `${VAR}` substitution
    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        serde_yaml::from_str(&content)
            .map_err(|e| WeatherWatchError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = Self::default_config_path()?;
        Ok(default_path)
    }

    /// Default path for writing new config files (~/.config/weatherwatch/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WeatherWatchError::Config("Cannot determine config directory".into()))?
            .join("weatherwatch");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up WeatherWatch!");
        println!();

        println!("Location");
        let name: String = prompt_text("  Name", "Dresden")?;
        let latitude: f64 = prompt_text("  Latitude", 51.0504)?;
        let longitude: f64 = prompt_text("  Longitude", 13.7373)?;
        let timezone: String = prompt_text("  Timezone", default_timezone())?;

        println!();

        println!("Telegram");
        let bot_token: String = Password::new()
            .with_prompt("  Bot token")
            .interact()
            .map_err(|e| WeatherWatchError::Config(format!("Input error: {}", e)))?;
        let chat_id: i64 = Input::new()
            .with_prompt("  Chat id")
            .interact_text()
            .map_err(|e| WeatherWatchError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Gemini (leave API key blank to skip)");
        let gemini_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| WeatherWatchError::Config(format!("Input error: {}", e)))?;

        let gemini = if gemini_key.is_empty() {
            None
        } else {
            Some(GeminiConfig {
                api_key: gemini_key,
                model: prompt_text("  Model", default_gemini_model())?,
                enabled: true,
                api_base: default_gemini_base(),
            })
        };

        println!();

        let config = Config {
            location: LocationConfig {
                name,
                latitude,
                longitude,
                timezone,
            },
            telegram: TelegramConfig {
                bot_token,
                chat_id,
                api_base: default_telegram_base(),
            },
            gemini,
            open_meteo: OpenMeteoConfig::default(),
            schedule: ScheduleConfig::default(),
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| WeatherWatchError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# WeatherWatch Configuration\n# Generated by `weatherwatch init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return result,
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("WEATHERWATCH_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| WeatherWatchError::Config("Cannot determine data directory".into()))?
            .join("weatherwatch");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("weatherwatch.db"))
    }

    /// Gemini settings when the composer should be used.
    ///
    /// A key still holding a `${VAR}` placeholder means the variable was unset.
    pub fn active_gemini(&self) -> Option<&GeminiConfig> {
        let gemini = self.gemini.as_ref().filter(|g| g.enabled)?;
        if gemini.api_key.trim().is_empty() {
            return None;
        }
        if is_unresolved(&gemini.api_key) {
            tracing::warn!(
                key = %gemini.api_key,
                "Gemini API key references an unset environment variable, disabling Gemini"
            );
            return None;
        }
        Some(gemini)
    }
}

fn is_unresolved(value: &str) -> bool {
    value.contains("${")
}

fn prompt_text<T>(prompt: &str, default: impl Into<T>) -> Result<T>
where
    T: Clone + ToString + std::str::FromStr,
    <T as std::str::FromStr>::Err: ToString,
{
    Input::new()
        .with_prompt(prompt)
        .default(default.into())
        .interact_text()
        .map_err(|e| WeatherWatchError::Config(format!("Input error: {}", e)))
}
