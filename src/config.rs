use crate::error::{Result, WindWatchError};
use crate::models::{ProfileKind, ReportStyle, Schedule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Open-Meteo's forecast horizon
pub const MAX_FORECAST_DAYS: u8 = 16;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub ollama: OllamaConfig,
    pub telegram: Option<TelegramConfig>,
    pub wind: WindConfig,
    pub rain: RainConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1:11434".into(),
            model: "llama3.1".into(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub token: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub chat_id: String,
    #[serde(default = "default_telegram_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Accepts a string, a bare number (chat ids) or null (an unset placeholder)
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        String(String),
        Number(i64),
    }

    Ok(match Option::<Text>::deserialize(deserializer)? {
        Some(Text::String(s)) => s,
        Some(Text::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

fn default_telegram_url() -> String {
    "https://api.telegram.org".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl TelegramConfig {
    /// Both token and chat id present; otherwise notifications are off
    pub fn is_configured(&self) -> bool {
        !self.token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: String::new(),
            base_url: default_telegram_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindConfig {
    pub enabled: bool,
    pub days: u8,
    pub report: ReportStyle,
    pub run_on_start: bool,
    pub schedule: Schedule,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            days: ProfileKind::Wind.default_days(),
            report: ReportStyle::default(),
            run_on_start: true,
            schedule: ProfileKind::Wind.default_schedule(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RainConfig {
    pub enabled: bool,
    pub days: u8,
    pub run_on_start: bool,
    pub schedule: Schedule,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            days: ProfileKind::Rain.default_days(),
            run_on_start: true,
            schedule: ProfileKind::Rain.default_schedule(),
        }
    }
}

impl Config {
    /// Load from file (if any), apply environment overrides, then validate
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) if !p.exists() => {
                return Err(WindWatchError::Config(format!(
                    "Config file not found at {:?}",
                    p
                )));
            }
            Some(p) => Some(p),
            None => Self::find_config_path(),
        };

        let mut config = match config_path {
            Some(path) => {
                tracing::info!("Loading config from {}", path.display());
                let config_str = std::fs::read_to_string(&path)
                    .map_err(|e| WindWatchError::Config(format!("Failed to read config: {}", e)))?;
                Self::from_yaml(&Self::substitute_env_vars(&config_str))?
            }
            None => {
                tracing::info!("No config file found, using defaults and environment");
                Config::default()
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| WindWatchError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("windwatch").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/windwatch/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WindWatchError::Config("Cannot determine config directory".into()))?
            .join("windwatch");
        Ok(config_dir.join("config.yaml"))
    }

    /// Write the default configuration to `path`, refusing to overwrite
    pub fn write_default(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(WindWatchError::Config(format!(
                "Config file already exists at {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&Config::default())
            .map_err(|e| WindWatchError::Config(format!("Failed to serialize config: {}", e)))?;
        let content = format!(
            "# WindWatch Configuration\n# Generated by `windwatch init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> String {
        Self::substitute_with(content, |name| std::env::var(name).ok())
    }

    fn substitute_with<F>(content: &str, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return content.to_string(),
        };

        // Unset variables become empty so a blank secret disables its section
        re.replace_all(content, |cap: &regex_lite::Captures| {
            lookup(&cap[1]).unwrap_or_else(|| {
                tracing::warn!("Config references unset variable {}", &cap[1]);
                String::new()
            })
        })
        .into_owned()
    }

    /// Environment variables take precedence over the file
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = non_empty("OLLAMA_HOST") {
            self.ollama.host = host;
        }
        if let Some(model) = non_empty("OLLAMA_MODEL") {
            self.ollama.model = model;
        }
        if let Some(token) = non_empty("TELEGRAM_TOKEN") {
            self.telegram.get_or_insert_with(TelegramConfig::default).token = token;
        }
        if let Some(chat_id) = non_empty("TELEGRAM_CHAT_ID") {
            self.telegram.get_or_insert_with(TelegramConfig::default).chat_id = chat_id;
        }

        override_clock(&mut self.wind.schedule.hour, non_empty("WIND_CHECK_HOUR"), "WIND_CHECK_HOUR", 23);
        override_clock(&mut self.wind.schedule.minute, non_empty("WIND_CHECK_MINUTE"), "WIND_CHECK_MINUTE", 59);
        override_clock(&mut self.rain.schedule.hour, non_empty("RAIN_CHECK_HOUR"), "RAIN_CHECK_HOUR", 23);
        override_clock(&mut self.rain.schedule.minute, non_empty("RAIN_CHECK_MINUTE"), "RAIN_CHECK_MINUTE", 59);
    }

    pub fn validate(&self) -> Result<()> {
        if !self.wind.enabled && !self.rain.enabled {
            return Err(WindWatchError::Config(
                "At least one of wind or rain must be enabled".into(),
            ));
        }

        for (kind, schedule, days) in [
            (ProfileKind::Wind, self.wind.schedule, self.wind.days),
            (ProfileKind::Rain, self.rain.schedule, self.rain.days),
        ] {
            if !schedule.is_valid() {
                return Err(WindWatchError::Config(format!(
                    "{}.schedule {:02}:{:02} is not a valid time of day",
                    kind, schedule.hour, schedule.minute
                )));
            }
            if !(1..=MAX_FORECAST_DAYS).contains(&days) {
                return Err(WindWatchError::Config(format!(
                    "{}.days must be between 1 and {}, got {}",
                    kind, MAX_FORECAST_DAYS, days
                )));
            }
        }

        check_url("weather.base_url", &self.weather.base_url)?;
        check_url("ollama.host", &self.ollama.host)?;
        if let Some(telegram) = &self.telegram {
            check_url("telegram.base_url", &telegram.base_url)?;
        }

        if self.ollama.model.trim().is_empty() {
            return Err(WindWatchError::Config("ollama.model must not be empty".into()));
        }

        Ok(())
    }

    /// Telegram settings when notifications are usable
    pub fn notifications(&self) -> Option<&TelegramConfig> {
        self.telegram.as_ref().filter(|t| t.is_configured())
    }
}

fn override_clock(field: &mut u32, value: Option<String>, key: &str, max: u32) {
    let Some(value) = value else {
        return;
    };
    match value.trim().parse::<u32>() {
        Ok(v) if v <= max => *field = v,
        _ => tracing::warn!("Ignoring {}={:?}: expected 0-{}", key, value, max),
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(url) => Err(WindWatchError::Config(format!(
            "{} must use http or https, got {}",
            field,
            url.scheme()
        ))),
        Err(e) => Err(WindWatchError::Config(format!(
            "{} is not a valid URL ({}): {}",
            field, value, e
        ))),
    }
}
