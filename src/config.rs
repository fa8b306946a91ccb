//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::dashboard::{build_widgets, default_festivals, WidgetSpec};
use crate::festival::{FestivalSpec, SalaryRule, WorkdayRule};
use crate::progress::CountdownFormat;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub workday: WorkdayRule,

    #[serde(default)]
    pub salary: SalaryRule,

    #[serde(default = "default_festivals")]
    pub festivals: Vec<FestivalSpec>,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tick rates and countdown text
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_countdown_interval")]
    pub countdown_interval_ms: u64,

    #[serde(default)]
    pub countdown_format: CountdownFormat,
}

fn default_tick_interval() -> u64 {
    1000
}

fn default_countdown_interval() -> u64 {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            countdown_interval_ms: default_countdown_interval(),
            countdown_format: CountdownFormat::default(),
        }
    }
}

/// Weather webhook configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub url: String,

    #[serde(default = "default_weather_timeout")]
    pub timeout_ms: u64,

    #[serde(default = "default_banner_dismiss")]
    pub banner_dismiss_secs: u64,
}

fn default_weather_url() -> String {
    "http://127.0.0.1:5678/webhook/weather".to_string()
}

fn default_weather_timeout() -> u64 {
    5000
}

fn default_banner_dismiss() -> u64 {
    5
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            url: default_weather_url(),
            timeout_ms: default_weather_timeout(),
            banner_dismiss_secs: default_banner_dismiss(),
        }
    }
}

/// Where the theme flag lives
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

fn default_store_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("tickboard").join("settings.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./tickboard_settings.json".to_string())
}

impl ThemeConfig {
    /// Store path with a leading `~` expanded to the home directory
    pub fn resolved_path(&self) -> PathBuf {
        expand_home(&self.store_path)
    }
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8086
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Config file locations, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("tickboard").join("config.toml")),
            Some(PathBuf::from("/etc/tickboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Reject rules that can never resolve
    pub fn validate(&self) -> Result<(), ConfigError> {
        for spec in &self.festivals {
            spec.rule.validate().map_err(|e| ConfigError::Invalid {
                field: format!("festivals.{}", spec.name),
                error: e.to_string(),
            })?;
        }

        // Cards are addressed by key, so two widgets may not share one
        let mut keys = HashSet::new();
        for widget in self.widgets() {
            let key = widget.key();
            if !keys.insert(key.clone()) {
                return Err(ConfigError::Invalid {
                    field: "festivals".to_string(),
                    error: format!("duplicate card key '{}'", key),
                });
            }
        }

        if self.workday.end < self.workday.start {
            return Err(ConfigError::Invalid {
                field: "workday".to_string(),
                error: format!("ends at {} before it starts at {}", self.workday.end, self.workday.start),
            });
        }
        if !(1..=31).contains(&self.salary.day) {
            return Err(ConfigError::Invalid {
                field: "salary.day".to_string(),
                error: format!("{} is not a day of the month", self.salary.day),
            });
        }
        if self.dashboard.tick_interval_ms == 0 || self.dashboard.countdown_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "dashboard".to_string(),
                error: "intervals must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Widgets in display definition order
    pub fn widgets(&self) -> Vec<WidgetSpec> {
        build_widgets(&self.festivals, self.workday, self.salary)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `TICKBOARD_*` overrides from any lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = lookup("TICKBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("TICKBOARD_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Dashboard overrides
        if let Some(ms) = lookup("TICKBOARD_TICK_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                if ms > 0 {
                    self.dashboard.tick_interval_ms = ms;
                }
            }
        }
        if let Some(format) = lookup("TICKBOARD_COUNTDOWN_FORMAT") {
            if let Ok(format) = format.parse() {
                self.dashboard.countdown_format = format;
            }
        }
        if let Some(day) = lookup("TICKBOARD_SALARY_DAY") {
            if let Ok(day) = day.parse::<u32>() {
                if (1..=31).contains(&day) {
                    self.salary.day = day;
                }
            }
        }

        // Weather and theme overrides
        if let Some(url) = lookup("TICKBOARD_WEATHER_URL") {
            self.weather.url = url;
        }
        if let Some(path) = lookup("TICKBOARD_THEME_PATH") {
            self.theme.store_path = path;
        }

        // Logging overrides
        if let Some(level) = lookup("TICKBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TICKBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dashboard: DashboardConfig::default(),
            workday: WorkdayRule::default(),
            salary: SalaryRule::default(),
            festivals: default_festivals(),
            weather: WeatherConfig::default(),
            theme: ThemeConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid config value {field}: {error}")]
    Invalid { field: String, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# tickboard Configuration
#
# Environment variables override these settings:
# - TICKBOARD_API_HOST
# - TICKBOARD_API_PORT
# - TICKBOARD_TICK_MS
# - TICKBOARD_COUNTDOWN_FORMAT
# - TICKBOARD_SALARY_DAY
# - TICKBOARD_WEATHER_URL
# - TICKBOARD_THEME_PATH
# - TICKBOARD_LOG_LEVEL
# - TICKBOARD_LOG_FORMAT

[dashboard]
# How often progress widgets are recomputed (ms)
tick_interval_ms = 1000

# Refresh rate of the millisecond countdown (ms)
countdown_interval_ms = 10

# Countdown text: standard, compact, detailed or short
countdown_format = "standard"

[workday]
# Weekday working hours for the off-work countdown
start = "08:30"
end = "17:00"

[salary]
# Day of the month salary arrives (clamped to short months)
day = 15

[weather]
# Local webhook returning {city, temperature, weather, humidity, windDir}
url = "http://127.0.0.1:5678/webhook/weather"

# Request timeout (ms)
timeout_ms = 5000

# How long the error banner stays visible (seconds)
banner_dismiss_secs = 5

[theme]
# JSON file holding the light/dark flag; defaults to the platform data
# directory. A leading ~ expands to the home directory.
# store_path = "~/.local/share/tickboard/settings.json"

[api]
# API server host
host = "127.0.0.1"

# API server port
port = 8086

# Allowed CORS origins
cors_origins = ["http://localhost:8080", "http://127.0.0.1:8080"]

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Festival countdowns. Omit the list entirely to get the built-in set.
# kind: fixed (month, day, optional at = "HH:MM"), lunar (month, day), month_end (month)
# baseline: year_start (default) or previous_occurrence

[[festivals]]
name = "Spring Festival"
rule = { kind = "lunar", month = 1, day = 1 }

[[festivals]]
key = "valentine"
name = "Valentine's Day"
rule = { kind = "fixed", month = 2, day = 14 }

[[festivals]]
name = "Mid-Autumn Festival"
rule = { kind = "lunar", month = 8, day = 15 }

[[festivals]]
name = "Company Holiday"
rule = { kind = "fixed", month = 1, day = 23, at = "17:30" }
"#
    .to_string()
}
