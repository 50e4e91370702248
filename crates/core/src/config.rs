use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::DEFAULT_MENU_HEADER;

pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["bakebot.toml", "config/bakebot.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub dialogue: DialogueConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub menu_path: PathBuf,
    pub intents_path: PathBuf,
    pub menu_header: String,
}

#[derive(Clone, Debug)]
pub struct DialogueConfig {
    /// Tag of the intent whose response opens every session.
    pub greeting_tag: String,
    pub fallback_message: String,
    /// Context flag that switches the runtime into order taking.
    pub order_flag: String,
    /// Context flag that ends the conversation.
    pub exit_flag: String,
    /// Fixed seed for response selection; random when unset.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub menu_path: Option<PathBuf>,
    pub intents_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                menu_path: PathBuf::from("menu.json"),
                intents_path: PathBuf::from("intents.json"),
                menu_header: DEFAULT_MENU_HEADER.to_string(),
            },
            dialogue: DialogueConfig {
                greeting_tag: "apresentacao".to_string(),
                fallback_message: "Desculpe, não entendi.".to_string(),
                order_flag: "comprar".to_string(),
                exit_flag: "desligar".to_string(),
                seed: None,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(menu_path) = catalog.menu_path {
                self.catalog.menu_path = menu_path;
            }
            if let Some(intents_path) = catalog.intents_path {
                self.catalog.intents_path = intents_path;
            }
            if let Some(menu_header) = catalog.menu_header {
                self.catalog.menu_header = menu_header;
            }
        }

        if let Some(dialogue) = patch.dialogue {
            if let Some(greeting_tag) = dialogue.greeting_tag {
                self.dialogue.greeting_tag = greeting_tag;
            }
            if let Some(fallback_message) = dialogue.fallback_message {
                self.dialogue.fallback_message = fallback_message;
            }
            if let Some(order_flag) = dialogue.order_flag {
                self.dialogue.order_flag = order_flag;
            }
            if let Some(exit_flag) = dialogue.exit_flag {
                self.dialogue.exit_flag = exit_flag;
            }
            if let Some(seed) = dialogue.seed {
                self.dialogue.seed = Some(seed);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("BAKEBOT_CATALOG_MENU_PATH") {
            self.catalog.menu_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("BAKEBOT_CATALOG_INTENTS_PATH") {
            self.catalog.intents_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("BAKEBOT_CATALOG_MENU_HEADER") {
            self.catalog.menu_header = value;
        }

        if let Some(value) = read_env("BAKEBOT_DIALOGUE_GREETING_TAG") {
            self.dialogue.greeting_tag = value;
        }
        if let Some(value) = read_env("BAKEBOT_DIALOGUE_FALLBACK_MESSAGE") {
            self.dialogue.fallback_message = value;
        }
        if let Some(value) = read_env("BAKEBOT_DIALOGUE_ORDER_FLAG") {
            self.dialogue.order_flag = value;
        }
        if let Some(value) = read_env("BAKEBOT_DIALOGUE_EXIT_FLAG") {
            self.dialogue.exit_flag = value;
        }
        if let Some(value) = read_env("BAKEBOT_DIALOGUE_SEED") {
            self.dialogue.seed = Some(parse_u64("BAKEBOT_DIALOGUE_SEED", &value)?);
        }

        let log_level =
            read_env("BAKEBOT_LOGGING_LEVEL").or_else(|| read_env("BAKEBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("BAKEBOT_LOGGING_FORMAT").or_else(|| read_env("BAKEBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(menu_path) = overrides.menu_path {
            self.catalog.menu_path = menu_path;
        }
        if let Some(intents_path) = overrides.intents_path {
            self.catalog.intents_path = intents_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(seed) = overrides.seed {
            self.dialogue.seed = Some(seed);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_dialogue(&self.dialogue)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_FILES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.menu_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("catalog.menu_path must not be empty".to_string()));
    }
    if catalog.intents_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "catalog.intents_path must not be empty".to_string(),
        ));
    }
    if catalog.menu_header.contains('\n') {
        return Err(ConfigError::Validation(
            "catalog.menu_header must be a single line".to_string(),
        ));
    }
    Ok(())
}

fn validate_dialogue(dialogue: &DialogueConfig) -> Result<(), ConfigError> {
    let required = [
        ("dialogue.greeting_tag", &dialogue.greeting_tag),
        ("dialogue.fallback_message", &dialogue.fallback_message),
        ("dialogue.order_flag", &dialogue.order_flag),
        ("dialogue.exit_flag", &dialogue.exit_flag),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{key} must not be empty")));
        }
    }

    if dialogue.order_flag == dialogue.exit_flag {
        return Err(ConfigError::Validation(
            "dialogue.order_flag and dialogue.exit_flag must differ".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    dialogue: Option<DialoguePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    menu_path: Option<PathBuf>,
    intents_path: Option<PathBuf>,
    menu_header: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DialoguePatch {
    greeting_tag: Option<String>,
    fallback_message: Option<String>,
    order_flag: Option<String>,
    exit_flag: Option<String>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    fn missing_file_options() -> LoadOptions {
        LoadOptions {
            config_path: Some(PathBuf::from("does-not-exist/bakebot.toml")),
            ..LoadOptions::default()
        }
    }

    #[test]
    fn defaults_are_valid() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(missing_file_options())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.catalog.menu_path == PathBuf::from("menu.json"), "default menu path")?;
        ensure(config.dialogue.greeting_tag == "apresentacao", "default greeting tag")?;
        ensure(config.dialogue.order_flag == "comprar", "default order flag")?;
        ensure(config.dialogue.exit_flag == "desligar", "default exit flag")?;
        ensure(config.dialogue.seed.is_none(), "no seed by default")?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "compact logs by default")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_BAKEBOT_DATA_DIR", "/srv/bakebot");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("bakebot.toml");
            fs::write(
                &path,
                r#"
[catalog]
menu_path = "${TEST_BAKEBOT_DATA_DIR}/menu.json"
intents_path = "${TEST_BAKEBOT_DATA_DIR}/intents.json"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.catalog.menu_path == PathBuf::from("/srv/bakebot/menu.json"),
                "menu path should be interpolated from environment",
            )?;
            ensure(
                config.catalog.intents_path == PathBuf::from("/srv/bakebot/intents.json"),
                "intents path should be interpolated from environment",
            )
        })();

        clear_vars(&["TEST_BAKEBOT_DATA_DIR"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_an_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("bakebot.toml");
        fs::write(&path, "[catalog]\nmenu_path = \"${BAKEBOT_TEST_UNSET_VAR}\"\n")
            .map_err(|err| err.to_string())?;

        let error = match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() }) {
            Ok(_) => return Err("expected interpolation failure".to_string()),
            Err(error) => error,
        };
        ensure(
            matches!(error, ConfigError::MissingEnvInterpolation { ref var } if var == "BAKEBOT_TEST_UNSET_VAR"),
            "error should name the missing variable",
        )
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("BAKEBOT_CATALOG_INTENTS_PATH", "from-env-intents.json");
        env::set_var("BAKEBOT_DIALOGUE_SEED", "7");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("bakebot.toml");
            fs::write(
                &path,
                r#"
[catalog]
menu_path = "from-file-menu.json"
intents_path = "from-file-intents.json"

[dialogue]
fallback_message = "Não entendi, pode repetir?"
seed = 1

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    menu_path: Some(PathBuf::from("from-override-menu.json")),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.catalog.menu_path == PathBuf::from("from-override-menu.json"),
                "override menu path should win",
            )?;
            ensure(
                config.catalog.intents_path == PathBuf::from("from-env-intents.json"),
                "env intents path should win over file",
            )?;
            ensure(config.dialogue.seed == Some(7), "env seed should win over file")?;
            ensure(
                config.dialogue.fallback_message == "Não entendi, pode repetir?",
                "file fallback message should win over default",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")
        })();

        clear_vars(&["BAKEBOT_CATALOG_INTENTS_PATH", "BAKEBOT_DIALOGUE_SEED"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("BAKEBOT_LOG_LEVEL", "warn");
        env::set_var("BAKEBOT_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(missing_file_options())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env var",
            )
        })();

        clear_vars(&["BAKEBOT_LOG_LEVEL", "BAKEBOT_LOG_FORMAT"]);
        result
    }

    #[test]
    fn invalid_seed_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("BAKEBOT_DIALOGUE_SEED", "not-a-number");
        let result = AppConfig::load(missing_file_options());
        clear_vars(&["BAKEBOT_DIALOGUE_SEED"]);

        ensure(
            matches!(result, Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "BAKEBOT_DIALOGUE_SEED"),
            "invalid seed should fail with the offending key",
        )
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                log_level: Some("verbose".to_string()),
                ..ConfigOverrides::default()
            },
            ..missing_file_options()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".to_string()),
            Err(error) => error,
        };
        ensure(
            matches!(error, ConfigError::Validation(ref message) if message.contains("logging.level")),
            "validation failure should mention logging.level",
        )
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let result =
            AppConfig::load(LoadOptions { require_file: true, ..missing_file_options() });
        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(_))),
            "missing required file should be reported",
        )
    }
}
