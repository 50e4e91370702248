use std::env;
use std::fs;
use std::path::Path;

use bakebot_core::config::{resolve_config_path, AppConfig, ConfigOverrides};
use toml::Value;

/// Where a configuration value may come from, highest precedence first.
struct FieldSources<'a> {
    key_path: &'a str,
    flag: Option<(&'a str, bool)>,
    env_keys: &'a [&'a str],
}

pub fn run(config: &AppConfig, config_path: Option<&Path>, overrides: &ConfigOverrides) -> String {
    let config_file_path = resolve_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |fields: FieldSources<'_>| {
        field_source(fields, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec![
        "effective config (source precedence: flag > env > file > default):".to_string()
    ];

    lines.push(render_line(
        "catalog.menu_path",
        &config.catalog.menu_path.display().to_string(),
        source(FieldSources {
            key_path: "catalog.menu_path",
            flag: Some(("--menu", overrides.menu_path.is_some())),
            env_keys: &["BAKEBOT_CATALOG_MENU_PATH"],
        }),
    ));
    lines.push(render_line(
        "catalog.intents_path",
        &config.catalog.intents_path.display().to_string(),
        source(FieldSources {
            key_path: "catalog.intents_path",
            flag: Some(("--intents", overrides.intents_path.is_some())),
            env_keys: &["BAKEBOT_CATALOG_INTENTS_PATH"],
        }),
    ));
    lines.push(render_line(
        "catalog.menu_header",
        &config.catalog.menu_header,
        source(FieldSources {
            key_path: "catalog.menu_header",
            flag: None,
            env_keys: &["BAKEBOT_CATALOG_MENU_HEADER"],
        }),
    ));

    lines.push(render_line(
        "dialogue.greeting_tag",
        &config.dialogue.greeting_tag,
        source(FieldSources {
            key_path: "dialogue.greeting_tag",
            flag: None,
            env_keys: &["BAKEBOT_DIALOGUE_GREETING_TAG"],
        }),
    ));
    lines.push(render_line(
        "dialogue.fallback_message",
        &config.dialogue.fallback_message,
        source(FieldSources {
            key_path: "dialogue.fallback_message",
            flag: None,
            env_keys: &["BAKEBOT_DIALOGUE_FALLBACK_MESSAGE"],
        }),
    ));
    lines.push(render_line(
        "dialogue.order_flag",
        &config.dialogue.order_flag,
        source(FieldSources {
            key_path: "dialogue.order_flag",
            flag: None,
            env_keys: &["BAKEBOT_DIALOGUE_ORDER_FLAG"],
        }),
    ));
    lines.push(render_line(
        "dialogue.exit_flag",
        &config.dialogue.exit_flag,
        source(FieldSources {
            key_path: "dialogue.exit_flag",
            flag: None,
            env_keys: &["BAKEBOT_DIALOGUE_EXIT_FLAG"],
        }),
    ));
    lines.push(render_line(
        "dialogue.seed",
        &config.dialogue.seed.map_or_else(|| "<unset>".to_string(), |seed| seed.to_string()),
        source(FieldSources {
            key_path: "dialogue.seed",
            flag: Some(("--seed", overrides.seed.is_some())),
            env_keys: &["BAKEBOT_DIALOGUE_SEED"],
        }),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source(FieldSources {
            key_path: "logging.level",
            flag: Some(("--log-level", overrides.log_level.is_some())),
            env_keys: &["BAKEBOT_LOGGING_LEVEL", "BAKEBOT_LOG_LEVEL"],
        }),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source(FieldSources {
            key_path: "logging.format",
            flag: None,
            env_keys: &["BAKEBOT_LOGGING_FORMAT", "BAKEBOT_LOG_FORMAT"],
        }),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    fields: FieldSources<'_>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some((flag, true)) = fields.flag {
        return format!("flag ({flag})");
    }

    if let Some(env_key) =
        fields.env_keys.iter().find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()))
    {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, fields.key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {} (source: {source})", value.escape_debug())
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::contains_path;

    #[test]
    fn nested_keys_are_found_in_config_documents() {
        let doc = "[dialogue]\nseed = 4\n".parse::<Value>().expect("toml");

        assert!(contains_path(&doc, "dialogue.seed"));
        assert!(!contains_path(&doc, "dialogue.exit_flag"));
        assert!(!contains_path(&doc, "logging.level"));
    }
}
