use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use assortment_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run(config_path: Option<PathBuf>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.clone(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let file_path = resolve_config_path(config_path.as_deref());
    let file_doc = load_config_file_doc(file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(&field, file_doc.as_ref(), file_path.as_deref());
        lines.push(render_line(field.key, &field.value, source));
    }

    CommandResult::success("config", lines.join("\n"))
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    vec![
        Field {
            key: "llm.provider",
            env_keys: &["ASSORTMENT_LLM_PROVIDER"],
            value: config.llm.provider.as_str().to_string(),
        },
        Field { key: "llm.model", env_keys: &["ASSORTMENT_LLM_MODEL"], value: config.llm.model.clone() },
        Field {
            key: "llm.base_url",
            env_keys: &["ASSORTMENT_LLM_BASE_URL"],
            value: config.llm.effective_base_url().to_string(),
        },
        Field { key: "llm.api_key", env_keys: &["ASSORTMENT_LLM_API_KEY"], value: api_key.to_string() },
        Field {
            key: "llm.timeout_secs",
            env_keys: &["ASSORTMENT_LLM_TIMEOUT_SECS"],
            value: config.llm.timeout_secs.to_string(),
        },
        Field {
            key: "llm.max_retries",
            env_keys: &["ASSORTMENT_LLM_MAX_RETRIES"],
            value: config.llm.max_retries.to_string(),
        },
        Field {
            key: "llm.temperature",
            env_keys: &["ASSORTMENT_LLM_TEMPERATURE"],
            value: config.llm.temperature.to_string(),
        },
        Field {
            key: "assortment.top_k",
            env_keys: &["ASSORTMENT_TOP_K"],
            value: config.assortment.top_k.to_string(),
        },
        Field {
            key: "assortment.output_dir",
            env_keys: &["ASSORTMENT_OUTPUT_DIR"],
            value: config.assortment.output_dir.display().to_string(),
        },
        Field {
            key: "logging.level",
            env_keys: &["ASSORTMENT_LOGGING_LEVEL", "ASSORTMENT_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key: "logging.format",
            env_keys: &["ASSORTMENT_LOGGING_FORMAT", "ASSORTMENT_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(field: &Field, config_file_doc: Option<&Value>, config_file_path: Option<&Path>) -> String {
    let env_key = field
        .env_keys
        .iter()
        .find(|key| env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
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
    format!("- {key} = {value} (source: {source})")
}
