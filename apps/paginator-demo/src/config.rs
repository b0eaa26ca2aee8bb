use std::path::Path;

use anyhow::{Context, Result};
use paginator_core::{EntityColumns, PaginationConfig};
use serde::{Deserialize, Serialize};

/// Demo binary configuration: the pagination section plus console logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    #[serde(default = "default_pagination")]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// "trace", "debug", "info", "warn", "error" or "off"
    #[serde(default = "default_console_level")]
    pub console_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: default_console_level(),
        }
    }
}

fn default_console_level() -> String {
    "info".to_string()
}

// Posts may be sorted and filtered by title; comments by their post.
fn default_pagination() -> PaginationConfig {
    PaginationConfig::default()
        .with_columns("Post", EntityColumns::new(["id", "title"], ["id", "title"]))
        .with_columns(
            "comments",
            EntityColumns::new(["id", "postId"], ["id", "postId", "body"]),
        )
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            pagination: default_pagination(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Defaults → YAML file → `DEMO__*` environment variables.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Yaml},
            Figment,
        };

        let figment = Figment::new()
            .merge(Yaml::file(config_path.as_ref()))
            // Example: DEMO__PAGINATION__MAX_LIMIT=50 maps to pagination.max_limit
            .merge(Env::prefixed("DEMO__").split("__"));

        let mut config: DemoConfig = figment
            .extract()
            .with_context(|| format!("Failed to load config {}", config_path.as_ref().display()))?;

        config.layer_builtin_columns();
        Ok(config)
    }

    /// Built-in entity policies sit underneath the loaded ones: keys from the file win,
    /// missing keys fall back to the demo defaults.
    fn layer_builtin_columns(&mut self) {
        for (key, columns) in default_pagination().columns {
            self.pagination.columns.entry(key).or_insert(columns);
        }
    }

    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// `-v` raises console logging to debug, `-vv` and more to trace.
    pub fn apply_cli_overrides(&mut self, verbose: u8) {
        match verbose {
            0 => {}
            1 => self.logging.console_level = "debug".to_string(),
            _ => self.logging.console_level = "trace".to_string(),
        }
    }
}
