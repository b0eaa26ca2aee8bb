//! Process-wide pagination configuration.
//!
//! Built once at startup and shared read-only (`Arc<PaginationConfig>`). Values are
//! layered: an optional YAML file, then `PAGINATION__*` environment variables; keys
//! missing from both take the built-in defaults. A `columns` map given in the file
//! replaces the built-in one entirely.
//!
//! ```yaml
//! page: 1
//! limit: 5
//! max_limit: 200
//! columns:
//!   default:
//!     sortable_columns: [id]
//!     filterable_columns: [id]
//!   Post:
//!     sortable_columns: [id, title]
//!     filterable_columns: [id, title]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Reserved `columns` key holding the global default policy.
pub const DEFAULT_COLUMNS_KEY: &str = "default";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default = "default_max_limit", alias = "maxLimit")]
    pub max_limit: u64,
    /// Lookup key (table name, class name or `default`) → column whitelist.
    #[serde(default = "default_columns")]
    pub columns: HashMap<String, EntityColumns>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EntityColumns {
    #[serde(
        default,
        alias = "sortableColumns",
        deserialize_with = "lenient_columns",
        skip_serializing_if = "Option::is_none"
    )]
    pub sortable_columns: Option<Vec<String>>,
    #[serde(
        default,
        alias = "filterableColumns",
        deserialize_with = "lenient_columns",
        skip_serializing_if = "Option::is_none"
    )]
    pub filterable_columns: Option<Vec<String>>,
}

impl EntityColumns {
    pub fn new<S, F>(sortable: S, filterable: F) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            sortable_columns: Some(sortable.into_iter().map(Into::into).collect()),
            filterable_columns: Some(filterable.into_iter().map(Into::into).collect()),
        }
    }
}

// A list that is not a sequence of strings counts as absent so lookup falls through.
fn lenient_columns<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            max_limit: default_max_limit(),
            columns: default_columns(),
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    5
}

fn default_max_limit() -> u64 {
    200
}

fn default_columns() -> HashMap<String, EntityColumns> {
    HashMap::from([(
        DEFAULT_COLUMNS_KEY.to_owned(),
        EntityColumns::new(["id"], ["id"]),
    )])
}

impl PaginationConfig {
    pub const ENV_PREFIX: &'static str = "PAGINATION__";

    /// Register a per-entity override (keyed by table or class name).
    pub fn with_columns(mut self, key: impl Into<String>, columns: EntityColumns) -> Self {
        self.columns.insert(key.into(), columns);
        self
    }

    /// YAML file ← `PAGINATION__*` environment variables, serde defaults underneath.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Yaml},
            Figment,
        };

        Figment::new()
            .merge(Yaml::file(config_path.as_ref()))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Ok(Self::default()),
        }
    }
}
