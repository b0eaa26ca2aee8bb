//! JSON filter text → [`Where`].
//!
//! An object keeps only filterable keys; each value goes through the operator parser.
//! An array is an OR group whose elements are themselves JSON-encoded filter strings
//! and re-enter this parser.

use serde_json::Value;
use tracing::debug;

use crate::ast::{Where, WhereClause};
use crate::conditional::resolve_conditional;
use crate::error::{Error, Result};

pub fn parse_filter(raw: &str, filterable: &[String]) -> Result<Where> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| Error::MalformedFilter(e.to_string()))?;

    match parsed {
        Value::Array(elements) => elements
            .into_iter()
            .map(|element| match element {
                Value::String(encoded) => parse_filter(&encoded, filterable),
                other => Err(Error::MalformedFilter(format!(
                    "filter array elements must be JSON-encoded strings, got `{other}`"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Where::Any),
        Value::Object(entries) => Ok(Where::All(filter_entries(entries, filterable))),
        // scalars carry no column constraints
        _ => Ok(Where::default()),
    }
}

fn filter_entries(entries: serde_json::Map<String, Value>, filterable: &[String]) -> WhereClause {
    entries
        .into_iter()
        .filter_map(|(column, value)| {
            if !filterable.contains(&column) {
                debug!(%column, "dropping filter key outside the filterable columns");
                return None;
            }
            let op = resolve_conditional(&value_text(&value));
            Some((column, op))
        })
        .collect()
}

// Arrays join their elements with commas, `[1,2]` reads as `1,2` and nulls inside
// them become empty. Objects collapse to a fixed placeholder.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
        other => other.to_string(),
    }
}
