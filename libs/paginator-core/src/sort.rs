use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }

    /// Anything other than a case-insensitive `desc` (including nothing) sorts ascending.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.trim().eq_ignore_ascii_case("desc") => SortDir::Desc,
            _ => SortDir::Asc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub dir: SortDir,
}

/// Ordered column → direction mapping. Never empty once parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec(pub Vec<SortKey>);

impl SortSpec {
    pub const FALLBACK_COLUMN: &'static str = "id";

    /// `{id: ASC}`, used whenever nothing in the input survives the policy.
    pub fn fallback() -> Self {
        SortSpec(vec![SortKey {
            column: Self::FALLBACK_COLUMN.to_owned(),
            dir: SortDir::Asc,
        }])
    }

    /// Parse `"title:DESC,id"` against the sortable columns.
    ///
    /// Each sortable column is consumed by its first occurrence; later duplicates and
    /// columns outside the policy are dropped.
    pub fn parse(raw: Option<&str>, sortable: &[String]) -> Self {
        let mut remaining: Vec<&str> = sortable.iter().map(String::as_str).collect();
        let mut keys = Vec::new();

        for token in raw.unwrap_or_default().split(',') {
            let mut parts = token.split(':');
            let column = parts.next().unwrap_or_default().trim();
            if column.is_empty() {
                continue;
            }
            let Some(pos) = remaining.iter().position(|c| *c == column) else {
                debug!(column, "dropping sort token outside the sortable columns");
                continue;
            };
            remaining.remove(pos);
            keys.push(SortKey {
                column: column.to_owned(),
                dir: SortDir::from_token(parts.next()),
            });
        }

        if keys.is_empty() {
            Self::fallback()
        } else {
            SortSpec(keys)
        }
    }

    pub fn get(&self, column: &str) -> Option<SortDir> {
        self.0.iter().find(|k| k.column == column).map(|k| k.dir)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortKey> {
        self.0.iter()
    }

    /// `column:DIRECTION` pairs concatenated without a separator, as echoed in links.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.0 {
            write!(f, "{}:{}", key.column, key.dir.as_str())?;
        }
        Ok(())
    }
}
