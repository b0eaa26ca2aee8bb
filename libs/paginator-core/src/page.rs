use serde::{Deserialize, Deserializer, Serialize};

use crate::config::PaginationConfig;

/// Inbound page request as extracted by the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub filter: Option<String>,
    /// Base URL the navigation links are built on.
    pub path: String,
}

/// Query-string shape (`?page=2&limit=10&sort=title:DESC&filter=...`).
///
/// Numbers that fail to parse are treated as absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub filter: Option<String>,
}

impl PageParams {
    pub fn into_request(self, path: impl Into<String>) -> PageRequest {
        PageRequest {
            page: self.page,
            limit: self.limit,
            sort: self.sort,
            filter: self.filter,
            path: path.into(),
        }
    }
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Page/limit defaults and the limit ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageBounds {
    pub default_page: u64,
    pub default_limit: u64,
    pub max_limit: u64,
}

impl From<&PaginationConfig> for PageBounds {
    fn from(cfg: &PaginationConfig) -> Self {
        Self {
            default_page: cfg.page,
            default_limit: cfg.limit,
            max_limit: cfg.max_limit,
        }
    }
}

impl PageBounds {
    /// Non-positive or missing page → default page; non-positive or missing limit →
    /// default limit; limit capped at `max_limit`. The page has no upper bound.
    pub fn clamp(&self, page: Option<i64>, limit: Option<i64>) -> (u64, u64) {
        let page = match page {
            Some(p) if p > 0 => p as u64,
            _ => self.default_page.max(1),
        };
        let limit = match limit {
            Some(l) if l > 0 => l as u64,
            _ => self.default_limit,
        };
        (page, limit.min(self.max_limit).max(1))
    }
}

/// Pagination actually applied, echoed back for link building.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePagination {
    pub page: u64,
    pub limit: u64,
    pub path: String,
    /// Canonical sort string, e.g. `title:DESCid:ASC`.
    pub sort: String,
    /// Filter text exactly as received.
    pub filter: Option<String>,
}

impl EffectivePagination {
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn take(&self) -> u64 {
        self.limit
    }

    /// `{path}?page={page}&limit={limit}[&sort=..][&filter=..]`
    pub fn link(&self, page: u64) -> String {
        let mut link = format!("{}?page={}&limit={}", self.path, page, self.limit);
        if !self.sort.is_empty() {
            link.push_str("&sort=");
            link.push_str(&self.sort);
        }
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.is_empty()) {
            link.push_str("&filter=");
            link.push_str(filter);
        }
        link
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

/// Navigation links. `previous` and `next` are always empty strings for now.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: String,
    pub previous: String,
    pub next: String,
    pub last: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
    pub links: PageLinks,
}

pub fn total_pages(total_items: u64, limit: u64) -> u64 {
    if total_items == 0 {
        0
    } else {
        total_items.div_ceil(limit.max(1))
    }
}

impl<T> PageResult<T> {
    pub fn assemble(items: Vec<T>, total_items: u64, pagination: &EffectivePagination) -> Self {
        let total_pages = total_pages(total_items, pagination.limit);
        Self {
            items,
            meta: PageMeta {
                page: pagination.page,
                total_pages,
                total_items,
            },
            links: PageLinks {
                first: pagination.link(1),
                previous: String::new(),
                next: String::new(),
                last: pagination.link(total_pages),
            },
        }
    }

    /// Map items while preserving meta and links (entity → DTO).
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
            links: self.links,
        }
    }
}
