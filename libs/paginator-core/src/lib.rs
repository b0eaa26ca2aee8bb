//! Offset pagination core: whitelisted sort/filter parsing, constraint merging,
//! page clamping and response assembly over an abstract repository.
//!
//! Storage lives behind [`PageRepository`]; this crate never talks to a database.

pub mod ast;
mod conditional;
pub mod config;
mod error;
pub mod filter;
mod merge;
pub mod page;
pub mod paginator;
mod policy;
pub mod sort;

pub use ast::{FindOperator, Operand, Operator, Where, WhereClause};
pub use conditional::{resolve_conditional, MAX_OPERATOR_DEPTH};
pub use config::{EntityColumns, PaginationConfig, DEFAULT_COLUMNS_KEY};
pub use error::{Error, Result};
pub use filter::parse_filter;
pub use merge::merge_where;
pub use page::{
    total_pages, EffectivePagination, PageBounds, PageLinks, PageMeta, PageParams, PageRequest,
    PageResult,
};
pub use paginator::{FindOptions, FindQuery, PageRepository, Paginated, Paginator};
pub use policy::{ColumnPolicy, EntityIdentity};
pub use sort::{SortDir, SortKey, SortSpec};
