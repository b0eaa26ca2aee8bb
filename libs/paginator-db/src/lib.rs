//! SeaORM adapter for `paginator-core`: compiles `Where`/`SortSpec` into
//! `Condition`/`ORDER BY` and serves pages through [`SeaOrmPageRepository`].

pub mod condition;
pub mod repo;

pub use condition::{
    operator_to_expr, where_to_condition, BuildError, BuildResult, Field, FieldKind, FieldMap,
    SortExt, WhereExt,
};
pub use repo::SeaOrmPageRepository;
