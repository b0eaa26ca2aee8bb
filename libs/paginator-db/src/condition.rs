//! Predicate tree → `sea_orm::Condition` compiler (AST in, SQL out).
//! Parsing belongs to `paginator-core`. This module only consumes `Where` and `SortSpec`.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use paginator_core::{FindOperator, Operand, Operator, SortDir, SortSpec, Where};
use sea_orm::{
    sea_query::{Alias, Expr, Func, Order, SimpleExpr},
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder,
};
use thiserror::Error;

/// Whitelisted field kind → used to coerce filter literals into `sea_orm::Value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    I64,
    F64,
    Bool,
    Uuid,
    DateTimeUtc,
    Date,
}

#[derive(Clone)]
pub struct Field<E: EntityTrait> {
    pub col: E::Column,
    pub kind: FieldKind,
}

/// API column name → entity column. Lookups are case-insensitive.
#[derive(Clone)]
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<String, Field<E>>,
    allow_raw: bool,
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            allow_raw: false,
        }
    }

    pub fn insert(mut self, api_name: impl Into<String>, col: E::Column, kind: FieldKind) -> Self {
        self.map
            .insert(api_name.into().to_lowercase(), Field { col, kind });
        self
    }

    /// Permit `Raw('...')` filter values. They are spliced into SQL verbatim.
    pub fn allow_raw(mut self) -> Self {
        self.allow_raw = true;
        self
    }

    pub fn raw_allowed(&self) -> bool {
        self.allow_raw
    }

    pub fn get(&self, name: &str) -> Option<&Field<E>> {
        self.map.get(&name.to_lowercase())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("type mismatch on {field}: expected {expected:?}, got '{got}'")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        got: String,
    },

    #[error("unsupported operator composition: {outer}({inner}(..))")]
    UnsupportedComposition { outer: Operator, inner: Operator },

    #[error("operator {0} does not accept this operand")]
    UnsupportedOperand(Operator),

    #[error("raw SQL filters are disabled (field {0})")]
    RawDisabled(String),

    #[error("relation loading is not supported: {0}")]
    UnsupportedRelation(String),
}
pub type BuildResult<T> = Result<T, BuildError>;

/* ---------- coercion helpers ---------- */

fn coerce(field: &str, kind: FieldKind, s: &str) -> BuildResult<sea_orm::Value> {
    use sea_orm::Value as V;

    let mismatch = || BuildError::TypeMismatch {
        field: field.to_owned(),
        expected: kind,
        got: s.to_owned(),
    };
    let s_trim = s.trim();

    Ok(match kind {
        FieldKind::String => V::String(Some(Box::new(s.to_owned()))),
        FieldKind::I64 => V::BigInt(Some(s_trim.parse::<i64>().map_err(|_| mismatch())?)),
        FieldKind::F64 => V::Double(Some(s_trim.parse::<f64>().map_err(|_| mismatch())?)),
        FieldKind::Bool => V::Bool(Some(s_trim.parse::<bool>().map_err(|_| mismatch())?)),
        FieldKind::Uuid => V::Uuid(Some(Box::new(
            s_trim.parse::<uuid::Uuid>().map_err(|_| mismatch())?,
        ))),
        FieldKind::DateTimeUtc => {
            let dt = chrono::DateTime::parse_from_rfc3339(s_trim)
                .map_err(|_| mismatch())?
                .with_timezone(&Utc);
            V::ChronoDateTimeUtc(Some(Box::new(dt)))
        }
        FieldKind::Date => V::ChronoDate(Some(Box::new(
            s_trim.parse::<NaiveDate>().map_err(|_| mismatch())?,
        ))),
    })
}

fn coerce_many(field: &str, kind: FieldKind, items: &[String]) -> BuildResult<Vec<sea_orm::Value>> {
    items.iter().map(|s| coerce(field, kind, s)).collect()
}

/* ---------- LIKE helpers ---------- */

// Non-text columns are compared as text
fn like_target<E: EntityTrait>(f: &Field<E>) -> SimpleExpr
where
    E::Column: ColumnTrait + Copy,
{
    match f.kind {
        FieldKind::String => Expr::col(f.col).into(),
        _ => Expr::col(f.col).cast_as(Alias::new("TEXT")),
    }
}

/* ---------- FindOperator -> SimpleExpr ---------- */

fn literal(op: &FindOperator) -> BuildResult<&str> {
    match &op.operand {
        Operand::Literal(v) => Ok(v),
        _ => Err(BuildError::UnsupportedOperand(op.op)),
    }
}

pub fn operator_to_expr<E: EntityTrait>(
    name: &str,
    op: &FindOperator,
    fmap: &FieldMap<E>,
) -> BuildResult<SimpleExpr>
where
    E::Column: ColumnTrait + Copy,
{
    let f = fmap
        .get(name)
        .ok_or_else(|| BuildError::UnknownField(name.to_owned()))?;
    let col = f.col;

    if let Operand::Nested(inner) = &op.operand {
        return match op.op {
            Operator::Not => Ok(operator_to_expr(name, inner, fmap)?.not()),
            Operator::IsNull => Ok(Expr::col(col).is_null()),
            outer => Err(BuildError::UnsupportedComposition {
                outer,
                inner: inner.op,
            }),
        };
    }

    Ok(match op.op {
        Operator::IsNull => Expr::col(col).is_null(),
        Operator::Equal => Expr::col(col).eq(coerce(name, f.kind, literal(op)?)?),
        Operator::Not => Expr::col(col).ne(coerce(name, f.kind, literal(op)?)?),
        Operator::LessThan => Expr::col(col).lt(coerce(name, f.kind, literal(op)?)?),
        Operator::LessThanOrEqual => Expr::col(col).lte(coerce(name, f.kind, literal(op)?)?),
        Operator::MoreThan => Expr::col(col).gt(coerce(name, f.kind, literal(op)?)?),
        Operator::MoreThanOrEqual => Expr::col(col).gte(coerce(name, f.kind, literal(op)?)?),
        Operator::Like => Expr::expr(like_target(f)).like(literal(op)?),
        Operator::ILike => {
            Expr::expr(Func::lower(like_target(f))).like(literal(op)?.to_lowercase())
        }
        Operator::Between => match &op.operand {
            Operand::Range(from, to) => Expr::col(col).between(
                coerce(name, f.kind, from)?,
                coerce(name, f.kind, to)?,
            ),
            _ => return Err(BuildError::UnsupportedOperand(op.op)),
        },
        Operator::In | Operator::Any => match &op.operand {
            // IN () → always false
            Operand::List(items) if items.is_empty() => Expr::cust("1=0"),
            Operand::List(items) => Expr::col(col).is_in(coerce_many(name, f.kind, items)?),
            _ => return Err(BuildError::UnsupportedOperand(op.op)),
        },
        Operator::Raw => {
            if !fmap.raw_allowed() {
                return Err(BuildError::RawDisabled(name.to_owned()));
            }
            Expr::col(col).eq(Expr::cust(literal(op)?.to_owned()))
        }
    })
}

/* ---------- Where -> Condition ---------- */

pub fn where_to_condition<E: EntityTrait>(
    filter: &Where,
    fmap: &FieldMap<E>,
) -> BuildResult<Condition>
where
    E::Column: ColumnTrait + Copy,
{
    match filter {
        Where::All(clause) => clause
            .iter()
            .try_fold(Condition::all(), |cond, (name, op)| {
                Ok(cond.add(operator_to_expr(name, op, fmap)?))
            }),
        Where::Any(items) => items.iter().try_fold(Condition::any(), |cond, item| {
            Ok(cond.add(where_to_condition(item, fmap)?))
        }),
    }
}

/// Apply a predicate tree to a plain SeaORM `Select<E>`.
pub trait WhereExt<E: EntityTrait>: Sized {
    fn apply_where(self, filter: &Where, fmap: &FieldMap<E>) -> BuildResult<Self>;
}

impl<E> WhereExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    fn apply_where(self, filter: &Where, fmap: &FieldMap<E>) -> BuildResult<Self> {
        if filter.is_empty() {
            return Ok(self);
        }
        let cond = where_to_condition::<E>(filter, fmap)?;
        Ok(self.filter(cond))
    }
}

/// Apply a parsed sort spec as `ORDER BY`.
pub trait SortExt<E: EntityTrait>: Sized {
    fn apply_sort(self, order: &SortSpec, fmap: &FieldMap<E>) -> BuildResult<Self>;
}

impl<E> SortExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    fn apply_sort(self, order: &SortSpec, fmap: &FieldMap<E>) -> BuildResult<Self> {
        let mut query = self;

        for key in order.iter() {
            let field = fmap
                .get(&key.column)
                .ok_or_else(|| BuildError::UnknownField(key.column.clone()))?;

            let sea_order = match key.dir {
                SortDir::Asc => Order::Asc,
                SortDir::Desc => Order::Desc,
            };

            query = query.order_by(field.col, sea_order);
        }

        Ok(query)
    }
}
