//! Structured predicate tree produced by the filter parser and consumed by repositories.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Operator keywords accepted in filter values, e.g. `LessThan('10')` or `Not(IsNull())`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Not,
    LessThan,
    LessThanOrEqual,
    MoreThan,
    MoreThanOrEqual,
    Equal,
    Like,
    ILike,
    Between,
    In,
    Any,
    IsNull,
    Raw,
}

impl Operator {
    pub const ALL: [Operator; 13] = [
        Operator::Not,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::MoreThan,
        Operator::MoreThanOrEqual,
        Operator::Equal,
        Operator::Like,
        Operator::ILike,
        Operator::Between,
        Operator::In,
        Operator::Any,
        Operator::IsNull,
        Operator::Raw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Not => "Not",
            Operator::LessThan => "LessThan",
            Operator::LessThanOrEqual => "LessThanOrEqual",
            Operator::MoreThan => "MoreThan",
            Operator::MoreThanOrEqual => "MoreThanOrEqual",
            Operator::Equal => "Equal",
            Operator::Like => "Like",
            Operator::ILike => "ILike",
            Operator::Between => "Between",
            Operator::In => "In",
            Operator::Any => "Any",
            Operator::IsNull => "IsNull",
            Operator::Raw => "Raw",
        }
    }

    /// Exact, case-sensitive keyword lookup.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == keyword)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an operator is applied to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// No argument (`IsNull()`).
    None,
    Literal(String),
    /// Comma separated literal for `In` / `Any`.
    List(Vec<String>),
    /// `from,to` literal for `Between`.
    Range(String, String),
    /// Result of another operator (`Not(IsNull())`).
    Nested(Box<FindOperator>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FindOperator {
    pub op: Operator,
    pub operand: Operand,
}

impl FindOperator {
    pub fn new(op: Operator, operand: Operand) -> Self {
        Self { op, operand }
    }

    pub fn equal(value: impl Into<String>) -> Self {
        Self::new(Operator::Equal, Operand::Literal(value.into()))
    }

    pub fn like(pattern: impl Into<String>) -> Self {
        Self::new(Operator::Like, Operand::Literal(pattern.into()))
    }

    /// Substring match, the fallback for values without operator syntax.
    pub fn contains(value: &str) -> Self {
        Self::like(format!("%{value}%"))
    }

    pub fn less_than(value: impl Into<String>) -> Self {
        Self::new(Operator::LessThan, Operand::Literal(value.into()))
    }

    pub fn more_than(value: impl Into<String>) -> Self {
        Self::new(Operator::MoreThan, Operand::Literal(value.into()))
    }

    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(Operator::Between, Operand::Range(from.into(), to.into()))
    }

    pub fn in_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            Operator::In,
            Operand::List(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn is_null() -> Self {
        Self::new(Operator::IsNull, Operand::None)
    }

    pub fn not(inner: FindOperator) -> Self {
        Self::new(Operator::Not, Operand::Nested(Box::new(inner)))
    }
}

/// Renders operator call syntax that parses back into the same operator.
impl fmt::Display for FindOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.op)?;
        match &self.operand {
            Operand::None => {}
            Operand::Literal(v) => write!(f, "'{v}'")?,
            Operand::List(items) => write!(f, "'{}'", items.join(","))?,
            Operand::Range(from, to) => write!(f, "'{from},{to}'")?,
            Operand::Nested(inner) => write!(f, "{inner}")?,
        }
        f.write_str(")")
    }
}

/// Column name → operator, all entries must hold.
pub type WhereClause = BTreeMap<String, FindOperator>;

/// Filter predicate: a JSON object in filter text becomes `All`, a JSON array becomes `Any`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Where {
    All(WhereClause),
    Any(Vec<Where>),
}

impl Default for Where {
    fn default() -> Self {
        Where::All(WhereClause::new())
    }
}

impl Where {
    /// Single-column equality, the usual shape of caller-side scoping.
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Where::All(WhereClause::from([(column.into(), FindOperator::equal(value))]))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Where::All(clause) => clause.is_empty(),
            Where::Any(items) => items.is_empty(),
        }
    }

    /// Renders the predicate back into filter text.
    ///
    /// Array elements are emitted as JSON-encoded strings, the same shape the
    /// filter parser expects for OR groups.
    pub fn to_filter_string(&self) -> String {
        self.to_json().to_string()
    }

    fn to_json(&self) -> Value {
        match self {
            Where::All(clause) => Value::Object(
                clause
                    .iter()
                    .map(|(column, op)| (column.clone(), Value::String(op.to_string())))
                    .collect(),
            ),
            Where::Any(items) => Value::Array(
                items
                    .iter()
                    .map(|w| Value::String(w.to_filter_string()))
                    .collect(),
            ),
        }
    }
}

impl FromIterator<(String, FindOperator)> for Where {
    fn from_iter<T: IntoIterator<Item = (String, FindOperator)>>(iter: T) -> Self {
        Where::All(iter.into_iter().collect())
    }
}
