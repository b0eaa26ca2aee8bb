//! Operator call syntax embedded in filter values.
//!
//! ```text
//! Call    := NAME '(' (Call | Literal)? ')'
//! Literal := '\'' any* '\''
//! ```
//!
//! Calls nest at most [`MAX_OPERATOR_DEPTH`] levels. Input that does not fit the
//! grammar, or whose outer name is not an operator keyword, becomes a substring match.

use tracing::debug;

use crate::ast::{FindOperator, Operand, Operator};

pub const MAX_OPERATOR_DEPTH: usize = 2;

#[derive(Debug, PartialEq, Eq)]
struct Call<'a> {
    names: Vec<&'a str>,
    literal: Option<&'a str>,
}

/// Resolve a raw filter value into an operator. Never fails.
pub fn resolve_conditional(value: &str) -> FindOperator {
    parse_call(value)
        .and_then(|call| call.resolve())
        .unwrap_or_else(|| {
            debug!(value, "no operator call in filter value, using substring match");
            FindOperator::contains(value)
        })
}

fn parse_call(input: &str) -> Option<Call<'_>> {
    let mut names = Vec::with_capacity(MAX_OPERATOR_DEPTH);
    let mut rest = input.trim();

    let literal = loop {
        let open = rest.find('(')?;
        let name = rest[..open].trim();
        if names.len() == MAX_OPERATOR_DEPTH || !is_identifier(name) {
            return None;
        }
        names.push(name);
        rest = rest[open + 1..].trim_start();

        if let Some(quoted) = rest.strip_prefix('\'') {
            let close = quoted.rfind('\'')?;
            rest = &quoted[close + 1..];
            break Some(&quoted[..close]);
        }
        if rest.starts_with(')') {
            break None;
        }
    };

    // every opened call closes, nothing trails
    let mut closers = 0;
    for c in rest.chars().filter(|c| !c.is_whitespace()) {
        if c != ')' {
            return None;
        }
        closers += 1;
    }
    (closers == names.len()).then_some(Call { names, literal })
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Call<'_> {
    fn resolve(&self) -> Option<FindOperator> {
        let outer = Operator::from_keyword(self.names.first()?)?;
        let inner = self
            .names
            .get(1)
            .and_then(|name| Operator::from_keyword(name));

        match inner {
            Some(inner) => {
                let inner = apply(inner, self.literal)?;
                Some(FindOperator::new(outer, Operand::Nested(Box::new(inner))))
            }
            None => apply(outer, self.literal),
        }
    }
}

/// Shapes the literal for the operator; `None` when it cannot be shaped.
fn apply(op: Operator, literal: Option<&str>) -> Option<FindOperator> {
    let literal = literal.unwrap_or_default();
    let operand = match op {
        Operator::IsNull => Operand::None,
        Operator::In | Operator::Any => Operand::List(split_list(literal)),
        Operator::Between => {
            let (from, to) = literal.split_once(',')?;
            Operand::Range(from.trim().to_owned(), to.trim().to_owned())
        }
        _ => Operand::Literal(literal.to_owned()),
    };
    Some(FindOperator::new(op, operand))
}

fn split_list(literal: &str) -> Vec<String> {
    if literal.trim().is_empty() {
        return Vec::new();
    }
    literal.split(',').map(|s| s.trim().to_owned()).collect()
}
