use crate::ast::Where;

/// Layer a caller-supplied constraint over the parsed filter.
///
/// - no constraint: the filter as is;
/// - array constraint: filter element(s) first, then the constraint elements;
/// - object constraint over an array filter: appended as one more element;
/// - object over object: shallow merge, constraint keys win.
pub fn merge_where(filter: Where, constraint: Option<Where>) -> Where {
    match (filter, constraint) {
        (filter, None) => filter,
        (Where::Any(mut items), Some(Where::Any(extra))) => {
            items.extend(extra);
            Where::Any(items)
        }
        (filter @ Where::All(_), Some(Where::Any(extra))) => {
            Where::Any(std::iter::once(filter).chain(extra).collect())
        }
        (Where::Any(mut items), Some(extra @ Where::All(_))) => {
            items.push(extra);
            Where::Any(items)
        }
        (Where::All(mut clause), Some(Where::All(extra))) => {
            clause.extend(extra);
            Where::All(clause)
        }
    }
}
