use crate::config::{EntityColumns, PaginationConfig, DEFAULT_COLUMNS_KEY};

/// Configuration lookup keys of an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityIdentity {
    pub table_name: String,
    pub class_name: String,
}

impl EntityIdentity {
    pub fn new(table_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            class_name: class_name.into(),
        }
    }
}

/// Columns an entity may be sorted and filtered by.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnPolicy {
    pub sortable: Vec<String>,
    pub filterable: Vec<String>,
}

impl PaginationConfig {
    /// Table name, then class name, then the `default` entry; empty when none matches.
    pub fn resolve_sortable(&self, entity: &EntityIdentity) -> &[String] {
        self.resolve(entity, |c| c.sortable_columns.as_deref())
    }

    pub fn resolve_filterable(&self, entity: &EntityIdentity) -> &[String] {
        self.resolve(entity, |c| c.filterable_columns.as_deref())
    }

    pub fn column_policy(&self, entity: &EntityIdentity) -> ColumnPolicy {
        ColumnPolicy {
            sortable: self.resolve_sortable(entity).to_vec(),
            filterable: self.resolve_filterable(entity).to_vec(),
        }
    }

    fn resolve<'a>(
        &'a self,
        entity: &EntityIdentity,
        pick: impl Fn(&'a EntityColumns) -> Option<&'a [String]>,
    ) -> &'a [String] {
        [
            entity.table_name.as_str(),
            entity.class_name.as_str(),
            DEFAULT_COLUMNS_KEY,
        ]
        .into_iter()
        .filter_map(|key| self.columns.get(key))
        .filter_map(pick)
        .find(|cols| !cols.is_empty())
        .unwrap_or(&[])
    }
}
