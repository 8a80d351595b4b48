use indexmap::IndexMap;

use crate::analyzer::{Expression, ResolvedColumns};

/// Resolved output columns of every aliased subquery joined in one FROM
/// clause: alias -> output column name -> expression. Base tables never
/// appear here; their columns are addressed directly by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasScope {
    entries: IndexMap<String, ResolvedColumns>,
}

impl AliasScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: String, columns: ResolvedColumns) {
        self.entries.insert(alias, columns);
    }

    /// The expression a qualified reference stands for, if `table` is a
    /// tracked alias exposing `column`.
    pub fn resolve(&self, table: &str, column: &str) -> Option<&Expression> {
        self.entries.get(table)?.get(column)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
