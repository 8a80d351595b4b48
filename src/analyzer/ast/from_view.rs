use crate::analyzer::ast::{opt_str_leaf, str_leaf, ExprView, ParseTree};
use crate::analyzer::AnalyzerError;

#[derive(Debug, Clone, PartialEq)]
pub enum FromKind {
    Table,
    Subquery,
}

/// How a join entry names its shared columns.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinRef {
    Using,
    Natural,
    /// ON and comma joins; their columns stay behind explicit qualified
    /// references, so nothing extra is resolved from them.
    Plain,
}

/// Validating view over one FROM-list entry.
pub struct FromEntry<'t> {
    node: &'t ParseTree,
}

impl<'t> FromEntry<'t> {
    pub fn new(node: &'t ParseTree) -> Self {
        Self { node }
    }

    fn expr(&self) -> ExprView<'t> {
        ExprView::new(self.node)
    }

    /// FROM entries must denote a base table or an aliased subquery;
    /// anything else breaks the contract with the external parser.
    pub fn kind(&self) -> Result<FromKind, AnalyzerError> {
        match str_leaf(self.node, "expr_type")
            .map_err(|_| AnalyzerError::shape("FROM entry without 'expr_type'"))?
        {
            "table" => Ok(FromKind::Table),
            "subquery" => Ok(FromKind::Subquery),
            other => Err(AnalyzerError::shape(format!(
                "FROM entry must be a table or subquery, got '{}'",
                other
            ))),
        }
    }

    pub fn alias_name(&self) -> Result<Option<String>, AnalyzerError> {
        self.expr().alias_name()
    }

    pub fn table_name(&self) -> Result<&'t str, AnalyzerError> {
        str_leaf(self.node, "table").map_err(|_| AnalyzerError::shape("join without a table name"))
    }

    /// The name this entry is addressed by: its alias when present, the
    /// table name otherwise. Subqueries always carry aliases.
    pub fn display_name(&self) -> Result<String, AnalyzerError> {
        if let Some(alias) = self.alias_name()? {
            return Ok(alias);
        }
        Ok(self.table_name()?.to_string())
    }

    pub fn join_ref(&self) -> JoinRef {
        match opt_str_leaf(self.node, "ref_type") {
            Some("USING") => JoinRef::Using,
            Some("NATURAL") => JoinRef::Natural,
            _ => JoinRef::Plain,
        }
    }

    /// The shared-column list of a USING join.
    pub fn ref_clause(&self) -> Result<&'t ParseTree, AnalyzerError> {
        match self.node.get_subtree("ref_clause") {
            Some(clause) if clause.value().is_none() => Ok(clause),
            _ => Err(AnalyzerError::shape("USING join without a 'ref_clause' list")),
        }
    }

    pub fn sub_tree(&self) -> Result<&'t ParseTree, AnalyzerError> {
        self.expr().sub_tree()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::KeyedTree;
    use serde_json::json;

    #[test]
    fn test_kind_accepts_tables_and_subqueries_only() {
        let node = KeyedTree::from_value(&json!({ "expr_type": "table" }));
        assert_eq!(FromEntry::new(&node).kind().unwrap(), FromKind::Table);

        let node = KeyedTree::from_value(&json!({ "expr_type": "subquery" }));
        assert_eq!(FromEntry::new(&node).kind().unwrap(), FromKind::Subquery);

        let node = KeyedTree::from_value(&json!({ "expr_type": "table_expression" }));
        match FromEntry::new(&node).kind() {
            Err(AnalyzerError::UnexpectedShape(message)) => {
                assert!(message.contains("table_expression"), "unexpected message: {message}");
            }
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn test_display_name_prefers_alias() {
        let node = KeyedTree::from_value(&json!({
            "expr_type": "table", "table": "orders", "alias": { "name": "o" }
        }));
        assert_eq!(FromEntry::new(&node).display_name().unwrap(), "o");

        let node = KeyedTree::from_value(&json!({
            "expr_type": "table", "table": "orders", "alias": false
        }));
        assert_eq!(FromEntry::new(&node).display_name().unwrap(), "orders");
    }

    #[test]
    fn test_join_ref_mapping() {
        let node = KeyedTree::from_value(&json!({ "ref_type": "USING" }));
        assert_eq!(FromEntry::new(&node).join_ref(), JoinRef::Using);

        let node = KeyedTree::from_value(&json!({ "ref_type": "NATURAL" }));
        assert_eq!(FromEntry::new(&node).join_ref(), JoinRef::Natural);

        let node = KeyedTree::from_value(&json!({ "ref_type": false }));
        assert_eq!(FromEntry::new(&node).join_ref(), JoinRef::Plain);

        let node = KeyedTree::from_value(&json!({ "table": "t" }));
        assert_eq!(FromEntry::new(&node).join_ref(), JoinRef::Plain);
    }

    #[test]
    fn test_ref_clause_must_be_a_list() {
        let node = KeyedTree::from_value(&json!({ "ref_clause": [{ "base_expr": "id" }] }));
        assert!(FromEntry::new(&node).ref_clause().is_ok());

        let node = KeyedTree::from_value(&json!({ "ref_clause": false }));
        assert!(FromEntry::new(&node).ref_clause().is_err());
    }
}
