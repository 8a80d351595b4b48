use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::analyzer::ast::ParseTree;

/// Output-column map of one resolved subquery: output name -> expression.
/// A recurring name overwrites the earlier entry.
pub type ResolvedColumns = IndexMap<String, Expression>;

/// A fully dealiased output column.
///
/// `expr_tree` keeps the external parser's node shape so a downstream
/// rewriter can splice it back into a statement; `columns` lists every
/// base-table column the expression reads, in discovery order, duplicates
/// included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub columns: Vec<String>,
    pub expr_tree: ParseTree,
}

impl Expression {
    pub fn new(columns: Vec<String>, expr_tree: ParseTree) -> Self {
        Self { columns, expr_tree }
    }

    /// A bare column reference with no computation applied.
    pub fn is_plain_colref(&self) -> bool {
        matches!(
            self.expr_tree.get_subtree("expr_type").and_then(|kind| kind.value()),
            Some(Value::String(kind)) if kind == "colref"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::KeyedTree;
    use serde_json::json;

    #[test]
    fn test_plain_colref_detection() {
        let colref = Expression::new(
            vec!["t.a".to_string()],
            KeyedTree::from_value(&json!({ "expr_type": "colref", "base_expr": "t.a" })),
        );
        assert!(colref.is_plain_colref());

        let derived = Expression::new(
            vec!["t.a".to_string()],
            KeyedTree::from_value(&json!({ "expr_type": "expression", "base_expr": "t.a + 1" })),
        );
        assert!(!derived.is_plain_colref());
    }
}
