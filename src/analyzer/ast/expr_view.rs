use serde_json::Value;

use crate::analyzer::ast::{str_leaf, ParseTree};
use crate::analyzer::AnalyzerError;

/// Expression node kinds this analyzer dispatches on. Anything else passes
/// through untouched as `Other`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    ColRef,
    Expression,
    Function,
    AggregateFunction,
    Subquery,
    Other(String),
}

/// Validating view over one expression node of the external parser's tree.
/// Every shape assumption about expression nodes lives behind these
/// accessors.
pub struct ExprView<'t> {
    node: &'t ParseTree,
}

impl<'t> ExprView<'t> {
    pub fn new(node: &'t ParseTree) -> Self {
        Self { node }
    }

    pub fn node(&self) -> &'t ParseTree {
        self.node
    }

    pub fn kind(&self) -> Result<ExprKind, AnalyzerError> {
        let kind = str_leaf(self.node, "expr_type")
            .map_err(|_| AnalyzerError::shape("expression node without 'expr_type'"))?;
        Ok(match kind {
            "colref" => ExprKind::ColRef,
            "expression" => ExprKind::Expression,
            "function" => ExprKind::Function,
            "aggregate_function" => ExprKind::AggregateFunction,
            "subquery" => ExprKind::Subquery,
            other => ExprKind::Other(other.to_string()),
        })
    }

    /// The explicit alias name, or `None` when the parser recorded
    /// `alias: false`.
    pub fn alias_name(&self) -> Result<Option<String>, AnalyzerError> {
        let alias = self
            .node
            .get_subtree("alias")
            .ok_or_else(|| AnalyzerError::shape("expression node without 'alias'"))?;
        if let Some(Value::Bool(false)) = alias.value() {
            return Ok(None);
        }
        match alias.get_subtree("name").and_then(|name| name.value()) {
            Some(Value::String(name)) => Ok(Some(name.clone())),
            _ => Err(AnalyzerError::shape("alias node without 'name'")),
        }
    }

    pub fn base_expr(&self) -> Result<&'t str, AnalyzerError> {
        str_leaf(self.node, "base_expr")
            .map_err(|_| AnalyzerError::shape("expression node without 'base_expr'"))
    }

    /// The decomposed identifier parts of a colref (`no_quotes.parts`).
    pub fn name_parts(&self) -> Result<Vec<String>, AnalyzerError> {
        let parts = self
            .node
            .get_subtree("no_quotes")
            .and_then(|no_quotes| no_quotes.get_subtree("parts"))
            .ok_or_else(|| AnalyzerError::shape("colref without 'no_quotes.parts'"))?;
        parts
            .forest()
            .values()
            .map(|part| match part.value() {
                Some(Value::String(text)) => Ok(text.clone()),
                _ => Err(AnalyzerError::shape("non-string identifier part")),
            })
            .collect()
    }

    /// Nested child expressions of expression/function nodes, or the inner
    /// statement of a subquery reference.
    pub fn sub_tree(&self) -> Result<&'t ParseTree, AnalyzerError> {
        self.node
            .get_subtree("sub_tree")
            .ok_or_else(|| AnalyzerError::shape("expression node without 'sub_tree'"))
    }
}
