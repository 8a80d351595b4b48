use tracing::{debug, trace};

use crate::analyzer::ast::{ExprKind, ExprView, ParseTree};
use crate::analyzer::{
    AliasResolver, AliasScope, AnalysisContext, AnalyzerError, Expression, ResolvedColumns,
};
use crate::identifier::IdentifierParser;

/// What the substitution walk does with one node of the current frontier.
enum Step {
    Descend,
    Inline(Expression),
    BaseColumn(String),
    Keep,
}

pub struct ColumnResolver;

impl ColumnResolver {
    /// Resolve every output column of `subquery` to its fully substituted
    /// expression and the base-table columns it depends on.
    pub fn exprs_from_subquery(
        subquery: &ParseTree,
        ctx: &mut AnalysisContext,
    ) -> Result<ResolvedColumns, AnalyzerError> {
        let scope = AliasResolver::dealias_subquery_exprs(subquery, ctx)?;
        let statement = subquery.get_subtree("SELECT").ok_or(AnalyzerError::NotASelect)?;

        let mut resolved = ResolvedColumns::new();
        for (_, column_expr) in statement.forest() {
            let view = ExprView::new(column_expr);
            let column_name = match view.alias_name()? {
                Some(name) => name,
                None => match view.kind()? {
                    ExprKind::ColRef => {
                        let parts = IdentifierParser::parse(view.base_expr()?);
                        match parts.last() {
                            Some(name) => name.clone(),
                            None => {
                                return Err(AnalyzerError::shape("colref with an empty base_expr"))
                            }
                        }
                    }
                    // unaliased computed expressions stay unaddressable
                    // from the superquery and are not resolved
                    _ => continue,
                },
            };

            let expression =
                Self::substitute(column_expr, &scope, ctx.config.max_expression_depth)?;
            trace!(column = %column_name, deps = expression.columns.len(), "resolved output column");
            resolved.insert(column_name, expression);
        }

        debug!(columns = resolved.len(), "resolved subquery output columns");
        Ok(resolved)
    }

    /// Breadth-first substitution over a working copy of one select item.
    /// Each round scans the expression lists of the current frontier and
    /// descends one nesting level; qualified references into the scope are
    /// swapped for the expressions they stand for, references past the
    /// scope are recorded as base-column dependencies.
    fn substitute(
        column_expr: &ParseTree,
        scope: &AliasScope,
        max_depth: usize,
    ) -> Result<Expression, AnalyzerError> {
        // single-item list wrapper, so the root expression can be replaced
        // like any nested node
        let mut wrapped = ParseTree::new();
        wrapped.set_subtree("0".to_string(), column_expr.clone());

        let mut columns: Vec<String> = Vec::new();
        let mut front: Vec<Vec<String>> = vec![vec![]];
        let mut depth = 0usize;

        while !front.is_empty() {
            depth += 1;
            if depth > max_depth {
                return Err(AnalyzerError::shape(format!(
                    "expression nested deeper than {} levels",
                    max_depth
                )));
            }

            let prev_front = std::mem::take(&mut front);
            for list_path in prev_front {
                let keys: Vec<String> =
                    Self::node_at(&wrapped, &list_path)?.forest().keys().cloned().collect();
                for key in keys {
                    let step = {
                        let list = Self::node_at(&wrapped, &list_path)?;
                        let subexpr = list.get_subtree(&key).ok_or_else(|| {
                            AnalyzerError::shape("expression list changed during the walk")
                        })?;
                        let view = ExprView::new(subexpr);
                        match view.kind()? {
                            ExprKind::Expression
                            | ExprKind::Function
                            | ExprKind::AggregateFunction => {
                                view.sub_tree()?;
                                Step::Descend
                            }
                            ExprKind::ColRef => {
                                let parts = view.name_parts()?;
                                match parts.len() {
                                    3 => {
                                        return Err(AnalyzerError::DatabaseQualifiedColumn(
                                            view.base_expr()?.to_string(),
                                        ))
                                    }
                                    1 => {
                                        return Err(AnalyzerError::UnqualifiedColumn(
                                            view.base_expr()?.to_string(),
                                        ))
                                    }
                                    2 => match scope.resolve(&parts[0], &parts[1]) {
                                        Some(dealiased) => Step::Inline(dealiased.clone()),
                                        None => Step::BaseColumn(view.base_expr()?.to_string()),
                                    },
                                    n => {
                                        return Err(AnalyzerError::shape(format!(
                                            "colref with {} identifier parts",
                                            n
                                        )))
                                    }
                                }
                            }
                            _ => Step::Keep,
                        }
                    };

                    match step {
                        Step::Descend => {
                            let mut path = list_path.clone();
                            path.push(key);
                            path.push("sub_tree".to_string());
                            front.push(path);
                        }
                        Step::Inline(dealiased) => {
                            // the reference is swapped for an already fully
                            // resolved tree, so this walk never revisits it
                            columns.extend(dealiased.columns.iter().cloned());
                            let list = Self::node_at_mut(&mut wrapped, &list_path)?;
                            list.set_subtree(key, dealiased.expr_tree);
                        }
                        Step::BaseColumn(reference) => columns.push(reference),
                        Step::Keep => {}
                    }
                }
            }
        }

        let expr_tree = wrapped
            .take_subtree("0")
            .ok_or_else(|| AnalyzerError::shape("substitution wrapper lost its root"))?;
        Ok(Expression::new(columns, expr_tree))
    }

    fn node_at<'t>(root: &'t ParseTree, path: &[String]) -> Result<&'t ParseTree, AnalyzerError> {
        let mut node = root;
        for key in path {
            node = node.get_subtree(key).ok_or_else(|| {
                AnalyzerError::shape(format!("dangling expression path at '{}'", key))
            })?;
        }
        Ok(node)
    }

    fn node_at_mut<'t>(
        root: &'t mut ParseTree,
        path: &[String],
    ) -> Result<&'t mut ParseTree, AnalyzerError> {
        let mut node = root;
        for key in path {
            node = node.get_subtree_mut(key).ok_or_else(|| {
                AnalyzerError::shape(format!("dangling expression path at '{}'", key))
            })?;
        }
        Ok(node)
    }
}
