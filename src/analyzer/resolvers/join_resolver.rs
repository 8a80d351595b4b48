use serde_json::json;
use tracing::debug;

use crate::analyzer::ast::{ExprKind, ExprView, FromEntry, FromKind, JoinRef, ParseTree};
use crate::analyzer::{AliasResolver, AliasScope, AnalysisContext, AnalyzerError};
use crate::collection::KeyedTree;

pub struct JoinResolver;

impl JoinResolver {
    /// Synthesize the implicit output columns of USING joins into the
    /// statement's SELECT list. The statement node is mutated in place and
    /// is the canonical version from here on.
    pub fn lift_joined_columns(
        subquery: &mut ParseTree,
        ctx: &mut AnalysisContext,
    ) -> Result<(), AnalyzerError> {
        if subquery.get_subtree("FROM").is_none() {
            // no tables, no change
            return Ok(());
        }

        let scope = AliasResolver::dealias_subquery_exprs(subquery, ctx)?;

        // every synthesized column is decided first; the SELECT list is
        // only touched once the FROM borrow ends
        let mut lifted: Vec<ParseTree> = Vec::new();
        {
            let tables = subquery
                .get_subtree("FROM")
                .ok_or_else(|| AnalyzerError::shape("FROM clause vanished during lifting"))?;
            let mut joins = tables.forest().values();
            if joins.next().is_none() {
                return Err(AnalyzerError::shape("FROM clause without a primary table"));
            }

            for join in joins {
                let entry = FromEntry::new(join);
                let join_table_name = entry.display_name()?;
                match entry.join_ref() {
                    JoinRef::Using => {
                        for (_, shared) in entry.ref_clause()?.forest() {
                            let ref_name = ExprView::new(shared).base_expr()?;
                            let column_expr = Self::synthesized_colref(&join_table_name, ref_name);
                            let lift = match entry.kind()? {
                                FromKind::Subquery => Self::passes_through_subquery(
                                    &entry,
                                    &scope,
                                    &join_table_name,
                                    ref_name,
                                )?,
                                FromKind::Table => true,
                            };
                            if lift {
                                debug!(join = %join_table_name, column = %ref_name, "lifting USING column");
                                lifted.push(column_expr);
                            }
                        }
                    }
                    JoinRef::Natural => return Err(AnalyzerError::NaturalJoin),
                    JoinRef::Plain => {
                        // reserved: ON and comma joins synthesize nothing
                    }
                }
            }
        }

        if !lifted.is_empty() {
            let statement =
                subquery.get_subtree_mut("SELECT").ok_or(AnalyzerError::NotASelect)?;
            for column_expr in lifted {
                statement.push_child(column_expr);
            }
        }
        Ok(())
    }

    /// A USING column shared with a joined subquery is only liftable when
    /// the subquery passes it through unchanged. Scans the subquery's own
    /// SELECT list for the item exposing `ref_name`.
    fn passes_through_subquery(
        entry: &FromEntry,
        scope: &AliasScope,
        join_table_name: &str,
        ref_name: &str,
    ) -> Result<bool, AnalyzerError> {
        let statement = entry
            .sub_tree()?
            .get_subtree("SELECT")
            .ok_or(AnalyzerError::NotASelect)?;

        for (_, col) in statement.forest() {
            let view = ExprView::new(col);
            let col_name = match view.alias_name()? {
                Some(name) => name,
                None => view.base_expr()?.to_string(),
            };
            if col_name != ref_name {
                continue;
            }

            match scope.resolve(join_table_name, &col_name) {
                Some(dealiased) => {
                    if dealiased.is_plain_colref() {
                        return Ok(true);
                    }
                    return Err(AnalyzerError::DerivedJoinColumn {
                        join: join_table_name.to_string(),
                        column: col_name,
                    });
                }
                // unresolved items can still be lifted when they are
                // themselves nested subquery references
                None => {
                    if view.kind()? == ExprKind::Subquery {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }

    fn synthesized_colref(join_table_name: &str, ref_name: &str) -> ParseTree {
        KeyedTree::from_value(&json!({
            "expr_type": "colref",
            "alias": false,
            "base_expr": format!("{}.{}", join_table_name, ref_name),
            "no_quotes": {
                "delim": ".",
                "parts": [join_table_name, ref_name],
            },
        }))
    }
}
