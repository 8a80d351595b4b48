use std::rc::Rc;

use tracing::debug;

use crate::analyzer::ast::{FromEntry, FromKind, ParseTree};
use crate::analyzer::{AliasScope, AnalysisContext, AnalyzerError, ColumnResolver};

pub struct AliasResolver;

impl AliasResolver {
    /// Resolve the output columns of every subquery joined in the FROM
    /// clause of `subquery`, keyed by alias. Memoized per node within one
    /// context, so the join lifter and the column resolver observe the
    /// same expression instances.
    pub fn dealias_subquery_exprs(
        subquery: &ParseTree,
        ctx: &mut AnalysisContext,
    ) -> Result<Rc<AliasScope>, AnalyzerError> {
        if let Some(cached) = ctx.cached_scope(subquery) {
            return Ok(cached);
        }

        let mut scope = AliasScope::new();
        if let Some(tables) = subquery.get_subtree("FROM") {
            // alias names are visible only to the immediate superquery;
            // column expressions cannot reference each other's aliases
            for (_, join) in tables.forest() {
                let entry = FromEntry::new(join);
                match entry.kind()? {
                    FromKind::Table => {}
                    FromKind::Subquery => {
                        let alias = entry.alias_name()?.ok_or_else(|| {
                            AnalyzerError::shape("joined subquery without an alias")
                        })?;
                        let resolved =
                            ColumnResolver::exprs_from_subquery(entry.sub_tree()?, ctx)?;
                        debug!(alias = %alias, columns = resolved.len(), "dealiased joined subquery");
                        scope.insert(alias, resolved);
                    }
                }
            }
        }

        let scope = Rc::new(scope);
        ctx.store_scope(subquery, scope.clone());
        Ok(scope)
    }
}
