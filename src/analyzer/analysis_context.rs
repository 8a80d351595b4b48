use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::analyzer::ast::ParseTree;
use crate::analyzer::{
    AliasResolver, AliasScope, AnalyzerConfig, AnalyzerError, ColumnResolver, JoinResolver,
    ResolvedColumns,
};
use crate::collection::KeyedTree;

/// Per-statement analysis state: the configuration plus the dealiasing
/// cache. One context covers exactly one top-level analysis run; batch
/// callers create a fresh context per statement, and concurrent analyses
/// must never share one (the context is single-threaded state).
pub struct AnalysisContext {
    pub config: AnalyzerConfig,
    /// alias scopes keyed by statement-node address
    scopes: HashMap<usize, Rc<AliasScope>>,
    computations: usize,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config, scopes: HashMap::new(), computations: 0 }
    }

    /// Lift a raw parser document into tree form and resolve its output
    /// columns in one step.
    pub fn analyze_statement(&mut self, parsed: &Value) -> Result<ResolvedColumns, AnalyzerError> {
        let statement = KeyedTree::from_value(parsed);
        self.exprs_from_subquery(&statement)
    }

    /// Output name -> fully substituted expression for every column the
    /// statement exposes to an enclosing query.
    pub fn exprs_from_subquery(
        &mut self,
        subquery: &ParseTree,
    ) -> Result<ResolvedColumns, AnalyzerError> {
        ColumnResolver::exprs_from_subquery(subquery, self)
    }

    /// Extend the statement's SELECT list with the implicit columns of its
    /// USING joins.
    pub fn lift_joined_columns(&mut self, subquery: &mut ParseTree) -> Result<(), AnalyzerError> {
        JoinResolver::lift_joined_columns(subquery, self)
    }

    /// The alias scope of `subquery`, computed once per node and shared.
    pub fn dealias_subquery_exprs(
        &mut self,
        subquery: &ParseTree,
    ) -> Result<Rc<AliasScope>, AnalyzerError> {
        AliasResolver::dealias_subquery_exprs(subquery, self)
    }

    /// Number of alias scopes computed so far (cache misses).
    pub fn scope_computations(&self) -> usize {
        self.computations
    }

    pub(crate) fn cached_scope(&self, subquery: &ParseTree) -> Option<Rc<AliasScope>> {
        self.scopes.get(&Self::node_id(subquery)).cloned()
    }

    pub(crate) fn store_scope(&mut self, subquery: &ParseTree, scope: Rc<AliasScope>) {
        self.computations += 1;
        self.scopes.insert(Self::node_id(subquery), scope);
    }

    /// Cache key: the node's address. Statement nodes stay put for the life
    /// of one run; only SELECT lists grow, and their items are never keys.
    fn node_id(subquery: &ParseTree) -> usize {
        subquery as *const ParseTree as usize
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}
