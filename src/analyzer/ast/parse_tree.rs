use serde_json::Value;

use crate::analyzer::AnalyzerError;
use crate::collection::KeyedTree;

/// One parsed SQL statement (or expression subtree) as delivered by the
/// external grammar parser, lifted into tree form by
/// `KeyedTree::from_value`. Lists carry decimal index keys in source order.
pub type ParseTree = KeyedTree<String, Value>;

/// Required scalar string leaf under `key`.
pub(crate) fn str_leaf<'t>(node: &'t ParseTree, key: &str) -> Result<&'t str, AnalyzerError> {
    match node.get_subtree(key).and_then(|subtree| subtree.value()) {
        Some(Value::String(text)) => Ok(text.as_str()),
        _ => Err(AnalyzerError::shape(format!("expected string leaf '{}'", key))),
    }
}

/// Scalar string leaf under `key`, if the key holds one.
pub(crate) fn opt_str_leaf<'t>(node: &'t ParseTree, key: &str) -> Option<&'t str> {
    match node.get_subtree(key).and_then(|subtree| subtree.value()) {
        Some(Value::String(text)) => Some(text.as_str()),
        _ => None,
    }
}
