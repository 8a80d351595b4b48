pub mod collection;
pub use collection::{KeyedTree, NestedValue, TreeError};

pub mod identifier;
pub use identifier::IdentifierParser;

pub mod analyzer;
pub use analyzer::{AliasScope, AnalysisContext, AnalyzerConfig, AnalyzerError, Expression, ResolvedColumns};
