use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    /// NATURAL joins are never expanded.
    NaturalJoin,
    /// 3-part column references (`db.table.column`).
    DatabaseQualifiedColumn(String),
    /// 1-part column references; every analyzable colref needs a table or
    /// alias qualifier.
    UnqualifiedColumn(String),
    /// A USING join shares a column the joined subquery computes rather
    /// than passes through.
    DerivedJoinColumn { join: String, column: String },
    NotASelect,
    /// The parse tree deviates from the external parser's contracted shape.
    UnexpectedShape(String),
}

impl AnalyzerError {
    pub fn shape(message: impl Into<String>) -> Self {
        AnalyzerError::UnexpectedShape(message.into())
    }
}

impl Display for AnalyzerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerError::NaturalJoin => {
                write!(f, "unsupported feature: NATURAL JOIN")
            }
            AnalyzerError::DatabaseQualifiedColumn(name) => {
                write!(f, "unsupported feature: column ref with database identifier '{}'", name)
            }
            AnalyzerError::UnqualifiedColumn(name) => {
                write!(f, "unsupported feature: column ref without table identifier '{}'", name)
            }
            AnalyzerError::DerivedJoinColumn { join, column } => {
                write!(f, "derived join columns cannot be analyzed: '{}.{}'", join, column)
            }
            AnalyzerError::NotASelect => {
                write!(f, "only SELECT statements can be analyzed")
            }
            AnalyzerError::UnexpectedShape(message) => {
                write!(f, "unexpected parse tree shape: {}", message)
            }
        }
    }
}
