use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgDiffError {
    #[error("Cannot parse string: {statement}\nExpected {expected} at position {position} '{context}'")]
    Syntax {
        statement: String,
        expected: String,
        /// 1-based character offset of the cursor when parsing failed.
        position: usize,
        context: String,
    },

    #[error("Unsupported syntax in statement: {statement}\nAt position {position} '{context}': {hint}")]
    Unsupported {
        statement: String,
        position: usize,
        context: String,
        hint: String,
    },

    #[error("Cannot find {kind} `{name}` referenced by statement: {statement}")]
    ObjectNotFound {
        kind: ObjectKind,
        name: String,
        statement: String,
    },

    #[error("{kind} `{name}` is defined more than once, second definition: {statement}")]
    DuplicateObject {
        kind: ObjectKind,
        name: String,
        statement: String,
    },

    #[error("End of input reached before the statement was terminated: {statement}")]
    UnterminatedStatement { statement: String },

    #[error("Invalid schema name pattern '{pattern}': {source}")]
    InvalidSchemaPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("io error: `{0}`")]
    IoError(#[from] std::io::Error),
}

/// The kind of object an [PgDiffError::ObjectNotFound] or [PgDiffError::DuplicateObject] is about.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ObjectKind {
    Schema,
    Relation,
    Table,
    View,
    Column,
    Constraint,
    Sequence,
    Function,
    Operator,
    Index,
    Trigger,
    Type,
    Domain,
    Extension,
    Policy,
    Rule,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ObjectKind::Schema => "schema",
            ObjectKind::Relation => "relation",
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
            ObjectKind::Column => "column",
            ObjectKind::Constraint => "constraint",
            ObjectKind::Sequence => "sequence",
            ObjectKind::Function => "function",
            ObjectKind::Operator => "operator",
            ObjectKind::Index => "index",
            ObjectKind::Trigger => "trigger",
            ObjectKind::Type => "type",
            ObjectKind::Domain => "domain",
            ObjectKind::Extension => "extension",
            ObjectKind::Policy => "policy",
            ObjectKind::Rule => "rule",
        })
    }
}

pub type Result<T = ()> = std::result::Result<T, PgDiffError>;
