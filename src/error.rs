use thiserror::Error;

use crate::change::ChangeType;

/// Error produced while lexing or parsing formula text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Unable to parse formula at position {position}: {message}")]
pub struct FormulaError {
    /// Character offset into the formula text
    pub position: usize,
    pub message: String,
}

impl FormulaError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        FormulaError {
            position,
            message: message.into(),
        }
    }
}

/// Errors that can occur while building, finalizing or emitting changes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChangeError {
    /// The owning model of a change is not registered
    #[error("Unable to find the model '{0}' for a model change.  This is likely a programming error.")]
    ModelNotFound(String),

    /// The model is registered but has no loaded document
    #[error("Unable to load the document for model '{0}'.")]
    MissingDocument(String),

    /// A repeated task references a task that does not exist
    #[error("Unable to find the task '{0}'.")]
    TaskNotFound(String),

    /// A qualified variable path does not point into the model
    #[error("Unable to find the variable '{variable}' in model '{model}'.")]
    UnresolvedVariable { variable: String, model: String },

    /// Loop constructs only make sense inside a repeated task
    #[error(
        "It is not legal to have a looping change construct in a model directly.  You must use a repeated task instead."
    )]
    LoopInModel,

    /// Wrong number of values for the change type
    #[error("A {change_type} needs {expected} value(s), but {found} were given.")]
    ValueCount {
        change_type: ChangeType,
        expected: usize,
        found: usize,
    },

    /// A vector range without values would drive a task that never runs
    #[error("A {0} needs at least one value.")]
    EmptyRange(ChangeType),

    /// Loop constructs need a name for their range
    #[error("A {0} needs a variable name.")]
    MissingVariable(ChangeType),

    /// Stored attribute text that is not a number
    #[error("Unable to read '{0}' as a number.")]
    InvalidNumber(String),

    #[error(transparent)]
    Formula(#[from] FormulaError),
}
