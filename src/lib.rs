pub mod change;
pub mod cli;
pub mod compile;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod lexer;
pub mod math;
pub mod number;
pub mod parser;
pub mod registry;
pub mod sedml;
pub mod unit;
pub mod xpath;

pub use change::{Change, ChangeKind, ChangeType, RangeScale};
pub use compile::{Compilation, ModelDefinition, RepeatedTaskDefinition};
pub use diagnostics::{Diagnostics, ReportedError};
pub use document::{Element, ElementKind, ModelDocument, ModelElement};
pub use error::{ChangeError, FormulaError};
pub use lexer::Lexer;
pub use math::{MathExpr, parse_formula};
pub use parser::Parser;
pub use registry::{ModelEntry, Registry, TaskEntry};
pub use sedml::{SedChange, SedDocument, SedModel, SedParameter, SedRange, SedRepeatedTask, SedSetValue};
pub use unit::CompilationUnit;
