//! # Formula Expressions
//!
//! This module holds the expression tree that carries the symbolic-math
//! payload of formula assignments, compute changes and set-value nodes.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the formula lexer
//! - **[operators]** - Unary and binary operators with their precedence
//! - **[format]** - Canonical text rendering (the `Display` impl)
//!
//! Parsing lives in [`crate::parser`]; [`parse_formula`] is the entry point.
//!
//! ## Quick Start
//!
//! ```
//! use simchange::math::{parse_formula, MathExpr};
//!
//! let expr = parse_formula("k1*S1 + 2").unwrap();
//! assert!(!expr.is_number());
//! assert_eq!(expr.to_string(), "k1 * S1 + 2");
//!
//! let literal = parse_formula("-2").unwrap();
//! assert_eq!(literal, MathExpr::Number(-2.0));
//! ```
//!
//! ## Ownership
//!
//! A tree is a plain owned value. `Clone` is a deep copy, so two changes never
//! share a tree.
pub mod format;
pub mod operators;
pub mod tokens;

pub use operators::{BinOp, UnaryOp};
pub use tokens::Token;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FormulaError;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Expression tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum MathExpr {
    /// Numeric literal
    ///
    /// # Example
    /// ```text
    /// 3.5
    /// ```
    Number(f64),

    /// Reference to a named quantity (model variable, range id, local helper)
    ///
    /// # Example
    /// ```text
    /// k1
    /// ```
    Name(String),

    /// Unary operation
    Unary { op: UnaryOp, operand: Box<MathExpr> },

    /// Binary operation (arithmetic, comparison, logical)
    Binary {
        op: BinOp,
        left: Box<MathExpr>,
        right: Box<MathExpr>,
    },

    /// Function call
    ///
    /// # Example
    /// ```text
    /// exp(-k * t)
    /// ```
    Call { name: String, args: Vec<MathExpr> },
}

impl MathExpr {
    pub fn name(name: impl Into<String>) -> Self {
        MathExpr::Name(name.into())
    }

    /// True when the tree is a single numeric literal.
    pub fn is_number(&self) -> bool {
        matches!(self, MathExpr::Number(_))
    }

    /// The literal value, if the tree is a pure number.
    pub fn number(&self) -> Option<f64> {
        match self {
            MathExpr::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Names referenced anywhere in the tree, in order of first appearance.
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            MathExpr::Number(_) => {}
            MathExpr::Name(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            MathExpr::Unary { operand, .. } => operand.collect_names(names),
            MathExpr::Binary { left, right, .. } => {
                left.collect_names(names);
                right.collect_names(names);
            }
            MathExpr::Call { args, .. } => {
                for arg in args {
                    arg.collect_names(names);
                }
            }
        }
    }
}

/// Parses formula text into an expression tree.
pub fn parse_formula(text: &str) -> Result<MathExpr, FormulaError> {
    let lexer = Lexer::new(text);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

impl Serialize for MathExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MathExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_formula(&text).map_err(serde::de::Error::custom)
    }
}
