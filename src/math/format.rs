//! Canonical formula text.
//!
//! Operators are spaced (`a + b`, `a * b`) except `^`, calls print as
//! `f(a, b)`, and parentheses appear only where precedence or associativity
//! requires them.

use std::fmt;

use super::{BinOp, MathExpr, UnaryOp};
use crate::number::number_to_text;

/// Precedence of a node when it appears as an operand.
fn precedence(expr: &MathExpr) -> u8 {
    match expr {
        MathExpr::Binary { op, .. } => op.precedence(),
        MathExpr::Unary { .. } => UnaryOp::PRECEDENCE,
        // Negative literals print with a leading '-'
        MathExpr::Number(n) if n.is_sign_negative() && *n != 0.0 => UnaryOp::PRECEDENCE,
        _ => u8::MAX,
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &MathExpr,
    needs_parens: bool,
) -> fmt::Result {
    if needs_parens {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl fmt::Display for MathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathExpr::Number(n) => write!(f, "{}", number_to_text(*n)),
            MathExpr::Name(name) => write!(f, "{}", name),
            MathExpr::Unary { op, operand } => {
                write!(f, "{}", op.symbol())?;
                write_operand(f, operand, precedence(operand) < UnaryOp::PRECEDENCE)
            }
            MathExpr::Binary { op, left, right } => {
                let own = op.precedence();
                let (left_parens, right_parens) = if op.is_right_associative() {
                    (precedence(left) <= own, precedence(right) < own)
                } else {
                    (precedence(left) < own, precedence(right) <= own)
                };

                write_operand(f, left, left_parens)?;
                match op {
                    BinOp::Power => write!(f, "{}", op.symbol())?,
                    _ => write!(f, " {} ", op.symbol())?,
                }
                write_operand(f, right, right_parens)
            }
            MathExpr::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
