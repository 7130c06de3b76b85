#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Number, with optional fraction and exponent
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// 1e-3
    /// .5
    /// ```
    Number(f64),

    /// Variable or function name
    ///
    /// Must start with letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// S1
    /// k_cat
    /// exp
    /// ```
    Identifier(String),

    // Arithmetic
    /// Addition
    Plus,

    /// Subtraction or negation
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    /// Power
    Caret,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Logical
    /// Logical AND
    AndAnd,

    /// Logical OR
    OrOr,

    /// Logical NOT
    Bang,

    // Delimiters
    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma between function arguments
    Comma,

    /// End of input
    Eof,
}
