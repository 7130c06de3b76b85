use crate::{
    error::FormulaError,
    lexer::Lexer,
    math::{BinOp, MathExpr, Token, UnaryOp},
};
use std::mem;

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    /// Start offset of `current_token`, for error reporting
    token_start: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, FormulaError> {
        let current_token = lexer.next_token()?;
        let token_start = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            token_start,
        })
    }

    fn advance(&mut self) -> Result<(), FormulaError> {
        self.current_token = self.lexer.next_token()?;
        self.token_start = self.lexer.token_start();
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> FormulaError {
        FormulaError::new(self.token_start, message)
    }

    fn expect(&mut self, expected: Token) -> Result<(), FormulaError> {
        if mem::discriminant(&self.current_token) != mem::discriminant(&expected) {
            return Err(self.error(format!(
                "Expected {:?}, got {:?}",
                expected, self.current_token
            )));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// Parse primary expressions (atoms): numbers, names, calls, '(' expr ')'
    fn parse_primary(&mut self) -> Result<MathExpr, FormulaError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Number(n) => {
                self.advance()?;
                Ok(MathExpr::Number(n))
            }
            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::LParen) {
                    self.advance()?;
                    let args = self.parse_arguments()?;
                    Ok(MathExpr::Call { name, args })
                } else {
                    Ok(MathExpr::Name(name))
                }
            }
            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Eof => Err(self.error("Unexpected end of formula")),
            token => Err(self.error(format!("Unexpected token in formula: {:?}", token))),
        }
    }

    /// Arguments of a call; the opening '(' is already consumed.
    fn parse_arguments(&mut self) -> Result<Vec<MathExpr>, FormulaError> {
        let mut args = vec![];

        while !self.check(&Token::RParen) {
            args.push(self.parse_expression()?);

            if !self.check(&Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RParen)?;
        Ok(args)
    }

    fn parse_power(&mut self) -> Result<MathExpr, FormulaError> {
        let base = self.parse_primary()?;

        if self.check(&Token::Caret) {
            self.advance()?;
            // Right associative, and the exponent may carry its own sign
            let exponent = self.parse_unary()?;
            return Ok(MathExpr::Binary {
                op: BinOp::Power,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<MathExpr, FormulaError> {
        let op = match &self.current_token {
            Token::Minus => UnaryOp::Negate,
            Token::Bang => UnaryOp::Not,
            Token::Plus => {
                self.advance()?;
                return self.parse_unary();
            }
            _ => return self.parse_power(),
        };

        self.advance()?;
        let operand = self.parse_unary()?;

        // A negated literal is itself a literal
        match (op, operand) {
            (UnaryOp::Negate, MathExpr::Number(n)) => Ok(MathExpr::Number(-n)),
            (op, operand) => Ok(MathExpr::Unary {
                op,
                operand: Box::new(operand),
            }),
        }
    }

    fn parse_multiplicative(&mut self) -> Result<MathExpr, FormulaError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current_token {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_unary()?;

            left = MathExpr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<MathExpr, FormulaError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current_token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_multiplicative()?;

            left = MathExpr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<MathExpr, FormulaError> {
        let mut left = self.parse_additive()?;

        if let Some(op) = match &self.current_token {
            Token::EqEq => Some(BinOp::Equal),
            Token::NotEq => Some(BinOp::NotEqual),
            Token::Lt => Some(BinOp::LessThan),
            Token::Gt => Some(BinOp::GreaterThan),
            Token::LtEq => Some(BinOp::LessEqual),
            Token::GtEq => Some(BinOp::GreaterEqual),
            _ => None,
        } {
            self.advance()?;
            let right = self.parse_additive()?;

            left = MathExpr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<MathExpr, FormulaError> {
        let mut left = self.parse_comparison()?;

        while self.check(&Token::AndAnd) {
            self.advance()?;
            let right = self.parse_comparison()?;

            left = MathExpr::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<MathExpr, FormulaError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::OrOr) {
            self.advance()?;
            let right = self.parse_and()?;

            left = MathExpr::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<MathExpr, FormulaError> {
        self.parse_or()
    }

    /// Parse a complete formula; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<MathExpr, FormulaError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }
}
