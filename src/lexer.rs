use crate::{error::FormulaError, math::Token};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    /// Offset of the first character of the last token read
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_number(&mut self) -> Result<Token, FormulaError> {
        let start = self.position;
        let mut number = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Exponent: only when followed by digits, so `2e` stays an error below
        if matches!(self.current_char(), Some('e') | Some('E')) {
            let sign = matches!(self.peek_char(1), Some('+') | Some('-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_char(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    number.push(self.current_char().unwrap_or('e'));
                    self.advance();
                }
                while let Some(ch) = self.current_char().filter(|c| c.is_ascii_digit()) {
                    number.push(ch);
                    self.advance();
                }
            }
        }

        number
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::new(start, format!("Invalid number '{}'", number)))
    }

    /// Two-character operator whose second character must be `second`.
    fn read_pair(&mut self, second: char, token: Token, hint: &str) -> Result<Token, FormulaError> {
        if self.peek_char(1) == Some(second) {
            self.advance();
            self.advance();
            Ok(token)
        } else {
            Err(FormulaError::new(self.position, hint))
        }
    }

    pub fn next_token(&mut self) -> Result<Token, FormulaError> {
        self.skip_whitespace();
        self.token_start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('+') => {
                self.advance();
                Token::Plus
            }
            Some('-') => {
                self.advance();
                Token::Minus
            }
            Some('*') => {
                self.advance();
                Token::Star
            }
            Some('/') => {
                self.advance();
                Token::Slash
            }
            Some('^') => {
                self.advance();
                Token::Caret
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some('=') => {
                self.read_pair('=', Token::EqEq, "Unexpected '=' (did you mean '=='?)")?
            }
            Some('&') => {
                self.read_pair('&', Token::AndAnd, "Unexpected '&' (did you mean '&&'?)")?
            }
            Some('|') => {
                self.read_pair('|', Token::OrOr, "Unexpected '|' (did you mean '||'?)")?
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::NotEq
                } else {
                    self.advance();
                    Token::Bang
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::GtEq
                } else {
                    self.advance();
                    Token::Gt
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::LtEq
                } else {
                    self.advance();
                    Token::Lt
                }
            }
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()?
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if ch.is_alphabetic() || ch == '_' => Token::Identifier(self.read_identifier()),
            Some(ch) => {
                return Err(FormulaError::new(
                    self.position,
                    format!("Unexpected character '{}'", ch),
                ));
            }
        };

        Ok(token)
    }
}

#[test]
fn test_operators() {
    let mut lexer = Lexer::new("a + b*c^2 >= 1 && !d || e != f");
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("a".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Plus));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("b".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Star));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("c".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Caret));
    assert_eq!(lexer.next_token(), Ok(Token::Number(2.0)));
    assert_eq!(lexer.next_token(), Ok(Token::GtEq));
    assert_eq!(lexer.next_token(), Ok(Token::Number(1.0)));
    assert_eq!(lexer.next_token(), Ok(Token::AndAnd));
    assert_eq!(lexer.next_token(), Ok(Token::Bang));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("d".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::OrOr));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("e".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::NotEq));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("f".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_numbers() {
    let mut lexer = Lexer::new("42 3.5 .25 1e-3 2E+2 7e");
    assert_eq!(lexer.next_token(), Ok(Token::Number(42.0)));
    assert_eq!(lexer.next_token(), Ok(Token::Number(3.5)));
    assert_eq!(lexer.next_token(), Ok(Token::Number(0.25)));
    assert_eq!(lexer.next_token(), Ok(Token::Number(0.001)));
    assert_eq!(lexer.next_token(), Ok(Token::Number(200.0)));
    // A dangling exponent marker is read as a separate identifier
    assert_eq!(lexer.next_token(), Ok(Token::Number(7.0)));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("e".to_string())));
}

#[test]
fn test_token_start_skips_whitespace() {
    let mut lexer = Lexer::new("1 +   )");
    lexer.next_token().unwrap();
    assert_eq!(lexer.token_start(), 0);
    lexer.next_token().unwrap();
    assert_eq!(lexer.token_start(), 2);
    assert_eq!(lexer.next_token(), Ok(Token::RParen));
    assert_eq!(lexer.token_start(), 6);
}

#[test]
fn test_single_equals_is_rejected() {
    let mut lexer = Lexer::new("a = b");
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("a".to_string())));
    let err = lexer.next_token().unwrap_err();
    assert_eq!(err.position, 2);
}
