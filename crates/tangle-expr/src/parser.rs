//! Recursive-descent parser producing the raw algebra form.
//!
//! The parser mirrors how the algebra layer represents arithmetic: a chain
//! of `+`/`-` at one nesting level becomes a single n-ary `Add` with
//! subtracted terms carrying a `-1` coefficient, and a chain of `*`/`/`
//! becomes a single n-ary `Mul` with divisors wrapped in `Pow(_, -1)`.
//! Parenthesized subexpressions stay nested, so `(a - b) - c` and
//! `a - b - c` parse to different raw forms.

use std::f64::consts::PI;

use crate::algebra::SymExpr;
use crate::error::{ExprError, ExprResult};
use crate::lexer::{Token, tokenize};

/// Parse an expression string into the raw algebra form.
pub fn parse_expression(input: &str) -> ExprResult<SymExpr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_add()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ExprError::UnexpectedToken {
            found: token.describe(),
            expected: "end of input",
        }),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token, description: &'static str) -> ExprResult<()> {
        match self.advance() {
            Some(token) if token == *expected => Ok(()),
            Some(token) => Err(ExprError::UnexpectedToken {
                found: token.describe(),
                expected: description,
            }),
            None => Err(ExprError::UnexpectedEnd(description)),
        }
    }

    fn parse_add(&mut self) -> ExprResult<SymExpr> {
        let mut terms = vec![self.parse_mul()?];
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    terms.push(self.parse_mul()?);
                }
                Some(Token::Minus) => {
                    self.advance();
                    terms.push(negate(self.parse_mul()?));
                }
                _ => break,
            }
        }
        if terms.len() == 1 {
            Ok(terms.into_iter().next().unwrap())
        } else {
            Ok(SymExpr::Add(terms))
        }
    }

    fn parse_mul(&mut self) -> ExprResult<SymExpr> {
        let mut factors = vec![self.parse_unary()?];
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    factors.push(self.parse_unary()?);
                }
                Some(Token::Slash) => {
                    self.advance();
                    let divisor = self.parse_unary()?;
                    factors.push(SymExpr::Pow(
                        Box::new(divisor),
                        Box::new(SymExpr::Integer(-1)),
                    ));
                }
                _ => break,
            }
        }
        if factors.len() == 1 {
            Ok(factors.into_iter().next().unwrap())
        } else {
            Ok(SymExpr::Mul(factors))
        }
    }

    fn parse_unary(&mut self) -> ExprResult<SymExpr> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.advance();
            Ok(negate(self.parse_unary()?))
        } else {
            self.parse_pow()
        }
    }

    fn parse_pow(&mut self) -> ExprResult<SymExpr> {
        let base = self.parse_atom()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.advance();
            // Right-associative, and the exponent may carry a sign.
            let exponent = self.parse_unary()?;
            Ok(SymExpr::Pow(Box::new(base), Box::new(exponent)))
        } else {
            Ok(base)
        }
    }

    fn parse_atom(&mut self) -> ExprResult<SymExpr> {
        match self.advance() {
            Some(Token::Int(n)) => Ok(SymExpr::Integer(n)),
            Some(Token::Float(f)) => Ok(SymExpr::Float(f)),
            Some(Token::Ident(name)) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    self.advance();
                    let args = self.parse_args()?;
                    return Ok(SymExpr::Call(name, args));
                }
                match name.as_str() {
                    "pi" => Ok(SymExpr::Float(PI)),
                    "I" => Ok(SymExpr::ImaginaryUnit),
                    _ => Ok(SymExpr::Symbol(name)),
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_add()?;
                self.expect(&Token::RParen, "closing parenthesis")?;
                Ok(inner)
            }
            Some(token) => Err(ExprError::UnexpectedToken {
                found: token.describe(),
                expected: "a value or parenthesized expression",
            }),
            None => Err(ExprError::UnexpectedEnd("a value or parenthesized expression")),
        }
    }

    fn parse_args(&mut self) -> ExprResult<Vec<SymExpr>> {
        if matches!(self.peek(), Some(Token::RParen)) {
            self.advance();
            return Ok(Vec::new());
        }
        let mut args = vec![self.parse_add()?];
        loop {
            match self.advance() {
                Some(Token::Comma) => args.push(self.parse_add()?),
                Some(Token::RParen) => return Ok(args),
                Some(token) => {
                    return Err(ExprError::UnexpectedToken {
                        found: token.describe(),
                        expected: "comma or closing parenthesis",
                    });
                }
                None => return Err(ExprError::UnexpectedEnd("comma or closing parenthesis")),
            }
        }
    }
}

/// Negate a raw expression the way the algebra layer does: fold the sign
/// into literals, otherwise attach a `-1` coefficient.
fn negate(expr: SymExpr) -> SymExpr {
    match expr {
        SymExpr::Integer(n) => SymExpr::Integer(-n),
        SymExpr::Float(f) => SymExpr::Float(-f),
        SymExpr::Rational(n, d) => SymExpr::Rational(-n, d),
        SymExpr::Mul(mut factors) => {
            factors.insert(0, SymExpr::Integer(-1));
            SymExpr::Mul(factors)
        }
        other => SymExpr::Mul(vec![SymExpr::Integer(-1), other]),
    }
}
