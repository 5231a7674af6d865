use thiserror::Error;

/// Errors from lexing, parsing, or building expression trees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// The lexer could not tokenize part of the input.
    #[error("unrecognized input at byte {position}: {fragment:?}")]
    Lex {
        /// Byte offset of the offending fragment.
        position: usize,
        /// The text that failed to tokenize.
        fragment: String,
    },

    /// The parser hit a token it could not use.
    #[error("unexpected token {found:?}, expected {expected}")]
    UnexpectedToken {
        /// What the parser saw.
        found: String,
        /// What it would have accepted.
        expected: &'static str,
    },

    /// The input ended mid-expression.
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    /// A function application with a name the builder does not know.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A rational constant with denominator zero.
    #[error("rational constant with zero denominator")]
    ZeroDenominator,
}

/// Convenience alias used throughout the crate.
pub type ExprResult<T> = Result<T, ExprError>;
