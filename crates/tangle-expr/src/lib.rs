//! Symbolic gate-parameter expressions.
//!
//! Gate parameters are either plain numbers or algebraic expressions over
//! named symbols (`2 * theta + 1`). This crate provides the canonical
//! expression tree ([`ExpressionNode`]), a parser for the text form, and a
//! builder that converts the raw algebra representation (where subtraction
//! and division are encoded as negated addition and reciprocal
//! multiplication) into canonical trees with genuine `Sub` and `Div` nodes.
//!
//! ```
//! use tangle_expr::{ExpressionNode, parse};
//!
//! let expr = parse("2 * theta + 1")?;
//! assert_eq!(expr.symbols(), vec!["theta".to_string()]);
//! assert_eq!(expr.to_string(), "2 * theta + 1");
//! # Ok::<(), tangle_expr::ExprError>(())
//! ```

mod algebra;
mod ast;
mod error;
mod lexer;
mod parser;

pub use algebra::{
    SymExpr, expression_tree_from_raw, is_addition_of_negation, is_multiplication_by_reciprocal,
};
pub use ast::{ExpressionNode, FunctionCall, Literal, Operation};
pub use error::{ExprError, ExprResult};
pub use parser::parse_expression;

/// Parse an expression string into the canonical tree.
///
/// The text form is idempotent: parsing the [`std::fmt::Display`] output of
/// a canonical tree yields an equal tree.
pub fn parse(input: &str) -> ExprResult<ExpressionNode> {
    let raw = parse_expression(input)?;
    expression_tree_from_raw(&raw)
}
