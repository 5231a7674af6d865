//! Raw algebra form and the canonicalizing tree builder.
//!
//! The symbolic layer has no subtraction or division operators: `a - b` is
//! represented as `Add(a, Mul(-1, b))` and `a / b` as `Mul(a, Pow(b, -1))`.
//! The builder inverts that rewriting deterministically, producing genuine
//! [`Operation::Sub`] and [`Operation::Div`] nodes, without evaluating or
//! simplifying anything.

use num_complex::Complex64;

use crate::ast::{ExpressionNode, Operation};
use crate::error::ExprError;

/// An expression as the algebra layer represents it: n-ary sums and
/// products, binary exponentiation, and leaf values.
#[derive(Debug, Clone, PartialEq)]
pub enum SymExpr {
    /// Named unknown.
    Symbol(String),
    /// Integer constant.
    Integer(i64),
    /// Exact rational constant.
    Rational(i64, i64),
    /// Floating-point constant.
    Float(f64),
    /// The imaginary unit.
    ImaginaryUnit,
    /// n-ary sum. Subtraction arrives as a `-1` coefficient term.
    Add(Vec<SymExpr>),
    /// n-ary product. Division arrives as a `Pow(_, -1)` factor.
    Mul(Vec<SymExpr>),
    /// Exponentiation.
    Pow(Box<SymExpr>, Box<SymExpr>),
    /// Named function application (`sin`, `cos`, `exp`).
    Call(String, Vec<SymExpr>),
}

impl SymExpr {
    fn is_numeric(&self) -> bool {
        matches!(
            self,
            SymExpr::Integer(_) | SymExpr::Rational(_, _) | SymExpr::Float(_)
        )
    }

    fn is_minus_one(&self) -> bool {
        match self {
            SymExpr::Integer(-1) => true,
            SymExpr::Rational(n, d) => *d != 0 && *n == -*d,
            SymExpr::Float(f) => *f == -1.0,
            _ => false,
        }
    }

    fn negative_value(&self) -> Option<f64> {
        match self {
            SymExpr::Integer(n) if *n < 0 => Some(*n as f64),
            SymExpr::Rational(n, d) if *d != 0 && (*n < 0) != (*d < 0) => {
                Some(*n as f64 / *d as f64)
            }
            SymExpr::Float(f) if *f < 0.0 => Some(*f),
            _ => None,
        }
    }
}

/// If `expr` is a term with a `-1` coefficient, return the term with the
/// coefficient stripped.
fn negated_term(expr: &SymExpr) -> Option<SymExpr> {
    let SymExpr::Mul(factors) = expr else {
        return None;
    };
    let minus_ones = factors.iter().filter(|t| t.is_minus_one()).count();
    if minus_ones != 1 {
        return None;
    }
    let rest: Vec<SymExpr> = factors.iter().filter(|t| !t.is_minus_one()).cloned().collect();
    match rest.len() {
        0 => None,
        1 => Some(rest.into_iter().next().unwrap()),
        _ => Some(SymExpr::Mul(rest)),
    }
}

/// If `expr` is a reciprocal factor, return the denominator it encodes.
fn reciprocal_of(expr: &SymExpr) -> Option<SymExpr> {
    match expr {
        SymExpr::Pow(base, exponent) => match exponent.as_ref() {
            SymExpr::Integer(-1) => Some(base.as_ref().clone()),
            SymExpr::Integer(n) if *n < -1 => Some(SymExpr::Pow(
                base.clone(),
                Box::new(SymExpr::Integer(-n)),
            )),
            SymExpr::Float(f) if *f < 0.0 => Some(SymExpr::Pow(
                base.clone(),
                Box::new(SymExpr::Float(-f)),
            )),
            _ => None,
        },
        // The algebra layer folds x/2 into a Rational(1, 2) coefficient.
        SymExpr::Rational(1, d) if *d > 1 => Some(SymExpr::Integer(*d)),
        _ => None,
    }
}

/// A `Mul` counts as multiplication by a reciprocal iff it has exactly one
/// reciprocal factor and exactly one other factor.
pub fn is_multiplication_by_reciprocal(expr: &SymExpr) -> bool {
    let SymExpr::Mul(factors) = expr else {
        return false;
    };
    factors.len() == 2 && factors.iter().filter(|t| reciprocal_of(t).is_some()).count() == 1
}

/// An `Add` counts as addition of a negation iff it has exactly two terms
/// and exactly one of them carries a `-1` coefficient, or one term is a
/// negative literal while the other is non-numeric (how `x - 1` arrives).
pub fn is_addition_of_negation(expr: &SymExpr) -> bool {
    let SymExpr::Add(terms) = expr else {
        return false;
    };
    if terms.len() != 2 {
        return false;
    }
    if terms.iter().filter(|t| negated_term(t).is_some()).count() == 1 {
        return true;
    }
    let negatives = terms.iter().filter(|t| t.negative_value().is_some()).count();
    let non_numeric = terms.iter().filter(|t| !t.is_numeric()).count();
    negatives == 1 && non_numeric == 1
}

/// Convert a raw algebra expression into the canonical tree.
///
/// Purely structural: `x - x` stays a subtraction, nothing is folded.
pub fn expression_tree_from_raw(expr: &SymExpr) -> Result<ExpressionNode, ExprError> {
    match expr {
        SymExpr::Symbol(name) => Ok(ExpressionNode::symbol(name.clone())),
        SymExpr::Integer(n) => Ok(ExpressionNode::real(*n as f64)),
        SymExpr::Rational(n, d) => {
            if *d == 0 {
                return Err(ExprError::ZeroDenominator);
            }
            Ok(ExpressionNode::real(*n as f64 / *d as f64))
        }
        SymExpr::Float(f) => Ok(ExpressionNode::real(*f)),
        SymExpr::ImaginaryUnit => Ok(ExpressionNode::complex(Complex64::new(0.0, 1.0))),
        SymExpr::Add(terms) => {
            if is_addition_of_negation(expr) {
                let (minuend, subtrahend) = split_subtraction(terms);
                return Ok(ExpressionNode::sub(
                    expression_tree_from_raw(&minuend)?,
                    expression_tree_from_raw(&subtrahend)?,
                ));
            }
            let args = terms
                .iter()
                .map(expression_tree_from_raw)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ExpressionNode::call(Operation::Add, args))
        }
        SymExpr::Mul(factors) => {
            if is_multiplication_by_reciprocal(expr) {
                let (numerator, denominator) = split_division(factors);
                return Ok(ExpressionNode::div(
                    expression_tree_from_raw(&numerator)?,
                    expression_tree_from_raw(&denominator)?,
                ));
            }
            let args = factors
                .iter()
                .map(expression_tree_from_raw)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ExpressionNode::call(Operation::Mul, args))
        }
        SymExpr::Pow(base, exponent) => Ok(ExpressionNode::call(
            Operation::Pow,
            vec![
                expression_tree_from_raw(base)?,
                expression_tree_from_raw(exponent)?,
            ],
        )),
        SymExpr::Call(name, args) => {
            let op = match name.as_str() {
                "sin" => Operation::Sin,
                "cos" => Operation::Cos,
                "exp" => Operation::Exp,
                other => return Err(ExprError::UnknownFunction(other.to_string())),
            };
            let args = args
                .iter()
                .map(expression_tree_from_raw)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ExpressionNode::call(op, args))
        }
    }
}

// Caller guarantees `is_addition_of_negation` held for these terms.
fn split_subtraction(terms: &[SymExpr]) -> (SymExpr, SymExpr) {
    if let Some(stripped) = negated_term(&terms[1]) {
        return (terms[0].clone(), stripped);
    }
    if let Some(stripped) = negated_term(&terms[0]) {
        return (terms[1].clone(), stripped);
    }
    // Negative literal case: the non-numeric term is the minuend.
    let (literal, other) = if terms[0].negative_value().is_some() {
        (&terms[0], &terms[1])
    } else {
        (&terms[1], &terms[0])
    };
    let value = literal.negative_value().unwrap_or(0.0);
    (other.clone(), SymExpr::Float(-value))
}

// Caller guarantees `is_multiplication_by_reciprocal` held for these factors.
fn split_division(factors: &[SymExpr]) -> (SymExpr, SymExpr) {
    if let Some(denominator) = reciprocal_of(&factors[1]) {
        (factors[0].clone(), denominator)
    } else {
        let denominator = reciprocal_of(&factors[0]).unwrap_or(SymExpr::Integer(1));
        (factors[1].clone(), denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;

    fn sym(name: &str) -> SymExpr {
        SymExpr::Symbol(name.to_string())
    }

    #[test]
    fn test_symbols_convert_to_symbol_nodes() {
        for name in ["theta", "x", "c_i"] {
            assert_eq!(
                expression_tree_from_raw(&sym(name)).unwrap(),
                ExpressionNode::symbol(name)
            );
        }
    }

    #[test]
    fn test_numbers_convert_to_native_literals() {
        assert_eq!(
            expression_tree_from_raw(&SymExpr::Integer(2)).unwrap(),
            ExpressionNode::real(2.0)
        );
        assert_eq!(
            expression_tree_from_raw(&SymExpr::Float(-2.5)).unwrap(),
            ExpressionNode::real(-2.5)
        );
        assert_eq!(
            expression_tree_from_raw(&SymExpr::Rational(3, 8)).unwrap(),
            ExpressionNode::real(0.375)
        );
    }

    #[test]
    fn test_imaginary_unit_converts_to_complex_i() {
        assert_eq!(
            expression_tree_from_raw(&SymExpr::ImaginaryUnit).unwrap(),
            ExpressionNode::Literal(Literal::Complex(Complex64::new(0.0, 1.0)))
        );
    }

    #[test]
    fn test_plain_add_stays_add() {
        let raw = SymExpr::Add(vec![sym("x"), sym("y"), sym("z")]);
        assert_eq!(
            expression_tree_from_raw(&raw).unwrap(),
            ExpressionNode::call(
                Operation::Add,
                vec![
                    ExpressionNode::symbol("x"),
                    ExpressionNode::symbol("y"),
                    ExpressionNode::symbol("z"),
                ]
            )
        );
    }

    #[test]
    fn test_plain_mul_stays_mul() {
        let raw = SymExpr::Mul(vec![sym("x"), SymExpr::Integer(2)]);
        assert_eq!(
            expression_tree_from_raw(&raw).unwrap(),
            ExpressionNode::call(
                Operation::Mul,
                vec![ExpressionNode::symbol("x"), ExpressionNode::real(2.0)]
            )
        );
    }

    #[test]
    fn test_reciprocal_classification() {
        // x / y
        let division = SymExpr::Mul(vec![
            sym("x"),
            SymExpr::Pow(Box::new(sym("y")), Box::new(SymExpr::Integer(-1))),
        ]);
        assert!(is_multiplication_by_reciprocal(&division));

        // Plain products are products, not divisions.
        let product = SymExpr::Mul(vec![sym("x"), sym("y")]);
        assert!(!is_multiplication_by_reciprocal(&product));
        let scaled = SymExpr::Mul(vec![SymExpr::Integer(2), sym("theta")]);
        assert!(!is_multiplication_by_reciprocal(&scaled));
        let triple = SymExpr::Mul(vec![sym("x"), sym("y"), sym("z")]);
        assert!(!is_multiplication_by_reciprocal(&triple));
    }

    #[test]
    fn test_division_converts_to_div_call() {
        // x / (z + 1)
        let raw = SymExpr::Mul(vec![
            sym("x"),
            SymExpr::Pow(
                Box::new(SymExpr::Add(vec![sym("z"), SymExpr::Integer(1)])),
                Box::new(SymExpr::Integer(-1)),
            ),
        ]);
        assert_eq!(
            expression_tree_from_raw(&raw).unwrap(),
            ExpressionNode::div(
                ExpressionNode::symbol("x"),
                ExpressionNode::call(
                    Operation::Add,
                    vec![ExpressionNode::symbol("z"), ExpressionNode::real(1.0)]
                )
            )
        );
    }

    #[test]
    fn test_rational_coefficient_counts_as_reciprocal() {
        // x / 2 arrives as Mul(Rational(1, 2), x)
        let raw = SymExpr::Mul(vec![SymExpr::Rational(1, 2), sym("x")]);
        assert!(is_multiplication_by_reciprocal(&raw));
        assert_eq!(
            expression_tree_from_raw(&raw).unwrap(),
            ExpressionNode::div(ExpressionNode::symbol("x"), ExpressionNode::real(2.0))
        );
    }

    #[test]
    fn test_negation_classification() {
        // x - y
        let sub = SymExpr::Add(vec![
            sym("x"),
            SymExpr::Mul(vec![SymExpr::Integer(-1), sym("y")]),
        ]);
        assert!(is_addition_of_negation(&sub));

        // 1 - x
        let one_minus = SymExpr::Add(vec![
            SymExpr::Integer(1),
            SymExpr::Mul(vec![SymExpr::Integer(-1), sym("x")]),
        ]);
        assert!(is_addition_of_negation(&one_minus));

        // x - 1 arrives with the literal already negated.
        let minus_one = SymExpr::Add(vec![SymExpr::Integer(-1), sym("x")]);
        assert!(is_addition_of_negation(&minus_one));

        // Plain sums are sums.
        assert!(!is_addition_of_negation(&SymExpr::Add(vec![sym("x"), sym("y")])));
        assert!(!is_addition_of_negation(&SymExpr::Add(vec![
            sym("x"),
            SymExpr::Integer(10)
        ])));
    }

    #[test]
    fn test_subtraction_converts_to_sub_call() {
        let raw = SymExpr::Add(vec![
            sym("x"),
            SymExpr::Mul(vec![SymExpr::Integer(-1), sym("y")]),
        ]);
        assert_eq!(
            expression_tree_from_raw(&raw).unwrap(),
            ExpressionNode::sub(ExpressionNode::symbol("x"), ExpressionNode::symbol("y"))
        );

        let raw = SymExpr::Add(vec![
            SymExpr::Integer(1),
            SymExpr::Mul(vec![SymExpr::Integer(-1), sym("x")]),
        ]);
        assert_eq!(
            expression_tree_from_raw(&raw).unwrap(),
            ExpressionNode::sub(ExpressionNode::real(1.0), ExpressionNode::symbol("x"))
        );
    }

    #[test]
    fn test_negative_literal_subtraction_keeps_operand_order() {
        // x - 1 == Add(-1, x): the non-numeric term is the minuend.
        let raw = SymExpr::Add(vec![SymExpr::Integer(-1), sym("x")]);
        assert_eq!(
            expression_tree_from_raw(&raw).unwrap(),
            ExpressionNode::sub(ExpressionNode::symbol("x"), ExpressionNode::real(1.0))
        );
    }

    #[test]
    fn test_three_term_sum_stays_add() {
        let raw = SymExpr::Add(vec![
            sym("x"),
            SymExpr::Mul(vec![SymExpr::Integer(-1), sym("y")]),
            sym("z"),
        ]);
        let ExpressionNode::Call(call) = expression_tree_from_raw(&raw).unwrap() else {
            panic!("expected a call node");
        };
        assert_eq!(call.op, Operation::Add);
        assert_eq!(call.args.len(), 3);
    }

    #[test]
    fn test_builder_does_not_simplify() {
        // x - x stays a subtraction, never 0.
        let raw = SymExpr::Add(vec![
            sym("x"),
            SymExpr::Mul(vec![SymExpr::Integer(-1), sym("x")]),
        ]);
        assert_eq!(
            expression_tree_from_raw(&raw).unwrap(),
            ExpressionNode::sub(ExpressionNode::symbol("x"), ExpressionNode::symbol("x"))
        );
    }
}
