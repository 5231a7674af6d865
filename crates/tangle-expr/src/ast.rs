//! Canonical expression tree: symbols, literals, and function calls.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations that may appear in a [`FunctionCall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// n-ary addition.
    Add,
    /// n-ary multiplication.
    Mul,
    /// Binary subtraction (never represented as negated addition).
    Sub,
    /// Binary division (never represented as reciprocal multiplication).
    Div,
    /// Binary exponentiation.
    Pow,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Natural exponential.
    Exp,
}

impl Operation {
    /// Lower-case name as used in the text form.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Mul => "mul",
            Operation::Sub => "sub",
            Operation::Div => "div",
            Operation::Pow => "pow",
            Operation::Sin => "sin",
            Operation::Cos => "cos",
            Operation::Exp => "exp",
        }
    }
}

/// A numeric constant, real or complex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Real constant.
    Real(f64),
    /// Complex constant (the imaginary unit and derived values).
    Complex(Complex64),
}

impl Literal {
    /// The value as a complex number.
    pub fn as_complex(self) -> Complex64 {
        match self {
            Literal::Real(v) => Complex64::new(v, 0.0),
            Literal::Complex(c) => c,
        }
    }
}

/// An operation applied to an ordered argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The operation.
    pub op: Operation,
    /// Arguments, order-significant.
    pub args: Vec<ExpressionNode>,
}

/// A node of the canonical expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionNode {
    /// A named algebraic unknown; equality by name.
    Symbol(String),
    /// A numeric constant.
    Literal(Literal),
    /// An operation applied to arguments.
    Call(FunctionCall),
}

impl ExpressionNode {
    /// Create a symbol node.
    pub fn symbol(name: impl Into<String>) -> Self {
        ExpressionNode::Symbol(name.into())
    }

    /// Create a real literal node.
    pub fn real(value: f64) -> Self {
        ExpressionNode::Literal(Literal::Real(value))
    }

    /// Create a complex literal node.
    pub fn complex(value: Complex64) -> Self {
        ExpressionNode::Literal(Literal::Complex(value))
    }

    /// The imaginary unit.
    pub fn imaginary_unit() -> Self {
        ExpressionNode::Literal(Literal::Complex(Complex64::new(0.0, 1.0)))
    }

    /// Build a call node.
    pub fn call(op: Operation, args: Vec<ExpressionNode>) -> Self {
        ExpressionNode::Call(FunctionCall { op, args })
    }

    /// Binary subtraction node.
    pub fn sub(minuend: ExpressionNode, subtrahend: ExpressionNode) -> Self {
        Self::call(Operation::Sub, vec![minuend, subtrahend])
    }

    /// Binary division node.
    pub fn div(numerator: ExpressionNode, denominator: ExpressionNode) -> Self {
        Self::call(Operation::Div, vec![numerator, denominator])
    }

    /// Sine of an expression.
    pub fn sin(arg: ExpressionNode) -> Self {
        Self::call(Operation::Sin, vec![arg])
    }

    /// Cosine of an expression.
    pub fn cos(arg: ExpressionNode) -> Self {
        Self::call(Operation::Cos, vec![arg])
    }

    /// Natural exponential of an expression.
    pub fn exp(arg: ExpressionNode) -> Self {
        Self::call(Operation::Exp, vec![arg])
    }

    /// Check whether any symbol occurs in the tree.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ExpressionNode::Symbol(_) => true,
            ExpressionNode::Literal(_) => false,
            ExpressionNode::Call(call) => call.args.iter().any(ExpressionNode::is_symbolic),
        }
    }

    /// Symbol names in order of first appearance.
    pub fn symbols(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<String>) {
        match self {
            ExpressionNode::Symbol(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            ExpressionNode::Literal(_) => {}
            ExpressionNode::Call(call) => {
                for arg in &call.args {
                    arg.collect_symbols(out);
                }
            }
        }
    }

    /// Substitute symbols by value, folding fully-numeric subtrees into
    /// literals. Symbols absent from `bindings` are left in place.
    pub fn substitute(&self, bindings: &FxHashMap<String, f64>) -> ExpressionNode {
        match self {
            ExpressionNode::Symbol(name) => match bindings.get(name) {
                Some(v) => ExpressionNode::real(*v),
                None => self.clone(),
            },
            ExpressionNode::Literal(_) => self.clone(),
            ExpressionNode::Call(call) => {
                let args: Vec<_> = call.args.iter().map(|a| a.substitute(bindings)).collect();
                let node = ExpressionNode::call(call.op, args);
                match node.as_complex() {
                    Some(c) if c.im == 0.0 => ExpressionNode::real(c.re),
                    Some(c) => ExpressionNode::complex(c),
                    None => node,
                }
            }
        }
    }

    /// Numeric value of a closed real expression.
    pub fn as_f64(&self) -> Option<f64> {
        let c = self.as_complex()?;
        if c.im.abs() < 1e-12 { Some(c.re) } else { None }
    }

    /// Numeric value of a closed expression.
    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            ExpressionNode::Symbol(_) => None,
            ExpressionNode::Literal(lit) => Some(lit.as_complex()),
            ExpressionNode::Call(call) => {
                let mut values = Vec::with_capacity(call.args.len());
                for arg in &call.args {
                    values.push(arg.as_complex()?);
                }
                match call.op {
                    Operation::Add => Some(values.into_iter().sum()),
                    Operation::Mul => Some(values.into_iter().product()),
                    Operation::Sub => Some(values[0] - values[1]),
                    Operation::Div => {
                        if values[1] == Complex64::new(0.0, 0.0) {
                            None
                        } else {
                            Some(values[0] / values[1])
                        }
                    }
                    Operation::Pow => Some(values[0].powc(values[1])),
                    Operation::Sin => Some(values[0].sin()),
                    Operation::Cos => Some(values[0].cos()),
                    Operation::Exp => Some(values[0].exp()),
                }
            }
        }
    }
}

impl From<f64> for ExpressionNode {
    fn from(value: f64) -> Self {
        ExpressionNode::real(value)
    }
}

impl From<i32> for ExpressionNode {
    fn from(value: i32) -> Self {
        ExpressionNode::real(f64::from(value))
    }
}

impl std::ops::Add for ExpressionNode {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ExpressionNode::call(Operation::Add, vec![self, rhs])
    }
}

impl std::ops::Sub for ExpressionNode {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ExpressionNode::sub(self, rhs)
    }
}

impl std::ops::Mul for ExpressionNode {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ExpressionNode::call(Operation::Mul, vec![self, rhs])
    }
}

impl std::ops::Div for ExpressionNode {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ExpressionNode::div(self, rhs)
    }
}

impl std::ops::Neg for ExpressionNode {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ExpressionNode::call(Operation::Mul, vec![ExpressionNode::real(-1.0), self])
    }
}

// Precedence levels used for parenthesization in the text form.
fn precedence(node: &ExpressionNode) -> u8 {
    match node {
        ExpressionNode::Symbol(_) => 4,
        ExpressionNode::Literal(Literal::Real(v)) if *v < 0.0 => 3,
        ExpressionNode::Literal(_) => 4,
        ExpressionNode::Call(call) => match call.op {
            Operation::Add | Operation::Sub => 1,
            Operation::Mul | Operation::Div => 2,
            Operation::Pow => 3,
            Operation::Sin | Operation::Cos | Operation::Exp => 4,
        },
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    node: &ExpressionNode,
    min_prec: u8,
) -> fmt::Result {
    if precedence(node) < min_prec {
        write!(f, "({node})")
    } else {
        write!(f, "{node}")
    }
}

impl fmt::Display for ExpressionNode {
    /// Text form that re-parses to the same canonical tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Symbol(name) => write!(f, "{name}"),
            ExpressionNode::Literal(Literal::Real(v)) => write!(f, "{v}"),
            ExpressionNode::Literal(Literal::Complex(c)) => {
                if c.re == 0.0 && c.im == 1.0 {
                    write!(f, "I")
                } else if c.re == 0.0 {
                    write!(f, "{} * I", c.im)
                } else if c.im >= 0.0 {
                    write!(f, "({} + {} * I)", c.re, c.im)
                } else {
                    write!(f, "({} - {} * I)", c.re, -c.im)
                }
            }
            // Additive and multiplicative chains are flattened to n-ary nodes
            // when re-parsed, so nested nodes of the same precedence keep
            // their parentheses: (a - b) - c, (a / b) * c.
            ExpressionNode::Call(call) => match call.op {
                Operation::Add => {
                    for (i, arg) in call.args.iter().enumerate() {
                        if i > 0 {
                            write!(f, " + ")?;
                        }
                        write_operand(f, arg, 2)?;
                    }
                    Ok(())
                }
                Operation::Sub => {
                    write_operand(f, &call.args[0], 2)?;
                    write!(f, " - ")?;
                    write_operand(f, &call.args[1], 2)
                }
                Operation::Mul => {
                    for (i, arg) in call.args.iter().enumerate() {
                        if i > 0 {
                            write!(f, " * ")?;
                        }
                        write_operand(f, arg, 3)?;
                    }
                    Ok(())
                }
                Operation::Div => {
                    write_operand(f, &call.args[0], 3)?;
                    write!(f, " / ")?;
                    write_operand(f, &call.args[1], 3)
                }
                Operation::Pow => {
                    write_operand(f, &call.args[0], 4)?;
                    write!(f, " ^ ")?;
                    write_operand(f, &call.args[1], 3)
                }
                Operation::Sin | Operation::Cos | Operation::Exp => {
                    write!(f, "{}(", call.op.name())?;
                    for (i, arg) in call.args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ")")
                }
            },
        }
    }
}
