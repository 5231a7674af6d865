//! Gate names, the gate catalog, and gate instances.

use ndarray::Array2;
use num_complex::Complex64;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use tangle_expr::ExpressionNode;

use crate::error::{IrError, IrResult};
use crate::qubit::Qubit;

/// Names of the gates the IR understands.
///
/// The common set has a native operator in every supported framework; the
/// unique set exists natively in at most one and is carried across the
/// others as a matrix-defined custom gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateName {
    I,
    X,
    Y,
    Z,
    H,
    S,
    T,
    Cnot,
    Cz,
    Swap,
    Cswap,
    Rx,
    Ry,
    Rz,
    CPhase,
    Measure,
    Barrier,
    Zxz,
    Rh,
    Xx,
    Yy,
    Zz,
    U1ex,
    U2ex,
    /// A gate known only by its unitary matrix.
    Custom(String),
}

impl GateName {
    /// Canonical spelling used in serialized circuits.
    pub fn as_str(&self) -> &str {
        match self {
            GateName::I => "I",
            GateName::X => "X",
            GateName::Y => "Y",
            GateName::Z => "Z",
            GateName::H => "H",
            GateName::S => "S",
            GateName::T => "T",
            GateName::Cnot => "CNOT",
            GateName::Cz => "CZ",
            GateName::Swap => "SWAP",
            GateName::Cswap => "CSWAP",
            GateName::Rx => "RX",
            GateName::Ry => "RY",
            GateName::Rz => "RZ",
            GateName::CPhase => "CPHASE",
            GateName::Measure => "MEASURE",
            GateName::Barrier => "BARRIER",
            GateName::Zxz => "ZXZ",
            GateName::Rh => "RH",
            GateName::Xx => "XX",
            GateName::Yy => "YY",
            GateName::Zz => "ZZ",
            GateName::U1ex => "U1ex",
            GateName::U2ex => "U2ex",
            GateName::Custom(name) => name,
        }
    }

    /// Inverse of [`GateName::as_str`]; unknown spellings become `Custom`.
    pub fn parse(name: &str) -> GateName {
        match name {
            "I" => GateName::I,
            "X" => GateName::X,
            "Y" => GateName::Y,
            "Z" => GateName::Z,
            "H" => GateName::H,
            "S" => GateName::S,
            "T" => GateName::T,
            "CNOT" => GateName::Cnot,
            "CZ" => GateName::Cz,
            "SWAP" => GateName::Swap,
            "CSWAP" => GateName::Cswap,
            "RX" => GateName::Rx,
            "RY" => GateName::Ry,
            "RZ" => GateName::Rz,
            "CPHASE" => GateName::CPhase,
            "MEASURE" => GateName::Measure,
            "BARRIER" => GateName::Barrier,
            "ZXZ" => GateName::Zxz,
            "RH" => GateName::Rh,
            "XX" => GateName::Xx,
            "YY" => GateName::Yy,
            "ZZ" => GateName::Zz,
            "U1ex" => GateName::U1ex,
            "U2ex" => GateName::U2ex,
            other => GateName::Custom(other.to_string()),
        }
    }

    /// Number of qubit operands, `None` when variadic.
    pub fn arity(&self) -> Option<usize> {
        match self {
            GateName::I
            | GateName::X
            | GateName::Y
            | GateName::Z
            | GateName::H
            | GateName::S
            | GateName::T
            | GateName::Rx
            | GateName::Ry
            | GateName::Rz
            | GateName::Zxz
            | GateName::Rh
            | GateName::Measure => Some(1),
            GateName::Cnot
            | GateName::Cz
            | GateName::Swap
            | GateName::CPhase
            | GateName::Xx
            | GateName::Yy
            | GateName::Zz
            | GateName::U1ex
            | GateName::U2ex => Some(2),
            GateName::Cswap => Some(3),
            GateName::Barrier | GateName::Custom(_) => None,
        }
    }

    /// Number of expression parameters the gate carries.
    pub fn n_params(&self) -> usize {
        match self {
            GateName::Rx
            | GateName::Ry
            | GateName::Rz
            | GateName::CPhase
            | GateName::Rh
            | GateName::Xx
            | GateName::Yy
            | GateName::Zz
            | GateName::U2ex => 1,
            GateName::Zxz | GateName::U1ex => 2,
            _ => 0,
        }
    }

    /// Whether every supported framework has a native operator for this gate.
    pub fn is_common(&self) -> bool {
        matches!(
            self,
            GateName::I
                | GateName::X
                | GateName::Y
                | GateName::Z
                | GateName::H
                | GateName::S
                | GateName::T
                | GateName::Cnot
                | GateName::Cz
                | GateName::Swap
                | GateName::Cswap
                | GateName::Rx
                | GateName::Ry
                | GateName::Rz
                | GateName::CPhase
                | GateName::Measure
                | GateName::Barrier
        )
    }

    /// Whether the gate needs a matrix definition outside its home framework.
    pub fn is_unique(&self) -> bool {
        matches!(
            self,
            GateName::Zxz
                | GateName::Rh
                | GateName::Xx
                | GateName::Yy
                | GateName::Zz
                | GateName::U1ex
                | GateName::U2ex
        )
    }
}

impl fmt::Display for GateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of gate names an exporter accepts, built once and passed in
/// rather than read from ambient state.
#[derive(Debug, Clone)]
pub struct GateCatalog {
    names: FxHashSet<GateName>,
}

impl GateCatalog {
    /// The full fixed catalog: the common set plus the unique set.
    pub fn standard() -> Self {
        let names = [
            GateName::I,
            GateName::X,
            GateName::Y,
            GateName::Z,
            GateName::H,
            GateName::S,
            GateName::T,
            GateName::Cnot,
            GateName::Cz,
            GateName::Swap,
            GateName::Cswap,
            GateName::Rx,
            GateName::Ry,
            GateName::Rz,
            GateName::CPhase,
            GateName::Measure,
            GateName::Barrier,
            GateName::Zxz,
            GateName::Rh,
            GateName::Xx,
            GateName::Yy,
            GateName::Zz,
            GateName::U1ex,
            GateName::U2ex,
        ]
        .into_iter()
        .collect();
        GateCatalog { names }
    }

    /// Whether the catalog lists `name`. Custom gates always pass, since
    /// they carry their own matrix.
    pub fn supports(&self, name: &GateName) -> bool {
        matches!(name, GateName::Custom(_)) || self.names.contains(name)
    }
}

impl Default for GateCatalog {
    fn default() -> Self {
        GateCatalog::standard()
    }
}

/// A gate applied to an ordered list of qubits.
#[derive(Debug, Clone)]
pub struct Gate {
    /// Catalog or custom name.
    pub name: GateName,
    /// Operands, order-significant.
    pub qubits: Vec<Qubit>,
    /// Expression parameters, order matching the gate's formal parameters.
    pub params: Vec<ExpressionNode>,
    /// Unitary matrix, present only for custom gates.
    pub matrix: Option<Array2<Complex64>>,
}

impl Gate {
    /// A parameterless catalog gate. Fails when the operand count does not
    /// match the gate's arity.
    pub fn new(name: GateName, qubits: Vec<Qubit>) -> IrResult<Gate> {
        Gate::with_params(name, qubits, Vec::new())
    }

    /// A catalog gate with parameters.
    pub fn with_params(
        name: GateName,
        qubits: Vec<Qubit>,
        params: Vec<ExpressionNode>,
    ) -> IrResult<Gate> {
        if let Some(arity) = name.arity()
            && qubits.len() != arity
        {
            return Err(IrError::MalformedGateData {
                reason: format!("{} expects {} qubits, got {}", name, arity, qubits.len()),
            });
        }
        if params.len() != name.n_params() {
            return Err(IrError::MalformedGateData {
                reason: format!(
                    "{} expects {} parameters, got {}",
                    name,
                    name.n_params(),
                    params.len()
                ),
            });
        }
        Ok(Gate {
            name,
            qubits,
            params,
            matrix: None,
        })
    }

    /// A matrix-defined gate. The matrix must be square with dimension
    /// `2^qubits`.
    pub fn custom(
        name: impl Into<String>,
        qubits: Vec<Qubit>,
        matrix: Array2<Complex64>,
    ) -> IrResult<Gate> {
        let dim = 1usize << qubits.len();
        if matrix.nrows() != dim || matrix.ncols() != dim {
            return Err(IrError::MalformedGateData {
                reason: format!(
                    "matrix is {}x{}, expected {}x{} for {} qubits",
                    matrix.nrows(),
                    matrix.ncols(),
                    dim,
                    dim,
                    qubits.len()
                ),
            });
        }
        Ok(Gate {
            name: GateName::Custom(name.into()),
            qubits,
            params: Vec::new(),
            matrix: Some(matrix),
        })
    }

    /// Substitute symbols in every parameter, producing a new gate.
    pub fn evaluate(&self, bindings: &FxHashMap<String, f64>) -> Gate {
        Gate {
            name: self.name.clone(),
            qubits: self.qubits.clone(),
            params: self.params.iter().map(|p| p.substitute(bindings)).collect(),
            matrix: self.matrix.clone(),
        }
    }

    /// Symbols appearing in the parameters, in order of first appearance.
    pub fn symbolic_params(&self) -> Vec<String> {
        let mut out = Vec::new();
        for param in &self.params {
            for name in param.symbols() {
                if !out.iter().any(|n| *n == name) {
                    out.push(name);
                }
            }
        }
        out
    }

    /// Whether any parameter still contains a symbol.
    pub fn is_symbolic(&self) -> bool {
        self.params.iter().any(ExpressionNode::is_symbolic)
    }
}

// Qubits compare by canonical index so that provenance picked up during an
// import does not break round-trip equality.
impl PartialEq for Gate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.qubits.len() == other.qubits.len()
            && self
                .qubits
                .iter()
                .zip(&other.qubits)
                .all(|(a, b)| a.same_index(b))
            && self.params == other.params
            && self.matrix == other.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::QubitProvenance;
    use ndarray::array;

    #[test]
    fn test_name_spelling_round_trips() {
        for name in [
            GateName::Cnot,
            GateName::CPhase,
            GateName::U1ex,
            GateName::Custom("UGLY".to_string()),
        ] {
            assert_eq!(GateName::parse(name.as_str()), name);
        }
    }

    #[test]
    fn test_arity_enforced() {
        let err = Gate::new(GateName::Cnot, vec![Qubit::new(0)]).unwrap_err();
        assert!(matches!(err, IrError::MalformedGateData { .. }));
    }

    #[test]
    fn test_param_count_enforced() {
        let err = Gate::new(GateName::Rx, vec![Qubit::new(0)]).unwrap_err();
        assert!(matches!(err, IrError::MalformedGateData { .. }));
        Gate::with_params(
            GateName::Rx,
            vec![Qubit::new(0)],
            vec![ExpressionNode::real(0.5)],
        )
        .unwrap();
    }

    #[test]
    fn test_custom_matrix_dimension_enforced() {
        let bad = array![
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        ];
        let err = Gate::custom("U", vec![Qubit::new(0), Qubit::new(1)], bad).unwrap_err();
        assert!(matches!(err, IrError::MalformedGateData { .. }));
    }

    #[test]
    fn test_evaluate_substitutes_params() {
        let gate = Gate::with_params(
            GateName::Rz,
            vec![Qubit::new(0)],
            vec![ExpressionNode::symbol("theta") * ExpressionNode::real(2.0)],
        )
        .unwrap();
        let mut bindings = FxHashMap::default();
        bindings.insert("theta".to_string(), 0.25);
        let evaluated = gate.evaluate(&bindings);
        assert_eq!(evaluated.params, vec![ExpressionNode::real(0.5)]);
        assert!(!evaluated.is_symbolic());
    }

    #[test]
    fn test_equality_ignores_provenance() {
        let a = Gate::new(GateName::X, vec![Qubit::new(1)]).unwrap();
        let b = Gate::new(
            GateName::X,
            vec![Qubit::with_provenance(1, QubitProvenance::Line { x: 1 })],
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_catalog_supports_custom() {
        let catalog = GateCatalog::standard();
        assert!(catalog.supports(&GateName::Xx));
        assert!(catalog.supports(&GateName::Custom("ANY".to_string())));
    }
}
