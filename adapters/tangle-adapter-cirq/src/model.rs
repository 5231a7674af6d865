//! Boundary object model for cirq-style moment circuits.

use tangle_expr::ExpressionNode;

/// A cirq qubit: a grid position or a line position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CirqQubit {
    /// Two-dimensional device grid coordinate.
    Grid {
        /// Grid row.
        row: i64,
        /// Grid column.
        col: i64,
    },
    /// One-dimensional line coordinate.
    Line {
        /// Position on the line.
        x: i64,
    },
}

/// Gates of the cirq-style operation set.
///
/// Power gates carry an exponent: `X^1` is `X`, and `X^t` rotates by
/// `t * pi` about the X axis (up to global phase).
#[derive(Debug, Clone, PartialEq)]
pub enum CirqGate {
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
    /// A gate controlled on one extra qubit (first operand).
    Controlled {
        sub_gate: Box<CirqGate>,
    },
    XPow {
        exponent: ExpressionNode,
    },
    YPow {
        exponent: ExpressionNode,
    },
    ZPow {
        exponent: ExpressionNode,
    },
    CzPow {
        exponent: ExpressionNode,
    },
    HPow {
        exponent: ExpressionNode,
    },
    /// An X-axis rotation conjugated by Z rotations:
    /// `Z^phase_exponent X^exponent Z^-phase_exponent`.
    PhasedXPow {
        phase_exponent: ExpressionNode,
        exponent: ExpressionNode,
    },
    XxPow {
        exponent: ExpressionNode,
    },
    YyPow {
        exponent: ExpressionNode,
    },
    ZzPow {
        exponent: ExpressionNode,
    },
    Measure {
        key: String,
    },
}

/// A gate applied to concrete qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct CirqOperation {
    pub gate: CirqGate,
    pub qubits: Vec<CirqQubit>,
}

/// Operations that happen at the same time step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Moment {
    pub operations: Vec<CirqOperation>,
}

impl Moment {
    fn touches_any(&self, qubits: &[CirqQubit]) -> bool {
        self.operations
            .iter()
            .any(|op| op.qubits.iter().any(|q| qubits.contains(q)))
    }
}

/// A circuit as a sequence of moments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CirqCircuit {
    pub moments: Vec<Moment>,
}

impl CirqCircuit {
    pub fn new() -> Self {
        CirqCircuit::default()
    }

    /// Append with the EARLIEST strategy: the operation slides left into
    /// the first moment after the last one that touches any of its qubits.
    pub fn append(&mut self, op: CirqOperation) {
        let mut target = self.moments.len();
        while target > 0 && !self.moments[target - 1].touches_any(&op.qubits) {
            target -= 1;
        }
        if target == self.moments.len() {
            self.moments.push(Moment::default());
        }
        self.moments[target].operations.push(op);
    }

    /// All operations in moment order.
    pub fn operations(&self) -> impl Iterator<Item = &CirqOperation> {
        self.moments.iter().flat_map(|m| m.operations.iter())
    }

    /// Distinct qubits, in a stable display order: line before grid, then
    /// by coordinate.
    pub fn qubits(&self) -> Vec<CirqQubit> {
        let mut out: Vec<CirqQubit> = Vec::new();
        for op in self.operations() {
            for qubit in &op.qubits {
                if !out.contains(qubit) {
                    out.push(*qubit);
                }
            }
        }
        out.sort_by_key(|q| match q {
            CirqQubit::Line { x } => (0, *x, 0),
            CirqQubit::Grid { row, col } => (1, *row, *col),
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(gate: CirqGate, xs: &[i64]) -> CirqOperation {
        CirqOperation {
            gate,
            qubits: xs.iter().map(|&x| CirqQubit::Line { x }).collect(),
        }
    }

    #[test]
    fn test_append_packs_disjoint_ops_into_one_moment() {
        let mut circuit = CirqCircuit::new();
        circuit.append(op(CirqGate::H, &[0]));
        circuit.append(op(CirqGate::H, &[1]));
        assert_eq!(circuit.moments.len(), 1);
        assert_eq!(circuit.moments[0].operations.len(), 2);
    }

    #[test]
    fn test_append_starts_new_moment_on_conflict() {
        let mut circuit = CirqCircuit::new();
        circuit.append(op(CirqGate::H, &[0]));
        circuit.append(op(CirqGate::Cnot, &[0, 1]));
        circuit.append(op(CirqGate::X, &[2]));
        assert_eq!(circuit.moments.len(), 2);
        // X on an untouched wire slides back into the first moment.
        assert_eq!(circuit.moments[0].operations.len(), 2);
    }

    #[test]
    fn test_qubits_sorted_and_distinct() {
        let mut circuit = CirqCircuit::new();
        circuit.append(op(CirqGate::Cnot, &[3, 1]));
        circuit.append(op(CirqGate::X, &[1]));
        assert_eq!(
            circuit.qubits(),
            vec![CirqQubit::Line { x: 1 }, CirqQubit::Line { x: 3 }]
        );
    }
}
