//! Cirq circuit -> canonical circuit.

use rustc_hash::FxHashMap;
use std::f64::consts::PI;

use tangle_expr::ExpressionNode;
use tangle_ir::{
    Circuit, FrameworkLabel, Gate, GateName, IrError, IrResult, Qubit, QubitProvenance, QubitTable,
};

use crate::model::{CirqCircuit, CirqGate, CirqOperation, CirqQubit};

fn canonical_qubit(native: &CirqQubit) -> IrResult<Qubit> {
    let (position, provenance) = match native {
        CirqQubit::Grid { row, col } => (*row, QubitProvenance::Grid { row: *row, col: *col }),
        CirqQubit::Line { x } => (*x, QubitProvenance::Line { x: *x }),
    };
    let index = u32::try_from(position).map_err(|_| IrError::MalformedGateData {
        reason: format!("qubit position {position} is not a valid canonical index"),
    })?;
    Ok(Qubit::with_provenance(index, provenance))
}

fn same_native(a: &CirqQubit, b: &CirqQubit) -> IrResult<bool> {
    match (a, b) {
        (CirqQubit::Grid { row, col }, CirqQubit::Grid { row: r, col: c }) => {
            Ok(row == r && col == c)
        }
        (CirqQubit::Line { x }, CirqQubit::Line { x: other }) => Ok(x == other),
        _ => Err(IrError::QubitTypeMismatch),
    }
}

// An exponent of e turns into a rotation by e * pi; numeric exponents fold
// to a plain number.
fn angle(exponent: &ExpressionNode) -> ExpressionNode {
    (exponent.clone() * ExpressionNode::real(PI)).substitute(&FxHashMap::default())
}

fn import_gate(gate: &CirqGate, qubits: Vec<Qubit>) -> IrResult<Gate> {
    match gate {
        CirqGate::I => Gate::new(GateName::I, qubits),
        CirqGate::X => Gate::new(GateName::X, qubits),
        CirqGate::Y => Gate::new(GateName::Y, qubits),
        CirqGate::Z => Gate::new(GateName::Z, qubits),
        CirqGate::H => Gate::new(GateName::H, qubits),
        CirqGate::S => Gate::new(GateName::S, qubits),
        CirqGate::T => Gate::new(GateName::T, qubits),
        CirqGate::Cnot => Gate::new(GateName::Cnot, qubits),
        CirqGate::Cz => Gate::new(GateName::Cz, qubits),
        CirqGate::Swap => Gate::new(GateName::Swap, qubits),
        CirqGate::Controlled { sub_gate } => match sub_gate.as_ref() {
            CirqGate::Swap => Gate::new(GateName::Cswap, qubits),
            other => Err(IrError::UnsupportedGate {
                name: format!("controlled {other:?}"),
            }),
        },
        CirqGate::XPow { exponent } => {
            Gate::with_params(GateName::Rx, qubits, vec![angle(exponent)])
        }
        CirqGate::YPow { exponent } => {
            Gate::with_params(GateName::Ry, qubits, vec![angle(exponent)])
        }
        CirqGate::ZPow { exponent } => {
            Gate::with_params(GateName::Rz, qubits, vec![angle(exponent)])
        }
        CirqGate::CzPow { exponent } => {
            Gate::with_params(GateName::CPhase, qubits, vec![angle(exponent)])
        }
        CirqGate::HPow { exponent } => {
            Gate::with_params(GateName::Rh, qubits, vec![angle(exponent)])
        }
        CirqGate::PhasedXPow {
            phase_exponent,
            exponent,
        } => Gate::with_params(
            GateName::Zxz,
            qubits,
            vec![angle(phase_exponent), angle(exponent)],
        ),
        CirqGate::XxPow { exponent } => {
            Gate::with_params(GateName::Xx, qubits, vec![angle(exponent)])
        }
        CirqGate::YyPow { exponent } => {
            Gate::with_params(GateName::Yy, qubits, vec![angle(exponent)])
        }
        CirqGate::ZzPow { exponent } => {
            Gate::with_params(GateName::Zz, qubits, vec![angle(exponent)])
        }
        CirqGate::Measure { .. } => Gate::new(GateName::Measure, qubits),
    }
}

/// Import a moment circuit.
///
/// Qubits deduplicate by their framework-native position: `(row, col)` for
/// grid qubits, `x` for line qubits. The canonical index is the row for a
/// grid qubit and the position for a line qubit; a circuit mixing the two
/// kinds fails with [`IrError::QubitTypeMismatch`].
pub fn import_circuit(circuit: &CirqCircuit) -> IrResult<Circuit> {
    tracing::debug!(moments = circuit.moments.len(), "importing cirq circuit");
    let mut table = QubitTable::new(same_native, canonical_qubit);
    let mut gates = Vec::new();
    for op in circuit.operations() {
        let mut qubits = Vec::with_capacity(op.qubits.len());
        for qubit in &op.qubits {
            qubits.push(table.resolve(qubit)?);
        }
        gates.push(import_gate(&op.gate, qubits)?);
    }
    let mut qubits = table.into_qubits();
    qubits.sort_by_key(|q| q.index);
    let mut out = Circuit {
        gates,
        qubits,
        ..Circuit::default()
    };
    out.info.label = Some(FrameworkLabel::Cirq);
    Ok(out)
}

/// Convenience for callers holding a flat operation list.
pub fn import_operations<'a>(
    ops: impl IntoIterator<Item = &'a CirqOperation>,
) -> IrResult<Circuit> {
    let mut circuit = CirqCircuit::new();
    for op in ops {
        circuit.append(op.clone());
    }
    import_circuit(&circuit)
}
