//! Canonical circuit -> cirq circuit.

use rustc_hash::FxHashMap;
use std::f64::consts::PI;

use tangle_expr::ExpressionNode;
use tangle_ir::{
    Circuit, FrameworkLabel, Gate, GateCatalog, GateName, IrError, IrResult, Qubit,
    QubitProvenance,
};

use crate::model::{CirqCircuit, CirqGate, CirqOperation, CirqQubit};

// A rotation by theta becomes a power gate with exponent theta / pi;
// numeric angles fold to a plain number.
fn exponent(angle: &ExpressionNode) -> ExpressionNode {
    ExpressionNode::div(angle.clone(), ExpressionNode::real(PI))
        .substitute(&FxHashMap::default())
}

fn native_qubit(qubit: &Qubit, label: Option<FrameworkLabel>) -> CirqQubit {
    if label == Some(FrameworkLabel::Cirq) {
        match &qubit.provenance {
            Some(QubitProvenance::Grid { row, col }) => {
                return CirqQubit::Grid {
                    row: *row,
                    col: *col,
                };
            }
            Some(QubitProvenance::Line { x }) => return CirqQubit::Line { x: *x },
            _ => {}
        }
    }
    CirqQubit::Line {
        x: i64::from(qubit.index),
    }
}

fn export_gate(gate: &Gate) -> IrResult<CirqGate> {
    let native = match &gate.name {
        GateName::I => CirqGate::I,
        GateName::X => CirqGate::X,
        GateName::Y => CirqGate::Y,
        GateName::Z => CirqGate::Z,
        GateName::H => CirqGate::H,
        GateName::S => CirqGate::S,
        GateName::T => CirqGate::T,
        GateName::Cnot => CirqGate::Cnot,
        GateName::Cz => CirqGate::Cz,
        GateName::Swap => CirqGate::Swap,
        GateName::Cswap => CirqGate::Controlled {
            sub_gate: Box::new(CirqGate::Swap),
        },
        GateName::Rx => CirqGate::XPow {
            exponent: exponent(&gate.params[0]),
        },
        GateName::Ry => CirqGate::YPow {
            exponent: exponent(&gate.params[0]),
        },
        GateName::Rz => CirqGate::ZPow {
            exponent: exponent(&gate.params[0]),
        },
        GateName::CPhase => CirqGate::CzPow {
            exponent: exponent(&gate.params[0]),
        },
        GateName::Rh => CirqGate::HPow {
            exponent: exponent(&gate.params[0]),
        },
        GateName::Zxz => CirqGate::PhasedXPow {
            phase_exponent: exponent(&gate.params[0]),
            exponent: exponent(&gate.params[1]),
        },
        GateName::Xx => CirqGate::XxPow {
            exponent: exponent(&gate.params[0]),
        },
        GateName::Yy => CirqGate::YyPow {
            exponent: exponent(&gate.params[0]),
        },
        GateName::Zz => CirqGate::ZzPow {
            exponent: exponent(&gate.params[0]),
        },
        GateName::Measure => CirqGate::Measure {
            key: gate.qubits[0].to_string(),
        },
        name => {
            return Err(IrError::UnsupportedGate {
                name: name.as_str().to_string(),
            });
        }
    };
    Ok(native)
}

/// Export a circuit as a cirq moment circuit.
///
/// With an explicit `register`, the circuit's qubits map positionally onto
/// it; a register shorter than the qubit set fails with
/// [`IrError::RegisterCapacity`]. Without one, qubits imported from cirq
/// are rebuilt from provenance, and everything else lands on line qubits
/// at the canonical index.
pub fn export_circuit(
    circuit: &Circuit,
    catalog: &GateCatalog,
    register: Option<&[CirqQubit]>,
) -> IrResult<CirqCircuit> {
    tracing::debug!(name = %circuit.name, gates = circuit.gates.len(), "exporting circuit to cirq");
    let mut mapping: FxHashMap<u32, CirqQubit> = FxHashMap::default();
    match register {
        Some(register) => {
            if register.len() < circuit.qubits.len() {
                return Err(IrError::RegisterCapacity {
                    required: circuit.qubits.len(),
                    available: register.len(),
                });
            }
            for (qubit, native) in circuit.qubits.iter().zip(register) {
                mapping.insert(qubit.index, *native);
            }
        }
        None => {
            for qubit in &circuit.qubits {
                mapping.insert(qubit.index, native_qubit(qubit, circuit.info.label));
            }
        }
    }

    let mut out = CirqCircuit::new();
    for gate in &circuit.gates {
        if !catalog.supports(&gate.name) {
            return Err(IrError::UnsupportedGate {
                name: gate.name.as_str().to_string(),
            });
        }
        if gate.name == GateName::Barrier {
            continue;
        }
        let mut qubits = Vec::with_capacity(gate.qubits.len());
        for qubit in &gate.qubits {
            let native = mapping
                .get(&qubit.index)
                .copied()
                .ok_or_else(|| IrError::MalformedGateData {
                    reason: format!("gate qubit q{} is not in the circuit", qubit.index),
                })?;
            qubits.push(native);
        }
        out.append(CirqOperation {
            gate: export_gate(gate)?,
            qubits,
        });
    }
    Ok(out)
}
