//! Canonical circuit -> qiskit circuit.

use tangle_ir::matrices::numeric_matrix;
use tangle_ir::{Circuit, Gate, GateCatalog, GateName, IrError, IrResult};

use crate::model::{
    QiskitCircuit, QiskitClbit, QiskitGate, QiskitInstruction, QiskitQubit, QiskitRegister,
};

fn instruction_name(name: &GateName) -> Option<&'static str> {
    let out = match name {
        GateName::I => "id",
        GateName::X => "x",
        GateName::Y => "y",
        GateName::Z => "z",
        GateName::H => "h",
        GateName::S => "s",
        GateName::T => "t",
        GateName::Cnot => "cx",
        GateName::Cz => "cz",
        GateName::Swap => "swap",
        GateName::Cswap => "cswap",
        GateName::Rx => "rx",
        GateName::Ry => "ry",
        GateName::Rz => "rz",
        GateName::CPhase => "cp",
        _ => return None,
    };
    Some(out)
}

fn numeric_params(gate: &Gate) -> IrResult<Vec<f64>> {
    gate.params
        .iter()
        .map(|p| {
            p.as_f64().ok_or_else(|| IrError::SymbolicParameter {
                name: p
                    .symbols()
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| p.to_string()),
            })
        })
        .collect()
}

/// Export a circuit as a qiskit register circuit.
///
/// One quantum register `q` sized to the highest canonical index plus one;
/// a classical register `c` of the same size appears only when the circuit
/// measures. Unique gates become matrix-defined `unitary` instructions
/// labeled with the gate name, which requires their parameters to be
/// numeric.
pub fn export_circuit(circuit: &Circuit, catalog: &GateCatalog) -> IrResult<QiskitCircuit> {
    tracing::debug!(name = %circuit.name, gates = circuit.gates.len(), "exporting circuit to qiskit");
    let size = circuit
        .qubit_indices()
        .last()
        .map(|&i| i + 1)
        .unwrap_or(0);
    let mut native = QiskitCircuit::new(circuit.name.clone());
    native.qregs.push(QiskitRegister {
        name: "q".to_string(),
        size,
    });
    if circuit.gates.iter().any(|g| g.name == GateName::Measure) {
        native.cregs.push(QiskitRegister {
            name: "c".to_string(),
            size,
        });
    }

    let qubit = |index: u32| QiskitQubit {
        register: "q".to_string(),
        index,
    };

    for gate in &circuit.gates {
        if !catalog.supports(&gate.name) {
            return Err(IrError::UnsupportedGate {
                name: gate.name.as_str().to_string(),
            });
        }
        let qubits: Vec<QiskitQubit> = gate.qubits.iter().map(|q| qubit(q.index)).collect();
        let instruction = match &gate.name {
            GateName::Measure => QiskitInstruction {
                gate: QiskitGate::named("measure", vec![]),
                clbits: vec![QiskitClbit {
                    register: "c".to_string(),
                    index: gate.qubits[0].index,
                }],
                qubits,
            },
            GateName::Barrier => QiskitInstruction {
                gate: QiskitGate::named("barrier", vec![]),
                qubits,
                clbits: vec![],
            },
            GateName::Custom(label) => {
                let matrix = gate.matrix.clone().ok_or_else(|| IrError::MalformedGateData {
                    reason: format!("custom gate {label} has no matrix"),
                })?;
                QiskitInstruction {
                    gate: QiskitGate {
                        name: "unitary".to_string(),
                        params: vec![],
                        label: Some(label.clone()),
                        matrix: Some(matrix),
                    },
                    qubits,
                    clbits: vec![],
                }
            }
            name if name.is_unique() => {
                let matrix = numeric_matrix(name, &numeric_params(gate)?)?;
                QiskitInstruction {
                    gate: QiskitGate {
                        name: "unitary".to_string(),
                        params: gate.params.clone(),
                        label: Some(name.as_str().to_string()),
                        matrix: Some(matrix),
                    },
                    qubits,
                    clbits: vec![],
                }
            }
            name => {
                let spelled = instruction_name(name).ok_or_else(|| IrError::UnsupportedGate {
                    name: name.as_str().to_string(),
                })?;
                QiskitInstruction {
                    gate: QiskitGate::named(spelled, gate.params.clone()),
                    qubits,
                    clbits: vec![],
                }
            }
        };
        native.data.push(instruction);
    }
    Ok(native)
}
