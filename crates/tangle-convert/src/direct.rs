//! Direct converters between the quil and cirq boundary models.
//!
//! These skip the canonical circuit entirely: instructions convert one at
//! a time, and gates cirq lacks natively leave for quil as rotation
//! sequences equal to the original up to global phase.

use rustc_hash::FxHashMap;
use std::f64::consts::PI;

use tangle_expr::ExpressionNode;
use tangle_ir::{GateName, IrError, IrResult};

use tangle_adapter_cirq::{CirqCircuit, CirqGate, CirqOperation, CirqQubit, decompose};
use tangle_adapter_quil::{Program, QuilGate, QuilInstruction, QuilQubit};

fn exponent(angle: &ExpressionNode) -> ExpressionNode {
    ExpressionNode::div(angle.clone(), ExpressionNode::real(PI)).substitute(&FxHashMap::default())
}

fn angle(exponent: &ExpressionNode) -> ExpressionNode {
    (exponent.clone() * ExpressionNode::real(PI)).substitute(&FxHashMap::default())
}

fn grid_qubit(qubit: QuilQubit) -> IrResult<CirqQubit> {
    let row = i64::try_from(qubit.0).map_err(|_| IrError::MalformedGateData {
        reason: format!("qubit index {} does not fit a grid row", qubit.0),
    })?;
    Ok(CirqQubit::Grid { row, col: 0 })
}

fn param(gate: &QuilGate, position: usize) -> IrResult<ExpressionNode> {
    gate.params
        .get(position)
        .cloned()
        .ok_or_else(|| IrError::MalformedGateData {
            reason: format!("{} is missing parameter {}", gate.name, position),
        })
}

fn convert_gate(gate: &QuilGate) -> IrResult<CirqGate> {
    let native = match GateName::parse(&gate.name) {
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
            exponent: exponent(&param(gate, 0)?),
        },
        GateName::Ry => CirqGate::YPow {
            exponent: exponent(&param(gate, 0)?),
        },
        GateName::Rz => CirqGate::ZPow {
            exponent: exponent(&param(gate, 0)?),
        },
        GateName::CPhase => CirqGate::CzPow {
            exponent: exponent(&param(gate, 0)?),
        },
        GateName::Rh => CirqGate::HPow {
            exponent: exponent(&param(gate, 0)?),
        },
        GateName::Zxz => CirqGate::PhasedXPow {
            phase_exponent: exponent(&param(gate, 0)?),
            exponent: exponent(&param(gate, 1)?),
        },
        GateName::Xx => CirqGate::XxPow {
            exponent: exponent(&param(gate, 0)?),
        },
        GateName::Yy => CirqGate::YyPow {
            exponent: exponent(&param(gate, 0)?),
        },
        GateName::Zz => CirqGate::ZzPow {
            exponent: exponent(&param(gate, 0)?),
        },
        name => {
            return Err(IrError::UnsupportedGate {
                name: name.as_str().to_string(),
            });
        }
    };
    Ok(native)
}

/// Convert a quil program directly to a cirq moment circuit.
///
/// Qubit `n` lands on grid position `(n, 0)`, so the canonical index of a
/// converted qubit matches the program's. Matrix-defined gates have no
/// cirq counterpart and fail with [`IrError::UnsupportedGate`].
pub fn quil_to_cirq(program: &Program) -> IrResult<CirqCircuit> {
    tracing::debug!(
        instructions = program.instructions.len(),
        "converting quil program to cirq"
    );
    let mut out = CirqCircuit::new();
    for instruction in &program.instructions {
        match instruction {
            QuilInstruction::Gate(gate) => {
                let mut qubits = Vec::with_capacity(gate.qubits.len());
                for &qubit in &gate.qubits {
                    qubits.push(grid_qubit(qubit)?);
                }
                out.append(CirqOperation {
                    gate: convert_gate(gate)?,
                    qubits,
                });
            }
            QuilInstruction::Measure { qubit, .. } => out.append(CirqOperation {
                gate: CirqGate::Measure {
                    key: format!("q{}", qubit.0),
                },
                qubits: vec![grid_qubit(*qubit)?],
            }),
        }
    }
    Ok(out)
}

fn line_index(qubit: &CirqQubit) -> IrResult<u64> {
    let position = match qubit {
        CirqQubit::Grid { row, .. } => *row,
        CirqQubit::Line { x } => *x,
    };
    u64::try_from(position).map_err(|_| IrError::MalformedGateData {
        reason: format!("qubit position {position} is not a valid program index"),
    })
}

fn pair(indices: &[u64], gate: &CirqGate) -> IrResult<(u64, u64)> {
    match indices {
        [a, b] => Ok((*a, *b)),
        _ => Err(IrError::MalformedGateData {
            reason: format!("{gate:?} expects 2 qubits, got {}", indices.len()),
        }),
    }
}

fn push(program: &mut Program, name: &GateName, params: Vec<ExpressionNode>, qubits: &[u64]) {
    program.push_gate(QuilGate {
        name: name.as_str().to_string(),
        params,
        qubits: qubits.iter().map(|&q| QuilQubit(q)).collect(),
    });
}

// A CNOT-conjugated RZ on the target is exp(-i theta/2 Z x Z).
fn emit_zz(program: &mut Program, theta: ExpressionNode, a: u64, b: u64) {
    push(program, &GateName::Cnot, vec![], &[a, b]);
    push(program, &GateName::Rz, vec![theta], &[b]);
    push(program, &GateName::Cnot, vec![], &[a, b]);
}

// H on both wires rotates the ZZ axis onto XX.
fn emit_xx(program: &mut Program, theta: ExpressionNode, a: u64, b: u64) {
    push(program, &GateName::H, vec![], &[a]);
    push(program, &GateName::H, vec![], &[b]);
    emit_zz(program, theta, a, b);
    push(program, &GateName::H, vec![], &[a]);
    push(program, &GateName::H, vec![], &[b]);
}

fn emit_operation(program: &mut Program, op: &CirqOperation) -> IrResult<()> {
    let mut indices = Vec::with_capacity(op.qubits.len());
    for qubit in &op.qubits {
        indices.push(line_index(qubit)?);
    }
    match &op.gate {
        CirqGate::I => push(program, &GateName::I, vec![], &indices),
        CirqGate::X => push(program, &GateName::X, vec![], &indices),
        CirqGate::Y => push(program, &GateName::Y, vec![], &indices),
        CirqGate::Z => push(program, &GateName::Z, vec![], &indices),
        CirqGate::H => push(program, &GateName::H, vec![], &indices),
        CirqGate::S => push(program, &GateName::S, vec![], &indices),
        CirqGate::T => push(program, &GateName::T, vec![], &indices),
        CirqGate::Cnot => push(program, &GateName::Cnot, vec![], &indices),
        CirqGate::Cz => push(program, &GateName::Cz, vec![], &indices),
        CirqGate::Swap => push(program, &GateName::Swap, vec![], &indices),
        CirqGate::Controlled { sub_gate } => match sub_gate.as_ref() {
            CirqGate::Swap => push(program, &GateName::Cswap, vec![], &indices),
            other => {
                return Err(IrError::UnsupportedGate {
                    name: format!("controlled {other:?}"),
                });
            }
        },
        CirqGate::XPow { exponent } => {
            push(program, &GateName::Rx, vec![angle(exponent)], &indices)
        }
        CirqGate::YPow { exponent } => {
            push(program, &GateName::Ry, vec![angle(exponent)], &indices)
        }
        CirqGate::ZPow { exponent } => {
            push(program, &GateName::Rz, vec![angle(exponent)], &indices)
        }
        CirqGate::CzPow { exponent } => {
            push(program, &GateName::CPhase, vec![angle(exponent)], &indices)
        }
        CirqGate::XxPow { exponent } => {
            let (a, b) = pair(&indices, &op.gate)?;
            emit_xx(program, angle(exponent), a, b);
        }
        CirqGate::YyPow { exponent } => {
            // Z-axis quarter turns on both wires rotate XX onto YY; the
            // RZ phases cancel pairwise, so this is exact.
            let (a, b) = pair(&indices, &op.gate)?;
            let quarter = ExpressionNode::real(PI / 2.0);
            let back = ExpressionNode::real(-PI / 2.0);
            push(program, &GateName::Rz, vec![back.clone()], &[a]);
            push(program, &GateName::Rz, vec![back], &[b]);
            emit_xx(program, angle(exponent), a, b);
            push(program, &GateName::Rz, vec![quarter.clone()], &[a]);
            push(program, &GateName::Rz, vec![quarter], &[b]);
        }
        CirqGate::ZzPow { exponent } => {
            let (a, b) = pair(&indices, &op.gate)?;
            emit_zz(program, angle(exponent), a, b);
        }
        CirqGate::HPow { .. } | CirqGate::PhasedXPow { .. } => {
            let steps = decompose(op).ok_or_else(|| IrError::UnsupportedGate {
                name: format!("{:?}", op.gate),
            })?;
            for step in &steps {
                emit_operation(program, step)?;
            }
        }
        CirqGate::Measure { .. } => {
            let (index, qubit) = match indices.as_slice() {
                [index] => (*index, QuilQubit(*index)),
                _ => {
                    return Err(IrError::MalformedGateData {
                        reason: format!("measurement expects 1 qubit, got {}", indices.len()),
                    });
                }
            };
            let target = program.declare(&format!("r{index}"), 1);
            program
                .instructions
                .push(QuilInstruction::Measure { qubit, target });
        }
    }
    Ok(())
}

/// Convert a cirq moment circuit directly to a quil program.
///
/// Grid qubits land on their row index, line qubits on their position.
/// Two-qubit power gates become CNOT-conjugated RZ sequences, and phased
/// power gates go through their own decomposition first; both agree with
/// the source gate up to global phase.
pub fn cirq_to_quil(circuit: &CirqCircuit) -> IrResult<Program> {
    tracing::debug!(
        moments = circuit.moments.len(),
        "converting cirq circuit to quil"
    );
    let mut program = Program::new();
    for op in circuit.operations() {
        emit_operation(&mut program, op)?;
    }
    Ok(program)
}
