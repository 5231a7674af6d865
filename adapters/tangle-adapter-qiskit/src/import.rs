//! Qiskit circuit -> canonical circuit.

use tangle_ir::{
    Circuit, FrameworkLabel, Gate, GateName, IrError, IrResult, Qubit, QubitProvenance, QubitTable,
};

use crate::model::{QiskitCircuit, QiskitInstruction, QiskitQubit};

fn gate_name(instruction_name: &str) -> Option<GateName> {
    let name = match instruction_name {
        "id" => GateName::I,
        "x" => GateName::X,
        "y" => GateName::Y,
        "z" => GateName::Z,
        "h" => GateName::H,
        "s" => GateName::S,
        "t" => GateName::T,
        "cx" => GateName::Cnot,
        "cz" => GateName::Cz,
        "swap" => GateName::Swap,
        "cswap" => GateName::Cswap,
        "rx" => GateName::Rx,
        "ry" => GateName::Ry,
        "rz" => GateName::Rz,
        "cp" => GateName::CPhase,
        "measure" => GateName::Measure,
        "barrier" => GateName::Barrier,
        _ => return None,
    };
    Some(name)
}

fn import_instruction(instruction: &QiskitInstruction, qubits: Vec<Qubit>) -> IrResult<Gate> {
    if instruction.gate.name == "unitary" {
        let matrix = instruction
            .gate
            .matrix
            .clone()
            .ok_or_else(|| IrError::MalformedGateData {
                reason: "unitary instruction without a matrix".to_string(),
            })?;
        let label = instruction
            .gate
            .label
            .clone()
            .unwrap_or_else(|| "unitary".to_string());
        return Gate::custom(label, qubits, matrix);
    }
    match gate_name(&instruction.gate.name) {
        Some(name) => Gate::with_params(name, qubits, instruction.gate.params.clone()),
        None => Err(IrError::UnsupportedGate {
            name: instruction.gate.name.clone(),
        }),
    }
}

/// Import a register circuit.
///
/// Qubits deduplicate by native equality; the canonical index is the
/// qubit's absolute position across the circuit's quantum registers. The
/// circuit keeps the native circuit's name.
pub fn import_circuit(native: &QiskitCircuit) -> IrResult<Circuit> {
    tracing::debug!(name = %native.name, instructions = native.data.len(), "importing qiskit circuit");
    let mut table = QubitTable::new(
        |a: &QiskitQubit, b: &QiskitQubit| Ok(a == b),
        |q: &QiskitQubit| {
            let position =
                native
                    .absolute_position(q)
                    .ok_or_else(|| IrError::MalformedGateData {
                        reason: format!("qubit {}[{}] is not in any register", q.register, q.index),
                    })?;
            Ok(Qubit::with_provenance(
                position,
                QubitProvenance::RegisterSlot {
                    register: q.register.clone(),
                    slot: q.index,
                },
            ))
        },
    );

    let mut gates = Vec::with_capacity(native.data.len());
    for instruction in &native.data {
        let mut qubits = Vec::with_capacity(instruction.qubits.len());
        for qubit in &instruction.qubits {
            qubits.push(table.resolve(qubit)?);
        }
        gates.push(import_instruction(instruction, qubits)?);
    }

    let mut qubits = table.into_qubits();
    qubits.sort_by_key(|q| q.index);
    Ok(Circuit {
        name: native.name.clone(),
        gates,
        qubits,
        info: tangle_ir::CircuitInfo {
            label: Some(FrameworkLabel::Qiskit),
        },
    })
}
