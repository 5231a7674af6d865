//! Ancilla qubits for canonical circuits.

use tangle_ir::{Circuit, Gate, GateName, IrResult, Qubit};

/// Extend a circuit with `count` ancilla qubits, each pinned into the
/// qubit set by an identity gate.
///
/// Ancilla indices start past the highest existing index, so a circuit
/// with a sparse index set never has an ancilla collide with one of its
/// own qubits.
pub fn add_ancilla_register(circuit: &Circuit, count: u32) -> IrResult<Circuit> {
    let start = circuit.qubit_indices().last().map(|&i| i + 1).unwrap_or(0);
    let mut gates = circuit.gates.clone();
    for offset in 0..count {
        gates.push(Gate::new(GateName::I, vec![Qubit::new(start + offset)])?);
    }
    let mut out = Circuit::from_gates(gates);
    out.name = circuit.name.clone();
    out.info = circuit.info.clone();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancillas_start_past_the_highest_index() {
        let circuit = Circuit::from_gates(vec![
            Gate::new(GateName::X, vec![Qubit::new(0)]).unwrap(),
            Gate::new(GateName::Z, vec![Qubit::new(4)]).unwrap(),
        ]);
        let extended = add_ancilla_register(&circuit, 2).unwrap();
        assert_eq!(extended.qubit_indices(), vec![0, 4, 5, 6]);
        assert_eq!(extended.gates.len(), 4);
        assert_eq!(extended.gates[2].name, GateName::I);
    }

    #[test]
    fn test_empty_circuit_gets_indices_from_zero() {
        let extended = add_ancilla_register(&Circuit::default(), 3).unwrap();
        assert_eq!(extended.qubit_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_name_and_info_survive() {
        let mut circuit = Circuit::named("vqe_layer");
        circuit.info.label = Some(tangle_ir::FrameworkLabel::Cirq);
        let extended = add_ancilla_register(&circuit, 1).unwrap();
        assert_eq!(extended.name, "vqe_layer");
        assert_eq!(extended.info.label, Some(tangle_ir::FrameworkLabel::Cirq));
    }
}
