//! Canonical circuit -> Quil program.

use ndarray::Array2;

use tangle_expr::ExpressionNode;
use tangle_ir::matrices::symbolic_definition;
use tangle_ir::{Circuit, Gate, GateCatalog, GateName, IrError, IrResult};

use crate::program::{GateDefinition, Program, QuilGate, QuilInstruction, QuilQubit};

/// Export a circuit as a Quil program.
///
/// Common gates map to instruction-set operators. A measurement declares a
/// one-bit region named after its qubit. Barriers vanish, since instruction
/// order already fixes the schedule. Unique and custom gates inject a
/// matrix definition once per name, then apply it.
pub fn export_circuit(circuit: &Circuit, catalog: &GateCatalog) -> IrResult<Program> {
    tracing::debug!(name = %circuit.name, gates = circuit.gates.len(), "exporting circuit to quil");
    let mut program = Program::new();
    for gate in &circuit.gates {
        add_gate(&mut program, gate, catalog)?;
    }
    Ok(program)
}

fn add_gate(program: &mut Program, gate: &Gate, catalog: &GateCatalog) -> IrResult<()> {
    if !catalog.supports(&gate.name) {
        return Err(IrError::UnsupportedGate {
            name: gate.name.as_str().to_string(),
        });
    }
    let qubits: Vec<QuilQubit> = gate.qubits.iter().map(|q| QuilQubit(u64::from(q.index))).collect();
    match &gate.name {
        GateName::Measure => {
            let region = format!("r{}", gate.qubits[0].index);
            let target = program.declare(&region, 1);
            program.instructions.push(QuilInstruction::Measure {
                qubit: qubits[0],
                target,
            });
        }
        GateName::Barrier => {}
        GateName::Custom(name) => {
            let matrix = gate.matrix.as_ref().ok_or_else(|| IrError::MalformedGateData {
                reason: format!("custom gate {name} has no matrix"),
            })?;
            program.define_gate(GateDefinition {
                name: name.clone(),
                parameters: Vec::new(),
                matrix: literal_matrix(matrix),
            });
            program.push_gate(QuilGate {
                name: name.clone(),
                params: Vec::new(),
                qubits,
            });
        }
        name if name.is_unique() => {
            let (formals, matrix) =
                symbolic_definition(name).ok_or_else(|| IrError::UnsupportedGate {
                    name: name.as_str().to_string(),
                })?;
            program.define_gate(GateDefinition {
                name: name.as_str().to_string(),
                parameters: formals.into_iter().map(str::to_string).collect(),
                matrix,
            });
            program.push_gate(QuilGate {
                name: name.as_str().to_string(),
                params: gate.params.clone(),
                qubits,
            });
        }
        name => {
            program.push_gate(QuilGate {
                name: name.as_str().to_string(),
                params: gate.params.clone(),
                qubits,
            });
        }
    }
    Ok(())
}

fn literal_matrix(matrix: &Array2<num_complex::Complex64>) -> Array2<ExpressionNode> {
    matrix.mapv(|entry| {
        if entry.im == 0.0 {
            ExpressionNode::real(entry.re)
        } else {
            ExpressionNode::complex(entry)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_ir::Qubit;

    fn catalog() -> GateCatalog {
        GateCatalog::standard()
    }

    #[test]
    fn test_common_gates_map_one_to_one() {
        let circuit = Circuit::from_gates(vec![
            Gate::new(GateName::H, vec![Qubit::new(0)]).unwrap(),
            Gate::new(GateName::Cnot, vec![Qubit::new(0), Qubit::new(1)]).unwrap(),
        ]);
        let program = export_circuit(&circuit, &catalog()).unwrap();
        assert_eq!(program.to_quil(), "H 0\nCNOT 0 1\n");
    }

    #[test]
    fn test_measure_declares_register() {
        let circuit = Circuit::from_gates(vec![
            Gate::new(GateName::Measure, vec![Qubit::new(3)]).unwrap(),
        ]);
        let program = export_circuit(&circuit, &catalog()).unwrap();
        assert_eq!(program.declarations.len(), 1);
        assert_eq!(program.declarations[0].name, "r3");
        assert_eq!(program.to_quil(), "DECLARE r3 BIT[1]\nMEASURE 3 r3[0]\n");
    }

    #[test]
    fn test_barrier_emits_nothing() {
        let circuit = Circuit {
            gates: vec![Gate {
                name: GateName::Barrier,
                qubits: vec![Qubit::new(0), Qubit::new(1)],
                params: vec![],
                matrix: None,
            }],
            qubits: vec![Qubit::new(0), Qubit::new(1)],
            ..Circuit::default()
        };
        let program = export_circuit(&circuit, &catalog()).unwrap();
        assert!(program.instructions.is_empty());
    }

    #[test]
    fn test_unique_gate_defined_once() {
        let theta = ExpressionNode::symbol("angle");
        let circuit = Circuit::from_gates(vec![
            Gate::with_params(
                GateName::Xx,
                vec![Qubit::new(0), Qubit::new(1)],
                vec![theta.clone()],
            )
            .unwrap(),
            Gate::with_params(
                GateName::Xx,
                vec![Qubit::new(1), Qubit::new(2)],
                vec![theta],
            )
            .unwrap(),
        ]);
        let program = export_circuit(&circuit, &catalog()).unwrap();
        assert_eq!(program.gate_definitions.len(), 1);
        assert_eq!(program.gate_definitions[0].name, "XX");
        assert_eq!(program.instructions.len(), 2);
        let text = program.to_quil();
        assert!(text.starts_with("DEFGATE XX(%theta):\n"));
        assert!(text.contains("cos(%theta / 2)"));
        assert!(text.ends_with("XX(angle) 0 1\nXX(angle) 1 2\n"));
    }
}
