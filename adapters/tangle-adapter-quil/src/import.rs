//! Quil program -> canonical circuit.

use ndarray::Array2;
use rustc_hash::FxHashMap;

use tangle_ir::{Circuit, FrameworkLabel, Gate, GateName, IrError, IrResult, Qubit, QubitTable};

use crate::program::{GateDefinition, Program, QuilGate, QuilInstruction, QuilQubit};

/// Import a Quil program.
///
/// Qubits are deduplicated by their integer index, which also becomes the
/// canonical index. Gate applications whose names are not in the catalog
/// are matched against the program's gate definitions and imported as
/// matrix-defined custom gates.
pub fn import_program(program: &Program) -> IrResult<Circuit> {
    tracing::debug!(
        instructions = program.instructions.len(),
        definitions = program.gate_definitions.len(),
        "importing quil program"
    );
    let mut table = QubitTable::new(
        |a: &QuilQubit, b: &QuilQubit| Ok(a == b),
        |q: &QuilQubit| Ok(Qubit::new(q.0 as u32)),
    );

    let mut gates = Vec::with_capacity(program.instructions.len());
    for instruction in &program.instructions {
        match instruction {
            QuilInstruction::Gate(application) => {
                let mut qubits = Vec::with_capacity(application.qubits.len());
                for qubit in &application.qubits {
                    qubits.push(table.resolve(qubit)?);
                }
                gates.push(import_gate(program, application, qubits)?);
            }
            QuilInstruction::Measure { qubit, .. } => {
                gates.push(Gate::new(GateName::Measure, vec![table.resolve(qubit)?])?);
            }
        }
    }

    let mut qubits = table.into_qubits();
    qubits.sort_by_key(|q| q.index);
    let mut circuit = Circuit {
        gates,
        qubits,
        ..Circuit::default()
    };
    circuit.info.label = Some(FrameworkLabel::PyQuil);
    Ok(circuit)
}

fn import_gate(program: &Program, application: &QuilGate, qubits: Vec<Qubit>) -> IrResult<Gate> {
    match GateName::parse(&application.name) {
        GateName::Custom(custom) => {
            let definition =
                program
                    .defined_gate(&custom)
                    .ok_or_else(|| IrError::UnsupportedGate {
                        name: custom.clone(),
                    })?;
            let matrix = instantiate(definition, &application.params)?;
            Gate::custom(custom, qubits, matrix)
        }
        name => Gate::with_params(name, qubits, application.params.clone()),
    }
}

// Bind the definition's formals to the application's actual parameters and
// fold the matrix to numbers.
fn instantiate(
    definition: &GateDefinition,
    actuals: &[tangle_expr::ExpressionNode],
) -> IrResult<Array2<num_complex::Complex64>> {
    if definition.parameters.len() != actuals.len() {
        return Err(IrError::MalformedGateData {
            reason: format!(
                "{} is defined with {} parameters, applied with {}",
                definition.name,
                definition.parameters.len(),
                actuals.len()
            ),
        });
    }
    let mut bindings = FxHashMap::default();
    for (formal, actual) in definition.parameters.iter().zip(actuals) {
        let value = actual.as_f64().ok_or_else(|| IrError::SymbolicParameter {
            name: actual.to_string(),
        })?;
        bindings.insert(formal.clone(), value);
    }
    let dim = definition.matrix.nrows();
    let mut numeric = Array2::zeros((dim, dim));
    for ((i, j), entry) in definition.matrix.indexed_iter() {
        numeric[[i, j]] = entry.substitute(&bindings).as_complex().ok_or_else(|| {
            IrError::SymbolicParameter {
                name: entry.to_string(),
            }
        })?;
    }
    Ok(numeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_expr::ExpressionNode;

    fn apply(name: &str, params: Vec<ExpressionNode>, qubits: Vec<u64>) -> QuilInstruction {
        QuilInstruction::Gate(QuilGate {
            name: name.to_string(),
            params,
            qubits: qubits.into_iter().map(QuilQubit).collect(),
        })
    }

    #[test]
    fn test_import_dedups_qubits() {
        let mut program = Program::new();
        program.instructions.push(apply("H", vec![], vec![2]));
        program.instructions.push(apply("CNOT", vec![], vec![2, 0]));
        program.instructions.push(apply("X", vec![], vec![2]));
        let circuit = import_program(&program).unwrap();
        assert_eq!(circuit.qubit_indices(), vec![0, 2]);
        assert_eq!(circuit.gates.len(), 3);
        // All three references resolve to the same canonical qubit.
        assert!(circuit.gates[0].qubits[0].same_index(&circuit.gates[1].qubits[0]));
        assert_eq!(circuit.info.label, Some(FrameworkLabel::PyQuil));
    }

    #[test]
    fn test_import_keeps_symbolic_params() {
        let mut program = Program::new();
        program.instructions.push(apply(
            "RZ",
            vec![ExpressionNode::symbol("theta")],
            vec![0],
        ));
        let circuit = import_program(&program).unwrap();
        assert_eq!(circuit.symbolic_params(), vec!["theta"]);
    }

    #[test]
    fn test_measure_becomes_measure_gate() {
        let mut program = Program::new();
        let target = program.declare("r0", 1);
        program.instructions.push(QuilInstruction::Measure {
            qubit: QuilQubit(0),
            target,
        });
        let circuit = import_program(&program).unwrap();
        assert_eq!(circuit.gates[0].name, GateName::Measure);
    }

    #[test]
    fn test_undefined_gate_is_unsupported() {
        let mut program = Program::new();
        program.instructions.push(apply("MYSTERY", vec![], vec![0]));
        assert_eq!(
            import_program(&program).unwrap_err(),
            IrError::UnsupportedGate {
                name: "MYSTERY".to_string()
            }
        );
    }
}
