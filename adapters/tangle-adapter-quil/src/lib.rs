//! Quil program boundary for the Tangle circuit IR.
//!
//! Owns a minimal typed model of Quil programs and converts it to and from
//! the canonical circuit. The core IR never sees these types outside this
//! crate.

mod export;
mod import;
mod program;

pub use export::export_circuit;
pub use import::import_program;
pub use program::{
    GateDefinition, MemoryDeclaration, MemoryReference, Program, QuilGate, QuilInstruction,
    QuilQubit,
};

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_expr::ExpressionNode;
    use tangle_ir::{Circuit, Gate, GateCatalog, GateName, Qubit};

    fn round_trip(circuit: &Circuit) -> Circuit {
        let program = export_circuit(circuit, &GateCatalog::standard()).unwrap();
        import_program(&program).unwrap()
    }

    #[test]
    fn test_export_import_is_identity_for_common_gates() {
        let circuit = Circuit::from_gates(vec![
            Gate::new(GateName::H, vec![Qubit::new(0)]).unwrap(),
            Gate::new(GateName::Cnot, vec![Qubit::new(0), Qubit::new(1)]).unwrap(),
            Gate::with_params(
                GateName::Rz,
                vec![Qubit::new(1)],
                vec![ExpressionNode::real(0.25)],
            )
            .unwrap(),
            Gate::new(GateName::Measure, vec![Qubit::new(0)]).unwrap(),
        ]);
        assert_eq!(round_trip(&circuit), circuit);
    }

    #[test]
    fn test_export_import_preserves_unique_gates() {
        let circuit = Circuit::from_gates(vec![
            Gate::with_params(
                GateName::Zxz,
                vec![Qubit::new(0)],
                vec![ExpressionNode::real(0.3), ExpressionNode::real(1.1)],
            )
            .unwrap(),
            Gate::with_params(
                GateName::Yy,
                vec![Qubit::new(0), Qubit::new(1)],
                vec![ExpressionNode::symbol("theta")],
            )
            .unwrap(),
        ]);
        assert_eq!(round_trip(&circuit), circuit);
    }
}
