//! The direct quil/cirq converters agree with the path through the IR.

use proptest::prelude::*;
use std::f64::consts::PI;

use tangle_adapter_cirq::import_circuit;
use tangle_adapter_quil::{Program, QuilGate, QuilQubit, import_program};
use tangle_convert::{cirq_to_quil, quil_to_cirq};
use tangle_expr::ExpressionNode;

// Power-of-two multiples of pi divide back out exactly, so the angle to
// exponent conversion is lossless for these.
fn rotation_angle() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(-PI),
        Just(-PI / 2.0),
        Just(-PI / 4.0),
        Just(PI / 4.0),
        Just(PI / 2.0),
        Just(PI),
        Just(2.0 * PI),
    ]
}

// Every generated gate touches qubit 0, so the moment structure on the
// cirq side cannot reorder the sequence.
fn anchored_gate() -> impl Strategy<Value = QuilGate> {
    let plain = prop_oneof![Just("H"), Just("X"), Just("Y"), Just("Z"), Just("S"), Just("T")]
        .prop_map(|name| QuilGate {
            name: name.to_string(),
            params: vec![],
            qubits: vec![QuilQubit(0)],
        });
    let rotation = (prop_oneof![Just("RX"), Just("RY"), Just("RZ")], rotation_angle()).prop_map(
        |(name, angle)| QuilGate {
            name: name.to_string(),
            params: vec![ExpressionNode::real(angle)],
            qubits: vec![QuilQubit(0)],
        },
    );
    let double = (prop_oneof![Just("CNOT"), Just("CZ"), Just("SWAP")], 1u64..5).prop_map(
        |(name, partner)| QuilGate {
            name: name.to_string(),
            params: vec![],
            qubits: vec![QuilQubit(0), QuilQubit(partner)],
        },
    );
    let cphase = (1u64..5, rotation_angle()).prop_map(|(partner, angle)| QuilGate {
        name: "CPHASE".to_string(),
        params: vec![ExpressionNode::real(angle)],
        qubits: vec![QuilQubit(0), QuilQubit(partner)],
    });
    prop_oneof![plain, rotation, double, cphase]
}

fn anchored_program() -> impl Strategy<Value = Program> {
    prop::collection::vec(anchored_gate(), 1..12).prop_map(|gates| {
        let mut program = Program::new();
        for gate in gates {
            program.push_gate(gate);
        }
        program
    })
}

proptest! {
    #[test]
    fn direct_conversion_matches_the_ir_path(program in anchored_program()) {
        let through_ir = import_program(&program).unwrap();
        let direct = import_circuit(&quil_to_cirq(&program).unwrap()).unwrap();
        prop_assert_eq!(direct, through_ir);
    }

    #[test]
    fn direct_round_trip_restores_the_program(program in anchored_program()) {
        let circuit = quil_to_cirq(&program).unwrap();
        prop_assert_eq!(cirq_to_quil(&circuit).unwrap(), program);
    }
}
