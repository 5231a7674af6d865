//! Unitary checks for the gate sequences the direct converter emits.

use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::PI;

use tangle_adapter_cirq::{CirqCircuit, CirqGate, CirqOperation, CirqQubit};
use tangle_adapter_quil::import_program;
use tangle_convert::cirq_to_quil;
use tangle_expr::ExpressionNode;
use tangle_ir::GateName;
use tangle_ir::matrices::numeric_matrix;

// Exponents covering the edge angles 0 and pi, a half turn, and an angle
// with no special structure.
const EXPONENTS: [f64; 4] = [0.0, 0.5, 1.0, 0.3776];

fn unitary_of(gate: CirqGate, qubits: usize) -> Array2<Complex64> {
    let mut circuit = CirqCircuit::new();
    circuit.append(CirqOperation {
        gate,
        qubits: (0..qubits as i64).map(|x| CirqQubit::Line { x }).collect(),
    });
    let program = cirq_to_quil(&circuit).unwrap();
    let imported = import_program(&program).unwrap();
    imported.to_unitary().unwrap()
}

fn assert_equal_up_to_phase(actual: &Array2<Complex64>, expected: &Array2<Complex64>) {
    assert_eq!(actual.dim(), expected.dim());
    let phase = actual
        .iter()
        .zip(expected.iter())
        .find(|(_, e)| e.norm() > 1e-9)
        .map(|(a, e)| a / e)
        .unwrap();
    assert!(
        (phase.norm() - 1.0).abs() < 1e-9,
        "entry ratio {phase} is not a phase"
    );
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!(
            (a - phase * e).norm() < 1e-9,
            "matrices differ beyond a global phase: {actual} vs {expected}"
        );
    }
}

#[test]
fn test_xx_sequence_matches_the_gate() {
    for e in EXPONENTS {
        let actual = unitary_of(
            CirqGate::XxPow {
                exponent: ExpressionNode::real(e),
            },
            2,
        );
        let expected = numeric_matrix(&GateName::Xx, &[e * PI]).unwrap();
        assert_equal_up_to_phase(&actual, &expected);
    }
}

#[test]
fn test_yy_sequence_matches_the_gate() {
    for e in EXPONENTS {
        let actual = unitary_of(
            CirqGate::YyPow {
                exponent: ExpressionNode::real(e),
            },
            2,
        );
        let expected = numeric_matrix(&GateName::Yy, &[e * PI]).unwrap();
        assert_equal_up_to_phase(&actual, &expected);
    }
}

#[test]
fn test_zz_sequence_matches_the_gate() {
    for e in EXPONENTS {
        let actual = unitary_of(
            CirqGate::ZzPow {
                exponent: ExpressionNode::real(e),
            },
            2,
        );
        let expected = numeric_matrix(&GateName::Zz, &[e * PI]).unwrap();
        assert_equal_up_to_phase(&actual, &expected);
    }
}

#[test]
fn test_phased_x_sequence_matches_zxz() {
    for e in EXPONENTS {
        let actual = unitary_of(
            CirqGate::PhasedXPow {
                phase_exponent: ExpressionNode::real(0.25),
                exponent: ExpressionNode::real(e),
            },
            1,
        );
        let expected = numeric_matrix(&GateName::Zxz, &[0.25 * PI, e * PI]).unwrap();
        assert_equal_up_to_phase(&actual, &expected);
    }
}

#[test]
fn test_h_power_sequence_matches_rh() {
    for e in EXPONENTS {
        let actual = unitary_of(
            CirqGate::HPow {
                exponent: ExpressionNode::real(e),
            },
            1,
        );
        let expected = numeric_matrix(&GateName::Rh, &[e * PI]).unwrap();
        assert_equal_up_to_phase(&actual, &expected);
    }
}
