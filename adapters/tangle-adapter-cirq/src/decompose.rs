//! The framework's own decomposition of the phased power gates.

use rustc_hash::FxHashMap;

use tangle_expr::ExpressionNode;

use crate::model::{CirqGate, CirqOperation};

fn negated(exponent: &ExpressionNode) -> ExpressionNode {
    (-exponent.clone()).substitute(&FxHashMap::default())
}

/// Rewrite an operation as a sequence of simpler operations, in
/// application order. Returns `None` for operations with no decomposition.
///
/// `PhasedXPow(p, t)` is `Z^p X^t Z^-p` as a matrix product, so the
/// sequence runs `Z^-p`, `X^t`, `Z^p`. `HPow(t)` rotates about the
/// Hadamard axis: `Y^-0.25` tilts the axis onto X, `X^t` turns, `Y^0.25`
/// tilts back, giving the sequence `Y^0.25`, `X^t`, `Y^-0.25`.
pub fn decompose(op: &CirqOperation) -> Option<Vec<CirqOperation>> {
    let single = |gate: CirqGate| CirqOperation {
        gate,
        qubits: op.qubits.clone(),
    };
    match &op.gate {
        CirqGate::PhasedXPow {
            phase_exponent,
            exponent,
        } => Some(vec![
            single(CirqGate::ZPow {
                exponent: negated(phase_exponent),
            }),
            single(CirqGate::XPow {
                exponent: exponent.clone(),
            }),
            single(CirqGate::ZPow {
                exponent: phase_exponent.clone(),
            }),
        ]),
        CirqGate::HPow { exponent } => Some(vec![
            single(CirqGate::YPow {
                exponent: ExpressionNode::real(0.25),
            }),
            single(CirqGate::XPow {
                exponent: exponent.clone(),
            }),
            single(CirqGate::YPow {
                exponent: ExpressionNode::real(-0.25),
            }),
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CirqQubit;

    fn on_line(gate: CirqGate) -> CirqOperation {
        CirqOperation {
            gate,
            qubits: vec![CirqQubit::Line { x: 0 }],
        }
    }

    #[test]
    fn test_phased_x_decomposition_shape() {
        let op = on_line(CirqGate::PhasedXPow {
            phase_exponent: ExpressionNode::real(0.5),
            exponent: ExpressionNode::real(0.25),
        });
        let steps = decompose(&op).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps[0].gate,
            CirqGate::ZPow {
                exponent: ExpressionNode::real(-0.5)
            }
        );
        assert_eq!(
            steps[2].gate,
            CirqGate::ZPow {
                exponent: ExpressionNode::real(0.5)
            }
        );
    }

    #[test]
    fn test_plain_gates_do_not_decompose() {
        assert!(decompose(&on_line(CirqGate::H)).is_none());
    }
}
