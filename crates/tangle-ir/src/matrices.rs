//! Closed-form gate matrices.
//!
//! Numeric matrices cover every catalog gate with a unitary; symbolic
//! matrices (entries are expressions over the gate's formal parameters)
//! exist for the unique gates so exporters can inject matrix definitions.
//!
//! Rotations and the two-qubit XX/YY/ZZ family use the half-angle
//! convention: `RZ(theta) = diag(e^{-i theta/2}, e^{i theta/2})`, and
//! `XX(theta) = exp(-i theta/2 X(x)X)`, so `CNOT RZ(theta) CNOT` equals
//! `ZZ(theta)` exactly rather than up to phase.

use ndarray::{Array2, array};
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use tangle_expr::{ExpressionNode, Operation};

use crate::error::{IrError, IrResult};
use crate::gate::GateName;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn r(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

/// The numeric unitary for a catalog gate with fully-numeric parameters.
///
/// `MEASURE` and `BARRIER` have no unitary; custom gates carry their own
/// matrix and are not looked up here.
pub fn numeric_matrix(name: &GateName, params: &[f64]) -> IrResult<Array2<Complex64>> {
    let param = |i: usize| -> IrResult<f64> {
        params.get(i).copied().ok_or_else(|| IrError::MalformedGateData {
            reason: format!("{name} is missing parameter {i}"),
        })
    };
    let matrix = match name {
        GateName::I => array![[r(1.0), r(0.0)], [r(0.0), r(1.0)]],
        GateName::X => array![[r(0.0), r(1.0)], [r(1.0), r(0.0)]],
        GateName::Y => array![[r(0.0), c(0.0, -1.0)], [c(0.0, 1.0), r(0.0)]],
        GateName::Z => array![[r(1.0), r(0.0)], [r(0.0), r(-1.0)]],
        GateName::H => array![
            [r(FRAC_1_SQRT_2), r(FRAC_1_SQRT_2)],
            [r(FRAC_1_SQRT_2), r(-FRAC_1_SQRT_2)],
        ],
        GateName::S => array![[r(1.0), r(0.0)], [r(0.0), c(0.0, 1.0)]],
        GateName::T => array![
            [r(1.0), r(0.0)],
            [r(0.0), c(FRAC_PI_4.cos(), FRAC_PI_4.sin())],
        ],
        GateName::Cnot => array![
            [r(1.0), r(0.0), r(0.0), r(0.0)],
            [r(0.0), r(1.0), r(0.0), r(0.0)],
            [r(0.0), r(0.0), r(0.0), r(1.0)],
            [r(0.0), r(0.0), r(1.0), r(0.0)],
        ],
        GateName::Cz => array![
            [r(1.0), r(0.0), r(0.0), r(0.0)],
            [r(0.0), r(1.0), r(0.0), r(0.0)],
            [r(0.0), r(0.0), r(1.0), r(0.0)],
            [r(0.0), r(0.0), r(0.0), r(-1.0)],
        ],
        GateName::Swap => array![
            [r(1.0), r(0.0), r(0.0), r(0.0)],
            [r(0.0), r(0.0), r(1.0), r(0.0)],
            [r(0.0), r(1.0), r(0.0), r(0.0)],
            [r(0.0), r(0.0), r(0.0), r(1.0)],
        ],
        GateName::Cswap => {
            // Identity on the first-qubit-0 block, swap on |101> and |110>.
            let mut m = Array2::eye(8).mapv(|v: f64| r(v));
            m[[5, 5]] = r(0.0);
            m[[6, 6]] = r(0.0);
            m[[5, 6]] = r(1.0);
            m[[6, 5]] = r(1.0);
            m
        }
        GateName::Rx => {
            let half = param(0)? / 2.0;
            array![
                [r(half.cos()), c(0.0, -half.sin())],
                [c(0.0, -half.sin()), r(half.cos())],
            ]
        }
        GateName::Ry => {
            let half = param(0)? / 2.0;
            array![
                [r(half.cos()), r(-half.sin())],
                [r(half.sin()), r(half.cos())],
            ]
        }
        GateName::Rz => {
            let half = param(0)? / 2.0;
            array![
                [c(half.cos(), -half.sin()), r(0.0)],
                [r(0.0), c(half.cos(), half.sin())],
            ]
        }
        GateName::CPhase => {
            let angle = param(0)?;
            array![
                [r(1.0), r(0.0), r(0.0), r(0.0)],
                [r(0.0), r(1.0), r(0.0), r(0.0)],
                [r(0.0), r(0.0), r(1.0), r(0.0)],
                [r(0.0), r(0.0), r(0.0), c(angle.cos(), angle.sin())],
            ]
        }
        GateName::Xx => {
            let half = param(0)? / 2.0;
            let cos = r(half.cos());
            let sin = c(0.0, -half.sin());
            array![
                [cos, r(0.0), r(0.0), sin],
                [r(0.0), cos, sin, r(0.0)],
                [r(0.0), sin, cos, r(0.0)],
                [sin, r(0.0), r(0.0), cos],
            ]
        }
        GateName::Yy => {
            let half = param(0)? / 2.0;
            let cos = r(half.cos());
            let plus = c(0.0, half.sin());
            let minus = c(0.0, -half.sin());
            array![
                [cos, r(0.0), r(0.0), plus],
                [r(0.0), cos, minus, r(0.0)],
                [r(0.0), minus, cos, r(0.0)],
                [plus, r(0.0), r(0.0), cos],
            ]
        }
        GateName::Zz => {
            let half = param(0)? / 2.0;
            let lower = c(half.cos(), -half.sin());
            let raise = c(half.cos(), half.sin());
            array![
                [lower, r(0.0), r(0.0), r(0.0)],
                [r(0.0), raise, r(0.0), r(0.0)],
                [r(0.0), r(0.0), raise, r(0.0)],
                [r(0.0), r(0.0), r(0.0), lower],
            ]
        }
        GateName::Zxz => {
            let beta = param(0)?;
            let half = param(1)? / 2.0;
            let diag = r(half.cos());
            array![
                [
                    diag,
                    c(-beta.sin() * half.sin(), -beta.cos() * half.sin()),
                ],
                [
                    c(beta.sin() * half.sin(), -beta.cos() * half.sin()),
                    diag,
                ],
            ]
        }
        GateName::Rh => {
            let half = param(0)? / 2.0;
            let phase = c(half.cos(), half.sin());
            let off = c(0.0, -FRAC_1_SQRT_2 * half.sin());
            array![
                [phase * c(half.cos(), -FRAC_1_SQRT_2 * half.sin()), phase * off],
                [phase * off, phase * c(half.cos(), FRAC_1_SQRT_2 * half.sin())],
            ]
        }
        GateName::U1ex => {
            let alpha = param(0)?;
            let beta = param(1)?;
            array![
                [r(1.0), r(0.0), r(0.0), r(0.0)],
                [
                    r(0.0),
                    r(alpha.cos()),
                    c(beta.cos(), beta.sin()) * alpha.sin(),
                    r(0.0),
                ],
                [
                    r(0.0),
                    c(beta.cos(), -beta.sin()) * alpha.sin(),
                    r(-alpha.cos()),
                    r(0.0),
                ],
                [r(0.0), r(0.0), r(0.0), r(1.0)],
            ]
        }
        GateName::U2ex => {
            let twice = 2.0 * param(0)?;
            array![
                [r(1.0), r(0.0), r(0.0), r(0.0)],
                [r(0.0), r(twice.cos()), c(0.0, -twice.sin()), r(0.0)],
                [r(0.0), c(0.0, -twice.sin()), r(twice.cos()), r(0.0)],
                [r(0.0), r(0.0), r(0.0), r(1.0)],
            ]
        }
        GateName::Measure | GateName::Barrier | GateName::Custom(_) => {
            return Err(IrError::UnsupportedGate {
                name: name.as_str().to_string(),
            });
        }
    };
    Ok(matrix)
}

fn sym(name: &str) -> ExpressionNode {
    ExpressionNode::symbol(name)
}

fn half(name: &str) -> ExpressionNode {
    ExpressionNode::div(sym(name), ExpressionNode::real(2.0))
}

fn zero() -> ExpressionNode {
    ExpressionNode::real(0.0)
}

fn i_times(expr: ExpressionNode) -> ExpressionNode {
    ExpressionNode::imaginary_unit() * expr
}

fn mul(args: Vec<ExpressionNode>) -> ExpressionNode {
    ExpressionNode::call(Operation::Mul, args)
}

/// The symbolic matrix for a unique gate, with its formal parameter names.
///
/// Returns `None` for gates that never need a definition injected.
pub fn symbolic_definition(name: &GateName) -> Option<(Vec<&'static str>, Array2<ExpressionNode>)> {
    match name {
        GateName::Zxz => {
            // Rotation about an axis in the XY plane: gamma is the turn
            // angle, beta picks the axis.
            let diag = ExpressionNode::cos(half("gamma"));
            let phase = i_times(
                ExpressionNode::cos(sym("beta")) * ExpressionNode::sin(half("gamma")),
            );
            let swing = ExpressionNode::sin(sym("beta")) * ExpressionNode::sin(half("gamma"));
            let matrix = array![
                [diag.clone(), -swing.clone() - phase.clone()],
                [swing - phase, diag],
            ];
            Some((vec!["beta", "gamma"], matrix))
        }
        GateName::Rh => {
            let phase = ExpressionNode::cos(half("beta")) + i_times(ExpressionNode::sin(half("beta")));
            let lean = mul(vec![
                ExpressionNode::imaginary_unit(),
                ExpressionNode::real(FRAC_1_SQRT_2),
                ExpressionNode::sin(half("beta")),
            ]);
            let matrix = array![
                [
                    phase.clone() * (ExpressionNode::cos(half("beta")) - lean.clone()),
                    phase.clone() * -lean.clone(),
                ],
                [
                    phase.clone() * -lean.clone(),
                    phase * (ExpressionNode::cos(half("beta")) + lean),
                ],
            ];
            Some((vec!["beta"], matrix))
        }
        GateName::Xx => {
            let cos = ExpressionNode::cos(half("theta"));
            let sin = -i_times(ExpressionNode::sin(half("theta")));
            let matrix = array![
                [cos.clone(), zero(), zero(), sin.clone()],
                [zero(), cos.clone(), sin.clone(), zero()],
                [zero(), sin.clone(), cos.clone(), zero()],
                [sin, zero(), zero(), cos],
            ];
            Some((vec!["theta"], matrix))
        }
        GateName::Yy => {
            let cos = ExpressionNode::cos(half("theta"));
            let plus = i_times(ExpressionNode::sin(half("theta")));
            let minus = -i_times(ExpressionNode::sin(half("theta")));
            let matrix = array![
                [cos.clone(), zero(), zero(), plus.clone()],
                [zero(), cos.clone(), minus.clone(), zero()],
                [zero(), minus, cos.clone(), zero()],
                [plus, zero(), zero(), cos],
            ];
            Some((vec!["theta"], matrix))
        }
        GateName::Zz => {
            let lower = ExpressionNode::sub(
                ExpressionNode::cos(half("theta")),
                i_times(ExpressionNode::sin(half("theta"))),
            );
            let raise = ExpressionNode::cos(half("theta"))
                + i_times(ExpressionNode::sin(half("theta")));
            let matrix = array![
                [lower.clone(), zero(), zero(), zero()],
                [zero(), raise.clone(), zero(), zero()],
                [zero(), zero(), raise, zero()],
                [zero(), zero(), zero(), lower],
            ];
            Some((vec!["theta"], matrix))
        }
        GateName::U1ex => {
            let turn = ExpressionNode::cos(sym("alpha"));
            let forward = (ExpressionNode::cos(sym("beta")) + i_times(ExpressionNode::sin(sym("beta"))))
                * ExpressionNode::sin(sym("alpha"));
            let backward = ExpressionNode::sub(
                ExpressionNode::cos(sym("beta")),
                i_times(ExpressionNode::sin(sym("beta"))),
            ) * ExpressionNode::sin(sym("alpha"));
            let matrix = array![
                [ExpressionNode::real(1.0), zero(), zero(), zero()],
                [zero(), turn.clone(), forward, zero()],
                [zero(), backward, -turn, zero()],
                [zero(), zero(), zero(), ExpressionNode::real(1.0)],
            ];
            Some((vec!["alpha", "beta"], matrix))
        }
        GateName::U2ex => {
            let twice = ExpressionNode::real(2.0) * sym("alpha");
            let cos = ExpressionNode::cos(twice.clone());
            let sin = -i_times(ExpressionNode::sin(twice));
            let matrix = array![
                [ExpressionNode::real(1.0), zero(), zero(), zero()],
                [zero(), cos.clone(), sin.clone(), zero()],
                [zero(), sin, cos, zero()],
                [zero(), zero(), zero(), ExpressionNode::real(1.0)],
            ];
            Some((vec!["alpha"], matrix))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;
    use std::f64::consts::PI;

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn test_unitary_rows_are_orthonormal() {
        for (name, params) in [
            (GateName::H, vec![]),
            (GateName::T, vec![]),
            (GateName::Rx, vec![0.7]),
            (GateName::CPhase, vec![1.3]),
            (GateName::Xx, vec![2.1]),
            (GateName::Zxz, vec![0.4, 1.9]),
            (GateName::Rh, vec![0.9]),
            (GateName::U1ex, vec![0.3, 0.8]),
            (GateName::U2ex, vec![1.1]),
        ] {
            let m = numeric_matrix(&name, &params).unwrap();
            let dim = m.nrows();
            for i in 0..dim {
                for j in 0..dim {
                    let dot: Complex64 =
                        (0..dim).map(|k| m[[i, k]] * m[[j, k]].conj()).sum();
                    let expected = if i == j { r(1.0) } else { r(0.0) };
                    assert!(close(dot, expected), "{name} rows {i},{j}: {dot}");
                }
            }
        }
    }

    #[test]
    fn test_rotations_at_zero_are_identity() {
        for name in [GateName::Rx, GateName::Ry, GateName::Rz] {
            let m = numeric_matrix(&name, &[0.0]).unwrap();
            assert!(close(m[[0, 0]], r(1.0)) && close(m[[1, 1]], r(1.0)));
            assert!(close(m[[0, 1]], r(0.0)) && close(m[[1, 0]], r(0.0)));
        }
    }

    #[test]
    fn test_rx_at_pi_is_minus_i_x() {
        let m = numeric_matrix(&GateName::Rx, &[PI]).unwrap();
        assert!(close(m[[0, 1]], c(0.0, -1.0)));
        assert!(close(m[[0, 0]], r(0.0)));
    }

    #[test]
    fn test_measure_has_no_unitary() {
        assert!(matches!(
            numeric_matrix(&GateName::Measure, &[]),
            Err(IrError::UnsupportedGate { .. })
        ));
    }

    #[test]
    fn test_symbolic_matrix_matches_numeric() {
        let mut bindings = FxHashMap::default();
        bindings.insert("theta".to_string(), 1.234);
        bindings.insert("beta".to_string(), 0.567);
        bindings.insert("gamma".to_string(), 2.345);
        bindings.insert("alpha".to_string(), 0.891);

        for (name, params) in [
            (GateName::Xx, vec![1.234]),
            (GateName::Yy, vec![1.234]),
            (GateName::Zz, vec![1.234]),
            (GateName::Zxz, vec![0.567, 2.345]),
            (GateName::Rh, vec![0.567]),
            (GateName::U1ex, vec![0.891, 0.567]),
            (GateName::U2ex, vec![0.891]),
        ] {
            let numeric = numeric_matrix(&name, &params).unwrap();
            let (_, symbolic) = symbolic_definition(&name).unwrap();
            for (idx, entry) in symbolic.indexed_iter() {
                let value = entry
                    .substitute(&bindings)
                    .as_complex()
                    .unwrap_or_else(|| panic!("{name} entry {idx:?} did not fold"));
                assert!(
                    close(value, numeric[idx]),
                    "{name} entry {idx:?}: {value} vs {}",
                    numeric[idx]
                );
            }
        }
    }
}
