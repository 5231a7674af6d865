//! Numeric unitary of a whole circuit.

use ndarray::Array2;
use num_complex::Complex64;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateName};
use crate::matrices::numeric_matrix;

/// The unitary a gate applies to the full state space.
///
/// Qubit positions index from the most significant bit, matching the
/// tensor-product order of the per-gate matrices.
fn embed(
    gate_matrix: &Array2<Complex64>,
    positions: &[usize],
    n_qubits: usize,
) -> Array2<Complex64> {
    let dim = 1usize << n_qubits;
    let k = positions.len();
    let bit = |state: usize, position: usize| (state >> (n_qubits - 1 - position)) & 1;
    let mut full = Array2::zeros((dim, dim));
    for col in 0..dim {
        let mut gate_col = 0usize;
        for &p in positions {
            gate_col = (gate_col << 1) | bit(col, p);
        }
        for gate_row in 0..(1usize << k) {
            let amp = gate_matrix[[gate_row, gate_col]];
            if amp == Complex64::new(0.0, 0.0) {
                continue;
            }
            let mut row = col;
            for (j, &p) in positions.iter().enumerate() {
                let shift = n_qubits - 1 - p;
                let wanted = (gate_row >> (k - 1 - j)) & 1;
                row = (row & !(1 << shift)) | (wanted << shift);
            }
            full[[row, col]] += amp;
        }
    }
    full
}

fn gate_unitary(gate: &Gate) -> IrResult<Array2<Complex64>> {
    if let Some(matrix) = &gate.matrix {
        return Ok(matrix.clone());
    }
    let mut params = Vec::with_capacity(gate.params.len());
    for param in &gate.params {
        match param.as_f64() {
            Some(v) => params.push(v),
            None => {
                let name = param
                    .symbols()
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| param.to_string());
                return Err(IrError::SymbolicParameter { name });
            }
        }
    }
    numeric_matrix(&gate.name, &params)
}

impl Circuit {
    /// The unitary of the full gate sequence.
    ///
    /// Barriers contribute nothing; a measurement has no unitary and is an
    /// error, as is any gate with an unbound symbolic parameter.
    pub fn to_unitary(&self) -> IrResult<Array2<Complex64>> {
        let indices = self.qubit_indices();
        let n_qubits = indices.len();
        let dim = 1usize << n_qubits;
        let position = |index: u32| -> IrResult<usize> {
            indices
                .iter()
                .position(|&i| i == index)
                .ok_or_else(|| IrError::MalformedGateData {
                    reason: format!("gate qubit q{index} is not in the circuit"),
                })
        };

        let mut total = Array2::eye(dim);
        for gate in &self.gates {
            if gate.name == GateName::Barrier {
                continue;
            }
            let matrix = gate_unitary(gate)?;
            let mut positions = Vec::with_capacity(gate.qubits.len());
            for qubit in &gate.qubits {
                positions.push(position(qubit.index)?);
            }
            total = embed(&matrix, &positions, n_qubits).dot(&total);
        }
        Ok(total)
    }
}
