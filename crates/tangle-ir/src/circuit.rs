//! The canonical circuit: an ordered gate list over a qubit set.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::gate::Gate;
use crate::qubit::Qubit;

/// Which framework a circuit was imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameworkLabel {
    PyQuil,
    Cirq,
    Qiskit,
}

impl FrameworkLabel {
    /// Lower-case label used in serialized circuits.
    pub fn as_str(self) -> &'static str {
        match self {
            FrameworkLabel::PyQuil => "pyquil",
            FrameworkLabel::Cirq => "cirq",
            FrameworkLabel::Qiskit => "qiskit",
        }
    }

    /// Inverse of [`FrameworkLabel::as_str`].
    pub fn parse(label: &str) -> Option<FrameworkLabel> {
        match label {
            "pyquil" => Some(FrameworkLabel::PyQuil),
            "cirq" => Some(FrameworkLabel::Cirq),
            "qiskit" => Some(FrameworkLabel::Qiskit),
            _ => None,
        }
    }
}

/// Provenance metadata carried alongside a circuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitInfo {
    /// The source framework, when imported.
    pub label: Option<FrameworkLabel>,
}

/// An ordered sequence of gates over a fixed qubit set.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Circuit name; `"Unnamed"` unless the source framework provides one.
    pub name: String,
    /// Gates in application order.
    pub gates: Vec<Gate>,
    /// Qubits the circuit spans, in import order.
    pub qubits: Vec<Qubit>,
    /// Provenance metadata.
    pub info: CircuitInfo,
}

impl Default for Circuit {
    fn default() -> Self {
        Circuit {
            name: "Unnamed".to_string(),
            gates: Vec::new(),
            qubits: Vec::new(),
            info: CircuitInfo::default(),
        }
    }
}

impl Circuit {
    /// An empty circuit with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Circuit {
            name: name.into(),
            ..Circuit::default()
        }
    }

    /// A circuit over the qubits its gates touch, one canonical qubit per
    /// distinct index, ordered by index.
    pub fn from_gates(gates: Vec<Gate>) -> Self {
        let mut qubits: Vec<Qubit> = Vec::new();
        for gate in &gates {
            for qubit in &gate.qubits {
                if !qubits.iter().any(|q| q.same_index(qubit)) {
                    qubits.push(qubit.clone());
                }
            }
        }
        qubits.sort_by_key(|q| q.index);
        Circuit {
            gates,
            qubits,
            ..Circuit::default()
        }
    }

    /// Sorted canonical indices.
    pub fn qubit_indices(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self.qubits.iter().map(|q| q.index).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Number of gates acting on more than one qubit.
    pub fn n_multiqubit_gates(&self) -> usize {
        self.gates.iter().filter(|g| g.qubits.len() > 1).count()
    }

    /// Symbols appearing in gate parameters, in order of first appearance.
    pub fn symbolic_params(&self) -> Vec<String> {
        let mut out = Vec::new();
        for gate in &self.gates {
            for name in gate.symbolic_params() {
                if !out.iter().any(|n| *n == name) {
                    out.push(name);
                }
            }
        }
        out
    }

    /// A copy with symbols substituted in every gate.
    ///
    /// Bindings that name symbols absent from the circuit are applied
    /// anyway (they bind nothing); a warning is logged since that usually
    /// means a misspelled symbol on the caller's side.
    pub fn evaluate(&self, bindings: &FxHashMap<String, f64>) -> Circuit {
        let own = self.symbolic_params();
        let extra: Vec<&String> = bindings.keys().filter(|k| !own.contains(k)).collect();
        if !extra.is_empty() {
            warn!(
                circuit = %self.name,
                symbols_in_circuit = ?own,
                unknown_symbols = ?extra,
                "evaluating circuit with symbols it does not contain"
            );
        }
        Circuit {
            name: self.name.clone(),
            gates: self.gates.iter().map(|g| g.evaluate(bindings)).collect(),
            qubits: self.qubits.clone(),
            info: self.info.clone(),
        }
    }

    /// Wire-listing picture of the circuit in qpic input format.
    pub fn to_qpic(&self) -> String {
        let mut out = String::new();
        let mut wires: Vec<u32> = self.qubits.iter().map(|q| q.index).collect();
        wires.sort_unstable();
        for index in wires {
            out.push_str(&format!("w{index} W {index}\n"));
        }
        for gate in &self.gates {
            for qubit in &gate.qubits {
                out.push_str(&format!("w{} ", qubit.index));
            }
            out.push_str(gate.name.as_str());
            if !gate.params.is_empty() {
                let rendered: Vec<String> =
                    gate.params.iter().map(|p| p.to_string()).collect();
                out.push_str(&format!("({})", rendered.join(", ")));
            }
            out.push('\n');
        }
        out
    }
}

// Qubit sequences compare by string form, gates pairwise; provenance and
// the info block do not participate.
impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.qubits.len() == other.qubits.len()
            && self
                .qubits
                .iter()
                .zip(&other.qubits)
                .all(|(a, b)| a.to_string() == b.to_string())
            && self.gates == other.gates
    }
}

/// Concatenation: gate lists in order over the union of the qubit index
/// sets. The result is a fresh circuit with default name and no label.
impl std::ops::Add for Circuit {
    type Output = Circuit;

    fn add(self, other: Circuit) -> Circuit {
        let mut indices: Vec<u32> = self
            .qubits
            .iter()
            .chain(&other.qubits)
            .map(|q| q.index)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        let mut gates = self.gates;
        gates.extend(other.gates);
        Circuit {
            gates,
            qubits: indices.into_iter().map(Qubit::new).collect(),
            ..Circuit::default()
        }
    }
}
