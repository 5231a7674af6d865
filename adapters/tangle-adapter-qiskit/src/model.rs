//! Boundary object model for qiskit-style register circuits.

use ndarray::Array2;
use num_complex::Complex64;

use tangle_expr::ExpressionNode;

/// A sized, named register (quantum or classical).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QiskitRegister {
    pub name: String,
    pub size: u32,
}

/// A qubit as a slot in a quantum register. Equality is the native
/// operator: same register name, same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QiskitQubit {
    pub register: String,
    pub index: u32,
}

/// A classical bit as a slot in a classical register.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QiskitClbit {
    pub register: String,
    pub index: u32,
}

/// An instruction-set gate reference.
#[derive(Debug, Clone, PartialEq)]
pub struct QiskitGate {
    /// Lower-case instruction name (`"cx"`, `"rz"`, `"unitary"`, ...).
    pub name: String,
    /// Actual parameters.
    pub params: Vec<ExpressionNode>,
    /// Label identifying a matrix-defined gate.
    pub label: Option<String>,
    /// The unitary of a `"unitary"` instruction.
    pub matrix: Option<Array2<Complex64>>,
}

impl QiskitGate {
    /// A plain instruction-set gate.
    pub fn named(name: &str, params: Vec<ExpressionNode>) -> Self {
        QiskitGate {
            name: name.to_string(),
            params,
            label: None,
            matrix: None,
        }
    }
}

/// One circuit-data entry: a gate with its quantum and classical operands.
#[derive(Debug, Clone, PartialEq)]
pub struct QiskitInstruction {
    pub gate: QiskitGate,
    pub qubits: Vec<QiskitQubit>,
    pub clbits: Vec<QiskitClbit>,
}

/// A qiskit circuit: registers plus an ordered instruction list.
#[derive(Debug, Clone, PartialEq)]
pub struct QiskitCircuit {
    pub name: String,
    pub qregs: Vec<QiskitRegister>,
    pub cregs: Vec<QiskitRegister>,
    pub data: Vec<QiskitInstruction>,
}

impl QiskitCircuit {
    pub fn new(name: impl Into<String>) -> Self {
        QiskitCircuit {
            name: name.into(),
            qregs: Vec::new(),
            cregs: Vec::new(),
            data: Vec::new(),
        }
    }

    /// A qubit's absolute position across the circuit's quantum registers.
    pub fn absolute_position(&self, qubit: &QiskitQubit) -> Option<u32> {
        let mut offset = 0u32;
        for register in &self.qregs {
            if register.name == qubit.register {
                if qubit.index < register.size {
                    return Some(offset + qubit.index);
                }
                return None;
            }
            offset += register.size;
        }
        None
    }
}
