//! Qiskit register-circuit boundary for the Tangle circuit IR.
//!
//! Owns a typed model of qiskit-style circuits (named registers, circuit
//! data as gate/qubits/clbits triples) plus the importer and exporter. The
//! core IR never sees these types outside this crate.

mod export;
mod import;
mod model;

pub use export::export_circuit;
pub use import::import_circuit;
pub use model::{
    QiskitCircuit, QiskitClbit, QiskitGate, QiskitInstruction, QiskitQubit, QiskitRegister,
};
