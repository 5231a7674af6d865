//! Cirq moment-circuit boundary for the Tangle circuit IR.
//!
//! Owns a typed model of cirq-style circuits (moments, grid/line qubits,
//! power gates) plus the importer, exporter, decomposition helper, and a
//! text-diagram renderer. The core IR never sees these types outside this
//! crate.

mod decompose;
mod diagram;
mod export;
mod import;
mod model;

pub use decompose::decompose;
pub use diagram::text_diagram;
pub use export::export_circuit;
pub use import::{import_circuit, import_operations};
pub use model::{CirqCircuit, CirqGate, CirqOperation, CirqQubit, Moment};
