//! Cross-framework circuit conversion built on the Tangle IR.
//!
//! [`import`] brings any supported native circuit into the canonical form
//! through a single dispatch point; [`quil_to_cirq`] and [`cirq_to_quil`]
//! convert between the two instruction-level frameworks directly, without
//! passing through the IR. [`add_ancilla_register`] grows a canonical
//! circuit by identity-pinned ancilla qubits.

mod ancilla;
mod direct;
mod dispatch;

pub use ancilla::add_ancilla_register;
pub use direct::{cirq_to_quil, quil_to_cirq};
pub use dispatch::{NativeCircuit, import};
