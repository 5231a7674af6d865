//! One entry point for importing any supported native circuit.

use tangle_ir::{Circuit, IrResult};

use tangle_adapter_cirq::CirqCircuit;
use tangle_adapter_qiskit::QiskitCircuit;
use tangle_adapter_quil::Program;

/// A circuit in one of the supported frameworks' native forms.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCircuit {
    Quil(Program),
    Cirq(CirqCircuit),
    Qiskit(QiskitCircuit),
}

/// Import any native circuit into the canonical IR.
///
/// This match is the only place the source framework is inspected; from
/// here on everything works on [`Circuit`].
pub fn import(native: &NativeCircuit) -> IrResult<Circuit> {
    match native {
        NativeCircuit::Quil(program) => tangle_adapter_quil::import_program(program),
        NativeCircuit::Cirq(circuit) => tangle_adapter_cirq::import_circuit(circuit),
        NativeCircuit::Qiskit(circuit) => tangle_adapter_qiskit::import_circuit(circuit),
    }
}
