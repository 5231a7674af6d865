use thiserror::Error;

use tangle_expr::ExprError;

/// Errors raised by the IR and by the framework adapters.
///
/// Every variant is unrecoverable at the point it is raised; callers
/// propagate rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrError {
    /// A gate with no mapping or decomposition for the requested target.
    #[error("unsupported gate: {name}")]
    UnsupportedGate {
        /// The gate name as the source framework spells it.
        name: String,
    },

    /// Two native qubits of different kinds were compared during identity
    /// resolution (grid against line).
    #[error("cannot compare qubits of different kinds")]
    QubitTypeMismatch,

    /// Serialized gate data that is inconsistent with the catalog.
    #[error("malformed gate data: {reason}")]
    MalformedGateData {
        /// What was wrong with the data.
        reason: String,
    },

    /// An explicitly supplied target register is too small for the circuit.
    #[error("target register holds {available} qubits, circuit needs {required}")]
    RegisterCapacity {
        /// Qubits the circuit spans.
        required: usize,
        /// Qubits the caller supplied.
        available: usize,
    },

    /// Numeric evaluation reached a symbol with no binding.
    #[error("parameter is symbolic: {name}")]
    SymbolicParameter {
        /// The unbound symbol.
        name: String,
    },

    /// A serialized parameter string failed to re-parse.
    #[error(transparent)]
    Expr(#[from] ExprError),
}

/// Convenience alias used throughout the workspace.
pub type IrResult<T> = Result<T, IrError>;
