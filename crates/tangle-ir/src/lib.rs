//! Canonical quantum-circuit intermediate representation.
//!
//! A [`Circuit`] is an ordered list of [`Gate`]s over canonical [`Qubit`]s.
//! Gate parameters are expressions from `tangle-expr`, so circuits may stay
//! symbolic until [`Circuit::evaluate`] binds their symbols. Framework
//! adapters convert between this IR and their native object models; the
//! dict serialization in [`serialize`] is the framework-neutral exchange
//! format.

mod circuit;
mod error;
mod gate;
pub mod matrices;
mod qubit;
pub mod serialize;
mod unitary;

pub use circuit::{Circuit, CircuitInfo, FrameworkLabel};
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateCatalog, GateName};
pub use qubit::{Qubit, QubitProvenance, QubitTable};
pub use serialize::SCHEMA_VERSION;
