//! Canonical qubits and native-operand identity resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IrResult;

/// Where a canonical qubit came from, kept only so an export back to the
/// source framework can rebuild the original operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QubitProvenance {
    /// A two-dimensional grid position.
    Grid {
        /// Grid row.
        row: i64,
        /// Grid column.
        col: i64,
    },
    /// A one-dimensional line position.
    Line {
        /// Position on the line.
        x: i64,
    },
    /// A slot inside a named register.
    RegisterSlot {
        /// Register name.
        register: String,
        /// Position within the register.
        slot: u32,
    },
}

/// A canonical qubit. Identity is the index; provenance is carried along
/// for re-export and never participates in canonical equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// Canonical index.
    pub index: u32,
    /// Framework-native origin, if imported.
    pub provenance: Option<QubitProvenance>,
}

impl Qubit {
    /// A qubit with no provenance.
    pub fn new(index: u32) -> Self {
        Qubit {
            index,
            provenance: None,
        }
    }

    /// A qubit that remembers its native origin.
    pub fn with_provenance(index: u32, provenance: QubitProvenance) -> Self {
        Qubit {
            index,
            provenance: Some(provenance),
        }
    }

    /// Canonical identity comparison.
    pub fn same_index(&self, other: &Qubit) -> bool {
        self.index == other.index
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.index)
    }
}

/// Deduplicating resolver for native qubit operands.
///
/// Importers see the same native operand many times; the table hands back
/// the canonical [`Qubit`] created on first sight. The equality predicate
/// is fallible because some frameworks cannot compare qubits of different
/// kinds, and the constructor decides the canonical index from the native
/// operand.
pub struct QubitTable<N, S, M> {
    seen: Vec<(N, Qubit)>,
    same: S,
    make: M,
}

impl<N, S, M> QubitTable<N, S, M>
where
    N: Clone,
    S: FnMut(&N, &N) -> IrResult<bool>,
    M: FnMut(&N) -> IrResult<Qubit>,
{
    /// Empty table with the given equality predicate and constructor.
    pub fn new(same: S, make: M) -> Self {
        QubitTable {
            seen: Vec::new(),
            same,
            make,
        }
    }

    /// The canonical qubit for `native`, creating it on first sight.
    pub fn resolve(&mut self, native: &N) -> IrResult<Qubit> {
        for (seen, qubit) in &self.seen {
            if (self.same)(seen, native)? {
                return Ok(qubit.clone());
            }
        }
        let qubit = (self.make)(native)?;
        self.seen.push((native.clone(), qubit.clone()));
        Ok(qubit)
    }

    /// All canonical qubits in first-seen order.
    pub fn into_qubits(self) -> Vec<Qubit> {
        self.seen.into_iter().map(|(_, q)| q).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Qubit::new(3).to_string(), "q3");
    }

    #[test]
    fn test_same_index_ignores_provenance() {
        let plain = Qubit::new(2);
        let grid = Qubit::with_provenance(2, QubitProvenance::Grid { row: 2, col: 0 });
        assert!(plain.same_index(&grid));
    }

    #[test]
    fn test_table_dedups_repeated_operands() {
        let mut table = QubitTable::new(
            |a: &u64, b: &u64| Ok(a == b),
            |n: &u64| Ok(Qubit::new(*n as u32)),
        );
        let first = table.resolve(&7).unwrap();
        let second = table.resolve(&7).unwrap();
        assert_eq!(first, second);
        assert_eq!(table.resolve(&1).unwrap().index, 1);
        assert_eq!(table.into_qubits().len(), 2);
    }

    #[test]
    fn test_table_propagates_predicate_errors() {
        use crate::error::IrError;
        let mut table = QubitTable::new(
            |_: &u64, _: &u64| Err(IrError::QubitTypeMismatch),
            |n: &u64| Ok(Qubit::new(*n as u32)),
        );
        table.resolve(&0).unwrap();
        assert_eq!(table.resolve(&1).unwrap_err(), IrError::QubitTypeMismatch);
    }
}
