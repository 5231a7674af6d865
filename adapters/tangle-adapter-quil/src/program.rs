//! Boundary object model for Quil programs.
//!
//! This mirrors just enough of the external framework's program structure
//! to import and export circuits: instructions, gate definitions, and
//! classical memory declarations. It is not a Quil implementation.

use ndarray::Array2;
use std::fmt::Write as _;

use tangle_expr::ExpressionNode;

/// A Quil qubit, identified by a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuilQubit(pub u64);

/// A classical memory region declaration (always BIT-typed here).
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDeclaration {
    /// Region name.
    pub name: String,
    /// Number of bits.
    pub size: u32,
}

/// A reference into a declared memory region.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryReference {
    /// Region name.
    pub name: String,
    /// Offset within the region.
    pub offset: u32,
}

/// A matrix definition for a gate the instruction set lacks.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDefinition {
    /// Gate name.
    pub name: String,
    /// Formal parameter names, in order.
    pub parameters: Vec<String>,
    /// Unitary with entries over the formal parameters.
    pub matrix: Array2<ExpressionNode>,
}

/// A gate application.
#[derive(Debug, Clone, PartialEq)]
pub struct QuilGate {
    /// Instruction-set or defined-gate name.
    pub name: String,
    /// Actual parameters.
    pub params: Vec<ExpressionNode>,
    /// Operands, order-significant.
    pub qubits: Vec<QuilQubit>,
}

/// One program instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum QuilInstruction {
    /// Apply a gate.
    Gate(QuilGate),
    /// Measure a qubit into classical memory.
    Measure {
        /// The measured qubit.
        qubit: QuilQubit,
        /// Where the result lands.
        target: MemoryReference,
    },
}

/// A Quil program: declarations, gate definitions, instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// Gate definitions, in declaration order.
    pub gate_definitions: Vec<GateDefinition>,
    /// Memory declarations, in declaration order.
    pub declarations: Vec<MemoryDeclaration>,
    /// Instructions, in execution order.
    pub instructions: Vec<QuilInstruction>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Declare a BIT region, reusing an existing declaration of the same
    /// name. Returns a reference to its first slot.
    pub fn declare(&mut self, name: &str, size: u32) -> MemoryReference {
        if !self.declarations.iter().any(|d| d.name == name) {
            self.declarations.push(MemoryDeclaration {
                name: name.to_string(),
                size,
            });
        }
        MemoryReference {
            name: name.to_string(),
            offset: 0,
        }
    }

    /// The definition registered under `name`, if any.
    pub fn defined_gate(&self, name: &str) -> Option<&GateDefinition> {
        self.gate_definitions.iter().find(|d| d.name == name)
    }

    /// Register a gate definition unless one with the same name exists.
    pub fn define_gate(&mut self, definition: GateDefinition) {
        if self.defined_gate(&definition.name).is_none() {
            self.gate_definitions.push(definition);
        }
    }

    /// Append a gate application.
    pub fn push_gate(&mut self, gate: QuilGate) {
        self.instructions.push(QuilInstruction::Gate(gate));
    }

    /// The program in Quil instruction-language form.
    pub fn to_quil(&self) -> String {
        let mut out = String::new();
        for declaration in &self.declarations {
            let _ = writeln!(out, "DECLARE {} BIT[{}]", declaration.name, declaration.size);
        }
        for definition in self.gate_definitions.iter() {
            let header = if definition.parameters.is_empty() {
                format!("DEFGATE {}:", definition.name)
            } else {
                let formals: Vec<String> = definition
                    .parameters
                    .iter()
                    .map(|p| format!("%{p}"))
                    .collect();
                format!("DEFGATE {}({}):", definition.name, formals.join(", "))
            };
            let _ = writeln!(out, "{header}");
            for row in definition.matrix.rows() {
                let entries: Vec<String> = row
                    .iter()
                    .map(|e| prefix_formals(&e.to_string(), &definition.parameters))
                    .collect();
                let _ = writeln!(out, "    {}", entries.join(", "));
            }
        }
        for instruction in &self.instructions {
            match instruction {
                QuilInstruction::Gate(gate) => {
                    let mut line = gate.name.clone();
                    if !gate.params.is_empty() {
                        let params: Vec<String> =
                            gate.params.iter().map(|p| p.to_string()).collect();
                        let _ = write!(line, "({})", params.join(", "));
                    }
                    for qubit in &gate.qubits {
                        let _ = write!(line, " {}", qubit.0);
                    }
                    let _ = writeln!(out, "{line}");
                }
                QuilInstruction::Measure { qubit, target } => {
                    let _ = writeln!(out, "MEASURE {} {}[{}]", qubit.0, target.name, target.offset);
                }
            }
        }
        out
    }
}

// Quil spells formal parameters with a leading %; expression display does
// not, so definition entries get their formals rewritten token-wise.
fn prefix_formals(text: &str, formals: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for ch in text.chars().chain(std::iter::once(' ')) {
        if ch.is_alphanumeric() || ch == '_' {
            word.push(ch);
            continue;
        }
        if !word.is_empty() {
            if formals.iter().any(|f| *f == word) {
                out.push('%');
            }
            out.push_str(&word);
            word.clear();
        }
        out.push(ch);
    }
    out.pop();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_declare_is_idempotent() {
        let mut program = Program::new();
        program.declare("r0", 1);
        program.declare("r0", 1);
        assert_eq!(program.declarations.len(), 1);
    }

    #[test]
    fn test_define_gate_keeps_first_definition() {
        let mut program = Program::new();
        let definition = GateDefinition {
            name: "XX".to_string(),
            parameters: vec!["theta".to_string()],
            matrix: array![[ExpressionNode::real(1.0)]],
        };
        program.define_gate(definition.clone());
        program.define_gate(definition);
        assert_eq!(program.gate_definitions.len(), 1);
    }

    #[test]
    fn test_to_quil_renders_instructions() {
        let mut program = Program::new();
        program.push_gate(QuilGate {
            name: "H".to_string(),
            params: vec![],
            qubits: vec![QuilQubit(0)],
        });
        program.push_gate(QuilGate {
            name: "RZ".to_string(),
            params: vec![ExpressionNode::real(0.5)],
            qubits: vec![QuilQubit(1)],
        });
        let target = program.declare("r1", 1);
        program.instructions.push(QuilInstruction::Measure {
            qubit: QuilQubit(1),
            target,
        });
        assert_eq!(
            program.to_quil(),
            "DECLARE r1 BIT[1]\nH 0\nRZ(0.5) 1\nMEASURE 1 r1[0]\n"
        );
    }

    #[test]
    fn test_formals_get_percent_prefix() {
        assert_eq!(
            prefix_formals("cos(theta / 2)", &["theta".to_string()]),
            "cos(%theta / 2)"
        );
        assert_eq!(
            prefix_formals("beta + thetax", &["theta".to_string()]),
            "beta + thetax"
        );
    }
}
