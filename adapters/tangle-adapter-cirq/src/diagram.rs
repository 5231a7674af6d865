//! Line-oriented text diagrams for moment circuits.

use crate::model::{CirqCircuit, CirqGate, CirqQubit};

fn label(qubit: &CirqQubit) -> String {
    match qubit {
        CirqQubit::Grid { row, col } => format!("({row}, {col})"),
        CirqQubit::Line { x } => x.to_string(),
    }
}

// One symbol per operand, in operand order.
fn symbols(gate: &CirqGate) -> Vec<String> {
    match gate {
        CirqGate::I => vec!["I".into()],
        CirqGate::X => vec!["X".into()],
        CirqGate::Y => vec!["Y".into()],
        CirqGate::Z => vec!["Z".into()],
        CirqGate::H => vec!["H".into()],
        CirqGate::S => vec!["S".into()],
        CirqGate::T => vec!["T".into()],
        CirqGate::Cnot => vec!["@".into(), "X".into()],
        CirqGate::Cz => vec!["@".into(), "@".into()],
        CirqGate::Swap => vec!["x".into(), "x".into()],
        CirqGate::Controlled { sub_gate } => {
            let mut out = vec!["@".into()];
            out.extend(symbols(sub_gate));
            out
        }
        CirqGate::XPow { exponent } => vec![format!("X^{exponent}")],
        CirqGate::YPow { exponent } => vec![format!("Y^{exponent}")],
        CirqGate::ZPow { exponent } => vec![format!("Z^{exponent}")],
        CirqGate::HPow { exponent } => vec![format!("H^{exponent}")],
        CirqGate::CzPow { exponent } => vec!["@".into(), format!("@^{exponent}")],
        CirqGate::PhasedXPow {
            phase_exponent,
            exponent,
        } => vec![format!("PhX({phase_exponent})^{exponent}")],
        CirqGate::XxPow { exponent } => vec!["XX".into(), format!("XX^{exponent}")],
        CirqGate::YyPow { exponent } => vec!["YY".into(), format!("YY^{exponent}")],
        CirqGate::ZzPow { exponent } => vec!["ZZ".into(), format!("ZZ^{exponent}")],
        CirqGate::Measure { key } => vec![format!("M('{key}')")],
    }
}

fn pad_center(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    let left = (width.saturating_sub(len)) / 2;
    let right = width.saturating_sub(len) - left;
    let mut out = String::new();
    out.extend(std::iter::repeat(fill).take(left));
    out.push_str(text);
    out.extend(std::iter::repeat(fill).take(right));
    out
}

/// Render a wire diagram, one row per qubit and one column per moment.
/// With `transpose`, time runs downward and qubits become columns.
pub fn text_diagram(circuit: &CirqCircuit, transpose: bool) -> String {
    let wires = circuit.qubits();
    if wires.is_empty() {
        return String::new();
    }
    let row_of = |qubit: &CirqQubit| wires.iter().position(|w| w == qubit).unwrap_or(0);
    let n_wires = wires.len();
    let n_moments = circuit.moments.len();

    let mut cells = vec![vec![String::new(); n_moments]; n_wires];
    let mut spans: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n_moments];
    for (col, moment) in circuit.moments.iter().enumerate() {
        for op in &moment.operations {
            let rows: Vec<usize> = op.qubits.iter().map(|q| row_of(q)).collect();
            for (symbol, &row) in symbols(&op.gate).iter().zip(&rows) {
                cells[row][col] = symbol.clone();
            }
            if rows.len() > 1 {
                let lo = *rows.iter().min().unwrap_or(&0);
                let hi = *rows.iter().max().unwrap_or(&0);
                spans[col].push((lo, hi));
            }
        }
    }

    if transpose {
        render_transposed(&wires, &cells, &spans)
    } else {
        render(&wires, &cells, &spans)
    }
}

fn render(wires: &[CirqQubit], cells: &[Vec<String>], spans: &[Vec<(usize, usize)>]) -> String {
    let labels: Vec<String> = wires.iter().map(label).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let n_moments = spans.len();
    let widths: Vec<usize> = (0..n_moments)
        .map(|c| {
            cells
                .iter()
                .map(|row| row[c].chars().count())
                .max()
                .unwrap_or(0)
                .max(1)
        })
        .collect();

    let mut out = String::new();
    for (row, wire_label) in labels.iter().enumerate() {
        let mut line = format!("{wire_label:>label_width$}: ");
        for col in 0..n_moments {
            line.push_str("───");
            line.push_str(&pad_center(&cells[row][col], widths[col], '─'));
        }
        line.push_str("───");
        out.push_str(line.trim_end());
        out.push('\n');
        if row + 1 < labels.len() {
            let mut gap = " ".repeat(label_width + 2);
            for (col, width) in widths.iter().enumerate() {
                gap.push_str("   ");
                let connected = spans[col].iter().any(|&(lo, hi)| lo <= row && row + 1 <= hi);
                let mark = if connected { "│" } else { " " };
                gap.push_str(&pad_center(mark, *width, ' '));
            }
            let gap = gap.trim_end();
            if !gap.is_empty() {
                out.push_str(gap);
            }
            out.push('\n');
        }
    }
    out
}

fn render_transposed(
    wires: &[CirqQubit],
    cells: &[Vec<String>],
    spans: &[Vec<(usize, usize)>],
) -> String {
    let labels: Vec<String> = wires.iter().map(label).collect();
    let n_moments = cells.first().map(|row| row.len()).unwrap_or(0);
    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(w, l)| {
            (0..n_moments)
                .map(|c| cells[w][c].chars().count())
                .max()
                .unwrap_or(0)
                .max(l.chars().count())
        })
        .collect();

    let mut out = String::new();
    let mut header = String::new();
    for (w, l) in labels.iter().enumerate() {
        if w > 0 {
            header.push_str("   ");
        }
        header.push_str(&pad_center(l, widths[w], ' '));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for col in 0..n_moments {
        let mut line = String::new();
        for (w, width) in widths.iter().enumerate() {
            let joined = spans[col]
                .iter()
                .any(|&(lo, hi)| w > 0 && lo < w && w <= hi);
            if w > 0 {
                line.push_str(if joined { "───" } else { "   " });
            }
            let cell = &cells[w][col];
            if cell.is_empty() {
                line.push_str(&pad_center("│", *width, ' '));
            } else {
                line.push_str(&pad_center(cell, *width, if joined { '─' } else { ' ' }));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CirqOperation;

    fn line(x: i64) -> CirqQubit {
        CirqQubit::Line { x }
    }

    #[test]
    fn test_bell_pair_diagram() {
        let mut circuit = CirqCircuit::new();
        circuit.append(CirqOperation {
            gate: CirqGate::H,
            qubits: vec![line(0)],
        });
        circuit.append(CirqOperation {
            gate: CirqGate::Cnot,
            qubits: vec![line(0), line(1)],
        });
        let diagram = text_diagram(&circuit, false);
        assert_eq!(diagram, "0: ───H───@───\n          │\n1: ───────X───\n");
    }

    #[test]
    fn test_transposed_diagram_runs_downward() {
        let mut circuit = CirqCircuit::new();
        circuit.append(CirqOperation {
            gate: CirqGate::H,
            qubits: vec![line(0)],
        });
        circuit.append(CirqOperation {
            gate: CirqGate::X,
            qubits: vec![line(1)],
        });
        let diagram = text_diagram(&circuit, true);
        let lines: Vec<&str> = diagram.lines().collect();
        assert_eq!(lines[0].trim(), "0   1");
        assert!(lines[1].contains('H'));
        assert!(lines[1].contains('X'));
    }

    #[test]
    fn test_empty_circuit_renders_empty() {
        assert_eq!(text_diagram(&CirqCircuit::new(), false), "");
    }
}
