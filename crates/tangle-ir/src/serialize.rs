//! Schema-tagged JSON serialization for circuits and circuit sets.
//!
//! Gates reference qubits by canonical index; deserialization reconnects
//! them against the circuit's qubit list. Parameters are JSON numbers when
//! closed, or display-form expression strings when symbolic and the caller
//! asked for serializable parameters.

use ndarray::Array2;
use num_complex::Complex64;
use serde_json::{Value, json};

use tangle_expr::ExpressionNode;

use crate::circuit::{Circuit, CircuitInfo, FrameworkLabel};
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateName};
use crate::qubit::{Qubit, QubitProvenance};

/// Version tag prefixed to every schema string.
pub const SCHEMA_VERSION: &str = "tangle-v1";

fn schema(kind: &str) -> String {
    format!("{SCHEMA_VERSION}-{kind}")
}

fn malformed(reason: impl Into<String>) -> IrError {
    IrError::MalformedGateData {
        reason: reason.into(),
    }
}

fn qubit_to_dict(qubit: &Qubit) -> Value {
    let mut dict = json!({
        "schema": schema("qubit"),
        "index": qubit.index,
    });
    if let Some(provenance) = &qubit.provenance {
        dict["provenance"] = serde_json::to_value(provenance).unwrap_or(Value::Null);
    }
    dict
}

fn qubit_from_dict(value: &Value) -> IrResult<Qubit> {
    let index = value
        .get("index")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("qubit dict is missing an integer index"))?;
    let provenance = match value.get("provenance") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            serde_json::from_value::<QubitProvenance>(v.clone())
                .map_err(|e| malformed(format!("bad qubit provenance: {e}")))?,
        ),
    };
    Ok(Qubit {
        index: index as u32,
        provenance,
    })
}

fn param_to_value(param: &ExpressionNode, serialize_gate_params: bool) -> IrResult<Value> {
    if let Some(v) = param.as_f64() {
        return Ok(json!(v));
    }
    if serialize_gate_params {
        Ok(Value::String(param.to_string()))
    } else {
        Err(malformed(format!(
            "parameter {param} is symbolic; serialize_gate_params is off"
        )))
    }
}

fn param_from_value(value: &Value) -> IrResult<ExpressionNode> {
    match value {
        Value::Number(n) => {
            let v = n
                .as_f64()
                .ok_or_else(|| malformed(format!("parameter {n} is not an f64")))?;
            Ok(ExpressionNode::real(v))
        }
        Value::String(text) => Ok(tangle_expr::parse(text)?),
        other => Err(malformed(format!("parameter {other} is neither number nor string"))),
    }
}

fn matrix_to_value(matrix: &Array2<Complex64>) -> Value {
    let rows: Vec<Value> = matrix
        .rows()
        .into_iter()
        .map(|row| Value::Array(row.iter().map(|e| json!([e.re, e.im])).collect()))
        .collect();
    Value::Array(rows)
}

fn matrix_from_value(value: &Value) -> IrResult<Array2<Complex64>> {
    let rows = value
        .as_array()
        .ok_or_else(|| malformed("matrix is not an array of rows"))?;
    let dim = rows.len();
    let mut out = Array2::zeros((dim, dim));
    for (i, row) in rows.iter().enumerate() {
        let entries = row
            .as_array()
            .filter(|r| r.len() == dim)
            .ok_or_else(|| malformed("matrix rows must all match the dimension"))?;
        for (j, entry) in entries.iter().enumerate() {
            let pair = entry
                .as_array()
                .filter(|p| p.len() == 2)
                .ok_or_else(|| malformed("matrix entries are [re, im] pairs"))?;
            let re = pair[0].as_f64().ok_or_else(|| malformed("matrix entry re"))?;
            let im = pair[1].as_f64().ok_or_else(|| malformed("matrix entry im"))?;
            out[[i, j]] = Complex64::new(re, im);
        }
    }
    Ok(out)
}

fn gate_to_dict(gate: &Gate, serialize_gate_params: bool) -> IrResult<Value> {
    let params = gate
        .params
        .iter()
        .map(|p| param_to_value(p, serialize_gate_params))
        .collect::<IrResult<Vec<_>>>()?;
    let mut dict = json!({
        "schema": schema("gate"),
        "name": gate.name.as_str(),
        "qubits": gate.qubits.iter().map(|q| q.index).collect::<Vec<_>>(),
        "params": params,
    });
    if let Some(matrix) = &gate.matrix {
        dict["matrix"] = matrix_to_value(matrix);
    }
    Ok(dict)
}

fn gate_from_dict(value: &Value, circuit_qubits: &[Qubit]) -> IrResult<Gate> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("gate dict is missing a name"))?;
    let name = GateName::parse(name);

    let index_list = value
        .get("qubits")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("gate dict is missing a qubit list"))?;
    let mut qubits = Vec::with_capacity(index_list.len());
    for index in index_list {
        let index = index
            .as_u64()
            .ok_or_else(|| malformed("gate qubit entries are integer indices"))?
            as u32;
        let qubit = circuit_qubits
            .iter()
            .find(|q| q.index == index)
            .ok_or_else(|| malformed(format!("gate references q{index}, not in the circuit")))?;
        qubits.push(qubit.clone());
    }

    let params = value
        .get("params")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(param_from_value).collect::<IrResult<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();

    match (&name, value.get("matrix")) {
        (GateName::Custom(custom), Some(matrix)) => {
            Gate::custom(custom.clone(), qubits, matrix_from_value(matrix)?)
        }
        (GateName::Custom(custom), None) => Err(malformed(format!(
            "custom gate {custom} has no matrix"
        ))),
        _ => Gate::with_params(name, qubits, params),
    }
}

/// Serialize a circuit to its schema-tagged dict.
pub fn to_dict(circuit: &Circuit, serialize_gate_params: bool) -> IrResult<Value> {
    let gates = circuit
        .gates
        .iter()
        .map(|g| gate_to_dict(g, serialize_gate_params))
        .collect::<IrResult<Vec<_>>>()?;
    Ok(json!({
        "schema": schema("circuit"),
        "name": circuit.name,
        "qubits": circuit.qubits.iter().map(qubit_to_dict).collect::<Vec<_>>(),
        "gates": gates,
        "info": {
            "label": circuit.info.label.map(FrameworkLabel::as_str),
        },
    }))
}

/// Rebuild a circuit from its dict form.
pub fn from_dict(value: &Value) -> IrResult<Circuit> {
    let tag = value.get("schema").and_then(Value::as_str).unwrap_or("");
    if tag != schema("circuit") {
        return Err(malformed(format!("expected a circuit dict, got schema {tag:?}")));
    }
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unnamed")
        .to_string();
    let qubits = value
        .get("qubits")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(qubit_from_dict).collect::<IrResult<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();
    let gates = value
        .get("gates")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .map(|g| gate_from_dict(g, &qubits))
                .collect::<IrResult<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();
    let label = value
        .pointer("/info/label")
        .and_then(Value::as_str)
        .and_then(FrameworkLabel::parse);
    Ok(Circuit {
        name,
        gates,
        qubits,
        info: CircuitInfo { label },
    })
}

/// Serialize a list of circuits as a circuit-set dict.
pub fn circuit_set_to_dict(circuits: &[Circuit], serialize_gate_params: bool) -> IrResult<Value> {
    let dicts = circuits
        .iter()
        .map(|c| to_dict(c, serialize_gate_params))
        .collect::<IrResult<Vec<_>>>()?;
    Ok(json!({
        "schema": schema("circuit_set"),
        "circuits": dicts,
    }))
}

/// Rebuild a list of circuits from a circuit-set dict.
pub fn circuit_set_from_dict(value: &Value) -> IrResult<Vec<Circuit>> {
    let tag = value.get("schema").and_then(Value::as_str).unwrap_or("");
    if tag != schema("circuit_set") {
        return Err(malformed(format!(
            "expected a circuit_set dict, got schema {tag:?}"
        )));
    }
    value
        .get("circuits")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("circuit_set dict is missing its circuit list"))?
        .iter()
        .map(from_dict)
        .collect()
}
