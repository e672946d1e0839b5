// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operation instances and the internal operation palette.

use crate::AttrValue;
use std::collections::BTreeMap;

/// The closed set of internal operation kinds.
///
/// This enum is the dispatch key a downstream execution engine consumes.
/// Kernel semantics are out of scope here — the importer's job ends at
/// producing correctly configured, correctly ordered instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpType {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    MatMul,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
    Reshape,
    Transpose,
    Concat,
    ReduceSum,
    ReduceMean,
    Gather,
    Pad,
    Fill,
    Identity,
}

impl OpType {
    /// Returns a human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            OpType::Add => "add",
            OpType::Sub => "sub",
            OpType::Mul => "mul",
            OpType::Div => "div",
            OpType::Neg => "neg",
            OpType::MatMul => "matmul",
            OpType::Relu => "relu",
            OpType::Sigmoid => "sigmoid",
            OpType::Tanh => "tanh",
            OpType::Softmax => "softmax",
            OpType::Reshape => "reshape",
            OpType::Transpose => "transpose",
            OpType::Concat => "concat",
            OpType::ReduceSum => "reduce_sum",
            OpType::ReduceMean => "reduce_mean",
            OpType::Gather => "gather",
            OpType::Pad => "pad",
            OpType::Fill => "fill",
            OpType::Identity => "identity",
        }
    }
}

impl std::fmt::Display for OpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured operation instance in the graph.
///
/// The operation's name doubles as the name of the value it produces, so
/// downstream operations reference it the same way they reference a
/// variable. `inputs` holds graph edges only — a parameter the source
/// format encoded as an extra input tensor is consumed into `attrs` during
/// import and does not appear here.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Operation {
    /// Node name; also the output value's name.
    pub name: String,
    /// Internal operation kind.
    pub op_type: OpType,
    /// Names of input values (variables or earlier operations' outputs).
    pub inputs: Vec<String>,
    /// Configuration extracted from the foreign node. Ordered map so the
    /// imported graph is byte-stable across runs.
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Operation {
    /// Creates a new operation with no attributes.
    pub fn new(name: impl Into<String>, op_type: OpType, inputs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            op_type,
            inputs,
            attrs: BTreeMap::new(),
        }
    }

    /// Returns an attribute by field name.
    pub fn attr(&self, field: &str) -> Option<&AttrValue> {
        self.attrs.get(field)
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        format!(
            "{} = {}({})",
            self.name,
            self.op_type,
            self.inputs.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_operation() {
        let op = Operation::new("c", OpType::Add, vec!["a".into(), "b".into()]);
        assert_eq!(op.op_type, OpType::Add);
        assert_eq!(op.inputs, vec!["a", "b"]);
        assert!(op.attrs.is_empty());
    }

    #[test]
    fn test_attr_lookup() {
        let mut op = Operation::new("s", OpType::Softmax, vec!["x".into()]);
        op.attrs.insert("axis".into(), AttrValue::Int(-1));
        assert_eq!(op.attr("axis"), Some(&AttrValue::Int(-1)));
        assert_eq!(op.attr("missing"), None);
    }

    #[test]
    fn test_summary() {
        let op = Operation::new("c", OpType::MatMul, vec!["a".into(), "b".into()]);
        assert_eq!(op.summary(), "c = matmul(a, b)");
    }

    #[test]
    fn test_op_type_display() {
        assert_eq!(format!("{}", OpType::ReduceSum), "reduce_sum");
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut op = Operation::new("r", OpType::Reshape, vec!["x".into()]);
        op.attrs.insert("shape".into(), AttrValue::Ints(vec![2, 2]));
        let json = serde_json::to_string(&op).unwrap();
        let back: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, op.name);
        assert_eq!(back.op_type, op.op_type);
        assert_eq!(back.attrs, op.attrs);
    }
}
