// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The computation graph: ordered variables and operations.
//!
//! Dependency edges are implicit: an operation's `inputs` reference
//! variables or other operations' outputs *by name*. The completion
//! invariant — every input of the operation at position `i` resolves to a
//! variable or to an operation at position `< i` — is what
//! [`ComputationGraph::verify_execution_order`] checks exhaustively.

use crate::{GraphError, Operation, VarRole, Variable};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// The framework-native computation graph produced by the importer.
#[derive(Debug, Clone, Default)]
pub struct ComputationGraph {
    name: String,
    variables: Vec<Variable>,
    var_index: HashMap<String, usize>,
    operations: Vec<Operation>,
    op_index: HashMap<String, usize>,
    /// Names of externally supplied constants (embedded in the source
    /// graph), as opposed to constants synthesized during import.
    imported_constants: BTreeSet<String>,
}

impl ComputationGraph {
    /// Creates an empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ── Variables ──────────────────────────────────────────────────

    /// Adds a variable, enforcing name uniqueness.
    pub fn add_variable(&mut self, variable: Variable) -> Result<(), GraphError> {
        if self.var_index.contains_key(&variable.name) {
            return Err(GraphError::DuplicateVariable {
                name: variable.name.clone(),
            });
        }
        self.var_index
            .insert(variable.name.clone(), self.variables.len());
        self.variables.push(variable);
        Ok(())
    }

    /// Returns a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.var_index.get(name).map(|&i| &self.variables[i])
    }

    /// Returns all variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Records `name` as an externally supplied constant.
    pub fn mark_imported_constant(&mut self, name: impl Into<String>) {
        self.imported_constants.insert(name.into());
    }

    /// Names of constants that were embedded in the source graph.
    pub fn imported_constants(&self) -> &BTreeSet<String> {
        &self.imported_constants
    }

    /// Placeholders whose shape never became concrete.
    pub fn unresolved_placeholders(&self) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|v| v.role == VarRole::Placeholder && v.shape_unresolved())
            .collect()
    }

    // ── Operations ─────────────────────────────────────────────────

    /// Appends an operation in build order.
    pub fn add_operation(&mut self, operation: Operation) {
        self.op_index
            .insert(operation.name.clone(), self.operations.len());
        self.operations.push(operation);
    }

    /// Returns an operation by name.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.op_index.get(name).map(|&i| &self.operations[i])
    }

    /// Returns all operations in their current order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the number of operations.
    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if `name` is a variable or an operation output.
    pub fn contains_value(&self, name: &str) -> bool {
        self.var_index.contains_key(name) || self.op_index.contains_key(name)
    }

    /// Replaces the operation order with the given permutation of current
    /// positions. Fails if `order` is not a permutation.
    pub fn reorder_operations(&mut self, order: Vec<usize>) -> Result<(), GraphError> {
        if order.len() != self.operations.len() {
            return Err(GraphError::InvalidGraph(format!(
                "reorder permutation has {} entries for {} operations",
                order.len(),
                self.operations.len()
            )));
        }
        let mut seen = vec![false; order.len()];
        for &i in &order {
            if i >= seen.len() || seen[i] {
                return Err(GraphError::InvalidGraph(
                    "reorder permutation is not a bijection".into(),
                ));
            }
            seen[i] = true;
        }
        let old = std::mem::take(&mut self.operations);
        let mut slots: Vec<Option<Operation>> = old.into_iter().map(Some).collect();
        // The bijection check above guarantees every slot is taken once.
        self.operations = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
        self.op_index = self
            .operations
            .iter()
            .enumerate()
            .map(|(i, op)| (op.name.clone(), i))
            .collect();
        Ok(())
    }

    /// Exhaustively checks the no-forward-reference invariant: every input
    /// of every operation resolves to a variable that is not the pending
    /// output of a later operation, or to an operation positioned strictly
    /// earlier.
    pub fn verify_execution_order(&self) -> Result<(), GraphError> {
        for (i, op) in self.operations.iter().enumerate() {
            for input in &op.inputs {
                if let Some(&producer) = self.op_index.get(input.as_str()) {
                    if producer >= i {
                        return Err(GraphError::InvalidGraph(format!(
                            "operation '{}' at position {i} reads '{input}' produced at position {producer}",
                            op.name
                        )));
                    }
                } else if !self.var_index.contains_key(input.as_str()) {
                    return Err(GraphError::UnknownVariable {
                        name: input.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns a summary string describing the graph.
    pub fn summary(&self) -> String {
        format!(
            "Graph '{}': {} variables ({} constants, {} placeholders), {} operations",
            self.name,
            self.num_variables(),
            self.variables
                .iter()
                .filter(|v| v.role == VarRole::Constant)
                .count(),
            self.variables
                .iter()
                .filter(|v| v.role == VarRole::Placeholder)
                .count(),
            self.num_operations(),
        )
    }
}

impl fmt::Display for ComputationGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for v in &self.variables {
            writeln!(f, "  var {}", v.summary())?;
        }
        for op in &self.operations {
            writeln!(f, "  op  {}", op.summary())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpType;
    use tensor_ir::{DType, Shape, Tensor};

    fn add_op(name: &str, inputs: &[&str]) -> Operation {
        Operation::new(
            name,
            OpType::Add,
            inputs.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn sample_graph() -> ComputationGraph {
        let mut g = ComputationGraph::new("test");
        g.add_variable(Variable::constant(
            "a",
            Tensor::from_f32(Shape::scalar(), &[1.0]).unwrap(),
        ))
        .unwrap();
        g.add_variable(Variable::placeholder("b", Some(DType::F32), None, None))
            .unwrap();
        g
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let mut g = sample_graph();
        let result = g.add_variable(Variable::computed("a", None, None));
        assert!(matches!(
            result,
            Err(GraphError::DuplicateVariable { name }) if name == "a"
        ));
    }

    #[test]
    fn test_contains_value() {
        let mut g = sample_graph();
        assert!(g.contains_value("a"));
        assert!(!g.contains_value("c"));
        g.add_operation(add_op("c", &["a", "b"]));
        assert!(g.contains_value("c"));
    }

    #[test]
    fn test_verify_order_ok() {
        let mut g = sample_graph();
        g.add_operation(add_op("c", &["a", "b"]));
        g.add_operation(add_op("d", &["c", "a"]));
        assert!(g.verify_execution_order().is_ok());
    }

    #[test]
    fn test_verify_order_forward_reference() {
        let mut g = sample_graph();
        g.add_operation(add_op("d", &["c", "a"]));
        g.add_operation(add_op("c", &["a", "b"]));
        assert!(g.verify_execution_order().is_err());
    }

    #[test]
    fn test_verify_order_unknown_input() {
        let mut g = sample_graph();
        g.add_operation(add_op("c", &["a", "ghost"]));
        assert!(matches!(
            g.verify_execution_order(),
            Err(GraphError::UnknownVariable { name }) if name == "ghost"
        ));
    }

    #[test]
    fn test_reorder_operations() {
        let mut g = sample_graph();
        g.add_operation(add_op("d", &["c", "a"]));
        g.add_operation(add_op("c", &["a", "b"]));
        g.reorder_operations(vec![1, 0]).unwrap();
        assert_eq!(g.operations()[0].name, "c");
        assert!(g.verify_execution_order().is_ok());
    }

    #[test]
    fn test_reorder_rejects_non_permutation() {
        let mut g = sample_graph();
        g.add_operation(add_op("c", &["a", "b"]));
        assert!(g.reorder_operations(vec![0, 0]).is_err());
        assert!(g.reorder_operations(vec![]).is_err());
    }

    #[test]
    fn test_unresolved_placeholders() {
        let g = sample_graph();
        let unresolved = g.unresolved_placeholders();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].name, "b");
    }

    #[test]
    fn test_imported_constant_set() {
        let mut g = sample_graph();
        g.mark_imported_constant("a");
        assert!(g.imported_constants().contains("a"));
        assert!(!g.imported_constants().contains("b"));
    }

    #[test]
    fn test_summary() {
        let mut g = sample_graph();
        g.add_operation(add_op("c", &["a", "b"]));
        let s = g.summary();
        assert!(s.contains("2 variables"));
        assert!(s.contains("1 operations"));
        assert!(s.contains("1 constants"));
    }
}
