// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution-order validation and repair.
//!
//! Node mapping appends operations in serialized order, which may contain
//! forward references. This pass computes a topological order over the
//! operation dependency DAG (variables are always-available sources) and
//! relocates out-of-order operations after their dependencies. Ties among
//! mutually independent operations break by original insertion order, so
//! the same input bytes always produce the same operation sequence.

use crate::{ImportError, ImportState};
use dataflow_graph::ComputationGraph;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Post-pass that guarantees the no-forward-reference invariant.
pub(crate) struct OrderValidator;

impl OrderValidator {
    /// Consumes the import state and returns the finished graph in a legal
    /// execution order, or [`ImportError::CyclicDependency`] if none
    /// exists.
    pub(crate) fn finalize(state: ImportState<'_>) -> Result<ComputationGraph, ImportError> {
        let mut graph = state.graph;
        let order = Self::topological_order(&graph)?;
        graph.reorder_operations(order)?;

        for placeholder in graph.unresolved_placeholders() {
            // Reported, not fatal: the shape may become concrete once the
            // caller binds actual input values.
            tracing::warn!(
                "placeholder '{}' has no concrete shape (declared: {:?})",
                placeholder.name,
                placeholder.declared_shape,
            );
        }

        tracing::debug!("finalized {}", graph.summary());
        Ok(graph)
    }

    /// Kahn's algorithm with a min-heap of insertion indices.
    fn topological_order(graph: &ComputationGraph) -> Result<Vec<usize>, ImportError> {
        let ops = graph.operations();
        let producer: HashMap<&str, usize> = ops
            .iter()
            .enumerate()
            .map(|(i, op)| (op.name.as_str(), i))
            .collect();

        let mut indegree = vec![0usize; ops.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); ops.len()];
        for (i, op) in ops.iter().enumerate() {
            for input in &op.inputs {
                // Inputs not produced by an operation are variables and
                // never block. A self-reference stays in the edge set and
                // is reported as a cycle below.
                if let Some(&p) = producer.get(input.as_str()) {
                    dependents[p].push(i);
                    indegree[i] += 1;
                }
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = indegree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(ops.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for &d in &dependents[i] {
                indegree[d] -= 1;
                if indegree[d] == 0 {
                    ready.push(Reverse(d));
                }
            }
        }

        if order.len() != ops.len() {
            let mut trapped: Vec<String> = indegree
                .iter()
                .enumerate()
                .filter(|(_, &d)| d > 0)
                .map(|(i, _)| ops[i].name.clone())
                .collect();
            trapped.sort();
            return Err(ImportError::CyclicDependency { nodes: trapped });
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImportConfig, SerializedGraph, SerializedNode, SerializedTensor};

    fn finalize_graph(source: &SerializedGraph) -> Result<ComputationGraph, ImportError> {
        let config = ImportConfig::default();
        let registry = dataflow_graph::OpRegistry::builtin();
        let mut state = ImportState::new(source, &config);
        crate::VariableClassifier::classify_all(source, &mut state, &config)?;
        crate::NodeMapper::map_all(source, &mut state, &registry, &config)?;
        OrderValidator::finalize(state)
    }

    fn inputs_graph() -> SerializedGraph {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::input("a", "f32", Some(vec![2])));
        g.tensors.push(SerializedTensor::input("b", "f32", Some(vec![2])));
        g
    }

    #[test]
    fn test_in_order_graph_keeps_insertion_order() {
        let mut g = inputs_graph();
        g.nodes.push(SerializedNode::new("c", "Add", &["a", "b"]));
        g.nodes.push(SerializedNode::new("d", "Relu", &["c"]));
        g.nodes.push(SerializedNode::new("e", "Neg", &["a"]));
        let graph = finalize_graph(&g).unwrap();
        let names: Vec<_> = graph.operations().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["c", "d", "e"]);
        graph.verify_execution_order().unwrap();
    }

    #[test]
    fn test_out_of_order_graph_is_repaired() {
        let mut g = inputs_graph();
        g.nodes.push(SerializedNode::new("d", "Relu", &["c"]));
        g.nodes.push(SerializedNode::new("e", "Neg", &["d"]));
        g.nodes.push(SerializedNode::new("c", "Add", &["a", "b"]));
        let graph = finalize_graph(&g).unwrap();
        let names: Vec<_> = graph.operations().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["c", "d", "e"]);
        graph.verify_execution_order().unwrap();
    }

    #[test]
    fn test_independent_ties_break_by_insertion_order() {
        let mut g = inputs_graph();
        g.nodes.push(SerializedNode::new("n3", "Neg", &["b"]));
        g.nodes.push(SerializedNode::new("n1", "Neg", &["a"]));
        g.nodes.push(SerializedNode::new("n2", "Neg", &["a"]));
        let graph = finalize_graph(&g).unwrap();
        let names: Vec<_> = graph.operations().iter().map(|o| o.name.as_str()).collect();
        // All independent: serialized order wins.
        assert_eq!(names, ["n3", "n1", "n2"]);
    }

    #[test]
    fn test_mutual_cycle_detected() {
        let mut g = inputs_graph();
        g.nodes.push(SerializedNode::new("p", "Relu", &["q"]));
        g.nodes.push(SerializedNode::new("q", "Relu", &["p"]));
        let result = finalize_graph(&g);
        match result {
            Err(ImportError::CyclicDependency { nodes }) => {
                assert_eq!(nodes, vec!["p".to_string(), "q".to_string()]);
            }
            other => panic!("expected CyclicDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut g = inputs_graph();
        g.nodes.push(SerializedNode::new("loop", "Relu", &["loop"]));
        assert!(matches!(
            finalize_graph(&g),
            Err(ImportError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_unresolved_placeholder_is_not_fatal() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::input("x", "f32", None));
        g.nodes.push(SerializedNode::new("y", "Relu", &["x"]));
        let graph = finalize_graph(&g).unwrap();
        assert_eq!(graph.unresolved_placeholders().len(), 1);
    }
}
