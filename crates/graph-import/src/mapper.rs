// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node mapping: one serialized node → one configured [`Operation`].
//!
//! Nodes are walked in serialized order, which is *not* guaranteed to be a
//! legal execution order — an input may name a node that has not been
//! mapped yet. Resolution therefore accepts any value already in the graph
//! plus any node that will still be mapped; the order validator repairs
//! the sequencing afterwards.

use crate::mapping::apply_mappings;
use crate::{ImportConfig, ImportError, ImportState, SerializedGraph, SerializedNode};
use dataflow_graph::{OpRegistry, Operation, Variable};

/// Maps serialized nodes onto internal operations.
pub(crate) struct NodeMapper;

impl NodeMapper {
    /// Maps every non-ignored node of the parsed graph, in serialized
    /// order.
    pub(crate) fn map_all(
        source: &SerializedGraph,
        state: &mut ImportState<'_>,
        registry: &OpRegistry,
        config: &ImportConfig,
    ) -> Result<(), ImportError> {
        for node in &source.nodes {
            if config.is_ignored(node) {
                tracing::debug!("skipping ignored node '{}' ({})", node.name, node.op_type);
                continue;
            }
            Self::map_node(node, state, registry)?;
        }
        tracing::debug!("mapped {} operations", state.graph.num_operations());
        Ok(())
    }

    /// Maps a single node:
    ///
    /// 1. Resolve the foreign op-type name through the registry.
    /// 2. Check every input reference resolves.
    /// 3. Apply the property-mapping table (consuming parameter inputs,
    ///    materializing injected edges).
    /// 4. Append the operation and ensure its output variable exists.
    pub(crate) fn map_node(
        node: &SerializedNode,
        state: &mut ImportState<'_>,
        registry: &OpRegistry,
    ) -> Result<(), ImportError> {
        let descriptor =
            registry
                .lookup(&node.op_type)
                .ok_or_else(|| ImportError::UnknownOpType {
                    op_type: node.op_type.clone(),
                })?;

        if state.graph.operation(&node.name).is_some() {
            return Err(ImportError::Graph(dataflow_graph::GraphError::InvalidGraph(
                format!("duplicate node name '{}'", node.name),
            )));
        }

        for input in &node.inputs {
            if !state.resolves(input) {
                return Err(ImportError::UnresolvedInput {
                    node: node.name.clone(),
                    input: input.clone(),
                });
            }
        }

        let props = apply_mappings(node, descriptor, state)?;

        let mut inputs: Vec<String> = node
            .inputs
            .iter()
            .enumerate()
            .filter(|(i, _)| !props.consumed_inputs.contains(i))
            .map(|(_, name)| name.clone())
            .collect();
        inputs.extend(props.injected_edges);

        let mut operation = Operation::new(&node.name, descriptor.op_type, inputs);
        operation.attrs = props.attrs;
        tracing::debug!("mapped {}", operation.summary());
        state.graph.add_operation(operation);

        // The output value may already have been classified from a tensor
        // entry (computed-with-known-shape); otherwise register it now.
        if state.graph.variable(&node.name).is_none() {
            state
                .graph
                .add_variable(Variable::computed(&node.name, None, None))?;
        }
        Ok(())
    }
}
