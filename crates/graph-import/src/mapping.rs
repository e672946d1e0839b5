// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Applies a foreign op type's declarative property-mapping table to one
//! serialized node.
//!
//! Each internal field is extracted from exactly one source: a named
//! attribute, a positional input tensor (consumed as data, not as a graph
//! edge), or a numbered attribute. A field with no extractable value and
//! no default aborts the import.

use crate::{ImportError, ImportState, SerializedNode};
use dataflow_graph::{AttrValue, OpDescriptor, PropertySource, Variable};
use std::collections::{BTreeMap, BTreeSet};

/// The result of running a node through its mapping table.
pub(crate) struct ExtractedProperties {
    /// Internal configuration fields.
    pub attrs: BTreeMap<String, AttrValue>,
    /// Positional inputs consumed as parameter data. These are dropped
    /// from the operation's edge list.
    pub consumed_inputs: BTreeSet<usize>,
    /// Names of synthetic constant variables created for `inject_as_edge`
    /// mappings, in table order. Appended to the operation's inputs.
    pub injected_edges: Vec<String>,
}

/// Runs the descriptor's table against `node`, materializing synthetic
/// constants into the graph as a side effect.
pub(crate) fn apply_mappings(
    node: &SerializedNode,
    descriptor: &OpDescriptor,
    state: &mut ImportState<'_>,
) -> Result<ExtractedProperties, ImportError> {
    let mut extracted = ExtractedProperties {
        attrs: BTreeMap::new(),
        consumed_inputs: BTreeSet::new(),
        injected_edges: Vec::new(),
    };

    for mapping in &descriptor.mappings {
        let value = match &mapping.source {
            PropertySource::Attribute(key) => node.attributes.get(*key).cloned(),
            PropertySource::PositionalAttribute(index) => node.positional.get(*index).cloned(),
            PropertySource::InputTensor(index) => {
                extract_from_input(node, *index, mapping.field, state, &mut extracted)?
            }
        };

        let Some(value) = value.or_else(|| mapping.default.clone()) else {
            return Err(ImportError::MissingPropertyMapping {
                node: node.name.clone(),
                field: mapping.field.to_string(),
            });
        };

        if mapping.inject_as_edge {
            inject_edge(node, mapping.field, &value, state, &mut extracted)?;
        } else {
            extracted.attrs.insert(mapping.field.to_string(), value);
        }
    }

    Ok(extracted)
}

/// Reads a positional input as parameter data. The input must already be a
/// constant variable; its tensor is flattened into an attribute value.
fn extract_from_input(
    node: &SerializedNode,
    index: usize,
    field: &str,
    state: &ImportState<'_>,
    extracted: &mut ExtractedProperties,
) -> Result<Option<AttrValue>, ImportError> {
    let Some(input_name) = node.inputs.get(index) else {
        // Out-of-range index: the mapping yields nothing; the caller
        // falls back to the default or fails MissingPropertyMapping.
        return Ok(None);
    };
    extracted.consumed_inputs.insert(index);

    let variable = state.graph.variable(input_name).ok_or_else(|| {
        ImportError::UnresolvedInput {
            node: node.name.clone(),
            input: input_name.clone(),
        }
    })?;
    let tensor = variable.value.as_ref().ok_or_else(|| ImportError::BadAttribute {
        node: node.name.clone(),
        field: field.to_string(),
        detail: format!("input '{input_name}' is not a constant"),
    })?;
    let value = AttrValue::from_tensor(tensor).ok_or_else(|| ImportError::BadAttribute {
        node: node.name.clone(),
        field: field.to_string(),
        detail: format!(
            "constant '{input_name}' ({}, rank {}) has no attribute form",
            tensor.dtype(),
            tensor.shape().rank()
        ),
    })?;
    Ok(Some(value))
}

/// Materializes `value` as a synthetic constant variable named
/// `"<node>/<field>"` and records it as an extra edge.
fn inject_edge(
    node: &SerializedNode,
    field: &str,
    value: &AttrValue,
    state: &mut ImportState<'_>,
    extracted: &mut ExtractedProperties,
) -> Result<(), ImportError> {
    let tensor = value.to_tensor().ok_or_else(|| ImportError::BadAttribute {
        node: node.name.clone(),
        field: field.to_string(),
        detail: format!("{} value has no tensor form", value.kind()),
    })?;
    let name = format!("{}/{field}", node.name);
    tracing::debug!("node '{}': materializing '{name}' as constant edge", node.name);
    state.graph.add_variable(Variable::constant(&name, tensor))?;
    extracted.injected_edges.push(name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImportConfig, SerializedGraph, SerializedTensor};
    use dataflow_graph::{OpRegistry, VarRole};

    fn i64_bytes(values: &[i64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Graph with two value tensors and one i64 constant `"target_shape"`.
    fn seeded_state<'a>(graph: &'a SerializedGraph, config: &ImportConfig) -> ImportState<'a> {
        let mut state = ImportState::new(graph, config);
        crate::VariableClassifier::classify_all(graph, &mut state, config).unwrap();
        state
    }

    fn reshape_fixture() -> SerializedGraph {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::value("x", "f32", Some(vec![4])));
        g.tensors.push(SerializedTensor::constant(
            "target_shape",
            "i64",
            vec![2],
            i64_bytes(&[2, 2]),
        ));
        g
    }

    #[test]
    fn test_input_tensor_consumed_as_attribute() {
        let g = reshape_fixture();
        let config = ImportConfig::default();
        let mut state = seeded_state(&g, &config);
        let registry = OpRegistry::builtin();
        let node = SerializedNode::new("y", "Reshape", &["x", "target_shape"]);

        let props =
            apply_mappings(&node, registry.lookup("Reshape").unwrap(), &mut state).unwrap();
        assert_eq!(props.attrs.get("shape"), Some(&AttrValue::Ints(vec![2, 2])));
        assert!(props.consumed_inputs.contains(&1));
        assert!(props.injected_edges.is_empty());
    }

    #[test]
    fn test_missing_positional_input_falls_to_missing_mapping() {
        let g = reshape_fixture();
        let config = ImportConfig::default();
        let mut state = seeded_state(&g, &config);
        let registry = OpRegistry::builtin();
        // Reshape wants input index 1, but only one input is present.
        let node = SerializedNode::new("y", "Reshape", &["x"]);

        let result = apply_mappings(&node, registry.lookup("Reshape").unwrap(), &mut state);
        assert!(matches!(
            result,
            Err(ImportError::MissingPropertyMapping { node, field })
                if node == "y" && field == "shape"
        ));
    }

    #[test]
    fn test_non_constant_parameter_input_rejected() {
        let g = reshape_fixture();
        let config = ImportConfig::default();
        let mut state = seeded_state(&g, &config);
        let registry = OpRegistry::builtin();
        // "x" is a computed value, not a constant: unusable as data.
        let node = SerializedNode::new("y", "Reshape", &["target_shape", "x"]);

        let result = apply_mappings(&node, registry.lookup("Reshape").unwrap(), &mut state);
        assert!(matches!(result, Err(ImportError::BadAttribute { .. })));
    }

    #[test]
    fn test_named_attribute_with_default() {
        let g = reshape_fixture();
        let config = ImportConfig::default();
        let mut state = seeded_state(&g, &config);
        let registry = OpRegistry::builtin();

        let explicit = SerializedNode::new("m1", "MatMul", &["x", "x"])
            .with_attr("transpose_b", AttrValue::Bool(true));
        let props =
            apply_mappings(&explicit, registry.lookup("MatMul").unwrap(), &mut state).unwrap();
        assert_eq!(props.attrs.get("transpose_a"), Some(&AttrValue::Bool(false)));
        assert_eq!(props.attrs.get("transpose_b"), Some(&AttrValue::Bool(true)));
    }

    #[test]
    fn test_inject_as_edge_creates_synthetic_constant() {
        let g = reshape_fixture();
        let config = ImportConfig::default();
        let mut state = seeded_state(&g, &config);
        let registry = OpRegistry::builtin();
        let node = SerializedNode::new("filled", "Fill", &["target_shape"])
            .with_positional(AttrValue::Float(1.5));

        let props =
            apply_mappings(&node, registry.lookup("Fill").unwrap(), &mut state).unwrap();
        assert_eq!(props.injected_edges, vec!["filled/value".to_string()]);
        let synthetic = state.graph.variable("filled/value").unwrap();
        assert_eq!(synthetic.role, VarRole::Constant);
        // Synthetic constants are not "imported" constants.
        assert!(!state.graph.imported_constants().contains("filled/value"));
    }

    #[test]
    fn test_positional_attribute_default() {
        let g = reshape_fixture();
        let config = ImportConfig::default();
        let mut state = seeded_state(&g, &config);
        let registry = OpRegistry::builtin();
        // No positional attribute supplied: Gather's axis defaults to 0.
        let node = SerializedNode::new("g0", "Gather", &["x", "target_shape"]);
        let props =
            apply_mappings(&node, registry.lookup("Gather").unwrap(), &mut state).unwrap();
        assert_eq!(props.attrs.get("axis"), Some(&AttrValue::Int(0)));
    }
}
