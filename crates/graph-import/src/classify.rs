// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Variable classification: one serialized tensor entry → one [`Variable`].
//!
//! Foreign formats conflate "tensor with unknown shape" and "placeholder
//! input". The classifier never infers placeholder-ness from a missing
//! shape: only the explicit declared-input-without-default flag produces a
//! placeholder, everything else is computed. The role is decided exactly
//! once per entry — there is no set-then-correct flag sequence to race on.

use crate::{ImportConfig, ImportError, ImportState, SerializedGraph, SerializedTensor};
use dataflow_graph::Variable;
use tensor_ir::{DType, Shape, Tensor};

/// Classifies every tensor entry of the parsed graph into the import state.
pub(crate) struct VariableClassifier;

impl VariableClassifier {
    /// Creates one variable per tensor entry, in serialized order.
    pub(crate) fn classify_all(
        source: &SerializedGraph,
        state: &mut ImportState<'_>,
        config: &ImportConfig,
    ) -> Result<(), ImportError> {
        for tensor in &source.tensors {
            Self::classify(tensor, state, config)?;
        }
        tracing::debug!(
            "classified {} tensor entries ({} constants)",
            source.tensors.len(),
            state.graph.imported_constants().len(),
        );
        Ok(())
    }

    /// Classifies a single entry. Decision policy, evaluated in order:
    ///
    /// 1. Unresolvable dtype tag (and not allowlisted): unresolved shape.
    /// 2. Embedded data materializes: constant, recorded in the imported
    ///    constant set.
    /// 3. No concrete shape: unresolved shape.
    /// 4. Concrete shape, no data: computed/placeholder with that shape.
    ///
    /// In branches 1, 3 and 4 the role is placeholder only for a declared
    /// input without a default value; placeholders keep the originally
    /// declared (possibly degenerate) shape for later validation.
    fn classify(
        tensor: &SerializedTensor,
        state: &mut ImportState<'_>,
        config: &ImportConfig,
    ) -> Result<(), ImportError> {
        let dtype = DType::from_tag(&tensor.dtype);
        let concrete = concrete_shape(tensor.shape.as_deref());

        let variable = if dtype.is_none() && !config.allows_unknown_dtype(&tensor.name) {
            tracing::debug!(
                "tensor '{}': unresolvable dtype tag '{}'",
                tensor.name,
                tensor.dtype
            );
            Self::role_for(tensor, None, None)
        } else if let Some(value) = Self::materialize(tensor, dtype)? {
            let variable = Variable::constant(&tensor.name, value);
            state.graph.add_variable(variable)?;
            state.graph.mark_imported_constant(&tensor.name);
            return Ok(());
        } else if concrete.is_none() {
            Self::role_for(tensor, dtype, None)
        } else {
            Self::role_for(tensor, dtype, concrete)
        };

        state.graph.add_variable(variable)?;
        Ok(())
    }

    /// The single placeholder-vs-computed decision.
    fn role_for(tensor: &SerializedTensor, dtype: Option<DType>, shape: Option<Shape>) -> Variable {
        if tensor.is_declared_input() {
            Variable::placeholder(&tensor.name, dtype, shape, tensor.shape.clone())
        } else {
            Variable::computed(&tensor.name, dtype, shape)
        }
    }

    /// Materializes the embedded constant data, if any.
    ///
    /// Returns `Ok(None)` when there is no embedded data or the dtype is
    /// unresolvable (an allowlisted unknown-dtype entry falls through to
    /// the shape branches). Embedded data that contradicts its declared
    /// shape/dtype is an error, not a silent skip.
    fn materialize(
        tensor: &SerializedTensor,
        dtype: Option<DType>,
    ) -> Result<Option<Tensor>, ImportError> {
        let (Some(data), Some(dtype)) = (tensor.data.as_ref(), dtype) else {
            return Ok(None);
        };
        let Some(shape) = concrete_shape(tensor.shape.as_deref()) else {
            return Err(ImportError::InvalidTensor {
                name: tensor.name.clone(),
                detail: "embedded data without a concrete shape".into(),
            });
        };
        Tensor::from_bytes(shape, dtype, data.clone()).map(Some).map_err(|e| {
            ImportError::InvalidTensor {
                name: tensor.name.clone(),
                detail: e.to_string(),
            }
        })
    }
}

/// Converts a declared shape into a concrete one.
///
/// Any negative dimension (unknown at export time) makes the whole shape
/// unresolved; the raw declaration survives on placeholder variables.
fn concrete_shape(declared: Option<&[i64]>) -> Option<Shape> {
    let dims = declared?;
    dims.iter()
        .map(|&d| usize::try_from(d).ok())
        .collect::<Option<Vec<usize>>>()
        .map(Shape::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SerializedGraph;
    use dataflow_graph::VarRole;

    fn classify<'a>(graph: &'a SerializedGraph, config: &ImportConfig) -> ImportState<'a> {
        let mut state = ImportState::new(graph, config);
        VariableClassifier::classify_all(graph, &mut state, config).unwrap();
        state
    }

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_no_data_no_input_flag_is_computed() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::value("a", "f32", Some(vec![2, 2])));
        g.tensors.push(SerializedTensor::value("b", "f32", None));
        g.tensors.push(SerializedTensor::value("c", "weird_type", None));
        let state = classify(&g, &ImportConfig::default());
        for name in ["a", "b", "c"] {
            assert_eq!(
                state.graph.variable(name).unwrap().role,
                VarRole::Computed,
                "{name} should be computed, never spuriously placeholder"
            );
        }
    }

    #[test]
    fn test_embedded_data_becomes_constant_byte_for_byte() {
        let data = f32_bytes(&[1.0, 2.0, 3.0, 4.0]);
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::constant(
            "w",
            "f32",
            vec![2, 2],
            data.clone(),
        ));
        let state = classify(&g, &ImportConfig::default());
        let var = state.graph.variable("w").unwrap();
        assert_eq!(var.role, VarRole::Constant);
        assert_eq!(var.value.as_ref().unwrap().bytes(), &data[..]);
        assert!(state.graph.imported_constants().contains("w"));
    }

    #[test]
    fn test_declared_input_is_placeholder_with_recorded_shape() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::input(
            "x",
            "f32",
            Some(vec![-1, 8]),
        ));
        let state = classify(&g, &ImportConfig::default());
        let var = state.graph.variable("x").unwrap();
        assert_eq!(var.role, VarRole::Placeholder);
        // -1 dim → shape unresolved, but the declaration is kept verbatim.
        assert!(var.shape_unresolved());
        assert_eq!(var.declared_shape, Some(vec![-1, 8]));
    }

    #[test]
    fn test_input_with_default_value_is_constant() {
        let mut tensor =
            SerializedTensor::input("x", "f32", Some(vec![1]));
        tensor.data = Some(f32_bytes(&[7.0]));
        let mut g = SerializedGraph::new("g");
        g.tensors.push(tensor);
        let state = classify(&g, &ImportConfig::default());
        assert_eq!(state.graph.variable("x").unwrap().role, VarRole::Constant);
    }

    #[test]
    fn test_unknown_dtype_input_is_placeholder_without_shape() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::input(
            "x",
            "resource",
            Some(vec![4]),
        ));
        let state = classify(&g, &ImportConfig::default());
        let var = state.graph.variable("x").unwrap();
        assert_eq!(var.role, VarRole::Placeholder);
        assert!(var.shape_unresolved());
        assert_eq!(var.declared_shape, Some(vec![4]));
        assert_eq!(var.dtype, None);
    }

    #[test]
    fn test_unknown_dtype_allowlist_keeps_shape() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::value(
            "legacy_table",
            "resource",
            Some(vec![4]),
        ));
        let mut config = ImportConfig::default();
        config.unknown_dtype_allowlist.insert("legacy_table".into());
        let state = classify(&g, &config);
        let var = state.graph.variable("legacy_table").unwrap();
        assert_eq!(var.role, VarRole::Computed);
        assert_eq!(var.shape, Some(Shape::vector(4)));
    }

    #[test]
    fn test_concrete_shape_with_known_dims() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::value("y", "i64", Some(vec![3])));
        let state = classify(&g, &ImportConfig::default());
        let var = state.graph.variable("y").unwrap();
        assert_eq!(var.shape, Some(Shape::vector(3)));
        assert_eq!(var.dtype, Some(DType::I64));
    }

    #[test]
    fn test_data_with_wrong_byte_count_fails() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::constant(
            "w",
            "f32",
            vec![4],
            vec![0u8; 3],
        ));
        let config = ImportConfig::default();
        let mut state = ImportState::new(&g, &config);
        let result = VariableClassifier::classify_all(&g, &mut state, &config);
        assert!(matches!(
            result,
            Err(ImportError::InvalidTensor { name, .. }) if name == "w"
        ));
    }

    #[test]
    fn test_overflowing_declared_shape_is_invalid_tensor() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::constant(
            "huge",
            "f32",
            vec![i64::MAX / 2, 3],
            vec![0u8; 4],
        ));
        let config = ImportConfig::default();
        let mut state = ImportState::new(&g, &config);
        let result = VariableClassifier::classify_all(&g, &mut state, &config);
        assert!(matches!(
            result,
            Err(ImportError::InvalidTensor { name, .. }) if name == "huge"
        ));
    }

    #[test]
    fn test_duplicate_tensor_name_fails() {
        let mut g = SerializedGraph::new("g");
        g.tensors.push(SerializedTensor::value("a", "f32", None));
        g.tensors.push(SerializedTensor::value("a", "f32", None));
        let config = ImportConfig::default();
        let mut state = ImportState::new(&g, &config);
        let result = VariableClassifier::classify_all(&g, &mut state, &config);
        assert!(matches!(result, Err(ImportError::Graph(_))));
    }
}
