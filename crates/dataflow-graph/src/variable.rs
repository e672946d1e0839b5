// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Graph variables and their roles.

use tensor_ir::{DType, Shape, Tensor};

/// The role a [`Variable`] plays in the graph.
///
/// Foreign formats conflate "tensor with unknown shape" and "placeholder
/// input"; internally the role is decided exactly once at classification
/// time and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarRole {
    /// Value supplied at execution time, not fixed at import time.
    Placeholder,
    /// Fixed value materialized at import time.
    Constant,
    /// Value produced by an operation in the graph.
    Computed,
}

impl VarRole {
    /// Returns a human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            VarRole::Placeholder => "placeholder",
            VarRole::Constant => "constant",
            VarRole::Computed => "computed",
        }
    }
}

impl std::fmt::Display for VarRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single unit of data in the computation graph.
///
/// The name is the key across the whole graph: operations reference their
/// inputs by variable name, and [`crate::ComputationGraph::add_variable`]
/// enforces uniqueness at creation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Variable {
    /// Graph-unique name.
    pub name: String,
    /// Concrete shape, or `None` while unresolved/deferred.
    pub shape: Option<Shape>,
    /// Element type, or `None` when the foreign dtype tag was unresolvable.
    pub dtype: Option<DType>,
    /// Placeholder, constant, or computed.
    pub role: VarRole,
    /// Materialized value (constants only).
    pub value: Option<Tensor>,
    /// The shape as originally declared by the source, recorded verbatim
    /// for placeholders so a later pass can validate resolution. `-1`
    /// entries mean "unknown at export time"; the declaration may be
    /// degenerate.
    pub declared_shape: Option<Vec<i64>>,
}

impl Variable {
    /// Creates a placeholder variable.
    pub fn placeholder(
        name: impl Into<String>,
        dtype: Option<DType>,
        shape: Option<Shape>,
        declared_shape: Option<Vec<i64>>,
    ) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype,
            role: VarRole::Placeholder,
            value: None,
            declared_shape,
        }
    }

    /// Creates a constant variable holding a materialized value.
    pub fn constant(name: impl Into<String>, value: Tensor) -> Self {
        Self {
            name: name.into(),
            shape: Some(value.shape().clone()),
            dtype: Some(value.dtype()),
            role: VarRole::Constant,
            value: Some(value),
            declared_shape: None,
        }
    }

    /// Creates a computed variable, shape optional.
    pub fn computed(
        name: impl Into<String>,
        dtype: Option<DType>,
        shape: Option<Shape>,
    ) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype,
            role: VarRole::Computed,
            value: None,
            declared_shape: None,
        }
    }

    /// Returns `true` if the shape never became concrete.
    pub fn shape_unresolved(&self) -> bool {
        self.shape.is_none()
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        let shape = self
            .shape
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".into());
        let dtype = self
            .dtype
            .map(|d| d.as_str())
            .unwrap_or("?");
        format!("{} ({}, {dtype}, {shape})", self.name, self.role)
    }
}
