// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operation attribute values.
//!
//! Attributes configure operations (an axis, a permutation, a transpose
//! flag). Foreign formats deliver them as named attributes, numbered
//! attributes, or constant input tensors; [`AttrValue`] is the single
//! internal form they all normalise to.

use tensor_ir::{DType, Shape, Tensor};

/// A single operation-configuration value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
}

impl AttrValue {
    /// Converts a constant tensor into an attribute value.
    ///
    /// Scalars become the scalar variants, 1-D tensors become the list
    /// variants. Higher ranks and non-numeric dtypes yield `None` — a
    /// parameter smuggled in as an input tensor is expected to be small
    /// and flat.
    pub fn from_tensor(tensor: &Tensor) -> Option<Self> {
        let scalar = tensor.shape().rank() == 0;
        if tensor.shape().rank() > 1 {
            return None;
        }
        match tensor.dtype() {
            DType::I32 | DType::I64 => {
                let values = tensor.to_i64_vec().ok()?;
                if scalar {
                    Some(AttrValue::Int(*values.first()?))
                } else {
                    Some(AttrValue::Ints(values))
                }
            }
            DType::F32 | DType::F64 => {
                let values = tensor.to_f64_vec().ok()?;
                if scalar {
                    Some(AttrValue::Float(*values.first()?))
                } else {
                    Some(AttrValue::Floats(values))
                }
            }
            DType::Bool => {
                let values = tensor.to_bool_vec().ok()?;
                if scalar {
                    Some(AttrValue::Bool(*values.first()?))
                } else {
                    None
                }
            }
        }
    }

    /// Converts an attribute value into a constant tensor.
    ///
    /// This is the reverse direction: used when the internal representation
    /// wants an explicit graph edge for a value the foreign node carried as
    /// an attribute. Strings have no tensor form and yield `None`.
    pub fn to_tensor(&self) -> Option<Tensor> {
        match self {
            AttrValue::Int(v) => Tensor::from_i64(Shape::scalar(), &[*v]).ok(),
            AttrValue::Ints(v) => Tensor::from_i64(Shape::vector(v.len()), v).ok(),
            AttrValue::Float(v) => Tensor::from_f64(Shape::scalar(), &[*v]).ok(),
            AttrValue::Floats(v) => Tensor::from_f64(Shape::vector(v.len()), v).ok(),
            AttrValue::Bool(v) => Tensor::from_bool(Shape::scalar(), &[*v]).ok(),
            AttrValue::Str(_) => None,
        }
    }

    /// Returns the integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float value, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer list, if this is an `Ints`.
    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            AttrValue::Ints(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a short label for the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Bool(_) => "bool",
            AttrValue::Str(_) => "str",
            AttrValue::Ints(_) => "ints",
            AttrValue::Floats(_) => "floats",
        }
    }
}
