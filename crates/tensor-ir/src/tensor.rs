// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The owned tensor value type.

use crate::{DType, Shape, TensorError};

/// An owned, n-dimensional value stored in contiguous memory.
///
/// `Tensor` is the carrier for materialized constant data in the imported
/// graph. Data is stored in row-major (C) order as a flat little-endian
/// byte buffer; typed access goes through the `to_*_vec` methods, which
/// decode element-wise and therefore never depend on buffer alignment.
///
/// Equality compares shape, dtype, and raw bytes, so a materialized
/// constant can be checked byte-for-byte against its serialized source.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tensor {
    shape: Shape,
    dtype: DType,
    data: Vec<u8>,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_ir::{Tensor, Shape, DType};
    /// let t = Tensor::zeros(Shape::matrix(2, 3), DType::F32);
    /// assert_eq!(t.size_bytes(), 24);
    /// ```
    pub fn zeros(shape: Shape, dtype: DType) -> Self {
        let size = shape.size_bytes(dtype);
        Self {
            shape,
            dtype,
            data: vec![0u8; size],
        }
    }

    /// Creates a tensor from raw little-endian bytes.
    ///
    /// Returns an error if the buffer size does not match
    /// `shape.size_bytes(dtype)`.
    pub fn from_bytes(shape: Shape, dtype: DType, data: Vec<u8>) -> Result<Self, TensorError> {
        let expected = shape.size_bytes(dtype);
        if data.len() != expected {
            return Err(TensorError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, dtype, data })
    }

    /// Creates an `F32` tensor from a slice of values.
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        Self::from_encoded(shape, DType::F32, values.len(), || {
            values.iter().flat_map(|v| v.to_le_bytes()).collect()
        })
    }

    /// Creates an `F64` tensor from a slice of values.
    pub fn from_f64(shape: Shape, values: &[f64]) -> Result<Self, TensorError> {
        Self::from_encoded(shape, DType::F64, values.len(), || {
            values.iter().flat_map(|v| v.to_le_bytes()).collect()
        })
    }

    /// Creates an `I64` tensor from a slice of values.
    pub fn from_i64(shape: Shape, values: &[i64]) -> Result<Self, TensorError> {
        Self::from_encoded(shape, DType::I64, values.len(), || {
            values.iter().flat_map(|v| v.to_le_bytes()).collect()
        })
    }

    /// Creates a `Bool` tensor from a slice of values.
    pub fn from_bool(shape: Shape, values: &[bool]) -> Result<Self, TensorError> {
        Self::from_encoded(shape, DType::Bool, values.len(), || {
            values.iter().map(|&v| v as u8).collect()
        })
    }

    fn from_encoded(
        shape: Shape,
        dtype: DType,
        len: usize,
        encode: impl FnOnce() -> Vec<u8>,
    ) -> Result<Self, TensorError> {
        if len != shape.num_elements() {
            return Err(TensorError::BufferSizeMismatch {
                expected: shape.size_bytes(dtype),
                actual: len * dtype.size_bytes(),
            });
        }
        Ok(Self {
            shape,
            dtype,
            data: encode(),
        })
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the element type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the raw little-endian byte buffer.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the buffer size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Decodes the buffer as `f32` values. Fails unless the dtype is `F32`.
    pub fn to_f32_vec(&self) -> Result<Vec<f32>, TensorError> {
        self.expect_dtype(DType::F32)?;
        Ok(self
            .data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    /// Decodes the buffer as `f64` values, widening `F32` if necessary.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>, TensorError> {
        match self.dtype {
            DType::F32 => Ok(self.to_f32_vec()?.into_iter().map(f64::from).collect()),
            DType::F64 => Ok(self
                .data
                .chunks_exact(8)
                .map(|c| {
                    f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                })
                .collect()),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::F64,
                actual: other,
            }),
        }
    }

    /// Decodes the buffer as `i64` values, widening `I32` if necessary.
    pub fn to_i64_vec(&self) -> Result<Vec<i64>, TensorError> {
        match self.dtype {
            DType::I32 => Ok(self
                .data
                .chunks_exact(4)
                .map(|c| i64::from(i32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .collect()),
            DType::I64 => Ok(self
                .data
                .chunks_exact(8)
                .map(|c| {
                    i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                })
                .collect()),
            other => Err(TensorError::DTypeMismatch {
                expected: DType::I64,
                actual: other,
            }),
        }
    }

    /// Decodes the buffer as `bool` values. Fails unless the dtype is `Bool`.
    pub fn to_bool_vec(&self) -> Result<Vec<bool>, TensorError> {
        self.expect_dtype(DType::Bool)?;
        Ok(self.data.iter().map(|&b| b != 0).collect())
    }

    fn expect_dtype(&self, expected: DType) -> Result<(), TensorError> {
        if self.dtype != expected {
            return Err(TensorError::DTypeMismatch {
                expected,
                actual: self.dtype,
            });
        }
        Ok(())
    }
}
