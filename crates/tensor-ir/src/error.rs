// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor value construction and access.

use crate::DType;

/// Errors that can occur when constructing or reinterpreting tensor values.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// The provided byte buffer does not match the shape/dtype footprint.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A typed accessor was used on a tensor of a different element type.
    #[error("dtype mismatch: expected {expected}, got {actual}")]
    DTypeMismatch { expected: DType, actual: DType },
}
