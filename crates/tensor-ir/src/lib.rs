// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-ir
//!
//! Leaf crate of the dataflow-import workspace: the value-level vocabulary
//! shared by the graph model and the importer.
//!
//! - [`DType`] — element types a tensor value can hold, with loose tag
//!   parsing (foreign formats write dtypes as strings).
//! - [`Shape`] — immutable dimension descriptor.
//! - [`Tensor`] — an owned, contiguous n-dimensional value stored as a flat
//!   byte buffer with typed accessors.
//!
//! Nothing here knows about graphs, nodes, or serialized formats. Compute
//! kernels are deliberately absent — a `Tensor` is a data carrier, not a
//! math object.

mod dtype;
mod error;
mod shape;
mod tensor;

pub use dtype::DType;
pub use error::TensorError;
pub use shape::Shape;
pub use tensor::Tensor;
