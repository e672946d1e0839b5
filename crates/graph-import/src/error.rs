// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for graph import.
//!
//! Every failure aborts the whole import and names the offending
//! node/tensor. The one locally recovered failure — binary parse falling
//! back to text — never surfaces here; only the combined
//! [`ImportError::UnrecognizedFormat`] does.

use dataflow_graph::GraphError;

/// Errors that can occur while importing a serialized graph.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Neither the binary nor the text parse succeeded.
    #[error("unrecognized graph format (binary: {binary}; text: {text})")]
    UnrecognizedFormat { binary: String, text: String },

    /// No registry entry exists for a foreign operation-type name.
    #[error("unknown operation type '{op_type}'")]
    UnknownOpType { op_type: String },

    /// A node references a name with no corresponding variable or node.
    #[error("node '{node}' references unresolved input '{input}'")]
    UnresolvedInput { node: String, input: String },

    /// A required internal field has no extraction source and no default.
    #[error("node '{node}': no property mapping yields required field '{field}'")]
    MissingPropertyMapping { node: String, field: String },

    /// No legal topological order exists.
    #[error("cyclic dependency among operations: {nodes:?}")]
    CyclicDependency { nodes: Vec<String> },

    /// An extraction source exists but its value cannot be converted.
    #[error("node '{node}', field '{field}': {detail}")]
    BadAttribute {
        node: String,
        field: String,
        detail: String,
    },

    /// A serialized tensor's embedded data is inconsistent with its
    /// declared shape/dtype.
    #[error("tensor '{name}': {detail}")]
    InvalidTensor { name: String, detail: String },

    /// Graph construction rejected an entry (e.g. a duplicate name).
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The input file/stream could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A graph could not be encoded into one of the wire formats.
    #[error("encode error: {0}")]
    Encode(String),

    /// The importer configuration is invalid.
    #[error("config error: {0}")]
    Config(String),
}
