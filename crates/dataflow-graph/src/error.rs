// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for computation-graph construction.

/// Errors that can occur when building or inspecting a computation graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A variable with this name already exists in the graph.
    #[error("duplicate variable: '{name}'")]
    DuplicateVariable { name: String },

    /// A lookup referenced a variable that does not exist.
    #[error("unknown variable: '{name}'")]
    UnknownVariable { name: String },

    /// The graph violates a structural invariant.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
}
