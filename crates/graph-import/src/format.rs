// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The serialized foreign-graph schema and the dual-format reader.
//!
//! One logical schema, two wire encodings: a compact binary serialization
//! (bincode) and a human-readable UTF-8 text serialization (JSON) of the
//! exact same shape. [`FormatReader::parse`] auto-detects by attempting
//! binary first and reinterpreting the same bytes as text on failure.

use crate::ImportError;
use dataflow_graph::AttrValue;
use std::collections::BTreeMap;

/// Foreign tensor metadata: shape, dtype tag, optional embedded data.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SerializedTensor {
    /// Tensor name, the key the rest of the graph references it by.
    pub name: String,
    /// Foreign dtype tag. Resolved via `DType::from_tag`; unresolvable
    /// tags drive the unknown-type classification branch.
    pub dtype: String,
    /// Declared shape; `-1` entries mean "unknown at export time".
    /// `None` means no shape was declared at all.
    pub shape: Option<Vec<i64>>,
    /// Embedded constant data (row-major little-endian bytes).
    #[serde(default)]
    pub data: Option<Vec<u8>>,
    /// Whether the source declares this tensor as a graph input.
    #[serde(default)]
    pub input: bool,
}

impl SerializedTensor {
    /// A declared graph input with no default value.
    pub fn input(name: impl Into<String>, dtype: impl Into<String>, shape: Option<Vec<i64>>) -> Self {
        Self {
            name: name.into(),
            dtype: dtype.into(),
            shape,
            data: None,
            input: true,
        }
    }

    /// A tensor entry with embedded constant data.
    pub fn constant(
        name: impl Into<String>,
        dtype: impl Into<String>,
        shape: Vec<i64>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            dtype: dtype.into(),
            shape: Some(shape),
            data: Some(data),
            input: false,
        }
    }

    /// A plain value entry (no data, not an input).
    pub fn value(name: impl Into<String>, dtype: impl Into<String>, shape: Option<Vec<i64>>) -> Self {
        Self {
            name: name.into(),
            dtype: dtype.into(),
            shape,
            data: None,
            input: false,
        }
    }

    /// The placeholder flag: declared as a graph input with no default.
    pub fn is_declared_input(&self) -> bool {
        self.input && self.data.is_none()
    }
}

/// Foreign operation record. Immutable once parsed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SerializedNode {
    /// Node name; also names the value the node produces.
    pub name: String,
    /// Foreign operation-type name (registry key).
    pub op_type: String,
    /// Ordered input references, by name.
    pub inputs: Vec<String>,
    /// Named attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
    /// Numbered attributes (format-specific positional convention).
    #[serde(default)]
    pub positional: Vec<AttrValue>,
}

impl SerializedNode {
    /// Creates a node with no attributes.
    pub fn new(name: impl Into<String>, op_type: impl Into<String>, inputs: &[&str]) -> Self {
        Self {
            name: name.into(),
            op_type: op_type.into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            attributes: BTreeMap::new(),
            positional: Vec::new(),
        }
    }

    /// Adds a named attribute (builder style).
    pub fn with_attr(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Adds a numbered attribute (builder style).
    pub fn with_positional(mut self, value: AttrValue) -> Self {
        self.positional.push(value);
        self
    }
}

/// The parsed foreign graph: an ordered node list plus tensor metadata.
///
/// Owned exclusively by the importer for the duration of one import.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SerializedGraph {
    /// Graph name carried over to the imported graph.
    pub name: String,
    /// Foreign nodes in their serialized order. This order is *not*
    /// guaranteed to be executable; the order validator repairs it.
    pub nodes: Vec<SerializedNode>,
    /// Tensor metadata entries.
    pub tensors: Vec<SerializedTensor>,
}

impl SerializedGraph {
    /// Creates an empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            tensors: Vec::new(),
        }
    }

    /// Encodes this graph in the compact binary format.
    pub fn to_binary(&self) -> Result<Vec<u8>, ImportError> {
        bincode::serialize(self).map_err(|e| ImportError::Encode(format!("binary: {e}")))
    }

    /// Encodes this graph in the human-readable text format.
    pub fn to_text(&self) -> Result<String, ImportError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ImportError::Encode(format!("text: {e}")))
    }
}

/// Turns raw bytes into a typed [`SerializedGraph`].
pub struct FormatReader;

impl FormatReader {
    /// Parses a serialized graph from bytes.
    ///
    /// Attempts the binary deserialization first. If that fails, the same
    /// byte buffer is reinterpreted as UTF-8 text and parsed in the text
    /// grammar. Only when both fail does this return
    /// [`ImportError::UnrecognizedFormat`], carrying both parse errors.
    ///
    /// No side effects beyond the returned value: graph construction has
    /// not begun yet.
    pub fn parse(bytes: &[u8]) -> Result<SerializedGraph, ImportError> {
        let binary_err = match bincode::deserialize::<SerializedGraph>(bytes) {
            Ok(graph) => {
                tracing::debug!("parsed binary graph ({} bytes)", bytes.len());
                return Ok(graph);
            }
            Err(e) => e.to_string(),
        };

        tracing::debug!("binary parse failed ({binary_err}), trying text fallback");

        let text_err = match std::str::from_utf8(bytes) {
            Ok(text) => match serde_json::from_str::<SerializedGraph>(text) {
                Ok(graph) => {
                    tracing::debug!("parsed text graph ({} bytes)", bytes.len());
                    return Ok(graph);
                }
                Err(e) => e.to_string(),
            },
            Err(e) => format!("not valid UTF-8: {e}"),
        };

        Err(ImportError::UnrecognizedFormat {
            binary: binary_err,
            text: text_err,
        })
    }
}
