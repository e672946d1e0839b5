// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # graph-import
//!
//! Consumes a serialized computation-graph definition produced by an
//! external modeling framework and converts it into the framework-native
//! [`dataflow_graph::ComputationGraph`].
//!
//! The pipeline is strictly sequential; each stage consumes the complete
//! output of the previous one:
//!
//! ```text
//! bytes ──▶ FormatReader ──▶ VariableClassifier ──▶ NodeMapper ──▶ OrderValidator
//!            (parse)          (tensor → Variable)   (node → Operation)  (topo order)
//! ```
//!
//! - [`FormatReader`] parses the compact binary encoding, falling back to
//!   the human-readable text encoding of the same schema.
//! - The variable classifier turns every serialized tensor entry into a
//!   [`dataflow_graph::Variable`] with its final role.
//! - The node mapper resolves each node through the operation registry
//!   and applies the declarative property-mapping table.
//! - The order validator establishes a legal execution order, rejecting
//!   true cycles.
//!
//! The [`GraphImporter`] facade ties the stages together. Import is
//! atomic: either a complete, order-valid graph or a single descriptive
//! [`ImportError`] — there is no partial-success mode.
//!
//! # Example
//! ```
//! use graph_import::{GraphImporter, SerializedGraph, SerializedNode, SerializedTensor};
//!
//! let mut graph = SerializedGraph::new("demo");
//! graph.tensors.push(SerializedTensor::input("x", "f32", Some(vec![1, 4])));
//! graph.tensors.push(SerializedTensor::input("y", "f32", Some(vec![1, 4])));
//! graph.nodes.push(SerializedNode::new("sum", "Add", &["x", "y"]));
//!
//! let importer = GraphImporter::new();
//! let imported = importer.import_bytes(&graph.to_binary().unwrap()).unwrap();
//! assert_eq!(imported.num_operations(), 1);
//! ```

mod classify;
mod config;
mod error;
mod format;
mod importer;
mod mapper;
mod mapping;
mod order;
mod state;

pub use config::ImportConfig;
pub use error::ImportError;
pub use format::{FormatReader, SerializedGraph, SerializedNode, SerializedTensor};
pub use importer::GraphImporter;

pub(crate) use classify::VariableClassifier;
pub(crate) use mapper::NodeMapper;
pub(crate) use order::OrderValidator;
pub(crate) use state::ImportState;
