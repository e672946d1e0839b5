// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # dataflow-graph
//!
//! The framework-native computation-graph model that the importer produces
//! and a downstream execution engine consumes.
//!
//! - [`Variable`] / [`VarRole`] — the unit of data: placeholder, constant,
//!   or computed, keyed by a graph-unique name.
//! - [`AttrValue`] — the tagged attribute union operations are configured
//!   with.
//! - [`Operation`] / [`OpType`] — a configured operation instance and the
//!   closed palette of internal operation kinds.
//! - [`ComputationGraph`] — the ordered collection of variables and
//!   operations, with the no-forward-reference invariant checkable via
//!   [`ComputationGraph::verify_execution_order`].
//! - [`OpRegistry`] — the read-only table mapping foreign operation-type
//!   names to internal descriptors, including each type's declarative
//!   property-mapping list.
//!
//! Operation *kernels* (the math) live elsewhere; this crate only models
//! structure and configuration.

mod attr;
mod error;
mod graph;
mod operation;
mod registry;
mod variable;

pub use attr::AttrValue;
pub use error::GraphError;
pub use graph::ComputationGraph;
pub use operation::{OpType, Operation};
pub use registry::{OpDescriptor, OpRegistry, PropertyMapping, PropertySource};
pub use variable::{VarRole, Variable};
