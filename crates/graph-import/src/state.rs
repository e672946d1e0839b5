// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Single-use import context.

use crate::{ImportConfig, SerializedGraph};
use dataflow_graph::ComputationGraph;
use std::collections::HashSet;

/// Transient context threaded through one import call.
///
/// Owns the in-progress graph plus the mappable-node index built from the
/// source. Created at the start of an `import_*` call and discarded at its
/// end; never shared across concurrent imports.
pub(crate) struct ImportState<'a> {
    /// The internal graph under construction.
    pub graph: ComputationGraph,
    /// Names of nodes that will actually be mapped (the ignore-list and
    /// its exception list already applied). An input reference to a name
    /// in this set is resolvable even before that node has been mapped;
    /// the order validator repairs the sequencing afterwards.
    pub mappable: HashSet<&'a str>,
}

impl<'a> ImportState<'a> {
    /// Builds the context for one import of `source`.
    pub fn new(source: &'a SerializedGraph, config: &ImportConfig) -> Self {
        let mappable = source
            .nodes
            .iter()
            .filter(|n| !config.is_ignored(n))
            .map(|n| n.name.as_str())
            .collect();
        Self {
            graph: ComputationGraph::new(source.name.clone()),
            mappable,
        }
    }

    /// Returns `true` if `name` can serve as an operation input: it is
    /// already a value in the graph, or it names a node that will be
    /// mapped.
    pub fn resolves(&self, name: &str) -> bool {
        self.graph.contains_value(name) || self.mappable.contains(name)
    }
}
