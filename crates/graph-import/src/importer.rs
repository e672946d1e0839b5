// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The import facade.
//!
//! Accepts a byte buffer, a file path, or an open byte stream — all
//! reduced internally to "parse these bytes" — and runs the four stages
//! strictly in sequence. Import is atomic: success hands over a complete,
//! order-valid [`ComputationGraph`]; any failure aborts the whole call.
//!
//! One importer may serve concurrent imports on independent inputs: the
//! registry and config are only ever read, and each call allocates its own
//! transient state.

use crate::{
    FormatReader, ImportConfig, ImportError, ImportState, NodeMapper, OrderValidator,
    VariableClassifier,
};
use dataflow_graph::{ComputationGraph, OpRegistry};
use std::io::Read;
use std::path::Path;

/// Orchestrates FormatReader → VariableClassifier → NodeMapper →
/// OrderValidator.
///
/// # Example
/// ```no_run
/// use graph_import::GraphImporter;
/// use std::path::Path;
///
/// let importer = GraphImporter::new();
/// let graph = importer.import_file(Path::new("./model.dfg")).unwrap();
/// println!("{}", graph.summary());
/// ```
#[derive(Debug, Clone)]
pub struct GraphImporter {
    registry: OpRegistry,
    config: ImportConfig,
}

impl Default for GraphImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphImporter {
    /// Creates an importer with the builtin registry and default config.
    pub fn new() -> Self {
        Self {
            registry: OpRegistry::builtin(),
            config: ImportConfig::default(),
        }
    }

    /// Creates an importer with a custom configuration.
    pub fn with_config(config: ImportConfig) -> Self {
        Self {
            registry: OpRegistry::builtin(),
            config,
        }
    }

    /// Creates an importer with a custom registry and configuration.
    ///
    /// The registry must be fully populated before the first import; it is
    /// only read from here on.
    pub fn with_registry(registry: OpRegistry, config: ImportConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Imports a graph from a byte buffer.
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ComputationGraph, ImportError> {
        let source = FormatReader::parse(bytes)?;
        tracing::info!(
            "importing graph '{}': {} nodes, {} tensor entries",
            source.name,
            source.nodes.len(),
            source.tensors.len(),
        );

        let mut state = ImportState::new(&source, &self.config);
        VariableClassifier::classify_all(&source, &mut state, &self.config)?;
        NodeMapper::map_all(&source, &mut state, &self.registry, &self.config)?;
        let graph = OrderValidator::finalize(state)?;

        tracing::info!("import complete: {}", graph.summary());
        Ok(graph)
    }

    /// Imports a graph from a file, memory-mapping it read-only.
    pub fn import_file(&self, path: &Path) -> Result<ComputationGraph, ImportError> {
        let file = std::fs::File::open(path)?;
        // Read-only map; the file is never written through it.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        tracing::debug!("mapped '{}' ({} bytes)", path.display(), mmap.len());
        self.import_bytes(&mmap)
    }

    /// Imports a graph from an open byte stream.
    pub fn import_reader(&self, mut reader: impl Read) -> Result<ComputationGraph, ImportError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.import_bytes(&bytes)
    }
}
