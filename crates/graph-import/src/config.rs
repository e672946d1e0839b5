// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Importer configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! ignored_ops = ["NoOp", "Assert", "Placeholder", "Const"]
//! ignore_exceptions = ["shape_source"]
//! unknown_dtype_allowlist = ["legacy_table"]
//! ```

use crate::{ImportError, SerializedNode};
use std::collections::BTreeSet;
use std::path::Path;

/// Configuration for the graph importer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImportConfig {
    /// Foreign op-type names skipped entirely during node mapping.
    #[serde(default = "default_ignored_ops")]
    pub ignored_ops: BTreeSet<String>,
    /// Node *names* exempt from the ignore-list. Some operations are
    /// ignorable only in isolation but required in specific structural
    /// contexts (e.g. as the sole producer of a downstream value); the
    /// source format grants an explicit exception list rather than
    /// deriving it from graph structure, and we preserve that mechanism.
    #[serde(default)]
    pub ignore_exceptions: BTreeSet<String>,
    /// Tensor names importable despite an unresolvable dtype tag.
    #[serde(default)]
    pub unknown_dtype_allowlist: BTreeSet<String>,
}

fn default_ignored_ops() -> BTreeSet<String> {
    // Placeholder/Const carry no computation — their tensor entries are
    // handled by the variable classifier.
    ["NoOp", "Assert", "Placeholder", "Const"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            ignored_ops: default_ignored_ops(),
            ignore_exceptions: BTreeSet::new(),
            unknown_dtype_allowlist: BTreeSet::new(),
        }
    }
}

impl ImportConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ImportError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ImportError> {
        toml::from_str(toml_str)
            .map_err(|e| ImportError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ImportError> {
        toml::to_string_pretty(self)
            .map_err(|e| ImportError::Config(format!("TOML serialise error: {e}")))
    }

    /// Returns `true` if this node should be skipped during mapping.
    pub fn is_ignored(&self, node: &SerializedNode) -> bool {
        self.ignored_ops.contains(&node.op_type)
            && !self.ignore_exceptions.contains(&node.name)
    }

    /// Returns `true` if `tensor_name` may be imported even though its
    /// dtype tag did not resolve.
    pub fn allows_unknown_dtype(&self, tensor_name: &str) -> bool {
        self.unknown_dtype_allowlist.contains(tensor_name)
    }
}
