// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The operation registry: foreign op-type names → internal descriptors.
//!
//! Foreign formats configure the "same" operation three different ways —
//! named attributes, numbered attributes, or extra input tensors carrying
//! parameter data. Each [`OpDescriptor`] therefore pairs the internal
//! [`OpType`] with a declarative [`PropertyMapping`] list telling the
//! importer where every internal configuration field comes from.
//!
//! The registry is read-only after construction. There is deliberately no
//! process-wide mutable singleton: callers construct one (usually via
//! [`OpRegistry::builtin`]) and pass it by reference, which makes
//! concurrent imports safe by construction.

use crate::{AttrValue, OpType};
use std::collections::BTreeMap;

/// Where one internal configuration field comes from in a foreign node.
///
/// Exactly one source per mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySource {
    /// A named foreign attribute.
    Attribute(&'static str),
    /// A positional input tensor, consumed as data rather than as a graph
    /// edge. The referenced input must resolve to a constant.
    InputTensor(usize),
    /// A numbered attribute (format-specific positional convention).
    PositionalAttribute(usize),
}

/// One declarative extraction rule: how to fill one internal field.
#[derive(Debug, Clone)]
pub struct PropertyMapping {
    /// Target internal field name.
    pub field: &'static str,
    /// Extraction source.
    pub source: PropertySource,
    /// Fallback when the source yields nothing. `None` makes the field
    /// required: extraction failure aborts the import.
    pub default: Option<AttrValue>,
    /// When set, the extracted value is materialized as a synthetic
    /// constant variable and appended to the operation's inputs instead of
    /// being stored as an attribute. Used where the internal representation
    /// wants an explicit graph edge for what the source format encoded as
    /// a literal.
    pub inject_as_edge: bool,
}

impl PropertyMapping {
    fn new(field: &'static str, source: PropertySource) -> Self {
        Self {
            field,
            source,
            default: None,
            inject_as_edge: false,
        }
    }

    fn with_default(mut self, default: AttrValue) -> Self {
        self.default = Some(default);
        self
    }

    fn as_edge(mut self) -> Self {
        self.inject_as_edge = true;
        self
    }
}

/// Everything the importer needs to know about one foreign op type.
#[derive(Debug, Clone)]
pub struct OpDescriptor {
    /// The internal operation this foreign type maps to.
    pub op_type: OpType,
    /// Declarative extraction table for the internal configuration fields.
    pub mappings: Vec<PropertyMapping>,
}

/// Read-only lookup table from foreign operation-type names to descriptors.
#[derive(Debug, Clone, Default)]
pub struct OpRegistry {
    entries: BTreeMap<String, OpDescriptor>,
}

impl OpRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor under one or more foreign names.
    pub fn register(&mut self, names: &[&str], op_type: OpType, mappings: Vec<PropertyMapping>) {
        for name in names {
            self.entries.insert(
                (*name).to_string(),
                OpDescriptor {
                    op_type,
                    mappings: mappings.clone(),
                },
            );
        }
    }

    /// Looks up a foreign operation-type name.
    pub fn lookup(&self, foreign_name: &str) -> Option<&OpDescriptor> {
        self.entries.get(foreign_name)
    }

    /// Returns the number of registered foreign names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no names are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the full builtin table.
    ///
    /// Foreign spellings follow the conventions of the supported source
    /// framework (`"AddV2"`, `"ConcatV2"`, ...). The table must be fully
    /// populated before any import begins; imports only ever read it.
    pub fn builtin() -> Self {
        use PropertySource::{Attribute, InputTensor, PositionalAttribute};

        let mut reg = Self::new();

        // Elementwise binary, no configuration.
        reg.register(&["Add", "AddV2", "BiasAdd"], OpType::Add, vec![]);
        reg.register(&["Sub"], OpType::Sub, vec![]);
        reg.register(&["Mul"], OpType::Mul, vec![]);
        reg.register(&["Div", "RealDiv"], OpType::Div, vec![]);

        // Elementwise unary.
        reg.register(&["Neg"], OpType::Neg, vec![]);
        reg.register(&["Relu"], OpType::Relu, vec![]);
        reg.register(&["Sigmoid"], OpType::Sigmoid, vec![]);
        reg.register(&["Tanh"], OpType::Tanh, vec![]);

        // Pass-through spellings all collapse to Identity.
        reg.register(
            &["Identity", "Snapshot", "StopGradient"],
            OpType::Identity,
            vec![],
        );

        reg.register(
            &["MatMul"],
            OpType::MatMul,
            vec![
                PropertyMapping::new("transpose_a", Attribute("transpose_a"))
                    .with_default(AttrValue::Bool(false)),
                PropertyMapping::new("transpose_b", Attribute("transpose_b"))
                    .with_default(AttrValue::Bool(false)),
            ],
        );

        reg.register(
            &["Softmax"],
            OpType::Softmax,
            vec![PropertyMapping::new("axis", Attribute("axis"))
                .with_default(AttrValue::Int(-1))],
        );

        // The target shape arrives as a second input tensor, not an
        // attribute. It is parameter data: consumed, not an edge.
        reg.register(
            &["Reshape"],
            OpType::Reshape,
            vec![PropertyMapping::new("shape", InputTensor(1))],
        );

        reg.register(
            &["Transpose"],
            OpType::Transpose,
            vec![PropertyMapping::new("perm", InputTensor(1))],
        );

        // ConcatV2 carries the axis as a trailing scalar input after the
        // two values being concatenated.
        reg.register(
            &["Concat", "ConcatV2"],
            OpType::Concat,
            vec![PropertyMapping::new("axis", InputTensor(2))],
        );

        reg.register(
            &["Sum"],
            OpType::ReduceSum,
            vec![
                PropertyMapping::new("axes", InputTensor(1))
                    .with_default(AttrValue::Ints(vec![])),
                PropertyMapping::new("keep_dims", Attribute("keep_dims"))
                    .with_default(AttrValue::Bool(false)),
            ],
        );
        reg.register(
            &["Mean"],
            OpType::ReduceMean,
            vec![
                PropertyMapping::new("axes", InputTensor(1))
                    .with_default(AttrValue::Ints(vec![])),
                PropertyMapping::new("keep_dims", Attribute("keep_dims"))
                    .with_default(AttrValue::Bool(false)),
            ],
        );

        // Gather's axis uses the source format's numbered-attribute
        // convention.
        reg.register(
            &["Gather", "GatherV2"],
            OpType::Gather,
            vec![PropertyMapping::new("axis", PositionalAttribute(0))
                .with_default(AttrValue::Int(0))],
        );

        reg.register(
            &["Pad", "PadV2"],
            OpType::Pad,
            vec![
                PropertyMapping::new("paddings", InputTensor(1)),
                PropertyMapping::new("constant_value", Attribute("constant_value"))
                    .with_default(AttrValue::Float(0.0)),
            ],
        );

        // Fill's scalar value is a literal in the source format, but the
        // internal representation wants it as an explicit constant edge.
        reg.register(
            &["Fill"],
            OpType::Fill,
            vec![PropertyMapping::new("value", PositionalAttribute(0)).as_edge()],
        );

        reg
    }
}
