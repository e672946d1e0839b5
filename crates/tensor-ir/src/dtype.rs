// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Supported tensor element data types.

/// Enumerates the element types a [`crate::Tensor`] can hold.
///
/// This is the palette the importer exercises: floats for values, integers
/// for indices / axes / shape parameters, booleans for flags. Foreign
/// formats declare dtypes as string tags; [`DType::from_tag`] resolves them
/// and returns `None` for anything unrecognised, which is the signal the
/// variable classifier branches on for "unresolved element type".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DType {
    /// 32-bit IEEE 754 floating point.
    F32,
    /// 64-bit IEEE 754 floating point.
    F64,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer (indices, axes, shape values).
    I64,
    /// Boolean, stored one byte per element.
    Bool,
}

impl DType {
    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 => 8,
            DType::I32 => 4,
            DType::I64 => 8,
            DType::Bool => 1,
        }
    }

    /// Returns a human-readable label for this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::Bool => "bool",
        }
    }

    /// Parses a dtype from a foreign tag string.
    ///
    /// Accepts our own labels plus the aliases common in foreign graph
    /// formats (`"float"`, `"float32"`, `"int64"`, ...). Returns `None`
    /// for tags with no supported counterpart.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "f32" | "float" | "float32" => Some(DType::F32),
            "f64" | "double" | "float64" => Some(DType::F64),
            "i32" | "int" | "int32" => Some(DType::I32),
            "i64" | "long" | "int64" => Some(DType::I64),
            "bool" | "boolean" => Some(DType::Bool),
            _ => None,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bytes() {
        assert_eq!(DType::F32.size_bytes(), 4);
        assert_eq!(DType::F64.size_bytes(), 8);
        assert_eq!(DType::I32.size_bytes(), 4);
        assert_eq!(DType::I64.size_bytes(), 8);
        assert_eq!(DType::Bool.size_bytes(), 1);
    }

    #[test]
    fn test_from_tag_aliases() {
        assert_eq!(DType::from_tag("float"), Some(DType::F32));
        assert_eq!(DType::from_tag("FLOAT32"), Some(DType::F32));
        assert_eq!(DType::from_tag("double"), Some(DType::F64));
        assert_eq!(DType::from_tag("int64"), Some(DType::I64));
        assert_eq!(DType::from_tag("bool"), Some(DType::Bool));
    }

    #[test]
    fn test_from_tag_unknown() {
        assert_eq!(DType::from_tag("complex64"), None);
        assert_eq!(DType::from_tag("resource"), None);
        assert_eq!(DType::from_tag(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", DType::I64), "i64");
    }
}
