/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Enumeration of shape types.
///
/// This represents the core shape types of the schema model, including simple
/// types, aggregate types, service types, and the special member type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ShapeType {
    // Simple types
    /// Boolean type
    Boolean,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Arbitrary precision integer
    BigInteger,
    /// Arbitrary precision decimal
    BigDecimal,
    /// UTF-8 string
    String,
    /// Binary data
    Blob,
    /// Timestamp
    Timestamp,
    /// Document type
    Document,
    /// String enumeration
    Enum,
    /// Integer enumeration
    IntEnum,

    // Aggregate types
    /// List type
    List,
    /// Map type
    Map,
    /// Structure type
    Structure,
    /// Union type
    Union,

    // Service types
    /// Operation shape
    Operation,
    /// Service shape
    Service,

    // Member
    /// Member shape
    Member,
}

impl ShapeType {
    /// Returns true if this is a simple type.
    #[inline]
    pub fn is_simple(&self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Byte
                | Self::Short
                | Self::Integer
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::BigInteger
                | Self::BigDecimal
                | Self::String
                | Self::Blob
                | Self::Timestamp
                | Self::Document
                | Self::Enum
                | Self::IntEnum
        )
    }

    /// Returns true if this is an aggregate type.
    #[inline]
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::List | Self::Map | Self::Structure | Self::Union)
    }

    /// Returns true if this is a member type.
    #[inline]
    pub fn is_member(&self) -> bool {
        matches!(self, Self::Member)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shape_type_simple() {
        assert!(ShapeType::String.is_simple());
        assert!(ShapeType::Integer.is_simple());
        assert!(ShapeType::Enum.is_simple());
        assert!(!ShapeType::Structure.is_simple());
        assert!(!ShapeType::List.is_simple());
    }

    #[test]
    fn test_shape_type_aggregate() {
        assert!(ShapeType::Structure.is_aggregate());
        assert!(ShapeType::Union.is_aggregate());
        assert!(ShapeType::List.is_aggregate());
        assert!(ShapeType::Map.is_aggregate());
        assert!(!ShapeType::Operation.is_aggregate());
    }

    #[test]
    fn test_shape_type_member() {
        assert!(ShapeType::Member.is_member());
        assert!(!ShapeType::String.is_member());
    }
}
