/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Prelude schemas for built-in simple types.
//!
//! These are the fundamental schemas available to every model. They carry no
//! traits and are shared process-wide.

use crate::{Schema, SchemaRef, ShapeId, ShapeType};
use std::sync::LazyLock;

macro_rules! prelude_schema {
    ($(#[$docs:meta])* $name:ident, $shape_name:literal, $shape_type:ident) => {
        $(#[$docs])*
        pub static $name: LazyLock<SchemaRef> = LazyLock::new(|| {
            Schema::scalar(
                ShapeId::from_parts("quiver.api", $shape_name),
                ShapeType::$shape_type,
                Vec::new(),
            )
        });
    };
}

prelude_schema!(
    /// Schema for `quiver.api#String`
    STRING, "String", String
);
prelude_schema!(
    /// Schema for `quiver.api#Boolean`
    BOOLEAN, "Boolean", Boolean
);
prelude_schema!(
    /// Schema for `quiver.api#Byte`
    BYTE, "Byte", Byte
);
prelude_schema!(
    /// Schema for `quiver.api#Short`
    SHORT, "Short", Short
);
prelude_schema!(
    /// Schema for `quiver.api#Integer`
    INTEGER, "Integer", Integer
);
prelude_schema!(
    /// Schema for `quiver.api#Long`
    LONG, "Long", Long
);
prelude_schema!(
    /// Schema for `quiver.api#Float`
    FLOAT, "Float", Float
);
prelude_schema!(
    /// Schema for `quiver.api#Double`
    DOUBLE, "Double", Double
);
prelude_schema!(
    /// Schema for `quiver.api#BigInteger`
    BIG_INTEGER, "BigInteger", BigInteger
);
prelude_schema!(
    /// Schema for `quiver.api#BigDecimal`
    BIG_DECIMAL, "BigDecimal", BigDecimal
);
prelude_schema!(
    /// Schema for `quiver.api#Blob`
    BLOB, "Blob", Blob
);
prelude_schema!(
    /// Schema for `quiver.api#Timestamp`
    TIMESTAMP, "Timestamp", Timestamp
);
prelude_schema!(
    /// Schema for `quiver.api#Document`
    DOCUMENT, "Document", Document
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_schemas() {
        assert_eq!(STRING.id().as_str(), "quiver.api#String");
        assert_eq!(STRING.shape_type(), ShapeType::String);
        assert!(STRING.traits().is_empty());

        assert_eq!(INTEGER.shape_type(), ShapeType::Integer);
        assert_eq!(TIMESTAMP.shape_type(), ShapeType::Timestamp);
        assert_eq!(DOCUMENT.shape_type(), ShapeType::Document);
    }

    #[test]
    fn test_all_prelude_types_are_simple() {
        for schema in [
            &STRING,
            &BOOLEAN,
            &BYTE,
            &SHORT,
            &INTEGER,
            &LONG,
            &FLOAT,
            &DOUBLE,
            &BIG_INTEGER,
            &BIG_DECIMAL,
            &BLOB,
            &TIMESTAMP,
            &DOCUMENT,
        ] {
            assert!(schema.shape_type().is_simple());
        }
    }
}
