/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::{BigDecimal, BigInteger, Blob, DateTime, Number};
use std::collections::HashMap;

/// The name of the map entry a typed document uses to carry its shape id.
pub const DISCRIMINATOR_KEY: &str = "__type";

/// Document Type
///
/// Document types represent protocol-agnostic open content that is accessed
/// like untyped data. Open content is useful for modeling unstructured data
/// that has no schema, data that can't be modeled using rigid types, or data
/// that has a schema that evolves outside of the purview of a model. The
/// serialization format of a document is an implementation detail of a
/// protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Numeric value (positive integer, negative integer, or float)
    Number(Number),
    /// Arbitrary precision integer value
    BigInteger(BigInteger),
    /// Arbitrary precision decimal value
    BigDecimal(BigDecimal),
    /// UTF-8 string value
    String(String),
    /// Binary value
    Blob(Blob),
    /// Timestamp value
    Timestamp(DateTime),
    /// List of documents
    List(Vec<Document>),
    /// String-keyed map of documents
    Map(HashMap<String, Document>),
}

impl Document {
    /// Returns the discriminator carried by a map document, if any.
    ///
    /// The discriminator is the value of the distinguished `__type` entry and
    /// names the shape the document represents, either as an absolute
    /// (`namespace#Name`) or relative (`Name`) shape id.
    pub fn discriminator(&self) -> Option<&str> {
        match self {
            Document::Map(map) => match map.get(DISCRIMINATOR_KEY) {
                Some(Document::String(id)) => Some(id),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the boolean value if this document is a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Document::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric value if this document is a number.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Document::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string value if this document is a string.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Document::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the list elements if this document is a list.
    pub fn as_list(&self) -> Option<&[Document]> {
        match self {
            Document::List(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the map entries if this document is a map.
    pub fn as_map(&self) -> Option<&HashMap<String, Document>> {
        match self {
            Document::Map(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true if this document is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Document::Boolean(value)
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::String(value)
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::String(value.to_string())
    }
}

impl From<Vec<Document>> for Document {
    fn from(values: Vec<Document>) -> Self {
        Document::List(values)
    }
}

impl From<HashMap<String, Document>> for Document {
    fn from(values: HashMap<String, Document>) -> Self {
        Document::Map(values)
    }
}

impl From<u64> for Document {
    fn from(value: u64) -> Self {
        Document::Number(Number::PosInt(value))
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Document::Number(Number::from(value))
    }
}

impl From<i32> for Document {
    fn from(value: i32) -> Self {
        Document::Number(Number::from(value))
    }
}

impl From<f64> for Document {
    fn from(value: f64) -> Self {
        Document::Number(Number::Float(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn discriminator_lookup() {
        let mut map = HashMap::new();
        map.insert(
            DISCRIMINATOR_KEY.to_string(),
            Document::from("com.example#Weather"),
        );
        map.insert("temperature".to_string(), Document::from(72i32));
        let doc = Document::Map(map);
        assert_eq!(doc.discriminator(), Some("com.example#Weather"));

        assert_eq!(Document::from("plain").discriminator(), None);
        assert_eq!(Document::Map(HashMap::new()).discriminator(), None);
    }

    #[test]
    fn accessors() {
        assert_eq!(Document::from(true).as_boolean(), Some(true));
        assert_eq!(Document::from(10i32).as_number(), Some(Number::PosInt(10)));
        assert_eq!(Document::from("hi").as_string(), Some("hi"));
        assert!(Document::Null.is_null());
        assert!(Document::from(1i64).as_string().is_none());
    }
}
