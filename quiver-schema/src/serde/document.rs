/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Uses a [`Document`] as a serializer source.
//!
//! Codecs route `write_document` through [`serialize_document`], which walks
//! the document tree and replays it as ordinary visitor calls. The visitor
//! method chosen for each node is the one predicted by
//! [`DocumentExt::document_type`].

use crate::serde::ShapeSerializer;
use crate::{prelude, SchemaRef, SerdeError, ShapeType};
use quiver_types::{BigInteger, Document, Number};

/// Schema-model extensions for [`Document`].
pub trait DocumentExt {
    /// Returns the shape type this document serializes as.
    fn document_type(&self) -> ShapeType;
}

impl DocumentExt for Document {
    fn document_type(&self) -> ShapeType {
        match self {
            Document::Null => ShapeType::Document,
            Document::Boolean(_) => ShapeType::Boolean,
            Document::Number(Number::Float(_)) => ShapeType::Double,
            Document::Number(Number::PosInt(value)) if *value > i64::MAX as u64 => {
                ShapeType::BigInteger
            }
            Document::Number(_) => ShapeType::Long,
            Document::BigInteger(_) => ShapeType::BigInteger,
            Document::BigDecimal(_) => ShapeType::BigDecimal,
            Document::String(_) => ShapeType::String,
            Document::Blob(_) => ShapeType::Blob,
            Document::Timestamp(_) => ShapeType::Timestamp,
            Document::List(_) => ShapeType::List,
            Document::Map(_) if self.discriminator().is_some() => ShapeType::Structure,
            Document::Map(_) => ShapeType::Map,
        }
    }
}

/// Serializes a document tree through the visitor interface.
///
/// The top-level value is written with `schema`; nested values use the
/// document prelude schema.
pub fn serialize_document<S: ShapeSerializer>(
    serializer: &mut S,
    schema: &SchemaRef,
    document: &Document,
) -> Result<(), SerdeError> {
    match document {
        Document::Null => serializer.write_null(schema),
        Document::Boolean(value) => serializer.write_boolean(schema, *value),
        Document::Number(Number::Float(value)) => serializer.write_double(schema, *value),
        Document::Number(Number::PosInt(value)) => {
            if *value > i64::MAX as u64 {
                serializer.write_big_integer(schema, &BigInteger::from(*value))
            } else {
                serializer.write_long(schema, *value as i64)
            }
        }
        Document::Number(Number::NegInt(value)) => serializer.write_long(schema, *value),
        Document::BigInteger(value) => serializer.write_big_integer(schema, value),
        Document::BigDecimal(value) => serializer.write_big_decimal(schema, value),
        Document::String(value) => serializer.write_string(schema, value),
        Document::Blob(value) => serializer.write_blob(schema, value),
        Document::Timestamp(value) => serializer.write_timestamp(schema, value),
        Document::List(items) => serializer.write_list(schema, Some(items.len()), |ser| {
            for item in items {
                serialize_document(ser, &prelude::DOCUMENT, item)?;
            }
            Ok(())
        }),
        Document::Map(entries) => serializer.write_map(schema, Some(entries.len()), |ser| {
            // A typed document carries its shape id in the `__type` entry,
            // which must land first.
            if let Some(id) = document.discriminator() {
                ser.write_string(&prelude::STRING, quiver_types::DISCRIMINATOR_KEY)?;
                ser.write_string(&prelude::STRING, id)?;
            }
            for (key, value) in entries {
                if key == quiver_types::DISCRIMINATOR_KEY {
                    continue;
                }
                ser.write_string(&prelude::STRING, key)?;
                serialize_document(ser, &prelude::DOCUMENT, value)?;
            }
            Ok(())
        }),
    }
}
