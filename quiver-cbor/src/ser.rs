/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The CBOR realization of the shape serializer protocol.

use crate::encode::Encoder;
use quiver_schema::serde::{document, FramedShapeSerializer, ShapeSerializer};
use quiver_schema::sink::ByteSink;
use quiver_schema::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

// The serializer tracks which aggregate it is inside of so each write knows
// the framing it owes first: structures emit the member-name key, maps toggle
// between key and value position, lists emit nothing.
#[derive(Debug)]
enum Ctx {
    Struct,
    List { definite: bool },
    Map { at_key: bool, definite: bool },
}

/// Serializes shapes as CBOR into a byte sink.
///
/// Structures and unions are always emitted as indefinite-length maps
/// terminated by a break byte; lists and maps use a definite length when the
/// caller supplies one.
#[derive(Debug)]
pub struct CborSerializer<B: ByteSink = Vec<u8>> {
    encoder: Encoder<B>,
    stack: Vec<Ctx>,
}

impl CborSerializer<Vec<u8>> {
    /// Creates a serializer writing into a resizing in-memory buffer.
    pub fn new() -> Self {
        Self::with_sink(Vec::new())
    }
}

impl Default for CborSerializer<Vec<u8>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ByteSink> CborSerializer<B> {
    /// Creates a serializer writing into the given sink.
    pub fn with_sink(sink: B) -> Self {
        Self {
            encoder: Encoder::new(sink),
            stack: Vec::new(),
        }
    }

    /// Finishes serialization and releases the sink.
    pub fn finish(self) -> B {
        self.encoder.into_sink()
    }

    // Emits the framing owed before a value: the member-name key inside a
    // structure, or the key/value position bookkeeping inside a map. Member
    // names are plain text strings, so the fast path is just a string head.
    fn before_value(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        match self.stack.last_mut() {
            Some(Ctx::Struct) => {
                let name = schema.member_name().ok_or_else(|| {
                    SerdeError::mismatch(format!(
                        "values inside a structure need a member schema, got `{}`",
                        schema.id()
                    ))
                })?;
                self.encoder.str(name)?;
                Ok(())
            }
            Some(Ctx::Map { at_key, .. }) => {
                if *at_key {
                    return Err(SerdeError::mismatch(
                        "map keys must be written as strings",
                    ));
                }
                *at_key = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl<B: ByteSink> FramedShapeSerializer for CborSerializer<B> {
    fn begin_struct(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.begin_map()?;
        self.stack.push(Ctx::Struct);
        Ok(())
    }

    fn end_struct(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        self.stack.pop();
        self.encoder.end()?;
        Ok(())
    }

    fn begin_list(&mut self, schema: &SchemaRef, size: Option<usize>) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        match size {
            Some(len) => self.encoder.array(len as u64)?,
            None => self.encoder.begin_array()?,
        };
        self.stack.push(Ctx::List {
            definite: size.is_some(),
        });
        Ok(())
    }

    fn end_list(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        if let Some(Ctx::List { definite: false }) = self.stack.pop() {
            self.encoder.end()?;
        }
        Ok(())
    }

    fn begin_map(&mut self, schema: &SchemaRef, size: Option<usize>) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        match size {
            Some(len) => self.encoder.map(len as u64)?,
            None => self.encoder.begin_map()?,
        };
        self.stack.push(Ctx::Map {
            at_key: true,
            definite: size.is_some(),
        });
        Ok(())
    }

    fn end_map(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        if let Some(Ctx::Map {
            definite: false, ..
        }) = self.stack.pop()
        {
            self.encoder.end()?;
        }
        Ok(())
    }
}

impl<B: ByteSink> ShapeSerializer for CborSerializer<B> {
    fn write_struct<F>(&mut self, schema: &SchemaRef, members: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        self.begin_struct(schema)?;
        members(self)?;
        self.end_struct(schema)
    }

    fn write_list<F>(
        &mut self,
        schema: &SchemaRef,
        size: Option<usize>,
        elements: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        self.begin_list(schema, size)?;
        elements(self)?;
        self.end_list(schema)
    }

    fn write_map<F>(
        &mut self,
        schema: &SchemaRef,
        size: Option<usize>,
        entries: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        self.begin_map(schema, size)?;
        entries(self)?;
        self.end_map(schema)
    }

    fn write_boolean(&mut self, schema: &SchemaRef, value: bool) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.boolean(value)?;
        Ok(())
    }

    fn write_byte(&mut self, schema: &SchemaRef, value: i8) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.byte(value)?;
        Ok(())
    }

    fn write_short(&mut self, schema: &SchemaRef, value: i16) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.short(value)?;
        Ok(())
    }

    fn write_integer(&mut self, schema: &SchemaRef, value: i32) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.integer(value)?;
        Ok(())
    }

    fn write_long(&mut self, schema: &SchemaRef, value: i64) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.long(value)?;
        Ok(())
    }

    fn write_float(&mut self, schema: &SchemaRef, value: f32) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.float(value)?;
        Ok(())
    }

    fn write_double(&mut self, schema: &SchemaRef, value: f64) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.double(value)?;
        Ok(())
    }

    fn write_big_integer(
        &mut self,
        schema: &SchemaRef,
        value: &BigInteger,
    ) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.big_integer(value)?;
        Ok(())
    }

    fn write_big_decimal(
        &mut self,
        schema: &SchemaRef,
        value: &BigDecimal,
    ) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.big_decimal(value)?;
        Ok(())
    }

    fn write_string(&mut self, schema: &SchemaRef, value: &str) -> Result<(), SerdeError> {
        // A string in key position is the map key itself.
        if let Some(Ctx::Map { at_key, .. }) = self.stack.last_mut() {
            if *at_key {
                *at_key = false;
                self.encoder.str(value)?;
                return Ok(());
            }
        }
        self.before_value(schema)?;
        self.encoder.str(value)?;
        Ok(())
    }

    fn write_blob(&mut self, schema: &SchemaRef, value: &Blob) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.blob(value)?;
        Ok(())
    }

    fn write_timestamp(&mut self, schema: &SchemaRef, value: &DateTime) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.timestamp(value)?;
        Ok(())
    }

    fn write_document(&mut self, schema: &SchemaRef, value: &Document) -> Result<(), SerdeError> {
        document::serialize_document(self, schema, value)
    }

    fn write_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        self.before_value(schema)?;
        self.encoder.null()?;
        Ok(())
    }
}
