/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::serde::ShapeSerializer;
use crate::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

/// A serializer that accepts every shape kind and writes nothing.
///
/// Useful where a callee demands a serializer but no output is wanted.
#[derive(Debug, Default)]
pub struct NullSerializer;

impl NullSerializer {
    /// Creates a new `NullSerializer`.
    pub fn new() -> Self {
        Self
    }
}

impl ShapeSerializer for NullSerializer {
    fn write_struct<F>(&mut self, _schema: &SchemaRef, members: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        members(self)
    }

    fn write_list<F>(
        &mut self,
        _schema: &SchemaRef,
        _size: Option<usize>,
        elements: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        elements(self)
    }

    fn write_map<F>(
        &mut self,
        _schema: &SchemaRef,
        _size: Option<usize>,
        entries: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        entries(self)
    }

    fn write_boolean(&mut self, _schema: &SchemaRef, _value: bool) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_byte(&mut self, _schema: &SchemaRef, _value: i8) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_short(&mut self, _schema: &SchemaRef, _value: i16) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_integer(&mut self, _schema: &SchemaRef, _value: i32) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_long(&mut self, _schema: &SchemaRef, _value: i64) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_float(&mut self, _schema: &SchemaRef, _value: f32) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_double(&mut self, _schema: &SchemaRef, _value: f64) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_big_integer(
        &mut self,
        _schema: &SchemaRef,
        _value: &BigInteger,
    ) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_big_decimal(
        &mut self,
        _schema: &SchemaRef,
        _value: &BigDecimal,
    ) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_string(&mut self, _schema: &SchemaRef, _value: &str) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_blob(&mut self, _schema: &SchemaRef, _value: &Blob) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_timestamp(
        &mut self,
        _schema: &SchemaRef,
        _value: &DateTime,
    ) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_document(
        &mut self,
        _schema: &SchemaRef,
        _value: &Document,
    ) -> Result<(), SerdeError> {
        Ok(())
    }

    fn write_null(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude;

    #[test]
    fn accepts_everything() {
        let mut ser = NullSerializer::new();
        ser.write_string(&prelude::STRING, "ignored").unwrap();
        ser.write_integer(&prelude::INTEGER, 42).unwrap();
        ser.write_list(&prelude::STRING, Some(1), |s| {
            s.write_string(&prelude::STRING, "inner")
        })
        .unwrap();
        ser.write_null(&prelude::STRING).unwrap();
    }
}
