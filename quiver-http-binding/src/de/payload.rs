/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use bytes::Bytes;
use quiver_schema::serde::ShapeDeserializer;
use quiver_schema::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

/// Deserializes a blob or string payload member directly from the collected
/// message body.
#[derive(Debug)]
pub(crate) struct PayloadDeserializer {
    bytes: Bytes,
}

impl PayloadDeserializer {
    pub(crate) fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

macro_rules! payload_rejects {
    ($($method:ident -> $ty:ty),* $(,)?) => {
        $(
            fn $method(&mut self, _schema: &SchemaRef) -> Result<$ty, SerdeError> {
                Err(SerdeError::mismatch(
                    "the raw payload holds a blob or string only",
                ))
            }
        )*
    };
}

impl ShapeDeserializer for PayloadDeserializer {
    fn read_struct<T, F>(
        &mut self,
        _schema: &SchemaRef,
        _state: T,
        _consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, &SchemaRef, &mut Self) -> Result<T, SerdeError>,
    {
        Err(SerdeError::mismatch(
            "structure payloads are decoded by the payload codec",
        ))
    }

    fn read_list<T, F>(
        &mut self,
        _schema: &SchemaRef,
        _state: T,
        _consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, &mut Self) -> Result<T, SerdeError>,
    {
        Err(SerdeError::mismatch(
            "the raw payload holds a blob or string only",
        ))
    }

    fn read_string_map<T, F>(
        &mut self,
        _schema: &SchemaRef,
        _state: T,
        _consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, String, &mut Self) -> Result<T, SerdeError>,
    {
        Err(SerdeError::mismatch(
            "the raw payload holds a blob or string only",
        ))
    }

    fn read_string(&mut self, _schema: &SchemaRef) -> Result<String, SerdeError> {
        std::str::from_utf8(&self.bytes)
            .map(str::to_string)
            .map_err(|_| SerdeError::mismatch("the payload is not valid utf-8"))
    }

    fn read_blob(&mut self, _schema: &SchemaRef) -> Result<Blob, SerdeError> {
        Ok(Blob::new(self.bytes.to_vec()))
    }

    payload_rejects!(
        read_boolean -> bool,
        read_byte -> i8,
        read_short -> i16,
        read_integer -> i32,
        read_long -> i64,
        read_float -> f32,
        read_double -> f64,
        read_big_integer -> BigInteger,
        read_big_decimal -> BigDecimal,
        read_timestamp -> DateTime,
        read_document -> Document,
    );

    fn read_null(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        Ok(())
    }

    fn is_null(&mut self) -> bool {
        self.bytes.is_empty()
    }

    fn container_size(&mut self) -> Option<usize> {
        None
    }
}
