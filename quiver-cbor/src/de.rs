/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The CBOR realization of the shape deserializer protocol.

use crate::codec::CborSettings;
use crate::decode::{Decoder, Type};
use quiver_schema::serde::ShapeDeserializer;
use quiver_schema::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document, Number};
use std::collections::HashMap;

/// Deserializes shapes from CBOR bytes.
///
/// Drives the caller's consumers from the wire: definite-length containers
/// iterate a counter, indefinite-length containers iterate to the break byte.
/// Map keys not present in the schema are skipped. Tags outside the supported
/// set are transparently unwrapped.
#[derive(Debug)]
pub struct CborDeserializer<'de> {
    decoder: Decoder<'de>,
    settings: CborSettings,
}

impl<'de> CborDeserializer<'de> {
    /// Creates a deserializer over `input` with default settings.
    pub fn new(input: &'de [u8]) -> Self {
        Self::with_settings(input, CborSettings::default())
    }

    /// Creates a deserializer over `input`.
    pub fn with_settings(input: &'de [u8], settings: CborSettings) -> Self {
        Self {
            decoder: Decoder::new(input),
            settings,
        }
    }

    fn decode_document(&mut self) -> Result<Document, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        match self.decoder.datatype()? {
            Type::Bool => Ok(Document::Boolean(self.decoder.boolean()?)),
            Type::Null | Type::Undefined => {
                self.decoder.skip()?;
                Ok(Document::Null)
            }
            Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16 | Type::I32
            | Type::I64 | Type::Int => {
                let value = self.decoder.big_integer()?;
                match value.to_i128() {
                    Some(v) if v >= 0 && v <= u64::MAX as i128 => {
                        Ok(Document::Number(Number::PosInt(v as u64)))
                    }
                    Some(v) if v >= i64::MIN as i128 && v < 0 => {
                        Ok(Document::Number(Number::NegInt(v as i64)))
                    }
                    _ => Ok(Document::BigInteger(value)),
                }
            }
            Type::F16 | Type::F32 | Type::F64 => {
                Ok(Document::Number(Number::Float(self.decoder.double()?)))
            }
            Type::Bytes | Type::BytesIndef => Ok(Document::Blob(self.decoder.blob()?)),
            Type::String | Type::StringIndef => Ok(Document::String(self.decoder.string()?)),
            Type::Array | Type::ArrayIndef => {
                let mut items = Vec::new();
                match self.decoder.list()? {
                    Some(len) => {
                        items.reserve(len as usize);
                        for _ in 0..len {
                            items.push(self.decode_document()?);
                        }
                    }
                    None => loop {
                        if self.decoder.datatype()? == Type::Break {
                            self.decoder.consume_break()?;
                            break;
                        }
                        items.push(self.decode_document()?);
                    },
                }
                Ok(Document::List(items))
            }
            Type::Map | Type::MapIndef => {
                let mut entries = HashMap::new();
                match self.decoder.map()? {
                    Some(len) => {
                        for _ in 0..len {
                            let key = self.decoder.string()?;
                            entries.insert(key, self.decode_document()?);
                        }
                    }
                    None => loop {
                        if self.decoder.datatype()? == Type::Break {
                            self.decoder.consume_break()?;
                            break;
                        }
                        let key = self.decoder.string()?;
                        entries.insert(key, self.decode_document()?);
                    },
                }
                Ok(Document::Map(entries))
            }
            Type::Tag => {
                // skip_unknown_tags left a semantically-known tag in place.
                let mut probe = self.decoder.clone();
                let tag = probe.tag()?;
                if tag == minicbor::data::IanaTag::Timestamp.tag() {
                    Ok(Document::Timestamp(
                        self.decoder.timestamp(self.settings.strict_timestamps())?,
                    ))
                } else if tag == minicbor::data::IanaTag::Decimal.tag() {
                    Ok(Document::BigDecimal(self.decoder.big_decimal()?))
                } else {
                    Ok(Document::BigInteger(self.decoder.big_integer()?))
                }
            }
            other => Err(SerdeError::mismatch(format!(
                "cannot decode a document from {:?}",
                other
            ))),
        }
    }
}

impl ShapeDeserializer for CborDeserializer<'_> {
    fn read_struct<T, F>(
        &mut self,
        schema: &SchemaRef,
        mut state: T,
        mut consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, &SchemaRef, &mut Self) -> Result<T, SerdeError>,
    {
        self.decoder.skip_unknown_tags()?;
        // A member schema (a structure-typed payload member) resolves to its
        // target so member lookup sees the real structure.
        let schema = schema.resolve();
        match self.decoder.map()? {
            Some(len) => {
                for _ in 0..len {
                    let key = self.decoder.str()?;
                    match schema.member(key) {
                        Some(member) => {
                            let member = member.clone();
                            state = consumer(state, &member, self)?;
                        }
                        None => {
                            tracing::debug!(member = key, schema = %schema.id(), "skipping unknown member");
                            self.decoder.skip()?;
                        }
                    }
                }
            }
            None => loop {
                if self.decoder.datatype()? == Type::Break {
                    self.decoder.consume_break()?;
                    break;
                }
                let key = self.decoder.str()?;
                match schema.member(key) {
                    Some(member) => {
                        let member = member.clone();
                        state = consumer(state, &member, self)?;
                    }
                    None => {
                        tracing::debug!(member = key, schema = %schema.id(), "skipping unknown member");
                        self.decoder.skip()?;
                    }
                }
            },
        }
        Ok(state)
    }

    fn read_list<T, F>(
        &mut self,
        _schema: &SchemaRef,
        mut state: T,
        mut consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, &mut Self) -> Result<T, SerdeError>,
    {
        self.decoder.skip_unknown_tags()?;
        match self.decoder.list()? {
            Some(len) => {
                for _ in 0..len {
                    state = consumer(state, self)?;
                }
            }
            None => loop {
                if self.decoder.datatype()? == Type::Break {
                    self.decoder.consume_break()?;
                    break;
                }
                state = consumer(state, self)?;
            },
        }
        Ok(state)
    }

    fn read_string_map<T, F>(
        &mut self,
        _schema: &SchemaRef,
        mut state: T,
        mut consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, String, &mut Self) -> Result<T, SerdeError>,
    {
        self.decoder.skip_unknown_tags()?;
        match self.decoder.map()? {
            Some(len) => {
                for _ in 0..len {
                    let key = self.decoder.string()?;
                    state = consumer(state, key, self)?;
                }
            }
            None => loop {
                if self.decoder.datatype()? == Type::Break {
                    self.decoder.consume_break()?;
                    break;
                }
                let key = self.decoder.string()?;
                state = consumer(state, key, self)?;
            },
        }
        Ok(state)
    }

    fn read_boolean(&mut self, _schema: &SchemaRef) -> Result<bool, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.boolean()
    }

    fn read_byte(&mut self, _schema: &SchemaRef) -> Result<i8, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.byte()
    }

    fn read_short(&mut self, _schema: &SchemaRef) -> Result<i16, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.short()
    }

    fn read_integer(&mut self, _schema: &SchemaRef) -> Result<i32, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.integer()
    }

    fn read_long(&mut self, _schema: &SchemaRef) -> Result<i64, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.long()
    }

    fn read_float(&mut self, _schema: &SchemaRef) -> Result<f32, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.float()
    }

    fn read_double(&mut self, _schema: &SchemaRef) -> Result<f64, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.double()
    }

    fn read_big_integer(&mut self, _schema: &SchemaRef) -> Result<BigInteger, SerdeError> {
        self.decoder.big_integer()
    }

    fn read_big_decimal(&mut self, _schema: &SchemaRef) -> Result<BigDecimal, SerdeError> {
        self.decoder.big_decimal()
    }

    fn read_string(&mut self, _schema: &SchemaRef) -> Result<String, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.string()
    }

    fn read_blob(&mut self, _schema: &SchemaRef) -> Result<Blob, SerdeError> {
        self.decoder.skip_unknown_tags()?;
        self.decoder.blob()
    }

    fn read_timestamp(&mut self, _schema: &SchemaRef) -> Result<DateTime, SerdeError> {
        self.decoder.timestamp(self.settings.strict_timestamps())
    }

    fn read_document(&mut self, _schema: &SchemaRef) -> Result<Document, SerdeError> {
        self.decode_document()
    }

    fn read_null(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        self.decoder.null()
    }

    fn is_null(&mut self) -> bool {
        matches!(self.decoder.datatype(), Ok(Type::Null))
    }

    fn container_size(&mut self) -> Option<usize> {
        let mut probe = self.decoder.clone();
        match probe.datatype().ok()? {
            Type::Array | Type::ArrayIndef => probe.list().ok()?.map(|len| len as usize),
            Type::Map | Type::MapIndef => probe.map().ok()?.map(|len| len as usize),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::{prelude, Schema, ShapeId};

    #[test]
    fn reads_structs_in_any_member_order() {
        let schema = Schema::structure_builder(ShapeId::new("com.example#Person"))
            .member("name", &prelude::STRING, vec![])
            .member("age", &prelude::INTEGER, vec![])
            .build();
        let bytes = [
            0xBF, 0x63, b'a', b'g', b'e', 0x18, 0x24, 0x64, b'n', b'a', b'm', b'e', 0x63, b'A',
            b'd', b'a', 0xFF,
        ];

        let mut de = CborDeserializer::new(&bytes);
        let (name, age) = de
            .read_struct(&schema, (None, None), |mut state, member, de| {
                match member.member_name() {
                    Some("name") => state.0 = Some(de.read_string(member)?),
                    Some("age") => state.1 = Some(de.read_integer(member)?),
                    _ => {}
                }
                Ok(state)
            })
            .unwrap();
        assert_eq!(name.as_deref(), Some("Ada"));
        assert_eq!(age, Some(36));
    }

    #[test]
    fn skips_unknown_members() {
        let schema = Schema::structure_builder(ShapeId::new("com.example#Person"))
            .member("age", &prelude::INTEGER, vec![])
            .build();
        let bytes = [
            0xBF, // indefinite map
            0x65, b'e', b'x', b't', b'r', b'a', 0x82, 0x01, 0x02, // extra: [1, 2]
            0x63, b'a', b'g', b'e', 0x05, // age: 5
            0xFF,
        ];
        let mut de = CborDeserializer::new(&bytes);
        let age = de
            .read_struct(&schema, None, |_, member, de| {
                Ok(Some(de.read_integer(member)?))
            })
            .unwrap();
        assert_eq!(age, Some(5));
    }

    #[test]
    fn reads_definite_and_indefinite_lists() {
        let list = Schema::list(ShapeId::new("com.example#Ints"), vec![], &prelude::INTEGER);
        let element = list.list_member().unwrap().clone();

        for bytes in [&[0x82u8, 0x01, 0x02][..], &[0x9F, 0x01, 0x02, 0xFF][..]] {
            let mut de = CborDeserializer::new(bytes);
            let items = de
                .read_list(&list, Vec::new(), |mut items, de| {
                    items.push(de.read_integer(&element)?);
                    Ok(items)
                })
                .unwrap();
            assert_eq!(items, [1, 2]);
        }
    }

    #[test]
    fn sparse_lists_expose_nulls() {
        let list = Schema::list(ShapeId::new("com.example#Ints"), vec![], &prelude::INTEGER);
        let element = list.list_member().unwrap().clone();
        let bytes = [0x83, 0x01, 0xF6, 0x03];

        let mut de = CborDeserializer::new(&bytes);
        let items = de
            .read_list(&list, Vec::new(), |mut items, de| {
                if de.is_null() {
                    de.read_null(&element)?;
                    items.push(None);
                } else {
                    items.push(Some(de.read_integer(&element)?));
                }
                Ok(items)
            })
            .unwrap();
        assert_eq!(items, [Some(1), None, Some(3)]);
    }

    #[test]
    fn container_size_hint() {
        let mut de = CborDeserializer::new(&[0x82, 0x01, 0x02]);
        assert_eq!(de.container_size(), Some(2));
        let mut de = CborDeserializer::new(&[0x9F, 0xFF]);
        assert_eq!(de.container_size(), None);
    }

    #[test]
    fn documents_round_trip_discriminators() {
        use quiver_schema::serde::ShapeSerializer;
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert("__type".to_string(), Document::from("Weather"));
        map.insert("temp".to_string(), Document::from(72i64));
        let doc = Document::Map(map);

        let mut ser = crate::CborSerializer::new();
        ser.write_document(&prelude::DOCUMENT, &doc).unwrap();
        let bytes = ser.finish();

        let mut de = CborDeserializer::new(&bytes);
        let decoded = de.read_document(&prelude::DOCUMENT).unwrap();
        assert_eq!(decoded.discriminator(), Some("Weather"));
        assert_eq!(
            decoded.as_map().unwrap().get("temp"),
            Some(&Document::Number(Number::PosInt(72)))
        );
    }
}
