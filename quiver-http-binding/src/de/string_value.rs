/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The basic string-value deserializer underlying header, query, label, and
//! status reads.

use quiver_schema::serde::ShapeDeserializer;
use quiver_schema::{SchemaRef, SerdeError, ShapeType, TraitKey};
use quiver_types::date_time::Format;
use quiver_types::{base64, BigDecimal, BigInteger, Blob, DateTime, Document};
use std::str::FromStr;

/// Parses shapes from the string values of a single transport location.
///
/// Holds one value for a scalar member, or the already-split element values
/// of a list member. Each read consumes one value.
#[derive(Debug)]
pub(crate) struct StringValueDeserializer {
    values: Vec<String>,
    position: usize,
    default_timestamp: Format,
}

impl StringValueDeserializer {
    /// A deserializer over a single value.
    pub(crate) fn single(value: String, default_timestamp: Format) -> Self {
        Self {
            values: vec![value],
            position: 0,
            default_timestamp,
        }
    }

    /// A deserializer over pre-split element values.
    pub(crate) fn multi(values: Vec<String>, default_timestamp: Format) -> Self {
        Self {
            values,
            position: 0,
            default_timestamp,
        }
    }

    /// A deserializer for a member, given the raw values of its location.
    ///
    /// List members split each raw value on commas; list elements that are
    /// http-date timestamps are re-joined pairwise, since that format itself
    /// contains a comma.
    pub(crate) fn for_member(
        member: &SchemaRef,
        raw_values: Vec<String>,
        default_timestamp: Format,
    ) -> Self {
        if member.resolve().shape_type() != ShapeType::List {
            return Self::multi(raw_values, default_timestamp);
        }
        let mut values: Vec<String> = raw_values
            .iter()
            .flat_map(|raw| raw.split(','))
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let element_is_http_date = member
            .resolve()
            .list_member()
            .map(|element| {
                element.resolve().shape_type() == ShapeType::Timestamp
                    && crate::ser::value::timestamp_format(member, default_timestamp)
                        == Format::HttpDate
            })
            .unwrap_or(false);
        if element_is_http_date {
            values = values
                .chunks(2)
                .map(|pair| pair.join(", "))
                .collect();
        }
        Self::multi(values, default_timestamp)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.values.len() - self.position
    }

    fn next_value(&mut self) -> Result<&str, SerdeError> {
        let value = self
            .values
            .get(self.position)
            .ok_or_else(|| SerdeError::mismatch("expected another value"))?;
        self.position += 1;
        Ok(value)
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T, SerdeError> {
        let value = self.next_value()?;
        value
            .parse()
            .map_err(|_| SerdeError::mismatch(format!("`{}` is not a valid {}", value, what)))
    }
}

impl ShapeDeserializer for StringValueDeserializer {
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
            "structures cannot be deserialized from strings",
        ))
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
        while self.remaining() > 0 {
            state = consumer(state, self)?;
        }
        Ok(state)
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
            "maps cannot be deserialized from strings",
        ))
    }

    fn read_boolean(&mut self, _schema: &SchemaRef) -> Result<bool, SerdeError> {
        self.parse("boolean")
    }

    fn read_byte(&mut self, _schema: &SchemaRef) -> Result<i8, SerdeError> {
        self.parse("byte")
    }

    fn read_short(&mut self, _schema: &SchemaRef) -> Result<i16, SerdeError> {
        self.parse("short")
    }

    fn read_integer(&mut self, _schema: &SchemaRef) -> Result<i32, SerdeError> {
        self.parse("integer")
    }

    fn read_long(&mut self, _schema: &SchemaRef) -> Result<i64, SerdeError> {
        self.parse("long")
    }

    fn read_float(&mut self, _schema: &SchemaRef) -> Result<f32, SerdeError> {
        match self.next_value()? {
            "NaN" => Ok(f32::NAN),
            "Infinity" => Ok(f32::INFINITY),
            "-Infinity" => Ok(f32::NEG_INFINITY),
            value => value
                .parse()
                .map_err(|_| SerdeError::mismatch(format!("`{}` is not a valid float", value))),
        }
    }

    fn read_double(&mut self, _schema: &SchemaRef) -> Result<f64, SerdeError> {
        match self.next_value()? {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            value => value
                .parse()
                .map_err(|_| SerdeError::mismatch(format!("`{}` is not a valid double", value))),
        }
    }

    fn read_big_integer(&mut self, _schema: &SchemaRef) -> Result<BigInteger, SerdeError> {
        self.parse("big integer")
    }

    fn read_big_decimal(&mut self, _schema: &SchemaRef) -> Result<BigDecimal, SerdeError> {
        self.parse("big decimal")
    }

    fn read_string(&mut self, schema: &SchemaRef) -> Result<String, SerdeError> {
        let value = self.next_value()?.to_string();
        if schema.has_trait(TraitKey::MediaType) {
            let decoded = base64::decode(&value)
                .map_err(|err| SerdeError::mismatch(format!("invalid base64: {}", err)))?;
            String::from_utf8(decoded)
                .map_err(|_| SerdeError::mismatch("media-typed string is not valid utf-8"))
        } else {
            Ok(value)
        }
    }

    fn read_blob(&mut self, _schema: &SchemaRef) -> Result<Blob, SerdeError> {
        let value = self.next_value()?;
        base64::decode(value)
            .map(Blob::new)
            .map_err(|err| SerdeError::mismatch(format!("invalid base64: {}", err)))
    }

    fn read_timestamp(&mut self, schema: &SchemaRef) -> Result<DateTime, SerdeError> {
        let format = crate::ser::value::timestamp_format(schema, self.default_timestamp);
        let value = self.next_value()?;
        match format {
            Format::EpochSeconds => DateTime::from_str(value, Format::EpochSeconds)
                .map_err(|_| {
                    SerdeError::timestamp_type(format!(
                        "expected an epoch-seconds number, found `{}`",
                        value
                    ))
                }),
            other => DateTime::from_str(value, other)
                .map_err(|err| SerdeError::mismatch(err.to_string())),
        }
    }

    fn read_document(&mut self, _schema: &SchemaRef) -> Result<Document, SerdeError> {
        Err(SerdeError::mismatch(
            "documents cannot be deserialized from strings",
        ))
    }

    fn read_null(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        self.next_value()?;
        Ok(())
    }

    fn is_null(&mut self) -> bool {
        self.values
            .get(self.position)
            .map(|value| value.is_empty())
            .unwrap_or(true)
    }

    fn container_size(&mut self) -> Option<usize> {
        Some(self.remaining())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::{prelude, Schema, ShapeId, Trait};

    #[test]
    fn parses_scalars() {
        let mut de = StringValueDeserializer::single("true".to_string(), Format::HttpDate);
        assert!(de.read_boolean(&prelude::BOOLEAN).unwrap());

        let mut de = StringValueDeserializer::single("-123".to_string(), Format::HttpDate);
        assert_eq!(de.read_integer(&prelude::INTEGER).unwrap(), -123);

        let mut de = StringValueDeserializer::single("NaN".to_string(), Format::HttpDate);
        assert!(de.read_double(&prelude::DOUBLE).unwrap().is_nan());

        let mut de = StringValueDeserializer::single("AQIDBA==".to_string(), Format::HttpDate);
        assert_eq!(de.read_blob(&prelude::BLOB).unwrap().as_ref(), [1, 2, 3, 4]);
    }

    #[test]
    fn list_members_split_on_commas() {
        let list = Schema::list(ShapeId::new("com.example#Tags"), vec![], &prelude::STRING);
        let schema = Schema::structure_builder(ShapeId::new("com.example#In"))
            .member(
                "tags",
                &list,
                vec![Trait::HttpHeader("x-tags".to_string())],
            )
            .build();
        let member = schema.member("tags").unwrap();

        let mut de = StringValueDeserializer::for_member(
            member,
            vec!["a, b".to_string(), "c".to_string()],
            Format::HttpDate,
        );
        let tags = de
            .read_list(member, Vec::new(), |mut tags, de| {
                tags.push(de.read_string(&prelude::STRING)?);
                Ok(tags)
            })
            .unwrap();
        assert_eq!(tags, ["a", "b", "c"]);
    }

    #[test]
    fn http_date_lists_rejoin_pairs() {
        let list = Schema::list(
            ShapeId::new("com.example#Dates"),
            vec![],
            &prelude::TIMESTAMP,
        );
        let schema = Schema::structure_builder(ShapeId::new("com.example#In"))
            .member(
                "dates",
                &list,
                vec![Trait::HttpHeader("x-dates".to_string())],
            )
            .build();
        let member = schema.member("dates").unwrap();

        let mut de = StringValueDeserializer::for_member(
            member,
            vec!["Tue, 14 Nov 2023 22:13:20 GMT, Wed, 15 Nov 2023 00:00:00 GMT".to_string()],
            Format::HttpDate,
        );
        let dates = de
            .read_list(member, Vec::new(), |mut dates, de| {
                dates.push(de.read_timestamp(&prelude::TIMESTAMP)?);
                Ok(dates)
            })
            .unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0], DateTime::from_secs(1_700_000_000));
    }

    #[test]
    fn epoch_seconds_strings_are_timestamp_type_errors() {
        let member = Schema::scalar(
            ShapeId::new("com.example#At"),
            ShapeType::Timestamp,
            vec![Trait::TimestampFormat(Format::EpochSeconds)],
        );
        let mut de =
            StringValueDeserializer::single("tomorrow".to_string(), Format::HttpDate);
        let err = de.read_timestamp(&member).unwrap_err();
        assert_eq!(err.kind(), quiver_schema::ErrorKind::TimestampTypeError);
    }
}
