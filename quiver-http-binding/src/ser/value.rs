/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Scalar-to-string formatting shared by every location serializer.
//!
//! Booleans render as `true`/`false`, numbers as decimal, blobs as base64,
//! strings verbatim unless their shape carries a media type (then base64),
//! and timestamps per the member's format trait or the location's default.

use quiver_schema::{SchemaRef, SerdeError, TraitKey};
use quiver_types::date_time::Format;
use quiver_types::{base64, Blob, DateTime};

pub(crate) fn fmt_boolean(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

pub(crate) fn fmt_float(value: f32) -> String {
    fmt_double(value as f64)
}

pub(crate) fn fmt_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        value.to_string()
    }
}

pub(crate) fn fmt_string(schema: &SchemaRef, value: &str) -> String {
    // Media-type-tagged strings carry arbitrary content and are base64-coded.
    if schema.has_trait(TraitKey::MediaType) {
        base64::encode(value.as_bytes())
    } else {
        value.to_string()
    }
}

pub(crate) fn fmt_blob(value: &Blob) -> String {
    base64::encode(value.as_ref())
}

pub(crate) fn timestamp_format(schema: &SchemaRef, default: Format) -> Format {
    schema
        .get_trait(TraitKey::TimestampFormat)
        .and_then(|t| match t {
            quiver_schema::Trait::TimestampFormat(format) => Some(*format),
            _ => None,
        })
        .unwrap_or(default)
}

pub(crate) fn fmt_timestamp(
    schema: &SchemaRef,
    value: &DateTime,
    default: Format,
) -> Result<String, SerdeError> {
    value
        .fmt(timestamp_format(schema, default))
        .map_err(|err| SerdeError::protocol(err.to_string()))
}

// Generates the scalar `ShapeSerializer` methods of a location serializer:
// every scalar formats to a string and lands in the location's `accept`.
// Null writes mean an absent member and produce nothing.
macro_rules! string_scalar_writes {
    ($default_ts:expr) => {
        fn write_boolean(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: bool,
        ) -> Result<(), quiver_schema::SerdeError> {
            let value = crate::ser::value::fmt_boolean(value);
            self.accept(schema, value)
        }

        fn write_byte(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: i8,
        ) -> Result<(), quiver_schema::SerdeError> {
            self.accept(schema, value.to_string())
        }

        fn write_short(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: i16,
        ) -> Result<(), quiver_schema::SerdeError> {
            self.accept(schema, value.to_string())
        }

        fn write_integer(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: i32,
        ) -> Result<(), quiver_schema::SerdeError> {
            self.accept(schema, value.to_string())
        }

        fn write_long(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: i64,
        ) -> Result<(), quiver_schema::SerdeError> {
            self.accept(schema, value.to_string())
        }

        fn write_float(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: f32,
        ) -> Result<(), quiver_schema::SerdeError> {
            let value = crate::ser::value::fmt_float(value);
            self.accept(schema, value)
        }

        fn write_double(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: f64,
        ) -> Result<(), quiver_schema::SerdeError> {
            let value = crate::ser::value::fmt_double(value);
            self.accept(schema, value)
        }

        fn write_big_integer(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: &quiver_types::BigInteger,
        ) -> Result<(), quiver_schema::SerdeError> {
            self.accept(schema, value.to_string())
        }

        fn write_big_decimal(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: &quiver_types::BigDecimal,
        ) -> Result<(), quiver_schema::SerdeError> {
            self.accept(schema, value.to_string())
        }

        fn write_string(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: &str,
        ) -> Result<(), quiver_schema::SerdeError> {
            let value = crate::ser::value::fmt_string(schema, value);
            self.accept(schema, value)
        }

        fn write_blob(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: &quiver_types::Blob,
        ) -> Result<(), quiver_schema::SerdeError> {
            let value = crate::ser::value::fmt_blob(value);
            self.accept(schema, value)
        }

        fn write_timestamp(
            &mut self,
            schema: &quiver_schema::SchemaRef,
            value: &quiver_types::DateTime,
        ) -> Result<(), quiver_schema::SerdeError> {
            let value = crate::ser::value::fmt_timestamp(schema, value, $default_ts)?;
            self.accept(schema, value)
        }

        fn write_null(
            &mut self,
            _schema: &quiver_schema::SchemaRef,
        ) -> Result<(), quiver_schema::SerdeError> {
            Ok(())
        }
    };
}

pub(crate) use string_scalar_writes;

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::{prelude, Schema, ShapeId, ShapeType, Trait};

    #[test]
    fn formats_floats_like_java_numerics() {
        assert_eq!(fmt_double(3.5), "3.5");
        assert_eq!(fmt_double(f64::NAN), "NaN");
        assert_eq!(fmt_double(f64::INFINITY), "Infinity");
        assert_eq!(fmt_double(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn media_typed_strings_are_base64() {
        let tagged = Schema::scalar(
            ShapeId::new("com.example#Json"),
            ShapeType::String,
            vec![Trait::MediaType("application/json".to_string())],
        );
        assert_eq!(fmt_string(&tagged, "{}"), "e30=");
        assert_eq!(fmt_string(&prelude::STRING, "{}"), "{}");
    }

    #[test]
    fn timestamp_trait_overrides_location_default() {
        let member = Schema::scalar(
            ShapeId::new("com.example#At"),
            ShapeType::Timestamp,
            vec![Trait::TimestampFormat(Format::EpochSeconds)],
        );
        let dt = DateTime::from_secs(1_700_000_000);
        assert_eq!(
            fmt_timestamp(&member, &dt, Format::HttpDate).unwrap(),
            "1700000000.000"
        );
        assert_eq!(
            fmt_timestamp(&prelude::TIMESTAMP, &dt, Format::HttpDate).unwrap(),
            "Tue, 14 Nov 2023 22:13:20 GMT"
        );
    }
}
