/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::serde::{document, ShapeSerializer};
use crate::{SchemaRef, SerdeError, TraitKey};
use quiver_types::date_time::Format;
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

/// A serializer that renders shapes to a human-readable string.
///
/// Structures render as `Name[member=value, ...]`, lists as `[a, b]`, maps as
/// `{key=value}`. Blobs render as lowercase two-digit hex. Values carrying
/// the `sensitive` trait render as `*REDACTED*`.
#[derive(Debug, Default)]
pub struct FmtSerializer {
    out: String,
    stack: Vec<Ctx>,
    redacting: usize,
}

#[derive(Debug)]
enum Ctx {
    Struct { first: bool },
    List { first: bool },
    Map { first: bool, at_key: bool },
}

impl FmtSerializer {
    /// Creates a new `FmtSerializer`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rendered string.
    pub fn finish(self) -> String {
        self.out
    }

    // Emits separators and member prefixes owed before a value, and reports
    // whether the value itself should be rendered.
    fn begin_value(&mut self, schema: &SchemaRef) -> bool {
        if self.redacting > 0 {
            return false;
        }
        match self.stack.last_mut() {
            Some(Ctx::Struct { first }) => {
                if !std::mem::take(first) {
                    self.out.push_str(", ");
                }
                if let Some(name) = schema.member_name() {
                    self.out.push_str(name);
                }
                self.out.push('=');
            }
            Some(Ctx::List { first }) => {
                if !std::mem::take(first) {
                    self.out.push_str(", ");
                }
            }
            Some(Ctx::Map { first, at_key }) => {
                if *at_key {
                    if !std::mem::take(first) {
                        self.out.push_str(", ");
                    }
                } else {
                    self.out.push('=');
                }
                *at_key = !*at_key;
            }
            None => {}
        }
        if schema.has_trait(TraitKey::Sensitive) {
            self.out.push_str("*REDACTED*");
            return false;
        }
        true
    }

    fn push_scalar(&mut self, schema: &SchemaRef, render: impl FnOnce(&mut String)) {
        if self.begin_value(schema) {
            render(&mut self.out);
        }
    }
}

impl ShapeSerializer for FmtSerializer {
    fn write_struct<F>(&mut self, schema: &SchemaRef, members: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        let visible = self.begin_value(schema);
        if !visible {
            self.redacting += 1;
        } else {
            if let Some(name) = schema.resolve().id().shape_name() {
                self.out.push_str(name);
            }
            self.out.push('[');
        }
        self.stack.push(Ctx::Struct { first: true });
        let result = members(self);
        self.stack.pop();
        if !visible {
            self.redacting -= 1;
        } else {
            self.out.push(']');
        }
        result
    }

    fn write_list<F>(
        &mut self,
        schema: &SchemaRef,
        _size: Option<usize>,
        elements: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        let visible = self.begin_value(schema);
        if !visible {
            self.redacting += 1;
        } else {
            self.out.push('[');
        }
        self.stack.push(Ctx::List { first: true });
        let result = elements(self);
        self.stack.pop();
        if !visible {
            self.redacting -= 1;
        } else {
            self.out.push(']');
        }
        result
    }

    fn write_map<F>(
        &mut self,
        schema: &SchemaRef,
        _size: Option<usize>,
        entries: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        let visible = self.begin_value(schema);
        if !visible {
            self.redacting += 1;
        } else {
            self.out.push('{');
        }
        self.stack.push(Ctx::Map {
            first: true,
            at_key: true,
        });
        let result = entries(self);
        self.stack.pop();
        if !visible {
            self.redacting -= 1;
        } else {
            self.out.push('}');
        }
        result
    }

    fn write_boolean(&mut self, schema: &SchemaRef, value: bool) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| {
            out.push_str(if value { "true" } else { "false" })
        });
        Ok(())
    }

    fn write_byte(&mut self, schema: &SchemaRef, value: i8) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(&value.to_string()));
        Ok(())
    }

    fn write_short(&mut self, schema: &SchemaRef, value: i16) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(&value.to_string()));
        Ok(())
    }

    fn write_integer(&mut self, schema: &SchemaRef, value: i32) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(&value.to_string()));
        Ok(())
    }

    fn write_long(&mut self, schema: &SchemaRef, value: i64) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(&value.to_string()));
        Ok(())
    }

    fn write_float(&mut self, schema: &SchemaRef, value: f32) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(&value.to_string()));
        Ok(())
    }

    fn write_double(&mut self, schema: &SchemaRef, value: f64) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(&value.to_string()));
        Ok(())
    }

    fn write_big_integer(
        &mut self,
        schema: &SchemaRef,
        value: &BigInteger,
    ) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(&value.to_string()));
        Ok(())
    }

    fn write_big_decimal(
        &mut self,
        schema: &SchemaRef,
        value: &BigDecimal,
    ) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(&value.to_string()));
        Ok(())
    }

    fn write_string(&mut self, schema: &SchemaRef, value: &str) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str(value));
        Ok(())
    }

    fn write_blob(&mut self, schema: &SchemaRef, value: &Blob) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| {
            for byte in value.as_ref() {
                out.push_str(&format!("{:02x}", byte));
            }
        });
        Ok(())
    }

    fn write_timestamp(&mut self, schema: &SchemaRef, value: &DateTime) -> Result<(), SerdeError> {
        let rendered = value
            .fmt(Format::DateTime)
            .unwrap_or_else(|_| format!("{}", value.as_secs_f64()));
        self.push_scalar(schema, |out| out.push_str(&rendered));
        Ok(())
    }

    fn write_document(&mut self, schema: &SchemaRef, value: &Document) -> Result<(), SerdeError> {
        document::serialize_document(self, schema, value)
    }

    fn write_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        self.push_scalar(schema, |out| out.push_str("null"));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{prelude, Schema, ShapeId, Trait};

    fn person() -> SchemaRef {
        Schema::structure_builder(ShapeId::new("com.example#Person"))
            .member("name", &prelude::STRING, vec![])
            .member("age", &prelude::INTEGER, vec![])
            .build()
    }

    #[test]
    fn renders_structs() {
        let schema = person();
        let mut ser = FmtSerializer::new();
        ser.write_struct(&schema, |s| {
            s.write_string(schema.member("name").unwrap(), "Ada")?;
            s.write_integer(schema.member("age").unwrap(), 36)
        })
        .unwrap();
        assert_eq!(ser.finish(), "Person[name=Ada, age=36]");
    }

    #[test]
    fn renders_lists_and_maps() {
        let mut ser = FmtSerializer::new();
        ser.write_list(&prelude::STRING, Some(2), |s| {
            s.write_string(&prelude::STRING, "a")?;
            s.write_string(&prelude::STRING, "b")
        })
        .unwrap();
        assert_eq!(ser.finish(), "[a, b]");

        let mut ser = FmtSerializer::new();
        ser.write_map(&prelude::STRING, Some(1), |s| {
            s.write_string(&prelude::STRING, "k")?;
            s.write_integer(&prelude::INTEGER, 1)
        })
        .unwrap();
        assert_eq!(ser.finish(), "{k=1}");
    }

    #[test]
    fn renders_blob_as_unsigned_hex() {
        let mut ser = FmtSerializer::new();
        // 0x80 and above must render as two-digit unsigned hex.
        ser.write_blob(&prelude::BLOB, &Blob::new(vec![0x00, 0x7f, 0x80, 0xff]))
            .unwrap();
        assert_eq!(ser.finish(), "007f80ff");
    }

    #[test]
    fn redacts_sensitive_members() {
        let secret = Schema::scalar(
            ShapeId::new("com.example#Password"),
            crate::ShapeType::String,
            vec![Trait::Sensitive],
        );
        let schema = Schema::structure_builder(ShapeId::new("com.example#Login"))
            .member("user", &prelude::STRING, vec![])
            .member("password", &secret, vec![])
            .build();
        let mut ser = FmtSerializer::new();
        ser.write_struct(&schema, |s| {
            s.write_string(schema.member("user").unwrap(), "ada")?;
            s.write_string(schema.member("password").unwrap(), "hunter2")
        })
        .unwrap();
        assert_eq!(ser.finish(), "Login[user=ada, password=*REDACTED*]");
    }
}
