/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::headers::{header_name, header_value};
use http::header::{HeaderMap, HeaderName};
use quiver_schema::serde::ShapeSerializer;
use quiver_schema::{SchemaRef, SerdeError, Trait, TraitKey};
use quiver_types::date_time::Format;

/// Serializes header-bound members.
///
/// A scalar member becomes one header. A list member becomes a single header
/// whose value is the elements joined by `", "`. Timestamps default to the
/// http-date format.
#[derive(Debug, Default)]
pub(crate) struct HeaderValueSerializer {
    headers: HeaderMap,
    name: Option<HeaderName>,
    list: Option<Vec<String>>,
}

impl HeaderValueSerializer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Positions the serializer at a header-bound member.
    pub(crate) fn begin_member(&mut self, member: &SchemaRef) -> Result<(), SerdeError> {
        let name = match member.get_trait(TraitKey::HttpHeader) {
            Some(Trait::HttpHeader(name)) => name,
            _ => {
                return Err(SerdeError::protocol(format!(
                    "member `{}` has no header binding",
                    member.id()
                )))
            }
        };
        self.name = Some(header_name(name)?);
        Ok(())
    }

    pub(crate) fn begin_list(&mut self) {
        self.list = Some(Vec::new());
    }

    pub(crate) fn end_list(&mut self) -> Result<(), SerdeError> {
        if let Some(parts) = self.list.take() {
            if !parts.is_empty() {
                self.emit(parts.join(", "))?;
            }
        }
        Ok(())
    }

    fn emit(&mut self, value: String) -> Result<(), SerdeError> {
        let name = self
            .name
            .clone()
            .expect("begin_member positions the serializer before any write");
        self.headers.append(name, header_value(&value)?);
        Ok(())
    }

    fn accept(&mut self, _schema: &SchemaRef, value: String) -> Result<(), SerdeError> {
        match &mut self.list {
            Some(parts) => {
                parts.push(value);
                Ok(())
            }
            None => self.emit(value),
        }
    }

    pub(crate) fn into_headers(self) -> HeaderMap {
        self.headers
    }
}

impl ShapeSerializer for HeaderValueSerializer {
    quiver_schema::reject_shape_writes!(structure list map document);
    crate::ser::value::string_scalar_writes!(Format::HttpDate);
}

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::{prelude, Schema, ShapeId};
    use quiver_types::DateTime;

    fn member(name: &str) -> SchemaRef {
        let schema = Schema::structure_builder(ShapeId::new("com.example#In"))
            .member(
                "value",
                &prelude::TIMESTAMP,
                vec![Trait::HttpHeader(name.to_string())],
            )
            .build();
        schema.member("value").unwrap().clone()
    }

    #[test]
    fn scalar_headers() {
        let member = member("x-when");
        let mut ser = HeaderValueSerializer::new();
        ser.begin_member(&member).unwrap();
        ser.write_timestamp(&member, &DateTime::from_secs(1_700_000_000))
            .unwrap();
        let headers = ser.into_headers();
        assert_eq!(
            headers.get("x-when").unwrap(),
            "Tue, 14 Nov 2023 22:13:20 GMT"
        );
    }

    #[test]
    fn list_headers_join_with_comma_space() {
        let member = member("x-tags");
        let mut ser = HeaderValueSerializer::new();
        ser.begin_member(&member).unwrap();
        ser.begin_list();
        ser.write_string(&prelude::STRING, "a").unwrap();
        ser.write_string(&prelude::STRING, "b").unwrap();
        ser.end_list().unwrap();
        let headers = ser.into_headers();
        assert_eq!(headers.get_all("x-tags").iter().count(), 1);
        assert_eq!(headers.get("x-tags").unwrap(), "a, b");
    }

    #[test]
    fn empty_lists_emit_nothing() {
        let member = member("x-tags");
        let mut ser = HeaderValueSerializer::new();
        ser.begin_member(&member).unwrap();
        ser.begin_list();
        ser.end_list().unwrap();
        assert!(ser.into_headers().is_empty());
    }
}
