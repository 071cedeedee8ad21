/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::headers::is_prefix_header_blocked;
use http::header::HeaderMap;
use quiver_schema::serde::ShapeDeserializer;
use quiver_schema::{SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};

/// Deserializes a prefix-headers map member.
///
/// Enumerates the headers sharing the member's prefix, stripping the prefix
/// from each key and skipping hop-by-hop and sensitive names.
#[derive(Debug)]
pub(crate) struct PrefixHeadersDeserializer<'a> {
    headers: &'a HeaderMap,
    prefix: String,
    current: Option<String>,
}

impl<'a> PrefixHeadersDeserializer<'a> {
    pub(crate) fn new(headers: &'a HeaderMap, prefix: &str) -> Self {
        Self {
            headers,
            prefix: prefix.to_ascii_lowercase(),
            current: None,
        }
    }

    fn take_current(&mut self) -> Result<String, SerdeError> {
        self.current
            .take()
            .ok_or_else(|| SerdeError::mismatch("no header value is being read"))
    }
}

macro_rules! string_only_reads {
    ($($method:ident -> $ty:ty),* $(,)?) => {
        $(
            fn $method(&mut self, _schema: &SchemaRef) -> Result<$ty, SerdeError> {
                Err(SerdeError::mismatch(
                    "prefix headers hold string values only",
                ))
            }
        )*
    };
}

impl ShapeDeserializer for PrefixHeadersDeserializer<'_> {
    fn read_struct<T, F>(
        &mut self,
        _schema: &SchemaRef,
        _state: T,
        _consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, &SchemaRef, &mut Self) -> Result<T, SerdeError>,
    {
        Err(SerdeError::mismatch("prefix headers bind to a map member"))
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
        Err(SerdeError::mismatch("prefix headers bind to a map member"))
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
        for (name, value) in self.headers.iter() {
            let name = name.as_str();
            if !name.starts_with(&self.prefix) || is_prefix_header_blocked(name) {
                continue;
            }
            let key = name[self.prefix.len()..].to_string();
            let value = value
                .to_str()
                .map_err(|_| {
                    SerdeError::protocol(format!("header `{}` is not valid utf-8", name))
                })?
                .to_string();
            self.current = Some(value);
            state = consumer(state, key, self)?;
        }
        Ok(state)
    }

    fn read_string(&mut self, _schema: &SchemaRef) -> Result<String, SerdeError> {
        self.take_current()
    }

    string_only_reads!(
        read_boolean -> bool,
        read_byte -> i8,
        read_short -> i16,
        read_integer -> i32,
        read_long -> i64,
        read_float -> f32,
        read_double -> f64,
        read_big_integer -> BigInteger,
        read_big_decimal -> BigDecimal,
        read_blob -> Blob,
        read_timestamp -> DateTime,
        read_document -> Document,
    );

    fn read_null(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        self.current = None;
        Ok(())
    }

    fn is_null(&mut self) -> bool {
        self.current.is_none()
    }

    fn container_size(&mut self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::prelude;
    use std::collections::HashMap;

    #[test]
    fn enumerates_matching_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-meta-owner", "ada".parse().unwrap());
        headers.insert("x-meta-team", "engines".parse().unwrap());
        headers.insert("x-other", "ignored".parse().unwrap());

        let mut de = PrefixHeadersDeserializer::new(&headers, "x-meta-");
        let map = de
            .read_string_map(&prelude::STRING, HashMap::new(), |mut map, key, de| {
                map.insert(key, de.read_string(&prelude::STRING)?);
                Ok(map)
            })
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["owner"], "ada");
        assert_eq!(map["team"], "engines");
    }

    #[test]
    fn blocklisted_headers_are_excluded() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "secret".parse().unwrap());
        headers.insert("auth-key", "value".parse().unwrap());

        // An empty prefix would otherwise sweep in everything.
        let mut de = PrefixHeadersDeserializer::new(&headers, "");
        let map = de
            .read_string_map(&prelude::STRING, HashMap::new(), |mut map, key, de| {
                map.insert(key, de.read_string(&prelude::STRING)?);
                Ok(map)
            })
            .unwrap();
        assert!(!map.contains_key("authorization"));
        assert_eq!(map["auth-key"], "value");
    }
}
