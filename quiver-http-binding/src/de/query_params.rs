/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::de::string_value::StringValueDeserializer;
use quiver_schema::serde::ShapeDeserializer;
use quiver_schema::{SchemaRef, SerdeError};
use quiver_types::date_time::Format;
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};
use std::collections::HashSet;

/// Deserializes a query-params map member from the parsed query multimap.
///
/// Parameters bound explicitly by query traits are excluded; the rest are
/// grouped by key in first-seen order, each group readable as a string or a
/// string list.
#[derive(Debug)]
pub(crate) struct QueryParamsDeserializer {
    groups: Vec<(String, Vec<String>)>,
    inner: Option<StringValueDeserializer>,
}

impl QueryParamsDeserializer {
    pub(crate) fn new(pairs: &[(String, String)], exclude: &HashSet<String>) -> Self {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for (key, value) in pairs {
            if exclude.contains(key) {
                continue;
            }
            match groups.iter_mut().find(|(existing, _)| existing == key) {
                Some((_, values)) => values.push(value.clone()),
                None => groups.push((key.clone(), vec![value.clone()])),
            }
        }
        Self {
            groups,
            inner: None,
        }
    }

    fn inner(&mut self) -> Result<&mut StringValueDeserializer, SerdeError> {
        self.inner
            .as_mut()
            .ok_or_else(|| SerdeError::mismatch("no query parameter is being read"))
    }
}

macro_rules! delegated_reads {
    ($($method:ident -> $ty:ty),* $(,)?) => {
        $(
            fn $method(&mut self, schema: &SchemaRef) -> Result<$ty, SerdeError> {
                self.inner()?.$method(schema)
            }
        )*
    };
}

impl ShapeDeserializer for QueryParamsDeserializer {
    fn read_struct<T, F>(
        &mut self,
        _schema: &SchemaRef,
        _state: T,
        _consumer: F,
    ) -> Result<T, SerdeError>
    where
        F: FnMut(T, &SchemaRef, &mut Self) -> Result<T, SerdeError>,
    {
        Err(SerdeError::mismatch("query params bind to a map member"))
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
        while self.inner()?.remaining() > 0 {
            state = consumer(state, self)?;
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
        for (key, values) in std::mem::take(&mut self.groups) {
            self.inner = Some(StringValueDeserializer::multi(values, Format::DateTime));
            state = consumer(state, key, self)?;
        }
        self.inner = None;
        Ok(state)
    }

    delegated_reads!(
        read_boolean -> bool,
        read_byte -> i8,
        read_short -> i16,
        read_integer -> i32,
        read_long -> i64,
        read_float -> f32,
        read_double -> f64,
        read_big_integer -> BigInteger,
        read_big_decimal -> BigDecimal,
        read_string -> String,
        read_blob -> Blob,
        read_timestamp -> DateTime,
        read_document -> Document,
    );

    fn read_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        self.inner()?.read_null(schema)
    }

    fn is_null(&mut self) -> bool {
        self.inner
            .as_mut()
            .map(|inner| inner.is_null())
            .unwrap_or(true)
    }

    fn container_size(&mut self) -> Option<usize> {
        self.inner.as_mut().and_then(|inner| inner.container_size())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::prelude;
    use std::collections::HashMap;

    #[test]
    fn groups_by_key_excluding_bound_params() {
        let pairs = vec![
            ("f".to_string(), "bound".to_string()),
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), "b".to_string()),
            ("q".to_string(), "x".to_string()),
        ];
        let exclude: HashSet<String> = ["f".to_string()].into_iter().collect();

        let mut de = QueryParamsDeserializer::new(&pairs, &exclude);
        let map = de
            .read_string_map(&prelude::STRING, HashMap::new(), |mut map, key, de| {
                let values =
                    de.read_list(&prelude::STRING, Vec::new(), |mut values, de| {
                        values.push(de.read_string(&prelude::STRING)?);
                        Ok(values)
                    })?;
                map.insert(key, values);
                Ok(map)
            })
            .unwrap();
        assert!(!map.contains_key("f"));
        assert_eq!(map["tag"], vec!["a", "b"]);
        assert_eq!(map["q"], vec!["x"]);
    }
}
