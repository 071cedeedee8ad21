/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use quiver_schema::serde::ShapeSerializer;
use quiver_schema::{SchemaRef, SerdeError};

/// Serializes a query-params map member: a string-to-string or
/// string-to-string-list map staged for merging into the query multimap.
///
/// Map entries arrive as alternating key and value string writes; a
/// string-list value keeps the current key for each element.
#[derive(Debug, Default)]
pub(crate) struct QueryParamsSerializer {
    staged: Vec<(String, String)>,
    key: Option<String>,
    in_list: bool,
}

impl QueryParamsSerializer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin_value_list(&mut self) -> Result<(), SerdeError> {
        if self.key.is_none() {
            return Err(SerdeError::mismatch(
                "a query-params list must be a map value",
            ));
        }
        self.in_list = true;
        Ok(())
    }

    pub(crate) fn end_value_list(&mut self) {
        self.in_list = false;
        self.key = None;
    }

    /// Drains the staged parameters.
    pub(crate) fn take_staged(&mut self) -> Vec<(String, String)> {
        self.key = None;
        self.in_list = false;
        std::mem::take(&mut self.staged)
    }
}

impl ShapeSerializer for QueryParamsSerializer {
    quiver_schema::reject_shape_writes!(
        structure list map document boolean byte short integer long float double big_integer
            big_decimal blob timestamp
    );

    fn write_string(&mut self, _schema: &SchemaRef, value: &str) -> Result<(), SerdeError> {
        match &self.key {
            None => {
                self.key = Some(value.to_string());
            }
            Some(key) => {
                self.staged.push((key.clone(), value.to_string()));
                if !self.in_list {
                    self.key = None;
                }
            }
        }
        Ok(())
    }

    fn write_null(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        self.key = None;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::prelude;

    #[test]
    fn alternating_keys_and_values() {
        let mut ser = QueryParamsSerializer::new();
        ser.write_string(&prelude::STRING, "a").unwrap();
        ser.write_string(&prelude::STRING, "1").unwrap();
        ser.write_string(&prelude::STRING, "b").unwrap();
        ser.write_string(&prelude::STRING, "2").unwrap();
        assert_eq!(
            ser.take_staged(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn list_values_share_the_key() {
        let mut ser = QueryParamsSerializer::new();
        ser.write_string(&prelude::STRING, "tag").unwrap();
        ser.begin_value_list().unwrap();
        ser.write_string(&prelude::STRING, "x").unwrap();
        ser.write_string(&prelude::STRING, "y").unwrap();
        ser.end_value_list();
        assert_eq!(
            ser.take_staged(),
            vec![
                ("tag".to_string(), "x".to_string()),
                ("tag".to_string(), "y".to_string()),
            ]
        );
    }
}
