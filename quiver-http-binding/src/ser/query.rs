/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::query::QueryString;
use quiver_schema::serde::ShapeSerializer;
use quiver_schema::{SchemaRef, SerdeError, Trait, TraitKey};
use quiver_types::date_time::Format;

/// Serializes query-bound members into the ordered query multimap.
///
/// A list member writes one `key=value` pair per element under the same key.
/// Timestamps default to the date-time format.
#[derive(Debug, Default)]
pub(crate) struct QueryValueSerializer {
    query: QueryString,
    key: Option<String>,
}

impl QueryValueSerializer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records the query keys of every query-bound member up front, so later
    /// merged map parameters cannot shadow them regardless of member order.
    pub(crate) fn reserve_explicit_keys<'a>(&mut self, keys: impl Iterator<Item = &'a str>) {
        for key in keys {
            self.query.mark_explicit(key);
        }
    }

    /// Positions the serializer at a query-bound member.
    pub(crate) fn begin_member(&mut self, member: &SchemaRef) -> Result<(), SerdeError> {
        let name = match member.get_trait(TraitKey::HttpQuery) {
            Some(Trait::HttpQuery(name)) => name.clone(),
            _ => {
                return Err(SerdeError::protocol(format!(
                    "member `{}` has no query binding",
                    member.id()
                )))
            }
        };
        self.key = Some(name);
        Ok(())
    }

    /// Merges a free-form parameter from a query-params map member.
    pub(crate) fn merge_param(&mut self, key: &str, value: String) {
        self.query.merge_param(key, value);
    }

    fn accept(&mut self, _schema: &SchemaRef, value: String) -> Result<(), SerdeError> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| SerdeError::protocol("no query member is being written"))?;
        self.query.push(key, value);
        Ok(())
    }

    pub(crate) fn into_query(self) -> QueryString {
        self.query
    }
}

impl ShapeSerializer for QueryValueSerializer {
    quiver_schema::reject_shape_writes!(structure list map document);
    crate::ser::value::string_scalar_writes!(Format::DateTime);
}

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::{prelude, Schema, ShapeId};

    #[test]
    fn list_members_repeat_the_key() {
        let list = Schema::list(ShapeId::new("com.example#Tags"), vec![], &prelude::STRING);
        let schema = Schema::structure_builder(ShapeId::new("com.example#In"))
            .member("tags", &list, vec![Trait::HttpQuery("tag".to_string())])
            .build();
        let member = schema.member("tags").unwrap();

        let mut ser = QueryValueSerializer::new();
        ser.begin_member(member).unwrap();
        ser.write_string(&prelude::STRING, "a").unwrap();
        ser.write_string(&prelude::STRING, "b").unwrap();
        assert_eq!(ser.into_query().to_encoded().unwrap(), "tag=a&tag=b");
    }
}
