/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::headers::{header_name, header_value};
use http::header::HeaderMap;
use quiver_schema::serde::ShapeSerializer;
use quiver_schema::{SchemaRef, SerdeError, Trait, TraitKey};

/// Serializes a prefix-headers map member: every entry becomes a
/// `<prefix><key>` header carrying the entry's value.
#[derive(Debug, Default)]
pub(crate) struct PrefixHeadersSerializer {
    headers: HeaderMap,
    prefix: String,
    key: Option<String>,
}

impl PrefixHeadersSerializer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Positions the serializer at a prefix-headers map member.
    pub(crate) fn begin_member(&mut self, member: &SchemaRef) -> Result<(), SerdeError> {
        let prefix = match member.get_trait(TraitKey::HttpPrefixHeaders) {
            Some(Trait::HttpPrefixHeaders(prefix)) => prefix.clone(),
            _ => {
                return Err(SerdeError::protocol(format!(
                    "member `{}` has no prefix-headers binding",
                    member.id()
                )))
            }
        };
        self.prefix = prefix;
        Ok(())
    }

    pub(crate) fn into_headers(self) -> HeaderMap {
        self.headers
    }
}

impl ShapeSerializer for PrefixHeadersSerializer {
    quiver_schema::reject_shape_writes!(
        structure list map document boolean byte short integer long float double big_integer
            big_decimal blob timestamp
    );

    fn write_string(&mut self, _schema: &SchemaRef, value: &str) -> Result<(), SerdeError> {
        match self.key.take() {
            None => {
                self.key = Some(value.to_string());
            }
            Some(key) => {
                let name = header_name(&format!("{}{}", self.prefix, key))?;
                self.headers.append(name, header_value(value)?);
            }
        }
        Ok(())
    }

    fn write_null(&mut self, _schema: &SchemaRef) -> Result<(), SerdeError> {
        self.key = None;
        Ok(())
    }
}
