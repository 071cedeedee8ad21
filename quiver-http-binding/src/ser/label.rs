/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use quiver_schema::serde::ShapeSerializer;
use quiver_schema::{SchemaRef, SerdeError};
use quiver_types::date_time::Format;
use std::collections::HashMap;

/// Serializes label-bound members into the label/value map the URI builder
/// substitutes at emit time. Timestamps default to the date-time format.
#[derive(Debug, Default)]
pub(crate) struct LabelValueSerializer {
    labels: HashMap<String, String>,
    name: Option<String>,
}

impl LabelValueSerializer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Positions the serializer at a label-bound member.
    pub(crate) fn begin_member(&mut self, member: &SchemaRef) -> Result<(), SerdeError> {
        let name = member.member_name().ok_or_else(|| {
            SerdeError::protocol(format!("`{}` is not a member schema", member.id()))
        })?;
        self.name = Some(name.to_string());
        Ok(())
    }

    fn accept(&mut self, _schema: &SchemaRef, value: String) -> Result<(), SerdeError> {
        let name = self
            .name
            .take()
            .ok_or_else(|| SerdeError::protocol("a label accepts exactly one value"))?;
        self.labels.insert(name, value);
        Ok(())
    }

    pub(crate) fn into_labels(self) -> HashMap<String, String> {
        self.labels
    }
}

impl ShapeSerializer for LabelValueSerializer {
    quiver_schema::reject_shape_writes!(structure list map document);
    crate::ser::value::string_scalar_writes!(Format::DateTime);
}
