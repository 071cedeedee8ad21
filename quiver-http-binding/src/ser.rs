/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Serialize-side HTTP binding: one location serializer per transport
//! location, and the router that drives them.

pub(crate) mod body;
mod header;
mod label;
mod prefix_headers;
mod query;
mod query_params;
pub(crate) mod value;

use crate::binding::{Binding, BindingMatcher};
use crate::query::QueryString;
use bytes::Bytes;
use http::header::HeaderMap;
use quiver_schema::serde::ShapeSerializer;
use quiver_schema::{SchemaRef, SerdeError, Trait, TraitKey};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};
use std::collections::HashMap;
use std::sync::Arc;

use header::HeaderValueSerializer;
use label::LabelValueSerializer;
use prefix_headers::PrefixHeadersSerializer;
use query::QueryValueSerializer;
use query_params::QueryParamsSerializer;

// Lifecycle of one serialization. Re-entering a top-level structure while
// members are being written is a protocol fault; harvesting consumes the
// serializer, so the terminal state is reaching `finish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    WritingMembers,
    BodyFlushed,
}

// The location a nested write re-enters while an aggregate member is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    None,
    Header,
    Label,
    Query,
    QueryParams,
    PrefixHeaders,
}

// Where a member-level write lands.
enum Target {
    Header,
    Label,
    Query,
    QueryParams,
    PrefixHeaders,
    Status,
    Payload,
    Skip,
}

/// What the router learned about the message body during the first pass.
#[derive(Debug)]
pub(crate) struct SerializedParts {
    pub(crate) headers: HeaderMap,
    pub(crate) query: QueryString,
    pub(crate) labels: HashMap<String, String>,
    pub(crate) status: Option<u16>,
    /// A blob or string payload member, captured directly.
    pub(crate) payload: Option<(SchemaRef, Bytes)>,
    /// A structure or union payload member, serialized by the codec later.
    pub(crate) payload_shape: Option<SchemaRef>,
    /// Whether any body-bound member was populated.
    pub(crate) saw_body_member: bool,
}

/// Routes each member of a top-level structure to the location serializer
/// its binding selects.
///
/// Body-bound members are only noted here; the facade runs the payload codec
/// over the structure in a second pass through the body filter.
#[derive(Debug)]
pub(crate) struct HttpBindingSerializer {
    matcher: Arc<BindingMatcher>,
    state: State,
    active: Active,
    skip_depth: usize,
    header: HeaderValueSerializer,
    label: LabelValueSerializer,
    query: QueryValueSerializer,
    query_params: QueryParamsSerializer,
    prefix_headers: PrefixHeadersSerializer,
    status: Option<u16>,
    payload: Option<(SchemaRef, Bytes)>,
    payload_shape: Option<SchemaRef>,
    saw_body_member: bool,
}

impl HttpBindingSerializer {
    pub(crate) fn new(schema: &SchemaRef, matcher: Arc<BindingMatcher>) -> Self {
        let mut query = QueryValueSerializer::new();
        // Explicit query keys are reserved up front so a query-params member
        // serialized earlier in the member order cannot shadow them.
        query.reserve_explicit_keys(schema.members().iter().filter_map(|member| {
            match member.get_trait(TraitKey::HttpQuery) {
                Some(Trait::HttpQuery(name)) => Some(name.as_str()),
                _ => None,
            }
        }));
        Self {
            matcher,
            state: State::Idle,
            active: Active::None,
            skip_depth: 0,
            header: HeaderValueSerializer::new(),
            label: LabelValueSerializer::new(),
            query,
            query_params: QueryParamsSerializer::new(),
            prefix_headers: PrefixHeadersSerializer::new(),
            status: None,
            payload: None,
            payload_shape: None,
            saw_body_member: false,
        }
    }

    /// Harvests the routed parts; the serializer is consumed.
    pub(crate) fn finish(self) -> Result<SerializedParts, SerdeError> {
        if self.state != State::BodyFlushed {
            return Err(SerdeError::protocol(
                "the structure serialization has not completed",
            ));
        }
        let mut headers = self.header.into_headers();
        headers.extend(self.prefix_headers.into_headers());
        Ok(SerializedParts {
            headers,
            query: self.query.into_query(),
            labels: self.label.into_labels(),
            status: self.status,
            payload: self.payload,
            payload_shape: self.payload_shape,
            saw_body_member: self.saw_body_member,
        })
    }

    fn target(&mut self, schema: &SchemaRef) -> Result<Target, SerdeError> {
        if self.skip_depth > 0 {
            return Ok(Target::Skip);
        }
        match self.active {
            Active::Header => return Ok(Target::Header),
            Active::Label => return Ok(Target::Label),
            Active::Query => return Ok(Target::Query),
            Active::QueryParams => return Ok(Target::QueryParams),
            Active::PrefixHeaders => return Ok(Target::PrefixHeaders),
            Active::None => {}
        }
        if self.state != State::WritingMembers {
            return Err(SerdeError::protocol(
                "values must be written inside the top-level structure",
            ));
        }
        match self.matcher.binding(schema)? {
            Binding::Header => {
                self.header.begin_member(schema)?;
                Ok(Target::Header)
            }
            Binding::Label => {
                self.label.begin_member(schema)?;
                Ok(Target::Label)
            }
            Binding::Query => {
                self.query.begin_member(schema)?;
                Ok(Target::Query)
            }
            Binding::QueryParams => Ok(Target::QueryParams),
            Binding::PrefixHeaders => Ok(Target::PrefixHeaders),
            Binding::Status => Ok(Target::Status),
            Binding::Payload => Ok(Target::Payload),
            Binding::Body => {
                self.saw_body_member = true;
                Ok(Target::Skip)
            }
        }
    }

    fn skip<F>(&mut self, body: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        self.skip_depth += 1;
        let result = body(self);
        self.skip_depth -= 1;
        result
    }

    fn with_active<F>(&mut self, active: Active, body: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        let previous = std::mem::replace(&mut self.active, active);
        let result = body(self);
        self.active = previous;
        result
    }

    fn set_status(&mut self, value: i64) -> Result<(), SerdeError> {
        let code = u16::try_from(value)
            .ok()
            .filter(|code| (100..=999).contains(code))
            .ok_or_else(|| {
                SerdeError::protocol(format!("`{}` is not a valid http status code", value))
            })?;
        self.status = Some(code);
        Ok(())
    }
}

macro_rules! routed_scalar_write {
    ($method:ident, $value_ty:ty) => {
        fn $method(&mut self, schema: &SchemaRef, value: $value_ty) -> Result<(), SerdeError> {
            match self.target(schema)? {
                Target::Header => self.header.$method(schema, value),
                Target::Label => self.label.$method(schema, value),
                Target::Query => self.query.$method(schema, value),
                Target::QueryParams => self.query_params.$method(schema, value),
                Target::PrefixHeaders => self.prefix_headers.$method(schema, value),
                Target::Status => Err(SerdeError::mismatch(
                    "the response status accepts integral values only",
                )),
                Target::Payload => Err(SerdeError::mismatch(
                    "only blobs, strings, structures, and unions bind to the payload",
                )),
                Target::Skip => Ok(()),
            }
        }
    };
}

macro_rules! routed_status_write {
    ($method:ident, $value_ty:ty) => {
        fn $method(&mut self, schema: &SchemaRef, value: $value_ty) -> Result<(), SerdeError> {
            match self.target(schema)? {
                Target::Header => self.header.$method(schema, value),
                Target::Label => self.label.$method(schema, value),
                Target::Query => self.query.$method(schema, value),
                Target::QueryParams => self.query_params.$method(schema, value),
                Target::PrefixHeaders => self.prefix_headers.$method(schema, value),
                Target::Status => self.set_status(value as i64),
                Target::Payload => Err(SerdeError::mismatch(
                    "only blobs, strings, structures, and unions bind to the payload",
                )),
                Target::Skip => Ok(()),
            }
        }
    };
}

impl ShapeSerializer for HttpBindingSerializer {
    fn write_struct<F>(&mut self, schema: &SchemaRef, members: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        if self.skip_depth > 0 {
            return self.skip(members);
        }
        match self.state {
            State::Idle => {
                self.state = State::WritingMembers;
                members(self)?;
                self.state = State::BodyFlushed;
                Ok(())
            }
            State::WritingMembers => {
                if schema.member_name().is_none() {
                    return Err(SerdeError::protocol(
                        "a top-level structure is already being serialized",
                    ));
                }
                if self.active != Active::None {
                    return Err(SerdeError::mismatch(
                        "structures cannot be serialized at this location",
                    ));
                }
                match self.matcher.binding(schema)? {
                    Binding::Payload => {
                        self.payload_shape = Some(schema.clone());
                        self.skip(members)
                    }
                    Binding::Body => {
                        self.saw_body_member = true;
                        self.skip(members)
                    }
                    _ => Err(SerdeError::mismatch(
                        "structures bind only to the body or the payload",
                    )),
                }
            }
            State::BodyFlushed => Err(SerdeError::protocol(
                "the serializer has already completed its structure",
            )),
        }
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
        if self.skip_depth > 0 {
            return self.skip(elements);
        }
        match self.active {
            Active::QueryParams => {
                self.query_params.begin_value_list()?;
                elements(self)?;
                self.query_params.end_value_list();
                return Ok(());
            }
            Active::None => {}
            _ => {
                return Err(SerdeError::mismatch(
                    "nested lists cannot be serialized at this location",
                ))
            }
        }
        if self.state != State::WritingMembers {
            return Err(SerdeError::protocol(
                "values must be written inside the top-level structure",
            ));
        }
        match self.matcher.binding(schema)? {
            Binding::Header => {
                self.header.begin_member(schema)?;
                self.header.begin_list();
                self.with_active(Active::Header, elements)?;
                self.header.end_list()
            }
            Binding::Query => {
                self.query.begin_member(schema)?;
                self.with_active(Active::Query, elements)
            }
            Binding::Body => {
                self.saw_body_member = true;
                self.skip(elements)
            }
            _ => Err(SerdeError::mismatch(
                "lists bind only to headers, query parameters, or the body",
            )),
        }
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
        if self.skip_depth > 0 {
            return self.skip(entries);
        }
        if self.active != Active::None {
            return Err(SerdeError::mismatch(
                "nested maps cannot be serialized at this location",
            ));
        }
        if self.state != State::WritingMembers {
            return Err(SerdeError::protocol(
                "values must be written inside the top-level structure",
            ));
        }
        match self.matcher.binding(schema)? {
            Binding::PrefixHeaders => {
                self.prefix_headers.begin_member(schema)?;
                self.with_active(Active::PrefixHeaders, entries)
            }
            Binding::QueryParams => {
                self.with_active(Active::QueryParams, entries)?;
                for (key, value) in self.query_params.take_staged() {
                    self.query.merge_param(&key, value);
                }
                Ok(())
            }
            Binding::Body => {
                self.saw_body_member = true;
                self.skip(entries)
            }
            _ => Err(SerdeError::mismatch(
                "maps bind only to prefix headers, query params, or the body",
            )),
        }
    }

    routed_status_write!(write_byte, i8);
    routed_status_write!(write_short, i16);
    routed_status_write!(write_integer, i32);
    routed_status_write!(write_long, i64);
    routed_scalar_write!(write_boolean, bool);
    routed_scalar_write!(write_float, f32);
    routed_scalar_write!(write_double, f64);
    routed_scalar_write!(write_big_integer, &BigInteger);
    routed_scalar_write!(write_big_decimal, &BigDecimal);
    routed_scalar_write!(write_timestamp, &DateTime);

    fn write_string(&mut self, schema: &SchemaRef, value: &str) -> Result<(), SerdeError> {
        match self.target(schema)? {
            Target::Header => self.header.write_string(schema, value),
            Target::Label => self.label.write_string(schema, value),
            Target::Query => self.query.write_string(schema, value),
            Target::QueryParams => self.query_params.write_string(schema, value),
            Target::PrefixHeaders => self.prefix_headers.write_string(schema, value),
            Target::Status => Err(SerdeError::mismatch(
                "the response status accepts integral values only",
            )),
            Target::Payload => {
                self.payload = Some((
                    schema.clone(),
                    Bytes::copy_from_slice(value.as_bytes()),
                ));
                Ok(())
            }
            Target::Skip => Ok(()),
        }
    }

    fn write_blob(&mut self, schema: &SchemaRef, value: &Blob) -> Result<(), SerdeError> {
        match self.target(schema)? {
            Target::Header => self.header.write_blob(schema, value),
            Target::Label => self.label.write_blob(schema, value),
            Target::Query => self.query.write_blob(schema, value),
            Target::QueryParams => self.query_params.write_blob(schema, value),
            Target::PrefixHeaders => self.prefix_headers.write_blob(schema, value),
            Target::Status => Err(SerdeError::mismatch(
                "the response status accepts integral values only",
            )),
            Target::Payload => {
                self.payload = Some((schema.clone(), Bytes::copy_from_slice(value.as_ref())));
                Ok(())
            }
            Target::Skip => Ok(()),
        }
    }

    fn write_document(&mut self, schema: &SchemaRef, _value: &Document) -> Result<(), SerdeError> {
        match self.target(schema)? {
            // Documents have no string form; they ride in the body.
            Target::Skip => Ok(()),
            _ => Err(SerdeError::mismatch(
                "documents bind only to the body",
            )),
        }
    }

    fn write_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        match self.target(schema)? {
            Target::Header => self.header.write_null(schema),
            Target::Label => self.label.write_null(schema),
            Target::Query => self.query.write_null(schema),
            Target::QueryParams => self.query_params.write_null(schema),
            Target::PrefixHeaders => self.prefix_headers.write_null(schema),
            Target::Status | Target::Payload | Target::Skip => Ok(()),
        }
    }
}

/// The message body and its content type, chosen per the binding rules.
pub(crate) struct MessageBody {
    pub(crate) bytes: Option<Bytes>,
    pub(crate) content_type: Option<String>,
}

/// Builds the message body from the routed parts.
///
/// A raw payload member supplies the body directly, with its media type. A
/// structure payload member and body-bound members are serialized by the
/// payload codec in a second pass through the body filter. With no populated
/// body at all, an empty one is still emitted for body-bound structures
/// unless `omit_empty_payload` is set.
pub(crate) fn build_body<C, T>(
    codec: &C,
    settings: &crate::HttpBindingSettings,
    matcher: &Arc<BindingMatcher>,
    parts: &SerializedParts,
    input: &T,
) -> Result<MessageBody, SerdeError>
where
    C: quiver_schema::Codec,
    C::Serializer: quiver_schema::serde::FramedShapeSerializer,
    T: quiver_schema::serde::SerializableStruct,
{
    use body::{BodyFilterSerializer, FilterMode};

    if let Some((member, bytes)) = &parts.payload {
        let content_type = member
            .get_trait(TraitKey::MediaType)
            .and_then(|t| match t {
                Trait::MediaType(media_type) => Some(media_type.clone()),
                _ => None,
            })
            .unwrap_or_else(|| {
                match member.resolve().shape_type() {
                    quiver_schema::ShapeType::Blob => "application/octet-stream",
                    _ => "text/plain",
                }
                .to_string()
            });
        return Ok(MessageBody {
            bytes: Some(bytes.clone()),
            content_type: Some(content_type),
        });
    }

    let codec_media_type = settings
        .payload_media_type()
        .unwrap_or_else(|| codec.media_type())
        .to_string();

    if let Some(member) = &parts.payload_shape {
        let index = member
            .member_index()
            .expect("payload members are member schemas");
        let mut filter = BodyFilterSerializer::new(
            codec.serializer(),
            matcher.clone(),
            FilterMode::Payload(index),
        );
        input.serialize(&mut filter)?;
        let bytes = codec.finish(filter.into_inner())?;
        let content_type = member
            .get_trait(TraitKey::MediaType)
            .and_then(|t| match t {
                Trait::MediaType(media_type) => Some(media_type.clone()),
                _ => None,
            })
            .unwrap_or(codec_media_type);
        return Ok(MessageBody {
            bytes: Some(bytes.into()),
            content_type: Some(content_type),
        });
    }

    if parts.saw_body_member || (!settings.omit_empty_payload() && matcher.has_body_members()) {
        let mut filter =
            BodyFilterSerializer::new(codec.serializer(), matcher.clone(), FilterMode::Body);
        input.serialize(&mut filter)?;
        let bytes = codec.finish(filter.into_inner())?;
        return Ok(MessageBody {
            bytes: Some(bytes.into()),
            content_type: Some(codec_media_type),
        });
    }

    Ok(MessageBody {
        bytes: None,
        content_type: None,
    })
}
