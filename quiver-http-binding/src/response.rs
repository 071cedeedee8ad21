/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Response-side facades: serialize an operation output or error onto an
//! HTTP response, and re-split an inbound response into the output
//! structure.

use crate::binding::{BindingMatcher, Direction};
use crate::de::{deserialize_message, MessageParts};
use crate::headers;
use crate::request::http_trait;
use crate::ser::{build_body, HttpBindingSerializer};
use crate::settings::HttpBindingSettings;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::StatusCode;
use quiver_cbor::CborCodec;
use quiver_schema::serde::{
    DeserializableStruct, FramedShapeSerializer, SerializableStruct,
};
use quiver_schema::{Codec, SchemaRef, SerdeError, Trait, TraitKey};
use quiver_types::DataStream;

/// Serializes operation outputs and errors onto HTTP responses (the server
/// side).
#[derive(Debug)]
pub struct ResponseSerializer<C = CborCodec> {
    codec: C,
    settings: HttpBindingSettings,
}

impl Default for ResponseSerializer<CborCodec> {
    fn default() -> Self {
        Self::new(CborCodec::new())
    }
}

impl<C> ResponseSerializer<C>
where
    C: Codec,
    C::Serializer: FramedShapeSerializer,
{
    /// Creates a response serializer over the given payload codec.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            settings: HttpBindingSettings::default(),
        }
    }

    /// Overrides the binding settings.
    pub fn with_settings(mut self, settings: HttpBindingSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Serializes `output` into an HTTP response.
    ///
    /// The status comes from, in priority order: a status-bound member, the
    /// shape's `httpError` trait, the `error` trait's fault default, the
    /// operation's `http` trait success code, and finally 200.
    pub fn serialize<T: SerializableStruct>(
        &self,
        operation: Option<&SchemaRef>,
        output: &T,
    ) -> Result<http::Response<DataStream>, SerdeError> {
        let schema = output.schema();
        let matcher = BindingMatcher::of(&schema, Direction::Response);
        matcher.check_payload_conflict(&schema)?;

        let mut router = HttpBindingSerializer::new(&schema, matcher.clone());
        output.serialize(&mut router)?;
        let parts = router.finish()?;

        let body = build_body(&self.codec, &self.settings, &matcher, &parts, output)?;

        let status = parts
            .status
            .or_else(|| match schema.get_trait(TraitKey::HttpError) {
                Some(Trait::HttpError(code)) => Some(*code),
                _ => None,
            })
            .or_else(|| match schema.get_trait(TraitKey::Error) {
                Some(Trait::Error(fault)) => Some(fault.default_status_code()),
                _ => None,
            })
            .or_else(|| {
                operation
                    .and_then(|op| http_trait(op).ok())
                    .map(|(_, _, code)| code)
            })
            .unwrap_or(200);
        let status = StatusCode::from_u16(status)
            .map_err(|_| SerdeError::protocol(format!("`{}` is not a valid status code", status)))?;

        let mut response = http::Response::builder()
            .status(status)
            .body(DataStream::empty())
            .map_err(|err| SerdeError::protocol(err.to_string()))?;
        *response.headers_mut() = parts.headers;
        if let Some(content_type) = &body.content_type {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, headers::header_value(content_type)?);
        }
        if let Some(bytes) = body.bytes {
            response.headers_mut().insert(
                CONTENT_LENGTH,
                headers::header_value(&bytes.len().to_string())?,
            );
            *response.body_mut() = DataStream::from_bytes(bytes);
        }
        Ok(response)
    }
}

/// Deserializes inbound HTTP responses into operation outputs (the client
/// side).
#[derive(Debug)]
pub struct ResponseDeserializer<C = CborCodec> {
    codec: C,
    settings: HttpBindingSettings,
}

impl Default for ResponseDeserializer<CborCodec> {
    fn default() -> Self {
        Self::new(CborCodec::new())
    }
}

impl<C: Codec> ResponseDeserializer<C> {
    /// Creates a response deserializer over the given payload codec.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            settings: HttpBindingSettings::default(),
        }
    }

    /// Overrides the binding settings.
    pub fn with_settings(mut self, settings: HttpBindingSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Deserializes `response` into the operation output `T`.
    ///
    /// Reading the response body is the only suspension point; a cancellation
    /// or timeout imposed by the caller propagates from there.
    pub async fn deserialize<T: DeserializableStruct>(
        &self,
        response: http::Response<DataStream>,
    ) -> Result<T, SerdeError> {
        let (parts, body) = response.into_parts();
        deserialize_message(
            &self.codec,
            &self.settings,
            Direction::Response,
            MessageParts {
                headers: &parts.headers,
                query_pairs: &[],
                labels: None,
                status: Some(parts.status.as_u16()),
            },
            body,
        )
        .await
    }
}
