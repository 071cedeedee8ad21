/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Request-side facades: serialize an operation input onto an HTTP request,
//! and re-split an inbound request into the input structure.

use crate::binding::{BindingMatcher, Direction};
use crate::de::{deserialize_message, MessageParts};
use crate::ser::{build_body, HttpBindingSerializer};
use crate::settings::HttpBindingSettings;
use crate::uri::UriPattern;
use crate::{headers, query};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::Method;
use quiver_cbor::CborCodec;
use quiver_schema::serde::{
    DeserializableStruct, FramedShapeSerializer, SerializableStruct,
};
use quiver_schema::{Codec, SchemaRef, SerdeError, Trait, TraitKey};
use quiver_types::DataStream;
use std::collections::HashMap;

pub(crate) fn http_trait(operation: &SchemaRef) -> Result<(Method, String, u16), SerdeError> {
    match operation.get_trait(TraitKey::Http) {
        Some(Trait::Http { method, uri, code }) => {
            let method = Method::from_bytes(method.as_bytes()).map_err(|_| {
                SerdeError::protocol(format!("`{}` is not a valid http method", method))
            })?;
            Ok((method, uri.clone(), *code))
        }
        _ => Err(SerdeError::protocol(format!(
            "operation `{}` carries no http trait",
            operation.id()
        ))),
    }
}

/// Serializes operation inputs onto HTTP requests.
///
/// The operation's `http` trait supplies the method and URI pattern; the
/// input structure's bindings route each member onto the request.
#[derive(Debug)]
pub struct RequestSerializer<C = CborCodec> {
    codec: C,
    settings: HttpBindingSettings,
}

impl Default for RequestSerializer<CborCodec> {
    fn default() -> Self {
        Self::new(CborCodec::new())
    }
}

impl<C> RequestSerializer<C>
where
    C: Codec,
    C::Serializer: FramedShapeSerializer,
{
    /// Creates a request serializer over the given payload codec.
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

    /// Serializes `input` into the HTTP request of `operation`.
    pub fn serialize<T: SerializableStruct>(
        &self,
        operation: &SchemaRef,
        input: &T,
    ) -> Result<http::Request<DataStream>, SerdeError> {
        let (method, uri, _code) = http_trait(operation)?;
        let pattern = UriPattern::parse(&uri)?;

        let schema = input.schema();
        let matcher = BindingMatcher::of(&schema, Direction::Request);
        matcher.check_payload_conflict(&schema)?;

        let mut router = HttpBindingSerializer::new(&schema, matcher.clone());
        input.serialize(&mut router)?;
        let parts = router.finish()?;

        let body = build_body(&self.codec, &self.settings, &matcher, &parts, input)?;

        let path = pattern.build(&parts.labels)?;
        let uri = match parts.query.to_encoded() {
            Some(encoded) => format!("{}?{}", path, encoded),
            None => path,
        };

        let mut request = http::Request::builder()
            .method(method)
            .uri(uri.as_str())
            .body(DataStream::empty())
            .map_err(|err| SerdeError::protocol(err.to_string()))?;
        *request.headers_mut() = parts.headers;
        if let Some(content_type) = &body.content_type {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, headers::header_value(content_type)?);
        }
        if let Some(bytes) = body.bytes {
            request
                .headers_mut()
                .insert(CONTENT_LENGTH, headers::header_value(&bytes.len().to_string())?);
            *request.body_mut() = DataStream::from_bytes(bytes);
        }
        Ok(request)
    }
}

/// Deserializes inbound HTTP requests into operation inputs (the server
/// side).
///
/// Path labels are assumed to be extracted (and percent-decoded) by the
/// router that matched the request; the raw query string is parsed here,
/// once.
#[derive(Debug)]
pub struct RequestDeserializer<C = CborCodec> {
    codec: C,
    settings: HttpBindingSettings,
}

impl Default for RequestDeserializer<CborCodec> {
    fn default() -> Self {
        Self::new(CborCodec::new())
    }
}

impl<C: Codec> RequestDeserializer<C> {
    /// Creates a request deserializer over the given payload codec.
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

    /// Deserializes `request` into the operation input `T`.
    ///
    /// Reading the request body is the only suspension point; a cancellation
    /// or timeout imposed by the caller propagates from there.
    pub async fn deserialize<T: DeserializableStruct>(
        &self,
        request: http::Request<DataStream>,
        labels: &HashMap<String, String>,
    ) -> Result<T, SerdeError> {
        let (parts, body) = request.into_parts();
        let query_pairs = query::parse(parts.uri.query().unwrap_or(""));
        deserialize_message(
            &self.codec,
            &self.settings,
            Direction::Request,
            MessageParts {
                headers: &parts.headers,
                query_pairs: &query_pairs,
                labels: Some(labels),
                status: None,
            },
            body,
        )
        .await
    }
}
