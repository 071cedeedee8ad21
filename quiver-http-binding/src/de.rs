/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Deserialize-side HTTP binding: per-location deserializers and the engine
//! that re-splits an inbound message along its member bindings.

mod payload;
mod prefix_headers;
mod query_params;
pub(crate) mod string_value;

use crate::binding::{Binding, BindingMatcher, Direction};
use crate::settings::HttpBindingSettings;
use http::header::{HeaderMap, CONTENT_TYPE};
use quiver_schema::serde::{DeserializableStruct, ShapeDeserializer};
use quiver_schema::{Codec, SerdeError, ShapeType, Trait, TraitKey};
use quiver_types::data_stream::CollectError;
use quiver_types::date_time::Format;
use quiver_types::DataStream;
use std::collections::{HashMap, HashSet};

use payload::PayloadDeserializer;
use prefix_headers::PrefixHeadersDeserializer;
use query_params::QueryParamsDeserializer;
use string_value::StringValueDeserializer;

/// The non-body pieces of an inbound message.
pub(crate) struct MessageParts<'a> {
    pub(crate) headers: &'a HeaderMap,
    pub(crate) query_pairs: &'a [(String, String)],
    pub(crate) labels: Option<&'a HashMap<String, String>>,
    pub(crate) status: Option<u16>,
}

fn header_values(headers: &HeaderMap, name: &str) -> Result<Vec<String>, SerdeError> {
    headers
        .get_all(name)
        .iter()
        .map(|value| {
            value
                .to_str()
                .map(str::to_string)
                .map_err(|_| SerdeError::protocol(format!("header `{}` is not valid utf-8", name)))
        })
        .collect()
}

// An explicit Content-Type that disagrees with the payload codec while body
// members are present is a protocol mismatch.
fn check_content_type(
    headers: &HeaderMap,
    expected: &str,
) -> Result<(), SerdeError> {
    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        let content_type = content_type
            .to_str()
            .map_err(|_| SerdeError::protocol("content-type is not valid utf-8"))?;
        let base = content_type.split(';').next().unwrap_or("").trim();
        if !base.eq_ignore_ascii_case(expected) {
            return Err(SerdeError::protocol(format!(
                "expected content-type `{}`, found `{}`",
                expected, base
            )));
        }
    }
    Ok(())
}

async fn collect_body(
    body: DataStream,
    max_bytes: usize,
) -> Result<bytes::Bytes, SerdeError> {
    body.collect(max_bytes).await.map_err(|err| match err {
        CollectError::TooLarge { max_bytes } => SerdeError::protocol(format!(
            "the body exceeds the in-memory limit of {} bytes",
            max_bytes
        )),
        CollectError::Io(source) => SerdeError::io(source),
        _ => SerdeError::protocol("unknown collect error"),
    })
}

/// Re-splits an inbound message and builds the target structure.
///
/// Non-body members are read first, each from the deserializer of its
/// transport location; body members are decoded by the payload codec in one
/// pass over the collected body.
pub(crate) async fn deserialize_message<C, T>(
    codec: &C,
    settings: &HttpBindingSettings,
    direction: Direction,
    parts: MessageParts<'_>,
    body: DataStream,
) -> Result<T, SerdeError>
where
    C: Codec,
    T: DeserializableStruct,
{
    let schema = T::schema();
    let matcher = BindingMatcher::of(&schema, direction);
    matcher.check_payload_conflict(&schema)?;

    let explicit_query: HashSet<String> = schema
        .members()
        .iter()
        .filter_map(|member| match member.get_trait(TraitKey::HttpQuery) {
            Some(Trait::HttpQuery(name)) => Some(name.clone()),
            _ => None,
        })
        .collect();

    let mut builder = T::Builder::default();
    for member in schema.members() {
        match matcher.binding(member)? {
            Binding::Header => {
                let name = match member.get_trait(TraitKey::HttpHeader) {
                    Some(Trait::HttpHeader(name)) => name.clone(),
                    _ => continue,
                };
                let values = header_values(parts.headers, &name)?;
                if values.is_empty() {
                    continue;
                }
                let mut de =
                    StringValueDeserializer::for_member(member, values, Format::HttpDate);
                builder = T::read_member(builder, member, &mut de)?;
            }
            Binding::PrefixHeaders => {
                let prefix = match member.get_trait(TraitKey::HttpPrefixHeaders) {
                    Some(Trait::HttpPrefixHeaders(prefix)) => prefix.clone(),
                    _ => continue,
                };
                let mut de = PrefixHeadersDeserializer::new(parts.headers, &prefix);
                builder = T::read_member(builder, member, &mut de)?;
            }
            Binding::Label => {
                let Some(labels) = parts.labels else { continue };
                let Some(name) = member.member_name() else { continue };
                let Some(value) = labels.get(name) else { continue };
                let mut de =
                    StringValueDeserializer::single(value.clone(), Format::DateTime);
                builder = T::read_member(builder, member, &mut de)?;
            }
            Binding::Query => {
                let name = match member.get_trait(TraitKey::HttpQuery) {
                    Some(Trait::HttpQuery(name)) => name.clone(),
                    _ => continue,
                };
                let values: Vec<String> = parts
                    .query_pairs
                    .iter()
                    .filter(|(key, _)| *key == name)
                    .map(|(_, value)| value.clone())
                    .collect();
                if values.is_empty() {
                    continue;
                }
                let mut de =
                    StringValueDeserializer::multi(values, Format::DateTime);
                builder = T::read_member(builder, member, &mut de)?;
            }
            Binding::QueryParams => {
                let mut de = QueryParamsDeserializer::new(parts.query_pairs, &explicit_query);
                builder = T::read_member(builder, member, &mut de)?;
            }
            Binding::Status => {
                let Some(code) = parts.status else { continue };
                let mut de =
                    StringValueDeserializer::single(code.to_string(), Format::DateTime);
                builder = T::read_member(builder, member, &mut de)?;
            }
            // Decoded from the collected body below.
            Binding::Body | Binding::Payload => {}
        }
    }

    if matcher.has_body_members() || matcher.payload_member().is_some() {
        let expected = settings
            .payload_media_type()
            .unwrap_or_else(|| codec.media_type());
        if matcher.has_body_members() {
            check_content_type(parts.headers, expected)?;
        }
        let bytes = collect_body(body, settings.max_in_memory_payload()).await?;
        if let Some(index) = matcher.payload_member() {
            let member = schema
                .member_by_index(index)
                .expect("the matcher indexed an existing member")
                .clone();
            match member.resolve().shape_type() {
                ShapeType::Structure | ShapeType::Union => {
                    if !bytes.is_empty() {
                        let mut de = codec.deserializer(&bytes);
                        builder = T::read_member(builder, &member, &mut de)?;
                    }
                }
                _ => {
                    let mut de = PayloadDeserializer::new(bytes.clone());
                    builder = T::read_member(builder, &member, &mut de)?;
                }
            }
        } else if !bytes.is_empty() {
            // The body carries exactly the body-bound members.
            let mut de = codec.deserializer(&bytes);
            builder = de.read_struct(&schema, builder, T::read_member)?;
        }
    }

    T::build(builder)
}
