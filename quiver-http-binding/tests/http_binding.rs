/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use quiver_cbor::CborCodec;
use quiver_http_binding::{
    HttpBindingSettings, RequestDeserializer, RequestSerializer, ResponseDeserializer,
    ResponseSerializer,
};
use quiver_schema::serde::{
    DeserializableStruct, SerializableStruct, ShapeDeserializer, ShapeSerializer,
};
use quiver_schema::{prelude, ErrorFault, Schema, SchemaRef, SerdeError, ShapeId, Trait};
use quiver_types::DataStream;
use std::collections::HashMap;
use std::sync::LazyLock;

static ITEM_DATA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::structure_builder(ShapeId::new("com.example#ItemData"))
        .member("v", &prelude::INTEGER, vec![])
        .build()
});

static PUT_ITEM_INPUT: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::structure_builder(ShapeId::new("com.example#PutItemInput"))
        .member("id", &prelude::STRING, vec![Trait::HttpLabel])
        .member(
            "filter",
            &prelude::STRING,
            vec![Trait::HttpQuery("f".to_string())],
        )
        .member(
            "trace",
            &prelude::STRING,
            vec![Trait::HttpHeader("x-trace".to_string())],
        )
        .member("payload", &ITEM_DATA, vec![Trait::HttpPayload])
        .build()
});

static PUT_ITEM: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::operation(
        ShapeId::new("com.example#PutItem"),
        vec![Trait::Http {
            method: "PUT".to_string(),
            uri: "/items/{id}".to_string(),
            code: 200,
        }],
        &PUT_ITEM_INPUT,
        &prelude::DOCUMENT,
    )
});

#[derive(Debug, Clone, PartialEq)]
struct ItemData {
    v: i32,
}

impl SerializableStruct for ItemData {
    fn schema(&self) -> SchemaRef {
        ITEM_DATA.clone()
    }

    fn serialize_members<S: ShapeSerializer>(&self, ser: &mut S) -> Result<(), SerdeError> {
        ser.write_integer(ITEM_DATA.member("v").unwrap(), self.v)
    }
}

#[derive(Debug, Default)]
struct ItemDataBuilder {
    v: Option<i32>,
}

impl DeserializableStruct for ItemData {
    type Builder = ItemDataBuilder;

    fn schema() -> SchemaRef {
        ITEM_DATA.clone()
    }

    fn read_member<D: ShapeDeserializer>(
        mut builder: ItemDataBuilder,
        member: &SchemaRef,
        de: &mut D,
    ) -> Result<ItemDataBuilder, SerdeError> {
        if member.member_name() == Some("v") {
            builder.v = Some(de.read_integer(member)?);
        }
        Ok(builder)
    }

    fn build(builder: ItemDataBuilder) -> Result<Self, SerdeError> {
        Ok(ItemData {
            v: builder
                .v
                .ok_or_else(|| SerdeError::validation("missing required member `v`"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PutItemInput {
    id: String,
    filter: Option<String>,
    trace: Option<String>,
    payload: Option<ItemData>,
}

impl SerializableStruct for PutItemInput {
    fn schema(&self) -> SchemaRef {
        PUT_ITEM_INPUT.clone()
    }

    fn serialize_members<S: ShapeSerializer>(&self, ser: &mut S) -> Result<(), SerdeError> {
        let schema = self.schema();
        ser.write_string(schema.member("id").unwrap(), &self.id)?;
        if let Some(filter) = &self.filter {
            ser.write_string(schema.member("filter").unwrap(), filter)?;
        }
        if let Some(trace) = &self.trace {
            ser.write_string(schema.member("trace").unwrap(), trace)?;
        }
        if let Some(payload) = &self.payload {
            ser.write_struct(schema.member("payload").unwrap(), |s| {
                payload.serialize_members(s)
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PutItemInputBuilder {
    id: Option<String>,
    filter: Option<String>,
    trace: Option<String>,
    payload: Option<ItemData>,
}

impl DeserializableStruct for PutItemInput {
    type Builder = PutItemInputBuilder;

    fn schema() -> SchemaRef {
        PUT_ITEM_INPUT.clone()
    }

    fn read_member<D: ShapeDeserializer>(
        mut builder: PutItemInputBuilder,
        member: &SchemaRef,
        de: &mut D,
    ) -> Result<PutItemInputBuilder, SerdeError> {
        match member.member_name() {
            Some("id") => builder.id = Some(de.read_string(member)?),
            Some("filter") => builder.filter = Some(de.read_string(member)?),
            Some("trace") => builder.trace = Some(de.read_string(member)?),
            Some("payload") => {
                let item = de.read_struct(member, ItemDataBuilder::default(), ItemData::read_member)?;
                builder.payload = Some(ItemData::build(item)?);
            }
            _ => {}
        }
        Ok(builder)
    }

    fn build(builder: PutItemInputBuilder) -> Result<Self, SerdeError> {
        Ok(PutItemInput {
            id: builder
                .id
                .ok_or_else(|| SerdeError::validation("missing required member `id`"))?,
            filter: builder.filter,
            trace: builder.trace,
            payload: builder.payload,
        })
    }
}

#[test]
fn put_item_request_lands_each_member_in_its_location() {
    let input = PutItemInput {
        id: "a/b".to_string(),
        filter: Some("new".to_string()),
        trace: Some("t1".to_string()),
        payload: Some(ItemData { v: 1 }),
    };
    let request = RequestSerializer::default()
        .serialize(&PUT_ITEM, &input)
        .unwrap();

    assert_eq!(request.method(), http::Method::PUT);
    assert_eq!(request.uri().path(), "/items/a%2Fb");
    assert_eq!(request.uri().query(), Some("f=new"));
    assert_eq!(request.headers().get("x-trace").unwrap(), "t1");
    assert_eq!(
        request.headers().get("content-type").unwrap(),
        "application/cbor"
    );
    // {v: 1} as an indefinite-length map.
    let body = request.body().as_inline().unwrap();
    assert_eq!(body.as_ref(), [0xBF, 0x61, b'v', 0x01, 0xFF]);
    assert_eq!(
        request.headers().get("content-length").unwrap(),
        &body.len().to_string()
    );
}

#[tokio::test]
async fn put_item_request_round_trips() {
    let input = PutItemInput {
        id: "a/b".to_string(),
        filter: Some("new".to_string()),
        trace: Some("t1".to_string()),
        payload: Some(ItemData { v: 1 }),
    };
    let request = RequestSerializer::default()
        .serialize(&PUT_ITEM, &input)
        .unwrap();

    // The server's router extracts and decodes the path labels.
    let labels: HashMap<String, String> = [("id".to_string(), "a/b".to_string())].into();
    let decoded: PutItemInput = RequestDeserializer::default()
        .deserialize(request, &labels)
        .await
        .unwrap();
    assert_eq!(decoded, input);
}

static NOTE_INPUT: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::structure_builder(ShapeId::new("com.example#NoteInput"))
        .member("id", &prelude::STRING, vec![Trait::HttpLabel])
        .member("note", &prelude::STRING, vec![])
        .member("count", &prelude::INTEGER, vec![])
        .build()
});

static PUT_NOTE: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::operation(
        ShapeId::new("com.example#PutNote"),
        vec![Trait::Http {
            method: "PUT".to_string(),
            uri: "/notes/{id}".to_string(),
            code: 200,
        }],
        &NOTE_INPUT,
        &prelude::DOCUMENT,
    )
});

#[derive(Debug, Clone, PartialEq)]
struct NoteInput {
    id: String,
    note: Option<String>,
    count: Option<i32>,
}

impl SerializableStruct for NoteInput {
    fn schema(&self) -> SchemaRef {
        NOTE_INPUT.clone()
    }

    fn serialize_members<S: ShapeSerializer>(&self, ser: &mut S) -> Result<(), SerdeError> {
        let schema = self.schema();
        ser.write_string(schema.member("id").unwrap(), &self.id)?;
        if let Some(note) = &self.note {
            ser.write_string(schema.member("note").unwrap(), note)?;
        }
        if let Some(count) = self.count {
            ser.write_integer(schema.member("count").unwrap(), count)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct NoteInputBuilder {
    id: Option<String>,
    note: Option<String>,
    count: Option<i32>,
}

impl DeserializableStruct for NoteInput {
    type Builder = NoteInputBuilder;

    fn schema() -> SchemaRef {
        NOTE_INPUT.clone()
    }

    fn read_member<D: ShapeDeserializer>(
        mut builder: NoteInputBuilder,
        member: &SchemaRef,
        de: &mut D,
    ) -> Result<NoteInputBuilder, SerdeError> {
        match member.member_name() {
            Some("id") => builder.id = Some(de.read_string(member)?),
            Some("note") => builder.note = Some(de.read_string(member)?),
            Some("count") => builder.count = Some(de.read_integer(member)?),
            _ => {}
        }
        Ok(builder)
    }

    fn build(builder: NoteInputBuilder) -> Result<Self, SerdeError> {
        Ok(NoteInput {
            id: builder
                .id
                .ok_or_else(|| SerdeError::validation("missing required member `id`"))?,
            note: builder.note,
            count: builder.count,
        })
    }
}

#[test]
fn body_members_serialize_as_a_structure() {
    let input = NoteInput {
        id: "n1".to_string(),
        note: Some("hi".to_string()),
        count: Some(2),
    };
    let request = RequestSerializer::default()
        .serialize(&PUT_NOTE, &input)
        .unwrap();
    let body = request.body().as_inline().unwrap();
    assert_eq!(
        body.as_ref(),
        [
            0xBF, 0x64, b'n', b'o', b't', b'e', 0x62, b'h', b'i', 0x65, b'c', b'o', b'u', b'n',
            b't', 0x02, 0xFF,
        ]
    );
}

#[tokio::test]
async fn body_members_round_trip() {
    let input = NoteInput {
        id: "n1".to_string(),
        note: Some("hi".to_string()),
        count: Some(2),
    };
    let request = RequestSerializer::default()
        .serialize(&PUT_NOTE, &input)
        .unwrap();
    let labels: HashMap<String, String> = [("id".to_string(), "n1".to_string())].into();
    let decoded: NoteInput = RequestDeserializer::default()
        .deserialize(request, &labels)
        .await
        .unwrap();
    assert_eq!(decoded, input);
}

#[test]
fn empty_body_is_omitted_by_default() {
    let input = NoteInput {
        id: "n1".to_string(),
        note: None,
        count: None,
    };
    let request = RequestSerializer::default()
        .serialize(&PUT_NOTE, &input)
        .unwrap();
    assert!(request.headers().get("content-type").is_none());
    assert_eq!(request.body().content_length(), Some(0));

    let request = RequestSerializer::new(CborCodec::new())
        .with_settings(HttpBindingSettings::new().with_omit_empty_payload(false))
        .serialize(&PUT_NOTE, &input)
        .unwrap();
    assert_eq!(
        request.headers().get("content-type").unwrap(),
        "application/cbor"
    );
    assert_eq!(
        request.body().as_inline().unwrap().as_ref(),
        [0xBF, 0xFF]
    );
}

#[tokio::test]
async fn content_type_mismatch_is_a_protocol_fault() {
    let mut request = http::Request::builder()
        .method("PUT")
        .uri("/notes/n1")
        .body(DataStream::from_bytes(vec![0xBF, 0xFF]))
        .unwrap();
    request
        .headers_mut()
        .insert("content-type", "application/json".parse().unwrap());

    let labels: HashMap<String, String> = [("id".to_string(), "n1".to_string())].into();
    let err = RequestDeserializer::<CborCodec>::default()
        .deserialize::<NoteInput>(request, &labels)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), quiver_schema::ErrorKind::ProtocolFault);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let body = vec![0u8; 64];
    let request = http::Request::builder()
        .method("PUT")
        .uri("/notes/n1")
        .body(DataStream::from_bytes(body))
        .unwrap();
    let labels: HashMap<String, String> = [("id".to_string(), "n1".to_string())].into();
    let err = RequestDeserializer::new(CborCodec::new())
        .with_settings(HttpBindingSettings::new().with_max_in_memory_payload(16))
        .deserialize::<NoteInput>(request, &labels)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), quiver_schema::ErrorKind::ProtocolFault);
}

static GET_FILE: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::operation(
        ShapeId::new("com.example#GetFile"),
        vec![Trait::Http {
            method: "GET".to_string(),
            uri: "/files/{path+}".to_string(),
            code: 200,
        }],
        &FILE_INPUT,
        &prelude::DOCUMENT,
    )
});

static FILE_INPUT: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::structure_builder(ShapeId::new("com.example#FileInput"))
        .member("path", &prelude::STRING, vec![Trait::HttpLabel])
        .build()
});

#[derive(Debug)]
struct FileInput {
    path: String,
}

impl SerializableStruct for FileInput {
    fn schema(&self) -> SchemaRef {
        FILE_INPUT.clone()
    }

    fn serialize_members<S: ShapeSerializer>(&self, ser: &mut S) -> Result<(), SerdeError> {
        ser.write_string(FILE_INPUT.member("path").unwrap(), &self.path)
    }
}

#[test]
fn greedy_labels_preserve_slashes() {
    let request = RequestSerializer::default()
        .serialize(
            &GET_FILE,
            &FileInput {
                path: "docs/a b/readme".to_string(),
            },
        )
        .unwrap();
    assert_eq!(request.uri().path(), "/files/docs/a%20b/readme");
}

static STATUS_OUTPUT: LazyLock<SchemaRef> = LazyLock::new(|| {
    let meta_map = Schema::map(
        ShapeId::new("com.example#Meta"),
        vec![],
        &prelude::STRING,
        &prelude::STRING,
    );
    Schema::structure_builder(ShapeId::new("com.example#StatusOutput"))
        .member("code", &prelude::INTEGER, vec![Trait::HttpResponseCode])
        .member(
            "meta",
            &meta_map,
            vec![Trait::HttpPrefixHeaders("x-meta-".to_string())],
        )
        .member("note", &prelude::STRING, vec![])
        .build()
});

#[derive(Debug, Clone, PartialEq)]
struct StatusOutput {
    code: Option<i32>,
    meta: HashMap<String, String>,
    note: Option<String>,
}

impl SerializableStruct for StatusOutput {
    fn schema(&self) -> SchemaRef {
        STATUS_OUTPUT.clone()
    }

    fn serialize_members<S: ShapeSerializer>(&self, ser: &mut S) -> Result<(), SerdeError> {
        let schema = self.schema();
        if let Some(code) = self.code {
            ser.write_integer(schema.member("code").unwrap(), code)?;
        }
        if !self.meta.is_empty() {
            let member = schema.member("meta").unwrap();
            ser.write_map(member, Some(self.meta.len()), |s| {
                for (key, value) in &self.meta {
                    s.write_string(&prelude::STRING, key)?;
                    s.write_string(&prelude::STRING, value)?;
                }
                Ok(())
            })?;
        }
        if let Some(note) = &self.note {
            ser.write_string(schema.member("note").unwrap(), note)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StatusOutputBuilder {
    code: Option<i32>,
    meta: HashMap<String, String>,
    note: Option<String>,
}

impl DeserializableStruct for StatusOutput {
    type Builder = StatusOutputBuilder;

    fn schema() -> SchemaRef {
        STATUS_OUTPUT.clone()
    }

    fn read_member<D: ShapeDeserializer>(
        mut builder: StatusOutputBuilder,
        member: &SchemaRef,
        de: &mut D,
    ) -> Result<StatusOutputBuilder, SerdeError> {
        match member.member_name() {
            Some("code") => builder.code = Some(de.read_integer(member)?),
            Some("meta") => {
                builder.meta =
                    de.read_string_map(member, HashMap::new(), |mut meta, key, de| {
                        meta.insert(key, de.read_string(&prelude::STRING)?);
                        Ok(meta)
                    })?;
            }
            Some("note") => builder.note = Some(de.read_string(member)?),
            _ => {}
        }
        Ok(builder)
    }

    fn build(builder: StatusOutputBuilder) -> Result<Self, SerdeError> {
        Ok(StatusOutput {
            code: builder.code,
            meta: builder.meta,
            note: builder.note,
        })
    }
}

#[tokio::test]
async fn response_round_trips_status_and_prefix_headers() {
    let output = StatusOutput {
        code: Some(202),
        meta: [("owner".to_string(), "ada".to_string())].into(),
        note: Some("accepted".to_string()),
    };
    let response = ResponseSerializer::default()
        .serialize(None, &output)
        .unwrap();
    assert_eq!(response.status(), http::StatusCode::ACCEPTED);
    assert_eq!(response.headers().get("x-meta-owner").unwrap(), "ada");

    let decoded: StatusOutput = ResponseDeserializer::default()
        .deserialize(response)
        .await
        .unwrap();
    assert_eq!(decoded, output);
}

static TEAPOT_ERROR: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::structure_builder(ShapeId::new("com.example#TeapotError"))
        .with_trait(Trait::Error(ErrorFault::Client))
        .with_trait(Trait::HttpError(418))
        .member("message", &prelude::STRING, vec![])
        .build()
});

#[derive(Debug)]
struct TeapotError {
    message: String,
}

impl SerializableStruct for TeapotError {
    fn schema(&self) -> SchemaRef {
        TEAPOT_ERROR.clone()
    }

    fn serialize_members<S: ShapeSerializer>(&self, ser: &mut S) -> Result<(), SerdeError> {
        ser.write_string(TEAPOT_ERROR.member("message").unwrap(), &self.message)
    }
}

#[test]
fn error_status_comes_from_the_http_error_trait() {
    let response = ResponseSerializer::default()
        .serialize(
            None,
            &TeapotError {
                message: "short and stout".to_string(),
            },
        )
        .unwrap();
    assert_eq!(response.status().as_u16(), 418);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/cbor"
    );
    // Body carries the error members, codec-serialized.
    let body = response.body().as_inline().unwrap();
    assert_eq!(body[0], 0xBF);
    assert_eq!(body[body.len() - 1], 0xFF);
}

static FALLBACK_ERROR: LazyLock<SchemaRef> = LazyLock::new(|| {
    Schema::structure_builder(ShapeId::new("com.example#FallbackError"))
        .with_trait(Trait::Error(ErrorFault::Server))
        .member("message", &prelude::STRING, vec![])
        .build()
});

#[derive(Debug)]
struct FallbackError;

impl SerializableStruct for FallbackError {
    fn schema(&self) -> SchemaRef {
        FALLBACK_ERROR.clone()
    }

    fn serialize_members<S: ShapeSerializer>(&self, _ser: &mut S) -> Result<(), SerdeError> {
        Ok(())
    }
}

#[test]
fn error_trait_fault_supplies_the_default_status() {
    let response = ResponseSerializer::default()
        .serialize(None, &FallbackError)
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
}
