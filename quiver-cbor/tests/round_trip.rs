/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use quiver_cbor::{CborCodec, CborDeserializer, CborSerializer};
use quiver_schema::serde::{
    DeserializableStruct, SerializableStruct, ShapeDeserializer, ShapeSerializer,
};
use quiver_schema::{prelude, Codec, Schema, SchemaRef, SerdeError, ShapeId};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime};
use std::str::FromStr;
use std::sync::LazyLock;

static PROFILE: LazyLock<SchemaRef> = LazyLock::new(|| {
    let tags = Schema::list(
        ShapeId::new("com.example#Tags"),
        vec![],
        &prelude::STRING,
    );
    Schema::structure_builder(ShapeId::new("com.example#Profile"))
        .member("name", &prelude::STRING, vec![])
        .member("age", &prelude::INTEGER, vec![])
        .member("balance", &prelude::BIG_DECIMAL, vec![])
        .member("key", &prelude::BLOB, vec![])
        .member("created", &prelude::TIMESTAMP, vec![])
        .member("tags", &tags, vec![])
        .build()
});

#[derive(Debug, Clone, PartialEq)]
struct Profile {
    name: String,
    age: i32,
    balance: Option<BigDecimal>,
    key: Option<Blob>,
    created: Option<DateTime>,
    tags: Vec<String>,
}

impl SerializableStruct for Profile {
    fn schema(&self) -> SchemaRef {
        PROFILE.clone()
    }

    fn serialize_members<S: ShapeSerializer>(&self, ser: &mut S) -> Result<(), SerdeError> {
        let schema = self.schema();
        ser.write_string(schema.member("name").unwrap(), &self.name)?;
        ser.write_integer(schema.member("age").unwrap(), self.age)?;
        if let Some(balance) = &self.balance {
            ser.write_big_decimal(schema.member("balance").unwrap(), balance)?;
        }
        if let Some(key) = &self.key {
            ser.write_blob(schema.member("key").unwrap(), key)?;
        }
        if let Some(created) = &self.created {
            ser.write_timestamp(schema.member("created").unwrap(), created)?;
        }
        if !self.tags.is_empty() {
            let member = schema.member("tags").unwrap();
            let element = member.member_target().unwrap().list_member().unwrap().clone();
            ser.write_list(member, Some(self.tags.len()), |ser| {
                for tag in &self.tags {
                    ser.write_string(&element, tag)?;
                }
                Ok(())
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ProfileBuilder {
    name: Option<String>,
    age: Option<i32>,
    balance: Option<BigDecimal>,
    key: Option<Blob>,
    created: Option<DateTime>,
    tags: Vec<String>,
}

impl DeserializableStruct for Profile {
    type Builder = ProfileBuilder;

    fn schema() -> SchemaRef {
        PROFILE.clone()
    }

    fn read_member<D: ShapeDeserializer>(
        mut builder: ProfileBuilder,
        member: &SchemaRef,
        de: &mut D,
    ) -> Result<ProfileBuilder, SerdeError> {
        match member.member_name() {
            Some("name") => builder.name = Some(de.read_string(member)?),
            Some("age") => builder.age = Some(de.read_integer(member)?),
            Some("balance") => builder.balance = Some(de.read_big_decimal(member)?),
            Some("key") => builder.key = Some(de.read_blob(member)?),
            Some("created") => builder.created = Some(de.read_timestamp(member)?),
            Some("tags") => {
                builder.tags = de.read_list(member, Vec::new(), |mut tags, de| {
                    tags.push(de.read_string(member)?);
                    Ok(tags)
                })?;
            }
            _ => {}
        }
        Ok(builder)
    }

    fn build(builder: ProfileBuilder) -> Result<Self, SerdeError> {
        Ok(Profile {
            name: builder
                .name
                .ok_or_else(|| SerdeError::validation("missing required member `name`"))?,
            age: builder
                .age
                .ok_or_else(|| SerdeError::validation("missing required member `age`"))?,
            balance: builder.balance,
            key: builder.key,
            created: builder.created,
            tags: builder.tags,
        })
    }
}

#[test]
fn small_positive_integer() {
    let mut ser = CborSerializer::new();
    ser.write_integer(&prelude::INTEGER, 10).unwrap();
    let bytes = ser.finish();
    assert_eq!(bytes, [0x0A]);

    let mut de = CborDeserializer::new(&bytes);
    assert_eq!(de.read_integer(&prelude::INTEGER).unwrap(), 10);
}

#[test]
fn negative_integer() {
    let mut ser = CborSerializer::new();
    ser.write_integer(&prelude::INTEGER, -1).unwrap();
    let bytes = ser.finish();
    assert_eq!(bytes, [0x20]);

    let mut de = CborDeserializer::new(&bytes);
    assert_eq!(de.read_integer(&prelude::INTEGER).unwrap(), -1);
}

#[test]
fn epoch_timestamp() {
    let instant = DateTime::from_secs_f64(1_700_000_000.0);
    let mut ser = CborSerializer::new();
    ser.write_timestamp(&prelude::TIMESTAMP, &instant).unwrap();
    let bytes = ser.finish();
    assert_eq!(
        bytes,
        [0xC1, 0xFB, 0x41, 0xD9, 0x4A, 0x7A, 0x88, 0x00, 0x00, 0x00]
    );

    let mut de = CborDeserializer::new(&bytes);
    assert_eq!(de.read_timestamp(&prelude::TIMESTAMP).unwrap(), instant);
}

#[test]
fn structure_frame_is_indefinite() {
    let profile = Profile {
        name: "Ada".to_string(),
        age: 36,
        balance: None,
        key: None,
        created: None,
        tags: Vec::new(),
    };
    let bytes = CborCodec::new().serialize(&profile).unwrap();
    assert_eq!(*bytes.first().unwrap(), 0xBF);
    assert_eq!(*bytes.last().unwrap(), 0xFF);
    assert_eq!(
        bytes,
        [
            0xBF, 0x64, b'n', b'a', b'm', b'e', 0x63, b'A', b'd', b'a', 0x63, b'a', b'g', b'e',
            0x18, 0x24, 0xFF,
        ]
    );
}

#[test]
fn full_round_trip() {
    let profile = Profile {
        name: "Ada Lovelace".to_string(),
        age: 36,
        balance: Some(BigDecimal::from_str("1234.56").unwrap()),
        key: Some(Blob::new(vec![0x00, 0x80, 0xFF])),
        created: Some(DateTime::from_secs(1_700_000_000)),
        tags: vec!["math".to_string(), "engines".to_string()],
    };

    let codec = CborCodec::new();
    let bytes = codec.serialize(&profile).unwrap();
    let decoded: Profile = codec.deserialize(&bytes).unwrap();
    assert_eq!(decoded, profile);
}

#[test]
fn missing_required_member_fails_build() {
    // {"age": 1}
    let bytes = [0xBF, 0x63, b'a', b'g', b'e', 0x01, 0xFF];
    let err = CborCodec::new().deserialize::<Profile>(&bytes).unwrap_err();
    assert_eq!(err.kind(), quiver_schema::ErrorKind::ValidationFailure);
}

#[test]
fn big_integer_round_trip_above_64_bits() {
    let value = BigInteger::from_str("340282366920938463463374607431768211455").unwrap();
    let mut ser = CborSerializer::new();
    ser.write_big_integer(&prelude::BIG_INTEGER, &value).unwrap();
    let bytes = ser.finish();
    assert_eq!(bytes[0], 0xC2);

    let mut de = CborDeserializer::new(&bytes);
    assert_eq!(de.read_big_integer(&prelude::BIG_INTEGER).unwrap(), value);
}

#[test]
fn media_type_is_cbor() {
    assert_eq!(CborCodec::new().media_type(), "application/cbor");
}
