/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Codec trait for creating shape serializers and deserializers.
//!
//! A codec represents a specific serialization format and provides serializer
//! and deserializer instances for that format, plus the media type the format
//! is advertised under in HTTP messages.

use crate::serde::{DeserializableStruct, SerializableStruct, ShapeDeserializer, ShapeSerializer};
use crate::SerdeError;

/// A codec for a specific serialization format.
pub trait Codec {
    /// The serializer type for this codec.
    type Serializer: ShapeSerializer;

    /// The deserializer type for this codec, borrowing from the input bytes.
    type Deserializer<'de>: ShapeDeserializer;

    /// The media type of this codec's wire format, e.g. `application/cbor`.
    fn media_type(&self) -> &'static str;

    /// Creates a new serializer.
    fn serializer(&self) -> Self::Serializer;

    /// Finalizes a serializer and returns the serialized bytes.
    fn finish(&self, serializer: Self::Serializer) -> Result<Vec<u8>, SerdeError>;

    /// Creates a new deserializer over the given input bytes.
    fn deserializer<'de>(&self, input: &'de [u8]) -> Self::Deserializer<'de>;

    /// Serializes a structure to bytes.
    fn serialize<T: SerializableStruct>(&self, value: &T) -> Result<Vec<u8>, SerdeError> {
        let mut serializer = self.serializer();
        value.serialize(&mut serializer)?;
        self.finish(serializer)
    }

    /// Deserializes a structure from bytes.
    fn deserialize<T: DeserializableStruct>(&self, input: &[u8]) -> Result<T, SerdeError> {
        let mut deserializer = self.deserializer(input);
        T::deserialize(&mut deserializer)
    }
}
