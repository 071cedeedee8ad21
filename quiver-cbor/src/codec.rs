/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The CBOR [`Codec`] and its settings.

use crate::{CborDeserializer, CborSerializer};
use quiver_schema::{Codec, SerdeError, ShapeId};
use quiver_types::Document;

/// The media type advertised for CBOR payloads.
pub const MEDIA_TYPE: &str = "application/cbor";

/// Settings for the CBOR codec.
#[derive(Debug, Clone, Default)]
pub struct CborSettings {
    default_namespace: Option<String>,
    strict_timestamps: bool,
}

impl CborSettings {
    /// Creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace used to resolve relative document discriminators.
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }

    /// Refuses timestamps whose wire shape does not match the expected form.
    pub fn with_strict_timestamps(mut self, strict: bool) -> Self {
        self.strict_timestamps = strict;
        self
    }

    /// Returns the configured default namespace.
    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Returns whether strict timestamp handling is enabled.
    pub fn strict_timestamps(&self) -> bool {
        self.strict_timestamps
    }

    /// Resolves the discriminator of a document against the default
    /// namespace: absolute ids pass through, relative ids are qualified.
    pub fn resolve_discriminator(&self, document: &Document) -> Option<ShapeId> {
        let discriminator = document.discriminator()?;
        if discriminator.contains('#') {
            Some(ShapeId::new(discriminator))
        } else {
            self.default_namespace
                .as_deref()
                .map(|namespace| ShapeId::from_parts(namespace, discriminator))
        }
    }
}

/// A [`Codec`] producing CBOR serializers and deserializers.
#[derive(Debug, Clone, Default)]
pub struct CborCodec {
    settings: CborSettings,
}

impl CborCodec {
    /// Creates a codec with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with the given settings.
    pub fn with_settings(settings: CborSettings) -> Self {
        Self { settings }
    }

    /// Returns this codec's settings.
    pub fn settings(&self) -> &CborSettings {
        &self.settings
    }
}

impl Codec for CborCodec {
    type Serializer = CborSerializer<Vec<u8>>;
    type Deserializer<'de> = CborDeserializer<'de>;

    fn media_type(&self) -> &'static str {
        MEDIA_TYPE
    }

    fn serializer(&self) -> Self::Serializer {
        CborSerializer::new()
    }

    fn finish(&self, serializer: Self::Serializer) -> Result<Vec<u8>, SerdeError> {
        Ok(serializer.finish())
    }

    fn deserializer<'de>(&self, input: &'de [u8]) -> Self::Deserializer<'de> {
        CborDeserializer::with_settings(input, self.settings.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn resolves_relative_discriminators() {
        let settings = CborSettings::new().with_default_namespace("com.example");
        let mut map = HashMap::new();
        map.insert("__type".to_string(), Document::from("Weather"));
        let doc = Document::Map(map);
        assert_eq!(
            settings.resolve_discriminator(&doc).unwrap().as_str(),
            "com.example#Weather"
        );

        let mut map = HashMap::new();
        map.insert("__type".to_string(), Document::from("other.ns#Weather"));
        let doc = Document::Map(map);
        assert_eq!(
            settings.resolve_discriminator(&doc).unwrap().as_str(),
            "other.ns#Weather"
        );

        let bare = CborSettings::new();
        let mut map = HashMap::new();
        map.insert("__type".to_string(), Document::from("Weather"));
        assert!(bare.resolve_discriminator(&Document::Map(map)).is_none());
    }
}
