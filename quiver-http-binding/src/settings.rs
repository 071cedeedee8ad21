/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Configuration of the HTTP binding layer.
#[derive(Debug, Clone)]
pub struct HttpBindingSettings {
    omit_empty_payload: bool,
    payload_media_type: Option<String>,
    max_in_memory_payload: usize,
}

/// Default ceiling for in-memory body materialization: 128 MiB.
pub const DEFAULT_MAX_IN_MEMORY_PAYLOAD: usize = 128 * 1024 * 1024;

impl Default for HttpBindingSettings {
    fn default() -> Self {
        Self {
            omit_empty_payload: true,
            payload_media_type: None,
            max_in_memory_payload: DEFAULT_MAX_IN_MEMORY_PAYLOAD,
        }
    }
}

impl HttpBindingSettings {
    /// Creates default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls whether an empty body is suppressed when no body or payload
    /// member is populated. Defaults to true.
    pub fn with_omit_empty_payload(mut self, omit: bool) -> Self {
        self.omit_empty_payload = omit;
        self
    }

    /// Overrides the media type advertised for codec-serialized bodies.
    /// Defaults to the payload codec's own media type.
    pub fn with_payload_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.payload_media_type = Some(media_type.into());
        self
    }

    /// Sets the byte ceiling for materializing a body in memory.
    /// Defaults to 128 MiB.
    pub fn with_max_in_memory_payload(mut self, max_bytes: usize) -> Self {
        self.max_in_memory_payload = max_bytes;
        self
    }

    /// Returns whether empty payloads are suppressed.
    pub fn omit_empty_payload(&self) -> bool {
        self.omit_empty_payload
    }

    /// Returns the configured payload media type override.
    pub fn payload_media_type(&self) -> Option<&str> {
        self.payload_media_type.as_deref()
    }

    /// Returns the in-memory body ceiling in bytes.
    pub fn max_in_memory_payload(&self) -> usize {
        self.max_in_memory_payload
    }
}
