/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Runtime representation of schema traits.
//!
//! Traits provide additional metadata about shapes that affect serialization,
//! validation, and HTTP binding behavior. Each trait has a dense [`TraitKey`]
//! identity so trait lookups are a bitmask check plus a short scan.

use quiver_types::date_time::Format;

/// Dense identity of a trait, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[non_exhaustive]
pub enum TraitKey {
    /// `httpLabel`
    HttpLabel = 0,
    /// `httpQuery`
    HttpQuery,
    /// `httpQueryParams`
    HttpQueryParams,
    /// `httpHeader`
    HttpHeader,
    /// `httpPrefixHeaders`
    HttpPrefixHeaders,
    /// `httpPayload`
    HttpPayload,
    /// `httpResponseCode`
    HttpResponseCode,
    /// `http`
    Http,
    /// `httpError`
    HttpError,
    /// `error`
    Error,
    /// `timestampFormat`
    TimestampFormat,
    /// `mediaType`
    MediaType,
    /// `required`
    Required,
    /// `sparse`
    Sparse,
    /// `sensitive`
    Sensitive,
    /// `streaming`
    Streaming,
    /// `length`
    Length,
    /// `range`
    Range,
}

/// Whether an error shape is the caller's fault or the service's fault.
///
/// Determines the default HTTP status code when no `httpError` trait is
/// present: 400 for client faults and 500 for server faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFault {
    /// The caller caused the error.
    Client,
    /// The service caused the error.
    Server,
}

impl ErrorFault {
    /// Returns the default HTTP status code for this fault classification.
    pub fn default_status_code(&self) -> u16 {
        match self {
            ErrorFault::Client => 400,
            ErrorFault::Server => 500,
        }
    }
}

/// A trait applied to a shape or member, with its payload.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Trait {
    /// Binds a member to a URI label.
    HttpLabel,
    /// Binds a member to a query string parameter with the given name.
    HttpQuery(String),
    /// Binds a map member to arbitrary query string parameters.
    HttpQueryParams,
    /// Binds a member to an HTTP header with the given name.
    HttpHeader(String),
    /// Binds a map member to headers sharing the given prefix.
    HttpPrefixHeaders(String),
    /// Binds a member to the raw HTTP message payload.
    HttpPayload,
    /// Binds a member to the HTTP response status code.
    HttpResponseCode,
    /// Configures an operation's HTTP method, URI pattern, and success code.
    Http {
        /// HTTP method, e.g. `PUT`.
        method: String,
        /// URI pattern with `{label}` and greedy `{label+}` segments.
        uri: String,
        /// Status code of a successful response.
        code: u16,
    },
    /// Overrides the HTTP status code of an error shape.
    HttpError(u16),
    /// Marks a shape as an error and classifies its fault.
    Error(ErrorFault),
    /// Overrides the timestamp format of a member.
    TimestampFormat(Format),
    /// Declares the media type of a blob or string shape.
    MediaType(String),
    /// Marks a member as required.
    Required,
    /// Marks a collection as holding nullable values.
    Sparse,
    /// Marks a shape as sensitive; rendering sinks redact it.
    Sensitive,
    /// Marks a blob member as streaming.
    Streaming,
    /// Constrains the length of a string, blob, list, or map.
    Length {
        /// Inclusive minimum length.
        min: Option<u64>,
        /// Inclusive maximum length.
        max: Option<u64>,
    },
    /// Constrains the range of a numeric shape.
    Range {
        /// Inclusive minimum value.
        min: Option<f64>,
        /// Inclusive maximum value.
        max: Option<f64>,
    },
}

impl Trait {
    /// Returns the dense identity of this trait.
    pub fn key(&self) -> TraitKey {
        match self {
            Trait::HttpLabel => TraitKey::HttpLabel,
            Trait::HttpQuery(_) => TraitKey::HttpQuery,
            Trait::HttpQueryParams => TraitKey::HttpQueryParams,
            Trait::HttpHeader(_) => TraitKey::HttpHeader,
            Trait::HttpPrefixHeaders(_) => TraitKey::HttpPrefixHeaders,
            Trait::HttpPayload => TraitKey::HttpPayload,
            Trait::HttpResponseCode => TraitKey::HttpResponseCode,
            Trait::Http { .. } => TraitKey::Http,
            Trait::HttpError(_) => TraitKey::HttpError,
            Trait::Error(_) => TraitKey::Error,
            Trait::TimestampFormat(_) => TraitKey::TimestampFormat,
            Trait::MediaType(_) => TraitKey::MediaType,
            Trait::Required => TraitKey::Required,
            Trait::Sparse => TraitKey::Sparse,
            Trait::Sensitive => TraitKey::Sensitive,
            Trait::Streaming => TraitKey::Streaming,
            Trait::Length { .. } => TraitKey::Length,
            Trait::Range { .. } => TraitKey::Range,
        }
    }
}

/// A set of traits keyed by their dense [`TraitKey`] identity.
#[derive(Debug, Clone, Default)]
pub struct TraitMap {
    mask: u32,
    traits: Vec<Trait>,
}

impl TraitMap {
    /// Creates a new empty `TraitMap`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `TraitMap` from a list of traits.
    pub fn from_traits(traits: Vec<Trait>) -> Self {
        let mut map = Self::new();
        for t in traits {
            map.insert(t);
        }
        map
    }

    /// Inserts a trait, replacing any existing trait with the same key.
    pub fn insert(&mut self, trait_value: Trait) {
        let key = trait_value.key();
        self.mask |= 1 << key as u32;
        if let Some(existing) = self.traits.iter_mut().find(|t| t.key() == key) {
            *existing = trait_value;
        } else {
            self.traits.push(trait_value);
        }
    }

    /// Returns true if a trait with the given key is present.
    #[inline]
    pub fn contains(&self, key: TraitKey) -> bool {
        self.mask & (1 << key as u32) != 0
    }

    /// Gets a trait by its key.
    pub fn get(&self, key: TraitKey) -> Option<&Trait> {
        if !self.contains(key) {
            return None;
        }
        self.traits.iter().find(|t| t.key() == key)
    }

    /// Returns an iterator over all traits.
    pub fn iter(&self) -> impl Iterator<Item = &Trait> {
        self.traits.iter()
    }

    /// Returns the number of traits in the map.
    pub fn len(&self) -> usize {
        self.traits.len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_trait_map() {
        let mut map = TraitMap::new();
        assert!(map.is_empty());

        map.insert(Trait::HttpHeader("x-trace".to_string()));
        map.insert(Trait::Required);
        assert_eq!(map.len(), 2);
        assert!(map.contains(TraitKey::HttpHeader));
        assert!(map.contains(TraitKey::Required));
        assert!(!map.contains(TraitKey::HttpLabel));

        match map.get(TraitKey::HttpHeader) {
            Some(Trait::HttpHeader(name)) => assert_eq!(name, "x-trace"),
            other => panic!("unexpected trait: {:?}", other),
        }
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = TraitMap::new();
        map.insert(Trait::HttpQuery("a".to_string()));
        map.insert(Trait::HttpQuery("b".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(TraitKey::HttpQuery),
            Some(&Trait::HttpQuery("b".to_string()))
        );
    }

    #[test]
    fn test_error_fault_codes() {
        assert_eq!(ErrorFault::Client.default_status_code(), 400);
        assert_eq!(ErrorFault::Server.default_status_code(), 500);
    }
}
