/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Routing of structure members onto HTTP transport locations.

use quiver_schema::{SchemaRef, SerdeError, TraitKey};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

/// The transport location a member is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Binding {
    /// An HTTP header.
    Header,
    /// A query string parameter.
    Query,
    /// Arbitrary query string parameters from a map member.
    QueryParams,
    /// A URI label.
    Label,
    /// The response status code.
    Status,
    /// Headers sharing a prefix, from a map member.
    PrefixHeaders,
    /// The raw message payload.
    Payload,
    /// The codec-serialized message body.
    Body,
}

/// Whether bindings are computed for a request or a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Client-to-server message.
    Request,
    /// Server-to-client message.
    Response,
}

/// Precomputed member-to-location routing for one structure schema.
///
/// Routing is a pure function of the direction and each member's traits, so
/// matchers are computed once per `(schema, direction)` and shared
/// process-wide. Member indices are dense, making the routing table a plain
/// array lookup.
#[derive(Debug)]
pub struct BindingMatcher {
    bindings: Vec<Binding>,
    has_body_members: bool,
    payload_member: Option<usize>,
    status_member: Option<usize>,
}

static CACHE: LazyLock<RwLock<HashMap<(usize, Direction), Arc<BindingMatcher>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

impl BindingMatcher {
    /// Returns the matcher for the given structure schema and direction,
    /// computing and caching it on first use.
    pub fn of(schema: &SchemaRef, direction: Direction) -> Arc<BindingMatcher> {
        let key = (schema.identity(), direction);
        if let Some(matcher) = CACHE.read().unwrap().get(&key) {
            return matcher.clone();
        }
        let matcher = Arc::new(Self::compute(schema, direction));
        let mut cache = CACHE.write().unwrap();
        // Another thread may have raced the computation; first insert wins so
        // every caller observes the same instance.
        cache.entry(key).or_insert(matcher).clone()
    }

    fn compute(schema: &SchemaRef, direction: Direction) -> BindingMatcher {
        tracing::debug!(schema = %schema.id(), ?direction, "computing http bindings");
        let mut bindings = Vec::with_capacity(schema.members().len());
        let mut has_body_members = false;
        let mut payload_member = None;
        let mut status_member = None;
        for (index, member) in schema.members().iter().enumerate() {
            let binding = Self::binding_of(member, direction);
            match binding {
                Binding::Body => has_body_members = true,
                Binding::Payload => payload_member = Some(index),
                Binding::Status => status_member = Some(index),
                _ => {}
            }
            bindings.push(binding);
        }
        BindingMatcher {
            bindings,
            has_body_members,
            payload_member,
            status_member,
        }
    }

    fn binding_of(member: &SchemaRef, direction: Direction) -> Binding {
        if direction == Direction::Request {
            if member.has_trait(TraitKey::HttpLabel) {
                return Binding::Label;
            }
            if member.has_trait(TraitKey::HttpQuery) {
                return Binding::Query;
            }
            if member.has_trait(TraitKey::HttpQueryParams) {
                return Binding::QueryParams;
            }
        }
        if member.has_trait(TraitKey::HttpHeader) {
            return Binding::Header;
        }
        if member.has_trait(TraitKey::HttpPrefixHeaders) {
            return Binding::PrefixHeaders;
        }
        if member.has_trait(TraitKey::HttpPayload) {
            return Binding::Payload;
        }
        if direction == Direction::Response && member.has_trait(TraitKey::HttpResponseCode) {
            return Binding::Status;
        }
        Binding::Body
    }

    /// Returns the binding of a member of the matched structure.
    pub fn binding(&self, member: &SchemaRef) -> Result<Binding, SerdeError> {
        member
            .member_index()
            .and_then(|index| self.bindings.get(index).copied())
            .ok_or_else(|| {
                SerdeError::mismatch(format!(
                    "`{}` is not a member of the bound structure",
                    member.id()
                ))
            })
    }

    /// Returns true if any member is bound to the codec-serialized body.
    pub fn has_body_members(&self) -> bool {
        self.has_body_members
    }

    /// Returns the index of the payload-bound member, if any.
    pub fn payload_member(&self) -> Option<usize> {
        self.payload_member
    }

    /// Returns the index of the status-bound member, if any.
    pub fn status_member(&self) -> Option<usize> {
        self.status_member
    }

    /// Fails when the structure binds both a raw payload and body members;
    /// at most one of the two is structurally meaningful.
    pub fn check_payload_conflict(&self, schema: &SchemaRef) -> Result<(), SerdeError> {
        if self.payload_member.is_some() && self.has_body_members {
            return Err(SerdeError::protocol(format!(
                "`{}` binds both an http payload and body members",
                schema.id()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quiver_schema::{prelude, Schema, ShapeId, Trait};

    fn sample() -> SchemaRef {
        Schema::structure_builder(ShapeId::new("com.example#Input"))
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
            .member("payload", &prelude::STRING, vec![])
            .build()
    }

    #[test]
    fn request_bindings_follow_trait_priority() {
        let schema = sample();
        let matcher = BindingMatcher::of(&schema, Direction::Request);
        assert_eq!(
            matcher.binding(schema.member("id").unwrap()).unwrap(),
            Binding::Label
        );
        assert_eq!(
            matcher.binding(schema.member("filter").unwrap()).unwrap(),
            Binding::Query
        );
        assert_eq!(
            matcher.binding(schema.member("trace").unwrap()).unwrap(),
            Binding::Header
        );
        assert_eq!(
            matcher.binding(schema.member("payload").unwrap()).unwrap(),
            Binding::Body
        );
        assert!(matcher.has_body_members());
    }

    #[test]
    fn response_ignores_request_only_traits() {
        let schema = sample();
        let matcher = BindingMatcher::of(&schema, Direction::Response);
        // httpLabel and httpQuery have no meaning on responses.
        assert_eq!(
            matcher.binding(schema.member("id").unwrap()).unwrap(),
            Binding::Body
        );
        assert_eq!(
            matcher.binding(schema.member("filter").unwrap()).unwrap(),
            Binding::Body
        );
        assert_eq!(
            matcher.binding(schema.member("trace").unwrap()).unwrap(),
            Binding::Header
        );
    }

    #[test]
    fn matchers_are_cached_by_identity() {
        let schema = sample();
        let first = BindingMatcher::of(&schema, Direction::Request);
        let second = BindingMatcher::of(&schema, Direction::Request);
        assert!(Arc::ptr_eq(&first, &second));

        let other_direction = BindingMatcher::of(&schema, Direction::Response);
        assert!(!Arc::ptr_eq(&first, &other_direction));
    }

    #[test]
    fn status_binding_is_response_only() {
        let schema = Schema::structure_builder(ShapeId::new("com.example#Out"))
            .member(
                "status",
                &prelude::INTEGER,
                vec![Trait::HttpResponseCode],
            )
            .build();
        let matcher = BindingMatcher::of(&schema, Direction::Response);
        assert_eq!(
            matcher.binding(schema.member("status").unwrap()).unwrap(),
            Binding::Status
        );
        assert_eq!(matcher.status_member(), Some(0));

        let matcher = BindingMatcher::of(&schema, Direction::Request);
        assert_eq!(
            matcher.binding(schema.member("status").unwrap()).unwrap(),
            Binding::Body
        );
    }
}
