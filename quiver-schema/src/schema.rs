/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Runtime schema values.
//!
//! A [`Schema`] is a lightweight runtime representation of a shape: its id,
//! type, traits, and member schemas. Schemas are produced ahead of time (by a
//! schema compiler or by hand in tests), are immutable once built, and are
//! shared process-wide behind [`SchemaRef`]s, so identity comparison and
//! pointer-keyed caches are safe.

use crate::{ShapeId, ShapeType, Trait, TraitKey, TraitMap};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared handle to an immutable [`Schema`].
pub type SchemaRef = Arc<Schema>;

/// Constraint values pre-extracted from traits at schema build time.
///
/// Keeping these unpacked avoids re-interpreting trait payloads on hot
/// validation paths.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct Constraints {
    /// Inclusive minimum length of a string, blob, list, or map.
    pub min_length: Option<u64>,
    /// Inclusive maximum length of a string, blob, list, or map.
    pub max_length: Option<u64>,
    /// Inclusive minimum of an integral value.
    pub min_long: Option<i64>,
    /// Inclusive maximum of an integral value.
    pub max_long: Option<i64>,
    /// Inclusive minimum of a floating point value.
    pub min_double: Option<f64>,
    /// Inclusive maximum of a floating point value.
    pub max_double: Option<f64>,
    /// Allowed values of an enum shape.
    pub enum_values: Vec<String>,
    /// Allowed values of an int-enum shape.
    pub int_enum_values: Vec<i32>,
}

impl Constraints {
    fn from_traits(traits: &TraitMap) -> Self {
        let mut constraints = Constraints::default();
        if let Some(Trait::Length { min, max }) = traits.get(TraitKey::Length) {
            constraints.min_length = *min;
            constraints.max_length = *max;
        }
        if let Some(Trait::Range { min, max }) = traits.get(TraitKey::Range) {
            constraints.min_double = *min;
            constraints.max_double = *max;
            constraints.min_long = min.map(|v| v as i64);
            constraints.max_long = max.map(|v| v as i64);
        }
        constraints
    }

    fn merge_target(mut self, target: &Constraints) -> Self {
        self.min_length = self.min_length.or(target.min_length);
        self.max_length = self.max_length.or(target.max_length);
        self.min_long = self.min_long.or(target.min_long);
        self.max_long = self.max_long.or(target.max_long);
        self.min_double = self.min_double.or(target.min_double);
        self.max_double = self.max_double.or(target.max_double);
        if self.enum_values.is_empty() {
            self.enum_values = target.enum_values.clone();
        }
        if self.int_enum_values.is_empty() {
            self.int_enum_values = target.int_enum_values.clone();
        }
        self
    }
}

/// Runtime schema for a shape.
#[derive(Debug)]
pub struct Schema {
    id: ShapeId,
    shape_type: ShapeType,
    traits: TraitMap,
    members: Vec<SchemaRef>,
    member_names: HashMap<String, usize>,
    member_name: Option<String>,
    member_index: usize,
    target: Option<SchemaRef>,
    input: Option<SchemaRef>,
    output: Option<SchemaRef>,
    constraints: Constraints,
}

impl Schema {
    fn base(id: ShapeId, shape_type: ShapeType, traits: TraitMap) -> Self {
        let constraints = Constraints::from_traits(&traits);
        Self {
            id,
            shape_type,
            traits,
            members: Vec::new(),
            member_names: HashMap::new(),
            member_name: None,
            member_index: 0,
            target: None,
            input: None,
            output: None,
            constraints,
        }
    }

    /// Creates a schema for a simple shape.
    pub fn scalar(id: ShapeId, shape_type: ShapeType, traits: Vec<Trait>) -> SchemaRef {
        debug_assert!(shape_type.is_simple(), "{:?} is not a simple type", shape_type);
        Arc::new(Self::base(id, shape_type, TraitMap::from_traits(traits)))
    }

    /// Creates a schema for a string enum shape with the given allowed values.
    pub fn string_enum(id: ShapeId, values: Vec<String>, traits: Vec<Trait>) -> SchemaRef {
        let mut schema = Self::base(id, ShapeType::Enum, TraitMap::from_traits(traits));
        schema.constraints.enum_values = values;
        Arc::new(schema)
    }

    /// Creates a schema for an int enum shape with the given allowed values.
    pub fn int_enum(id: ShapeId, values: Vec<i32>, traits: Vec<Trait>) -> SchemaRef {
        let mut schema = Self::base(id, ShapeType::IntEnum, TraitMap::from_traits(traits));
        schema.constraints.int_enum_values = values;
        Arc::new(schema)
    }

    /// Starts building a structure schema.
    pub fn structure_builder(id: ShapeId) -> StructureBuilder {
        StructureBuilder::new(id, ShapeType::Structure)
    }

    /// Starts building a union schema.
    pub fn union_builder(id: ShapeId) -> StructureBuilder {
        StructureBuilder::new(id, ShapeType::Union)
    }

    /// Creates a list schema with the given element target.
    pub fn list(id: ShapeId, traits: Vec<Trait>, member_target: &SchemaRef) -> SchemaRef {
        let mut schema = Self::base(id.clone(), ShapeType::List, TraitMap::from_traits(traits));
        let member = Self::make_member(&id, "member", 0, member_target, Vec::new());
        schema.member_names.insert("member".to_string(), 0);
        schema.members.push(member);
        Arc::new(schema)
    }

    /// Creates a map schema with string keys and the given value target.
    pub fn map(
        id: ShapeId,
        traits: Vec<Trait>,
        key_target: &SchemaRef,
        value_target: &SchemaRef,
    ) -> SchemaRef {
        let mut schema = Self::base(id.clone(), ShapeType::Map, TraitMap::from_traits(traits));
        let key = Self::make_member(&id, "key", 0, key_target, Vec::new());
        let value = Self::make_member(&id, "value", 1, value_target, Vec::new());
        schema.member_names.insert("key".to_string(), 0);
        schema.member_names.insert("value".to_string(), 1);
        schema.members.push(key);
        schema.members.push(value);
        Arc::new(schema)
    }

    /// Creates an operation schema.
    pub fn operation(
        id: ShapeId,
        traits: Vec<Trait>,
        input: &SchemaRef,
        output: &SchemaRef,
    ) -> SchemaRef {
        let mut schema = Self::base(id, ShapeType::Operation, TraitMap::from_traits(traits));
        schema.input = Some(input.clone());
        schema.output = Some(output.clone());
        Arc::new(schema)
    }

    fn make_member(
        container: &ShapeId,
        name: &str,
        index: usize,
        target: &SchemaRef,
        traits: Vec<Trait>,
    ) -> SchemaRef {
        let traits = TraitMap::from_traits(traits);
        let constraints = Constraints::from_traits(&traits).merge_target(&target.constraints);
        Arc::new(Self {
            id: container.with_member(name),
            shape_type: ShapeType::Member,
            traits,
            members: Vec::new(),
            member_names: HashMap::new(),
            member_name: Some(name.to_string()),
            member_index: index,
            target: Some(target.clone()),
            input: None,
            output: None,
            constraints,
        })
    }

    /// Returns the shape ID of this schema.
    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    /// Returns the shape type.
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// Returns the traits attached to this schema.
    pub fn traits(&self) -> &TraitMap {
        &self.traits
    }

    /// Returns true if a trait with the given key is attached to this schema
    /// or, for members, to the member's target.
    pub fn has_trait(&self, key: TraitKey) -> bool {
        self.traits.contains(key)
            || self
                .target
                .as_ref()
                .map(|t| t.traits.contains(key))
                .unwrap_or(false)
    }

    /// Returns the trait with the given key from this schema or, for members,
    /// from the member's target.
    pub fn get_trait(&self, key: TraitKey) -> Option<&Trait> {
        self.traits
            .get(key)
            .or_else(|| self.target.as_ref().and_then(|t| t.traits.get(key)))
    }

    /// Returns the pre-extracted constraint values.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Returns the member name if this is a member schema.
    pub fn member_name(&self) -> Option<&str> {
        self.member_name.as_deref()
    }

    /// Returns the position of this member within its container.
    ///
    /// Member indices are dense and zero-based, so array-indexed caches keyed
    /// on them are valid.
    pub fn member_index(&self) -> Option<usize> {
        self.member_name.as_ref().map(|_| self.member_index)
    }

    /// Returns the target schema of a member schema.
    pub fn member_target(&self) -> Option<&SchemaRef> {
        self.target.as_ref()
    }

    /// Resolves a member schema to its target; returns `self` for non-members.
    pub fn resolve(&self) -> &Schema {
        self.target.as_deref().unwrap_or(self)
    }

    /// Returns the member schema with the given name.
    pub fn member(&self, name: &str) -> Option<&SchemaRef> {
        self.member_names
            .get(name)
            .and_then(|index| self.members.get(*index))
    }

    /// Returns the member schema at the given position.
    pub fn member_by_index(&self, index: usize) -> Option<&SchemaRef> {
        self.members.get(index)
    }

    /// Returns all member schemas in declaration order.
    pub fn members(&self) -> &[SchemaRef] {
        &self.members
    }

    /// Returns the element member schema of a list.
    pub fn list_member(&self) -> Option<&SchemaRef> {
        match self.shape_type {
            ShapeType::List => self.members.first(),
            _ => None,
        }
    }

    /// Returns the key member schema of a map.
    pub fn map_key(&self) -> Option<&SchemaRef> {
        match self.shape_type {
            ShapeType::Map => self.members.first(),
            _ => None,
        }
    }

    /// Returns the value member schema of a map.
    pub fn map_value(&self) -> Option<&SchemaRef> {
        match self.shape_type {
            ShapeType::Map => self.members.get(1),
            _ => None,
        }
    }

    /// Returns the input schema of an operation.
    pub fn input(&self) -> Option<&SchemaRef> {
        self.input.as_ref()
    }

    /// Returns the output schema of an operation.
    pub fn output(&self) -> Option<&SchemaRef> {
        self.output.as_ref()
    }

    /// Returns a stable identity for this schema, valid for cache keys.
    pub fn identity(self: &Arc<Self>) -> usize {
        Arc::as_ptr(self) as usize
    }
}

/// Builder for structure and union schemas.
#[derive(Debug)]
pub struct StructureBuilder {
    id: ShapeId,
    shape_type: ShapeType,
    traits: TraitMap,
    members: Vec<(String, SchemaRef, Vec<Trait>)>,
}

impl StructureBuilder {
    fn new(id: ShapeId, shape_type: ShapeType) -> Self {
        Self {
            id,
            shape_type,
            traits: TraitMap::new(),
            members: Vec::new(),
        }
    }

    /// Attaches a trait to the structure itself.
    pub fn with_trait(mut self, trait_value: Trait) -> Self {
        self.traits.insert(trait_value);
        self
    }

    /// Adds a member with the given name, target, and member traits.
    ///
    /// Members are indexed densely in the order they are added.
    pub fn member(mut self, name: &str, target: &SchemaRef, traits: Vec<Trait>) -> Self {
        self.members.push((name.to_string(), target.clone(), traits));
        self
    }

    /// Builds the schema.
    pub fn build(self) -> SchemaRef {
        let mut schema = Schema::base(self.id.clone(), self.shape_type, self.traits);
        for (index, (name, target, traits)) in self.members.into_iter().enumerate() {
            let member = Schema::make_member(&self.id, &name, index, &target, traits);
            schema.member_names.insert(name, index);
            schema.members.push(member);
        }
        Arc::new(schema)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude;

    #[test]
    fn structure_members_are_densely_indexed() {
        let schema = Schema::structure_builder(ShapeId::new("com.example#Person"))
            .member("name", &prelude::STRING, vec![])
            .member("age", &prelude::INTEGER, vec![])
            .build();

        assert_eq!(schema.shape_type(), ShapeType::Structure);
        assert_eq!(schema.members().len(), 2);

        let name = schema.member("name").unwrap();
        assert_eq!(name.member_name(), Some("name"));
        assert_eq!(name.member_index(), Some(0));
        assert_eq!(name.resolve().shape_type(), ShapeType::String);

        let age = schema.member_by_index(1).unwrap();
        assert_eq!(age.member_name(), Some("age"));
        assert_eq!(age.id().as_str(), "com.example#Person$age");
    }

    #[test]
    fn member_constraints_merge_target() {
        let bounded = Schema::scalar(
            ShapeId::new("com.example#Name"),
            ShapeType::String,
            vec![Trait::Length {
                min: Some(1),
                max: Some(10),
            }],
        );
        let schema = Schema::structure_builder(ShapeId::new("com.example#Person"))
            .member("name", &bounded, vec![Trait::Length { min: Some(2), max: None }])
            .build();

        let constraints = schema.member("name").unwrap().constraints();
        // The member's own length trait wins; the target fills in the rest.
        assert_eq!(constraints.min_length, Some(2));
        assert_eq!(constraints.max_length, None);
    }

    #[test]
    fn list_and_map_members() {
        let list = Schema::list(ShapeId::new("com.example#Names"), vec![], &prelude::STRING);
        assert_eq!(
            list.list_member().unwrap().resolve().shape_type(),
            ShapeType::String
        );

        let map = Schema::map(
            ShapeId::new("com.example#Ages"),
            vec![],
            &prelude::STRING,
            &prelude::INTEGER,
        );
        assert_eq!(map.map_key().unwrap().member_name(), Some("key"));
        assert_eq!(
            map.map_value().unwrap().resolve().shape_type(),
            ShapeType::Integer
        );
    }

    #[test]
    fn identity_is_stable() {
        let schema = Schema::scalar(
            ShapeId::new("com.example#Id"),
            ShapeType::String,
            vec![],
        );
        let clone = schema.clone();
        assert_eq!(schema.identity(), clone.identity());

        let other = Schema::scalar(
            ShapeId::new("com.example#Id"),
            ShapeType::String,
            vec![],
        );
        assert_ne!(schema.identity(), other.identity());
    }

    #[test]
    fn member_traits_resolve_through_target() {
        let tagged = Schema::scalar(
            ShapeId::new("com.example#Image"),
            ShapeType::Blob,
            vec![Trait::MediaType("image/png".to_string())],
        );
        let schema = Schema::structure_builder(ShapeId::new("com.example#Upload"))
            .member("image", &tagged, vec![])
            .build();
        let member = schema.member("image").unwrap();
        assert!(member.has_trait(TraitKey::MediaType));
        assert!(matches!(
            member.get_trait(TraitKey::MediaType),
            Some(Trait::MediaType(m)) if m == "image/png"
        ));
    }
}
