/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Constraint validation over the serializer protocol.
//!
//! The [`Validator`] is a [`ShapeSerializer`] that checks each written value
//! against the pre-extracted constraints of its schema, accumulating
//! [`ValidationError`]s with the path of each offending value. Validation
//! stops early when the error cap is reached or when the nesting depth
//! budget is exhausted; errors accumulated up to that point are preserved.

use crate::serde::{SerializableStruct, ShapeSerializer};
use crate::{Constraints, ErrorKind, SchemaRef, SerdeError};
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime, Document};
use std::fmt;

/// Default cap on accumulated validation errors.
pub const DEFAULT_MAX_ERRORS: usize = 100;

/// Default nesting depth budget.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    path: String,
    message: String,
}

impl ValidationError {
    /// Returns the path of the offending value, e.g. `/name/addresses/0/zip`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a description of the violated constraint.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug)]
enum Ctx {
    Struct,
    List { index: usize, count: usize },
    Map { at_key: bool, key: String, count: usize },
}

/// A serializer that validates constraints instead of producing output.
#[derive(Debug)]
pub struct Validator {
    errors: Vec<ValidationError>,
    max_errors: usize,
    max_depth: usize,
    path: Vec<String>,
    stack: Vec<Ctx>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a validator with the default error cap and depth budget.
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            max_errors: DEFAULT_MAX_ERRORS,
            max_depth: DEFAULT_MAX_DEPTH,
            path: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Overrides the cap on accumulated errors.
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Overrides the nesting depth budget.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the accumulated errors.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Validates a structure, returning every violation found.
    ///
    /// Short-circuit conditions (error cap, depth budget) end the walk early
    /// but keep the errors accumulated so far.
    pub fn validate<T: SerializableStruct>(value: &T) -> Result<Vec<ValidationError>, SerdeError> {
        let mut validator = Validator::new();
        match value.serialize(&mut validator) {
            Ok(()) => Ok(validator.into_errors()),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::ValidationFailure | ErrorKind::DepthExceeded
                ) =>
            {
                Ok(validator.into_errors())
            }
            Err(err) => Err(err),
        }
    }

    fn path_string(&self) -> String {
        if self.path.is_empty() {
            "/".to_string()
        } else {
            let mut out = String::new();
            for segment in &self.path {
                out.push('/');
                out.push_str(segment);
            }
            out
        }
    }

    fn record(&mut self, message: String) -> Result<(), SerdeError> {
        self.errors.push(ValidationError {
            path: self.path_string(),
            message,
        });
        if self.errors.len() >= self.max_errors {
            Err(SerdeError::validation("validation error limit reached"))
        } else {
            Ok(())
        }
    }

    // Pushes the path segment owed to the value about to be visited. Returns
    // whether a segment was pushed (map keys do not get one), so the caller
    // can pop symmetrically.
    fn enter_value(&mut self, schema: &SchemaRef) -> bool {
        match self.stack.last_mut() {
            Some(Ctx::Struct) => {
                if let Some(name) = schema.member_name() {
                    self.path.push(name.to_string());
                    return true;
                }
                false
            }
            Some(Ctx::List { index, count }) => {
                let segment = index.to_string();
                *index += 1;
                *count += 1;
                self.path.push(segment);
                true
            }
            Some(Ctx::Map { at_key, key, count }) => {
                if *at_key {
                    *at_key = false;
                    *count += 1;
                    false
                } else {
                    *at_key = true;
                    self.path.push(key.clone());
                    true
                }
            }
            None => false,
        }
    }

    fn leave_value(&mut self, pushed: bool) {
        if pushed {
            self.path.pop();
        }
    }

    fn check_length(
        &mut self,
        constraints: &Constraints,
        actual: u64,
        what: &str,
    ) -> Result<(), SerdeError> {
        if let Some(min) = constraints.min_length {
            if actual < min {
                self.record(format!(
                    "{} length of {} is less than the minimum of {}",
                    what, actual, min
                ))?;
            }
        }
        if let Some(max) = constraints.max_length {
            if actual > max {
                self.record(format!(
                    "{} length of {} exceeds the maximum of {}",
                    what, actual, max
                ))?;
            }
        }
        Ok(())
    }

    fn check_long(&mut self, schema: &SchemaRef, value: i64) -> Result<(), SerdeError> {
        let constraints = schema.constraints().clone();
        if let Some(min) = constraints.min_long {
            if value < min {
                self.record(format!("value {} is less than the minimum of {}", value, min))?;
            }
        }
        if let Some(max) = constraints.max_long {
            if value > max {
                self.record(format!("value {} exceeds the maximum of {}", value, max))?;
            }
        }
        if !constraints.int_enum_values.is_empty() {
            let as_i32 = i32::try_from(value).ok();
            if !as_i32.map(|v| constraints.int_enum_values.contains(&v)).unwrap_or(false) {
                self.record(format!(
                    "value {} is not a member of the int enum {:?}",
                    value, constraints.int_enum_values
                ))?;
            }
        }
        Ok(())
    }

    fn check_double(&mut self, schema: &SchemaRef, value: f64) -> Result<(), SerdeError> {
        let constraints = schema.constraints().clone();
        if let Some(min) = constraints.min_double {
            if value < min {
                self.record(format!("value {} is less than the minimum of {}", value, min))?;
            }
        }
        if let Some(max) = constraints.max_double {
            if value > max {
                self.record(format!("value {} exceeds the maximum of {}", value, max))?;
            }
        }
        Ok(())
    }

    fn enter_aggregate(&mut self) -> Result<(), SerdeError> {
        if self.stack.len() >= self.max_depth {
            return Err(SerdeError::depth_exceeded(self.max_depth));
        }
        Ok(())
    }
}

macro_rules! validate_integral {
    ($method:ident, $value_ty:ty) => {
        fn $method(&mut self, schema: &SchemaRef, value: $value_ty) -> Result<(), SerdeError> {
            let pushed = self.enter_value(schema);
            let result = self.check_long(schema, value as i64);
            self.leave_value(pushed);
            result
        }
    };
}

impl ShapeSerializer for Validator {
    fn write_struct<F>(&mut self, schema: &SchemaRef, members: F) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        self.enter_aggregate()?;
        let pushed = self.enter_value(schema);
        self.stack.push(Ctx::Struct);
        let result = members(self);
        self.stack.pop();
        self.leave_value(pushed);
        result
    }

    fn write_list<F>(
        &mut self,
        schema: &SchemaRef,
        _size: Option<usize>,
        elements: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        self.enter_aggregate()?;
        let pushed = self.enter_value(schema);
        self.stack.push(Ctx::List { index: 0, count: 0 });
        let result = elements(self);
        let count = match self.stack.pop() {
            Some(Ctx::List { count, .. }) => count,
            _ => 0,
        };
        let check = result.and_then(|()| {
            let constraints = schema.constraints().clone();
            self.check_length(&constraints, count as u64, "list")
        });
        self.leave_value(pushed);
        check
    }

    fn write_map<F>(
        &mut self,
        schema: &SchemaRef,
        _size: Option<usize>,
        entries: F,
    ) -> Result<(), SerdeError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerdeError>,
    {
        self.enter_aggregate()?;
        let pushed = self.enter_value(schema);
        self.stack.push(Ctx::Map {
            at_key: true,
            key: String::new(),
            count: 0,
        });
        let result = entries(self);
        let count = match self.stack.pop() {
            Some(Ctx::Map { count, .. }) => count,
            _ => 0,
        };
        let check = result.and_then(|()| {
            let constraints = schema.constraints().clone();
            self.check_length(&constraints, count as u64, "map")
        });
        self.leave_value(pushed);
        check
    }

    fn write_boolean(&mut self, schema: &SchemaRef, _value: bool) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        self.leave_value(pushed);
        Ok(())
    }

    validate_integral!(write_byte, i8);
    validate_integral!(write_short, i16);
    validate_integral!(write_integer, i32);
    validate_integral!(write_long, i64);

    fn write_float(&mut self, schema: &SchemaRef, value: f32) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        let result = self.check_double(schema, value as f64);
        self.leave_value(pushed);
        result
    }

    fn write_double(&mut self, schema: &SchemaRef, value: f64) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        let result = self.check_double(schema, value);
        self.leave_value(pushed);
        result
    }

    fn write_big_integer(
        &mut self,
        schema: &SchemaRef,
        _value: &BigInteger,
    ) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        self.leave_value(pushed);
        Ok(())
    }

    fn write_big_decimal(
        &mut self,
        schema: &SchemaRef,
        _value: &BigDecimal,
    ) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        self.leave_value(pushed);
        Ok(())
    }

    fn write_string(&mut self, schema: &SchemaRef, value: &str) -> Result<(), SerdeError> {
        // Map keys position the path for the upcoming value.
        if let Some(Ctx::Map { at_key: true, key, .. }) = self.stack.last_mut() {
            *key = value.to_string();
        }
        let pushed = self.enter_value(schema);
        let constraints = schema.constraints().clone();
        let mut result = self.check_length(&constraints, value.chars().count() as u64, "string");
        if result.is_ok()
            && !constraints.enum_values.is_empty()
            && !constraints.enum_values.iter().any(|v| v == value)
        {
            result = self.record(format!("value `{}` is not a member of the enum", value));
        }
        self.leave_value(pushed);
        result
    }

    fn write_blob(&mut self, schema: &SchemaRef, value: &Blob) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        let constraints = schema.constraints().clone();
        let result = self.check_length(&constraints, value.len() as u64, "blob");
        self.leave_value(pushed);
        result
    }

    fn write_timestamp(
        &mut self,
        schema: &SchemaRef,
        _value: &DateTime,
    ) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        self.leave_value(pushed);
        Ok(())
    }

    fn write_document(
        &mut self,
        schema: &SchemaRef,
        _value: &Document,
    ) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        self.leave_value(pushed);
        Ok(())
    }

    fn write_null(&mut self, schema: &SchemaRef) -> Result<(), SerdeError> {
        let pushed = self.enter_value(schema);
        self.leave_value(pushed);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{prelude, Schema, ShapeId, ShapeType, Trait};

    fn bounded_string(min: u64, max: u64) -> SchemaRef {
        Schema::scalar(
            ShapeId::new("com.example#Bounded"),
            ShapeType::String,
            vec![Trait::Length {
                min: Some(min),
                max: Some(max),
            }],
        )
    }

    #[test]
    fn no_violations_no_errors() {
        let schema = Schema::structure_builder(ShapeId::new("com.example#In"))
            .member("name", &bounded_string(1, 10), vec![])
            .build();
        let mut validator = Validator::new();
        validator
            .write_struct(&schema, |v| {
                v.write_string(schema.member("name").unwrap(), "ok")
            })
            .unwrap();
        assert!(validator.into_errors().is_empty());
    }

    #[test]
    fn violation_paths() {
        let list = Schema::list(
            ShapeId::new("com.example#Zips"),
            vec![],
            &bounded_string(5, 5),
        );
        let schema = Schema::structure_builder(ShapeId::new("com.example#In"))
            .member("zips", &list, vec![])
            .build();
        let member = schema.member("zips").unwrap().clone();
        let element = list.list_member().unwrap().clone();

        let mut validator = Validator::new();
        validator
            .write_struct(&schema, |v| {
                v.write_list(&member, Some(2), |v| {
                    v.write_string(&element, "12345")?;
                    v.write_string(&element, "123")
                })
            })
            .unwrap();
        let errors = validator.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), "/zips/1");
    }

    #[test]
    fn map_value_paths() {
        let map = Schema::map(
            ShapeId::new("com.example#ByName"),
            vec![],
            &prelude::STRING,
            &bounded_string(2, 4),
        );
        let schema = Schema::structure_builder(ShapeId::new("com.example#In"))
            .member("names", &map, vec![])
            .build();
        let member = schema.member("names").unwrap().clone();
        let key_schema = map.map_key().unwrap().clone();
        let value_schema = map.map_value().unwrap().clone();

        let mut validator = Validator::new();
        validator
            .write_struct(&schema, |v| {
                v.write_map(&member, Some(1), |v| {
                    v.write_string(&key_schema, "zip")?;
                    v.write_string(&value_schema, "too long here")
                })
            })
            .unwrap();
        let errors = validator.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), "/names/zip");
    }

    #[test]
    fn range_violations() {
        let aged = Schema::scalar(
            ShapeId::new("com.example#Age"),
            ShapeType::Integer,
            vec![Trait::Range {
                min: Some(0.0),
                max: Some(150.0),
            }],
        );
        let schema = Schema::structure_builder(ShapeId::new("com.example#In"))
            .member("age", &aged, vec![])
            .build();
        let mut validator = Validator::new();
        validator
            .write_struct(&schema, |v| {
                v.write_integer(schema.member("age").unwrap(), 200)
            })
            .unwrap();
        let errors = validator.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), "/age");
        assert!(errors[0].message().contains("exceeds the maximum"));
    }

    #[test]
    fn error_cap_short_circuits() {
        let bounded = bounded_string(5, 5);
        let list = Schema::list(ShapeId::new("com.example#L"), vec![], &bounded);
        let element = list.list_member().unwrap().clone();

        let mut validator = Validator::new().with_max_errors(3);
        let result = validator.write_list(&list, None, |v| {
            for _ in 0..10 {
                v.write_string(&element, "x")?;
            }
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(validator.into_errors().len(), 3);
    }

    #[test]
    fn depth_budget() {
        let schema = Schema::structure_builder(ShapeId::new("com.example#Deep")).build();
        let mut validator = Validator::new().with_max_depth(1);
        let err = validator
            .write_struct(&schema, |v| v.write_struct(&schema, |_| Ok(())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    }

    #[test]
    fn validate_walks_a_serializable_struct() {
        struct Login {
            user: String,
        }

        static LOGIN: std::sync::LazyLock<SchemaRef> = std::sync::LazyLock::new(|| {
            let user = Schema::scalar(
                ShapeId::new("com.example#User"),
                ShapeType::String,
                vec![Trait::Length {
                    min: Some(3),
                    max: None,
                }],
            );
            Schema::structure_builder(ShapeId::new("com.example#Login"))
                .member("user", &user, vec![])
                .build()
        });

        impl SerializableStruct for Login {
            fn schema(&self) -> SchemaRef {
                LOGIN.clone()
            }

            fn serialize_members<S: ShapeSerializer>(
                &self,
                ser: &mut S,
            ) -> Result<(), SerdeError> {
                ser.write_string(LOGIN.member("user").unwrap(), &self.user)
            }
        }

        let errors = Validator::validate(&Login {
            user: "ada".to_string(),
        })
        .unwrap();
        assert!(errors.is_empty());

        let errors = Validator::validate(&Login {
            user: "a".to_string(),
        })
        .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), "/user");
    }

    #[test]
    fn enum_membership() {
        let suit = Schema::string_enum(
            ShapeId::new("com.example#Suit"),
            vec!["hearts".into(), "spades".into()],
            vec![],
        );
        let mut validator = Validator::new();
        validator.write_string(&suit, "clubs").unwrap();
        let errors = validator.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), "/");
    }
}
