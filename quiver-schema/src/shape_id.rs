/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// A shape ID.
///
/// Shape IDs uniquely identify shapes in a model.
/// Format: `namespace#shapeName` or `namespace#shapeName$memberName`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeId {
    value: String,
}

impl ShapeId {
    /// Creates a new `ShapeId` from a string.
    ///
    /// # Examples
    /// ```
    /// use quiver_schema::ShapeId;
    ///
    /// let shape_id = ShapeId::new("quiver.api#String");
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Creates a `ShapeId` from a namespace and a shape name.
    pub fn from_parts(namespace: &str, shape_name: &str) -> Self {
        Self {
            value: format!("{}#{}", namespace, shape_name),
        }
    }

    /// Creates the ID of a member of the shape named by this ID.
    pub fn with_member(&self, member_name: &str) -> Self {
        Self {
            value: format!("{}${}", self.value, member_name),
        }
    }

    /// Returns the string representation of this `ShapeId`.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the namespace portion of the `ShapeId`.
    ///
    /// # Examples
    /// ```
    /// use quiver_schema::ShapeId;
    ///
    /// let shape_id = ShapeId::new("quiver.api#String");
    /// assert_eq!(shape_id.namespace(), Some("quiver.api"));
    /// ```
    pub fn namespace(&self) -> Option<&str> {
        self.value.split_once('#').map(|(ns, _)| ns)
    }

    /// Returns the shape name portion of the `ShapeId`.
    pub fn shape_name(&self) -> Option<&str> {
        self.value
            .split_once('#')
            .and_then(|(_, rest)| rest.split_once('$').map(|(name, _)| name).or(Some(rest)))
    }

    /// Returns the member name if this is a member shape ID.
    pub fn member_name(&self) -> Option<&str> {
        self.value
            .split_once('#')
            .and_then(|(_, rest)| rest.split_once('$').map(|(_, member)| member))
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing() {
        let id = ShapeId::new("quiver.api#String");
        assert_eq!(id.namespace(), Some("quiver.api"));
        assert_eq!(id.shape_name(), Some("String"));
        assert_eq!(id.member_name(), None);
    }

    #[test]
    fn test_member_id() {
        let id = ShapeId::new("com.example#MyStruct").with_member("field");
        assert_eq!(id.as_str(), "com.example#MyStruct$field");
        assert_eq!(id.namespace(), Some("com.example"));
        assert_eq!(id.shape_name(), Some("MyStruct"));
        assert_eq!(id.member_name(), Some("field"));
    }

    #[test]
    fn test_no_namespace() {
        assert_eq!(ShapeId::new("NoNamespace").namespace(), None);
    }
}
