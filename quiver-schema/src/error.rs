/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The error type shared by every shape serializer and deserializer.

use crate::schema::Schema;
use std::fmt;

/// Classifies a [`SerdeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A visitor call does not match the kind of the current schema or wire position.
    SchemaMismatch,
    /// A length, range, or enum-membership constraint was violated.
    ValidationFailure,
    /// The underlying byte source or sink failed.
    IoFault,
    /// An HTTP binding invariant was violated.
    ProtocolFault,
    /// Strict-mode mismatch between the expected timestamp wire shape and the encountered one.
    TimestampTypeError,
    /// The validation depth budget was exhausted.
    DepthExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SchemaMismatch => "schema mismatch",
            ErrorKind::ValidationFailure => "validation failure",
            ErrorKind::IoFault => "I/O fault",
            ErrorKind::ProtocolFault => "protocol fault",
            ErrorKind::TimestampTypeError => "timestamp type error",
            ErrorKind::DepthExceeded => "depth exceeded",
        };
        write!(f, "{}", name)
    }
}

/// The error returned by shape serialization and deserialization operations.
///
/// Carries a [`ErrorKind`] taxonomy, an optional path to the offending value
/// (`/name/addresses/0/zip`), and an optional source error.
#[derive(Debug)]
pub struct SerdeError {
    kind: ErrorKind,
    message: String,
    path: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SerdeError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Creates a schema mismatch error for a visitor call that does not fit the schema.
    pub fn schema_mismatch(expected: &str, schema: &Schema) -> Self {
        Self::new(
            ErrorKind::SchemaMismatch,
            format!(
                "expected {}, but schema `{}` is a {:?}",
                expected,
                schema.id(),
                schema.shape_type()
            ),
        )
    }

    /// Creates a schema mismatch error with a free-form message.
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchemaMismatch, message)
    }

    /// Creates a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailure, message)
    }

    /// Creates an I/O fault wrapping the underlying failure.
    pub fn io(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        let source = source.into();
        Self {
            kind: ErrorKind::IoFault,
            message: source.to_string(),
            path: None,
            source: Some(source),
        }
    }

    /// Creates a protocol fault.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProtocolFault, message)
    }

    /// Creates a strict-mode timestamp type error.
    pub fn timestamp_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TimestampTypeError, message)
    }

    /// Creates a depth-exceeded error.
    pub fn depth_exceeded(budget: usize) -> Self {
        Self::new(
            ErrorKind::DepthExceeded,
            format!("validation depth budget of {} exhausted", budget),
        )
    }

    /// Attaches the path of the offending value.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attaches a source error.
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the path of the offending value, if known.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the error message without kind or path.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(path) = &self.path {
            write!(f, " (at {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for SerdeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_includes_kind_and_path() {
        let err = SerdeError::validation("value too long").with_path("/name");
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert_eq!(
            err.to_string(),
            "validation failure: value too long (at /name)"
        );
    }

    #[test]
    fn io_preserves_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = SerdeError::io(cause);
        assert_eq!(err.kind(), ErrorKind::IoFault);
        assert!(std::error::Error::source(&err).is_some());
    }
}
