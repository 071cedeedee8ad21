/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! A number type that implements Javascript / JSON semantics.

use std::fmt;

/// A number type that implements Javascript / JSON semantics, modeled on serde_json:
/// <https://docs.serde.rs/src/serde_json/number.rs.html#20-22>
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Unsigned 64-bit integer value.
    PosInt(u64),
    /// Signed 64-bit integer value. The wrapped value is _always_ negative.
    NegInt(i64),
    /// 64-bit IEEE-754 floating point value.
    Float(f64),
}

/// The error returned when a lossless [`Number`] conversion fails.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TryFromNumberError {
    kind: TryFromNumberErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TryFromNumberErrorKind {
    OutsideIntegerRange,
    NegativeToUnsigned,
    FloatToInteger,
}

impl fmt::Display for TryFromNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TryFromNumberErrorKind::*;
        match self.kind {
            OutsideIntegerRange => write!(f, "integer too large for the target type"),
            NegativeToUnsigned => write!(f, "negative integer cannot become unsigned"),
            FloatToInteger => write!(f, "floating point number cannot become an integer"),
        }
    }
}

impl std::error::Error for TryFromNumberError {}

impl TryFromNumberError {
    fn new(kind: TryFromNumberErrorKind) -> Self {
        Self { kind }
    }
}

impl Number {
    /// Converts to an `f64` lossily.
    ///
    /// Use `Number::try_from` to make lossless conversions.
    pub fn to_f64_lossy(self) -> f64 {
        match self {
            Number::PosInt(v) => v as f64,
            Number::NegInt(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Converts to an `f32` lossily.
    ///
    /// Use `Number::try_from` to make lossless conversions.
    pub fn to_f32_lossy(self) -> f32 {
        match self {
            Number::PosInt(v) => v as f32,
            Number::NegInt(v) => v as f32,
            Number::Float(v) => v as f32,
        }
    }
}

impl TryFrom<Number> for i64 {
    type Error = TryFromNumberError;

    fn try_from(value: Number) -> Result<Self, Self::Error> {
        use TryFromNumberErrorKind::*;
        match value {
            Number::PosInt(v) => {
                i64::try_from(v).map_err(|_| TryFromNumberError::new(OutsideIntegerRange))
            }
            Number::NegInt(v) => Ok(v),
            Number::Float(_) => Err(TryFromNumberError::new(FloatToInteger)),
        }
    }
}

impl TryFrom<Number> for u64 {
    type Error = TryFromNumberError;

    fn try_from(value: Number) -> Result<Self, Self::Error> {
        use TryFromNumberErrorKind::*;
        match value {
            Number::PosInt(v) => Ok(v),
            Number::NegInt(_) => Err(TryFromNumberError::new(NegativeToUnsigned)),
            Number::Float(_) => Err(TryFromNumberError::new(FloatToInteger)),
        }
    }
}

macro_rules! to_small_integer {
    ($typ:ident) => {
        impl TryFrom<Number> for $typ {
            type Error = TryFromNumberError;

            fn try_from(value: Number) -> Result<Self, Self::Error> {
                let as_i64 = i64::try_from(value)?;
                $typ::try_from(as_i64).map_err(|_| {
                    TryFromNumberError::new(TryFromNumberErrorKind::OutsideIntegerRange)
                })
            }
        }
    };
}

to_small_integer!(i32);
to_small_integer!(i16);
to_small_integer!(i8);

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::PosInt(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        if value < 0 {
            Number::NegInt(value)
        } else {
            Number::PosInt(value as u64)
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::from(value as i64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}
