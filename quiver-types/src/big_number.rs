/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Arbitrary precision number types.
//!
//! These wrap the `num-bigint` / `bigdecimal` types so that codecs can get at
//! the pieces they need for wire encoding (sign, bit length, magnitude bytes,
//! unscaled value and scale) without committing the public API to a specific
//! arithmetic backend.

use num_traits::ToPrimitive;
use std::fmt;
use std::str::FromStr;

/// An arbitrary precision integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInteger(num_bigint::BigInt);

/// An arbitrary precision decimal.
#[derive(Debug, Clone, PartialEq)]
pub struct BigDecimal(bigdecimal::BigDecimal);

/// The error returned when parsing a [`BigInteger`] or [`BigDecimal`] from a string fails.
#[derive(Debug)]
pub struct BigNumberParseError {
    input: String,
}

impl fmt::Display for BigNumberParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid number", self.input)
    }
}

impl std::error::Error for BigNumberParseError {}

impl BigInteger {
    /// Creates a `BigInteger` from its backing representation.
    pub fn new(inner: num_bigint::BigInt) -> Self {
        Self(inner)
    }

    /// Returns the backing `num_bigint::BigInt`.
    pub fn inner(&self) -> &num_bigint::BigInt {
        &self.0
    }

    /// Consumes this value and returns the backing `num_bigint::BigInt`.
    pub fn into_inner(self) -> num_bigint::BigInt {
        self.0
    }

    /// Returns the number of bits required to represent the magnitude of this value.
    ///
    /// Zero has a bit length of zero.
    pub fn bit_len(&self) -> u64 {
        self.0.magnitude().bits()
    }

    /// Returns true if this value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0.sign() == num_bigint::Sign::Minus
    }

    /// Converts to an `i128` if the value fits.
    pub fn to_i128(&self) -> Option<i128> {
        self.0.to_i128()
    }

    /// Returns the big-endian bytes of the magnitude of this value.
    pub fn magnitude_be_bytes(&self) -> Vec<u8> {
        self.0.magnitude().to_bytes_be()
    }

    /// Builds a value from big-endian magnitude bytes.
    ///
    /// When `negative` is set the result is `-1 - n` where `n` is the decoded
    /// magnitude, matching the CBOR tag 3 convention.
    pub fn from_offset_be_bytes(bytes: &[u8], negative: bool) -> Self {
        let n = num_bigint::BigInt::from(num_bigint::BigUint::from_bytes_be(bytes));
        if negative {
            Self(-n - 1)
        } else {
            Self(n)
        }
    }
}

impl Default for BigInteger {
    fn default() -> Self {
        Self(num_bigint::BigInt::from(0))
    }
}

impl FromStr for BigInteger {
    type Err = BigNumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        num_bigint::BigInt::from_str(s)
            .map(Self)
            .map_err(|_| BigNumberParseError { input: s.into() })
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for BigInteger {
    fn from(value: i64) -> Self {
        Self(num_bigint::BigInt::from(value))
    }
}

impl From<u64> for BigInteger {
    fn from(value: u64) -> Self {
        Self(num_bigint::BigInt::from(value))
    }
}

impl From<i128> for BigInteger {
    fn from(value: i128) -> Self {
        Self(num_bigint::BigInt::from(value))
    }
}

impl BigDecimal {
    /// Creates a `BigDecimal` from its backing representation.
    pub fn new(inner: bigdecimal::BigDecimal) -> Self {
        Self(inner)
    }

    /// Builds a decimal from an unscaled integer and a scale.
    ///
    /// The value is `unscaled * 10^(-scale)`.
    pub fn from_unscaled(unscaled: BigInteger, scale: i64) -> Self {
        Self(bigdecimal::BigDecimal::new(unscaled.into_inner(), scale))
    }

    /// Splits this decimal into its unscaled integer and scale.
    pub fn unscaled_and_scale(&self) -> (BigInteger, i64) {
        let (int, scale) = self.0.as_bigint_and_exponent();
        (BigInteger(int), scale)
    }

    /// Returns the backing `bigdecimal::BigDecimal`.
    pub fn inner(&self) -> &bigdecimal::BigDecimal {
        &self.0
    }
}

impl Default for BigDecimal {
    fn default() -> Self {
        Self(bigdecimal::BigDecimal::from(0))
    }
}

impl FromStr for BigDecimal {
    type Err = BigNumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        bigdecimal::BigDecimal::from_str(s)
            .map(Self)
            .map_err(|_| BigNumberParseError { input: s.into() })
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn big_integer_bit_len() {
        assert_eq!(BigInteger::from(0i64).bit_len(), 0);
        assert_eq!(BigInteger::from(1i64).bit_len(), 1);
        assert_eq!(BigInteger::from(u64::MAX).bit_len(), 64);
        assert_eq!(
            BigInteger::from_str("18446744073709551616").unwrap().bit_len(),
            65
        );
    }

    #[test]
    fn big_integer_offset_bytes_round_trip() {
        // -18446744073709551617 == -1 - 2^64
        let v = BigInteger::from_str("-18446744073709551617").unwrap();
        assert!(v.is_negative());
        let magnitude = BigInteger::from_str("18446744073709551616").unwrap();
        let decoded = BigInteger::from_offset_be_bytes(&magnitude.magnitude_be_bytes(), true);
        assert_eq!(decoded, v);
    }

    #[test]
    fn big_decimal_scale() {
        let d = BigDecimal::from_str("123.45").unwrap();
        let (unscaled, scale) = d.unscaled_and_scale();
        assert_eq!(unscaled, BigInteger::from(12345i64));
        assert_eq!(scale, 2);

        let rebuilt = BigDecimal::from_unscaled(unscaled, scale);
        assert_eq!(rebuilt, d);
    }

    #[test]
    fn big_decimal_negative_scale() {
        let d = BigDecimal::from_unscaled(BigInteger::from(3i64), -2);
        assert_eq!(d, BigDecimal::from_str("300").unwrap());
    }
}
