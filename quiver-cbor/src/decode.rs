/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Low-level CBOR decoder.
//!
//! Wraps `minicbor`'s decoder and maps its failures onto the shared error
//! taxonomy: truncated input is an I/O fault, anything else is a schema
//! mismatch at the current wire position.

use minicbor::data::{IanaTag, Tag};
use quiver_schema::SerdeError;
use quiver_types::date_time::Format;
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime};

pub use minicbor::data::Type;

fn decode_err(err: minicbor::decode::Error) -> SerdeError {
    if err.is_end_of_input() {
        SerdeError::io(err.to_string())
    } else {
        SerdeError::mismatch(err.to_string())
    }
}

/// Low-level CBOR decoder over a byte slice.
#[derive(Debug, Clone)]
pub struct Decoder<'b> {
    decoder: minicbor::Decoder<'b>,
}

impl<'b> Decoder<'b> {
    /// Creates a decoder over `bytes`.
    pub fn new(bytes: &'b [u8]) -> Self {
        Self {
            decoder: minicbor::Decoder::new(bytes),
        }
    }

    /// Returns the type of the value at the current position without consuming it.
    pub fn datatype(&self) -> Result<Type, SerdeError> {
        self.decoder.datatype().map_err(decode_err)
    }

    /// Reads a map head; `None` means indefinite length.
    pub fn map(&mut self) -> Result<Option<u64>, SerdeError> {
        self.decoder.map().map_err(decode_err)
    }

    /// Reads an array head; `None` means indefinite length.
    pub fn list(&mut self) -> Result<Option<u64>, SerdeError> {
        self.decoder.array().map_err(decode_err)
    }

    /// Skips the value at the current position.
    pub fn skip(&mut self) -> Result<(), SerdeError> {
        self.decoder.skip().map_err(decode_err)
    }

    /// Reads a definite-length text string borrowed from the input.
    pub fn str(&mut self) -> Result<&'b str, SerdeError> {
        self.decoder.str().map_err(decode_err)
    }

    /// Reads a text string into an owned `String`.
    pub fn string(&mut self) -> Result<String, SerdeError> {
        self.decoder
            .str()
            .map(String::from) // This allocates.
            .map_err(decode_err)
    }

    /// Reads a byte string into a [`Blob`].
    pub fn blob(&mut self) -> Result<Blob, SerdeError> {
        self.decoder
            .bytes()
            .map(Blob::new) // This allocates.
            .map_err(decode_err)
    }

    /// Reads a boolean.
    pub fn boolean(&mut self) -> Result<bool, SerdeError> {
        self.decoder.bool().map_err(decode_err)
    }

    /// Reads an i8, accepting any narrower wire integer.
    pub fn byte(&mut self) -> Result<i8, SerdeError> {
        self.decoder.i8().map_err(decode_err)
    }

    /// Reads an i16.
    pub fn short(&mut self) -> Result<i16, SerdeError> {
        self.decoder.i16().map_err(decode_err)
    }

    /// Reads an i32.
    pub fn integer(&mut self) -> Result<i32, SerdeError> {
        self.decoder.i32().map_err(decode_err)
    }

    /// Reads an i64.
    pub fn long(&mut self) -> Result<i64, SerdeError> {
        self.decoder.i64().map_err(decode_err)
    }

    /// Reads an f32, accepting half-precision wire floats.
    pub fn float(&mut self) -> Result<f32, SerdeError> {
        self.decoder.f32().map_err(decode_err)
    }

    /// Reads an f64, accepting any narrower wire float.
    pub fn double(&mut self) -> Result<f64, SerdeError> {
        self.decoder.f64().map_err(decode_err)
    }

    /// Reads a tag head.
    pub fn tag(&mut self) -> Result<Tag, SerdeError> {
        self.decoder.tag().map_err(decode_err)
    }

    /// Reads a null.
    pub fn null(&mut self) -> Result<(), SerdeError> {
        self.decoder.null().map_err(decode_err)
    }

    /// Returns the current byte position.
    pub fn position(&self) -> usize {
        self.decoder.position()
    }

    /// Consumes the break byte terminating an indefinite-length container.
    ///
    /// Callers check for [`Type::Break`] with [`datatype`](Self::datatype)
    /// first; the break head is a single byte.
    pub fn consume_break(&mut self) -> Result<(), SerdeError> {
        match self.datatype()? {
            Type::Break => {
                self.decoder.set_position(self.decoder.position() + 1);
                Ok(())
            }
            other => Err(SerdeError::mismatch(format!(
                "expected the end of an indefinite-length container, found {:?}",
                other
            ))),
        }
    }

    /// Consumes any tags at the current position that the data model does not
    /// assign meaning to, leaving the tagged value to be decoded as if it
    /// were untagged.
    pub fn skip_unknown_tags(&mut self) -> Result<(), SerdeError> {
        while self.datatype()? == Type::Tag {
            let mut probe = self.decoder.clone();
            let tag = probe.tag().map_err(decode_err)?;
            if known_tag(tag) {
                return Ok(());
            }
            tracing::debug!(tag = ?tag, "unwrapping unknown cbor tag");
            self.decoder = probe;
        }
        Ok(())
    }

    /// Reads a timestamp: tag 1 wrapping an epoch-seconds number, or a bare
    /// number. A text string parses as an ISO-8601 date-time unless `strict`
    /// is set, in which case it is a timestamp type error.
    pub fn timestamp(&mut self, strict: bool) -> Result<DateTime, SerdeError> {
        self.skip_unknown_tags()?;
        match self.datatype()? {
            Type::Tag => {
                let tag = self.tag()?;
                if tag != IanaTag::Timestamp.tag() {
                    return Err(SerdeError::mismatch(format!(
                        "expected an epoch-seconds timestamp tag, found {:?}",
                        tag
                    )));
                }
                Ok(DateTime::from_secs_f64(self.number_as_f64()?))
            }
            Type::String => {
                if strict {
                    return Err(SerdeError::timestamp_type(
                        "expected an epoch-seconds number, found a string",
                    ));
                }
                let value = self.str()?;
                DateTime::from_str(value, Format::DateTime)
                    .map_err(|err| SerdeError::timestamp_type(err.to_string()))
            }
            _ => Ok(DateTime::from_secs_f64(self.number_as_f64()?)),
        }
    }

    /// Reads any numeric value as an f64.
    pub fn number_as_f64(&mut self) -> Result<f64, SerdeError> {
        match self.datatype()? {
            Type::F16 | Type::F32 | Type::F64 => self.double(),
            _ => Ok(self.long()? as f64),
        }
    }

    /// Reads a big integer: a plain integer, or a tag 2/3 byte string.
    pub fn big_integer(&mut self) -> Result<BigInteger, SerdeError> {
        self.skip_unknown_tags()?;
        match self.datatype()? {
            Type::Tag => {
                let tag = self.tag()?;
                if tag == IanaTag::PosBignum.tag() {
                    let bytes = self.decoder.bytes().map_err(decode_err)?;
                    Ok(BigInteger::from_offset_be_bytes(bytes, false))
                } else if tag == IanaTag::NegBignum.tag() {
                    let bytes = self.decoder.bytes().map_err(decode_err)?;
                    Ok(BigInteger::from_offset_be_bytes(bytes, true))
                } else {
                    Err(SerdeError::mismatch(format!(
                        "expected a bignum tag, found {:?}",
                        tag
                    )))
                }
            }
            _ => {
                let int = self.decoder.int().map_err(decode_err)?;
                Ok(BigInteger::from(i128::from(int)))
            }
        }
    }

    /// Reads a big decimal: tag 4 wrapping `[exponent, mantissa]`.
    pub fn big_decimal(&mut self) -> Result<BigDecimal, SerdeError> {
        self.skip_unknown_tags()?;
        match self.datatype()? {
            Type::Tag => {
                let tag = self.tag()?;
                if tag != IanaTag::Decimal.tag() {
                    return Err(SerdeError::mismatch(format!(
                        "expected a decimal fraction tag, found {:?}",
                        tag
                    )));
                }
                match self.list()? {
                    Some(2) => {}
                    other => {
                        return Err(SerdeError::mismatch(format!(
                            "a decimal fraction must be a two-element array, found {:?}",
                            other
                        )))
                    }
                }
                let exponent = self.long()?;
                let mantissa = self.big_integer()?;
                Ok(BigDecimal::from_unscaled(mantissa, -exponent))
            }
            other => Err(SerdeError::mismatch(format!(
                "expected a decimal fraction, found {:?}",
                other
            ))),
        }
    }
}

fn known_tag(tag: Tag) -> bool {
    tag == IanaTag::Timestamp.tag()
        || tag == IanaTag::PosBignum.tag()
        || tag == IanaTag::NegBignum.tag()
        || tag == IanaTag::Decimal.tag()
}
