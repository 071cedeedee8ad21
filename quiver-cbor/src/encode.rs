/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Low-level CBOR encoder.
//!
//! Wraps `minicbor`, which always emits the smallest type/length head that
//! fits a value, and adds the big-number and timestamp tag conventions on
//! top. The encoder writes into any [`ByteSink`]; the sink is owned by the
//! encoder and released by [`Encoder::into_sink`].

use minicbor::data::{IanaTag, Int, Tag};
use quiver_schema::sink::ByteSink;
use quiver_schema::SerdeError;
use quiver_types::{BigDecimal, BigInteger, Blob, DateTime};

/// Adapts a [`ByteSink`] to `minicbor`'s write interface.
#[derive(Debug)]
pub struct SinkWriter<B>(B);

impl<B: ByteSink> minicbor::encode::Write for SinkWriter<B> {
    type Error = SerdeError;

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.0.write_all(buf)
    }
}

/// Low-level CBOR encoder over a byte sink.
#[derive(Debug)]
pub struct Encoder<B: ByteSink = Vec<u8>> {
    encoder: minicbor::Encoder<SinkWriter<B>>,
}

fn encode_err(err: minicbor::encode::Error<SerdeError>) -> SerdeError {
    SerdeError::io(err.to_string())
}

impl<B: ByteSink> Encoder<B> {
    /// Creates an encoder writing into `sink`.
    pub fn new(sink: B) -> Self {
        Self {
            encoder: minicbor::Encoder::new(SinkWriter(sink)),
        }
    }

    /// Writes a definite-length array head.
    pub fn array(&mut self, len: u64) -> Result<&mut Self, SerdeError> {
        self.encoder.array(len).map_err(encode_err)?;
        Ok(self)
    }

    /// Begins an indefinite-length array; terminate with [`end`](Self::end).
    pub fn begin_array(&mut self) -> Result<&mut Self, SerdeError> {
        self.encoder.begin_array().map_err(encode_err)?;
        Ok(self)
    }

    // Used when the size is known in advance, i.e. when serializing a map
    // whose entry count the caller supplied.
    /// Writes a definite-length map head.
    pub fn map(&mut self, len: u64) -> Result<&mut Self, SerdeError> {
        self.encoder.map(len).map_err(encode_err)?;
        Ok(self)
    }

    // Used when it's not cheap to calculate the size, and always for
    // structures and unions.
    /// Begins an indefinite-length map; terminate with [`end`](Self::end).
    pub fn begin_map(&mut self) -> Result<&mut Self, SerdeError> {
        self.encoder.begin_map().map_err(encode_err)?;
        Ok(self)
    }

    /// Writes a text string.
    pub fn str(&mut self, x: &str) -> Result<&mut Self, SerdeError> {
        self.encoder.str(x).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes a boolean.
    pub fn boolean(&mut self, x: bool) -> Result<&mut Self, SerdeError> {
        self.encoder.bool(x).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes an i8.
    pub fn byte(&mut self, x: i8) -> Result<&mut Self, SerdeError> {
        self.encoder.i8(x).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes an i16.
    pub fn short(&mut self, x: i16) -> Result<&mut Self, SerdeError> {
        self.encoder.i16(x).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes an i32.
    pub fn integer(&mut self, x: i32) -> Result<&mut Self, SerdeError> {
        self.encoder.i32(x).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes an i64.
    pub fn long(&mut self, x: i64) -> Result<&mut Self, SerdeError> {
        self.encoder.i64(x).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes an f32 as a four-byte float.
    pub fn float(&mut self, x: f32) -> Result<&mut Self, SerdeError> {
        self.encoder.f32(x).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes an f64 as an eight-byte float.
    pub fn double(&mut self, x: f64) -> Result<&mut Self, SerdeError> {
        self.encoder.f64(x).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes a byte string.
    pub fn blob(&mut self, x: &Blob) -> Result<&mut Self, SerdeError> {
        self.encoder.bytes(x.as_ref()).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes a timestamp as tag 1 wrapping an epoch-seconds double.
    pub fn timestamp(&mut self, x: &DateTime) -> Result<&mut Self, SerdeError> {
        self.encoder
            .tag(Tag::from(IanaTag::Timestamp))
            .map_err(encode_err)?;
        self.encoder.f64(x.as_secs_f64()).map_err(encode_err)?;
        Ok(self)
    }

    /// Writes a big integer.
    ///
    /// Values whose magnitude fits 64 bits encode as plain major type 0/1
    /// integers; anything wider is a tag 2/3 byte string. Negative values use
    /// the `-1 - n` wire convention in both forms.
    pub fn big_integer(&mut self, x: &BigInteger) -> Result<&mut Self, SerdeError> {
        // CBOR plain integers span [-2^64, 2^64 - 1]; the wire value of a
        // negative integer is -1 - n, so -2^64 still fits eight bytes.
        if let Some(int) = x.to_i128().and_then(|v| Int::try_from(v).ok()) {
            self.encoder.int(int).map_err(encode_err)?;
        } else if x.is_negative() {
            // Tag 3 carries the bytes of -1 - n.
            let offset = BigInteger::new(-x.inner() - 1);
            self.encoder
                .tag(Tag::from(IanaTag::NegBignum))
                .map_err(encode_err)?;
            self.encoder
                .bytes(&offset.magnitude_be_bytes())
                .map_err(encode_err)?;
        } else {
            self.encoder
                .tag(Tag::from(IanaTag::PosBignum))
                .map_err(encode_err)?;
            self.encoder
                .bytes(&x.magnitude_be_bytes())
                .map_err(encode_err)?;
        }
        Ok(self)
    }

    /// Writes a big decimal as tag 4 wrapping `[exponent, mantissa]` where
    /// `exponent` is the negated scale.
    pub fn big_decimal(&mut self, x: &BigDecimal) -> Result<&mut Self, SerdeError> {
        let (unscaled, scale) = x.unscaled_and_scale();
        self.encoder
            .tag(Tag::from(IanaTag::Decimal))
            .map_err(encode_err)?;
        self.encoder.array(2).map_err(encode_err)?;
        self.encoder.i64(-scale).map_err(encode_err)?;
        self.big_integer(&unscaled)?;
        Ok(self)
    }

    /// Writes a null.
    pub fn null(&mut self) -> Result<&mut Self, SerdeError> {
        self.encoder.null().map_err(encode_err)?;
        Ok(self)
    }

    /// Writes the break byte terminating an indefinite-length container.
    pub fn end(&mut self) -> Result<&mut Self, SerdeError> {
        self.encoder.end().map_err(encode_err)?;
        Ok(self)
    }

    /// Releases the underlying sink.
    pub fn into_sink(self) -> B {
        self.encoder.into_writer().0
    }
}
