/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! CBOR codec for the quiver serialization runtime.
//!
//! Implements the shape serde visitor protocol over RFC 8949 CBOR:
//! structures and unions as indefinite-length maps, known-size lists and maps
//! with definite lengths, timestamps as tag 1 epoch-seconds doubles, and big
//! numbers with the tag 2/3/4 conventions.

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod codec;
pub mod decode;
mod de;
pub mod encode;
pub mod provider;
mod ser;

pub use codec::{CborCodec, CborSettings, MEDIA_TYPE};
pub use de::CborDeserializer;
pub use decode::Decoder;
pub use encode::Encoder;
pub use ser::CborSerializer;
