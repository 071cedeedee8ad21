/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Protocol-agnostic types for the quiver serialization runtime.

#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod base64;
mod big_number;
mod blob;
pub mod data_stream;
pub mod date_time;
mod document;
mod number;

pub use big_number::{BigDecimal, BigInteger, BigNumberParseError};
pub use blob::Blob;
pub use data_stream::DataStream;
pub use date_time::DateTime;
pub use document::{Document, DISCRIMINATOR_KEY};
pub use number::Number;
