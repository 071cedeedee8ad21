/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Runtime schema types and shape serde interfaces for the quiver runtime.
//!
//! This crate provides the core types for representing shape schemas at
//! runtime, the protocol-agnostic [`ShapeSerializer`](serde::ShapeSerializer)
//! and [`ShapeDeserializer`](serde::ShapeDeserializer) visitor interfaces that
//! codecs implement, and a set of utility visitors built on top of them.

#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod codec;
mod error;
pub mod prelude;
mod schema;
pub mod serde;
mod shape_id;
mod shape_type;
pub mod sink;
mod traits;

pub use codec::Codec;
pub use error::{ErrorKind, SerdeError};
pub use schema::{Constraints, Schema, SchemaRef, StructureBuilder};
pub use shape_id::ShapeId;
pub use shape_type::ShapeType;
pub use traits::{ErrorFault, Trait, TraitKey, TraitMap};
