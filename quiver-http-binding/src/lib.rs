/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! HTTP binding layer for the quiver serialization runtime.
//!
//! Projects a structure onto an HTTP message by routing each member to the
//! transport location its binding traits select: URI labels, query string
//! parameters, headers, prefix headers, the response status code, the raw
//! payload, or the codec-serialized body. The deserializers re-split inbound
//! messages along the same bindings.

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod binding;
pub(crate) mod de;
mod headers;
mod query;
mod request;
mod response;
pub(crate) mod ser;
mod settings;
mod uri;

pub use binding::{Binding, BindingMatcher, Direction};
pub use request::{RequestDeserializer, RequestSerializer};
pub use response::{ResponseDeserializer, ResponseSerializer};
pub use settings::HttpBindingSettings;
pub use uri::UriPattern;
