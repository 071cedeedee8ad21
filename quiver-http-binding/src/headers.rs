/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Header helpers shared by the serialize and deserialize paths.

use http::header::{HeaderName, HeaderValue};
use quiver_schema::SerdeError;

// Hop-by-hop and sensitive headers never participate in prefix-header
// matching, regardless of their prefix.
const PREFIX_HEADER_BLOCKLIST: &[&str] = &[
    "authorization",
    "connection",
    "content-length",
    "expect",
    "host",
    "max-forwards",
    "proxy-authenticate",
    "server",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "user-agent",
    "www-authenticate",
    "x-forwarded-for",
];

pub(crate) fn is_prefix_header_blocked(name: &str) -> bool {
    PREFIX_HEADER_BLOCKLIST
        .iter()
        .any(|blocked| blocked.eq_ignore_ascii_case(name))
}

pub(crate) fn header_name(name: &str) -> Result<HeaderName, SerdeError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| SerdeError::protocol(format!("`{}` is not a valid header name", name)))
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue, SerdeError> {
    HeaderValue::from_str(value)
        .map_err(|_| SerdeError::protocol(format!("header value `{}` contains invalid bytes", value)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blocklist_is_case_insensitive() {
        assert!(is_prefix_header_blocked("authorization"));
        assert!(is_prefix_header_blocked("Authorization"));
        assert!(is_prefix_header_blocked("X-Forwarded-For"));
        assert!(!is_prefix_header_blocked("x-meta-owner"));
    }

    #[test]
    fn header_names_must_be_valid() {
        assert!(header_name("x-trace").is_ok());
        assert!(header_name("bad header").is_err());
    }
}
