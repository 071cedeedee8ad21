/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! URI patterns with literal, label, and greedy-label segments.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use quiver_schema::SerdeError;
use std::collections::HashMap;
use std::fmt;

// RFC 3986 unreserved characters stay as-is; everything else is encoded.
const LABEL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

// Greedy labels span multiple path segments, so `/` survives.
const GREEDY_LABEL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

pub(crate) fn encode_label(value: &str, greedy: bool) -> String {
    let set = if greedy { GREEDY_LABEL } else { LABEL };
    utf8_percent_encode(value, set).to_string()
}

pub(crate) fn encode_query_component(value: &str) -> String {
    utf8_percent_encode(value, LABEL).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Label { name: String, greedy: bool },
}

/// A parsed URI pattern such as `/items/{id}` or `/proxy/{path+}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriPattern {
    segments: Vec<Segment>,
}

impl UriPattern {
    /// Parses a URI pattern.
    ///
    /// Labels are `{name}` path segments; a trailing `+` marks a greedy label
    /// that spans the remainder of the path.
    pub fn parse(pattern: &str) -> Result<Self, SerdeError> {
        let path = pattern.split('?').next().unwrap_or(pattern);
        if !path.starts_with('/') {
            return Err(SerdeError::protocol(format!(
                "uri pattern `{}` must begin with `/`",
                pattern
            )));
        }
        let mut segments = Vec::new();
        for raw in path.split('/').skip(1) {
            if raw.is_empty() {
                continue;
            }
            if let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
                let (name, greedy) = match inner.strip_suffix('+') {
                    Some(name) => (name, true),
                    None => (inner, false),
                };
                if name.is_empty() {
                    return Err(SerdeError::protocol(format!(
                        "uri pattern `{}` contains an empty label",
                        pattern
                    )));
                }
                segments.push(Segment::Label {
                    name: name.to_string(),
                    greedy,
                });
            } else {
                segments.push(Segment::Literal(raw.to_string()));
            }
        }
        Ok(Self { segments })
    }

    /// Builds the request path by substituting label values.
    ///
    /// Non-greedy labels are fully percent-encoded; greedy labels keep their
    /// `/` separators. A label without a value is a protocol fault.
    pub fn build(&self, labels: &HashMap<String, String>) -> Result<String, SerdeError> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Label { name, greedy } => {
                    let value = labels.get(name).ok_or_else(|| {
                        SerdeError::protocol(format!("no value for the uri label `{}`", name))
                    })?;
                    if value.is_empty() {
                        return Err(SerdeError::protocol(format!(
                            "the value for the uri label `{}` is empty",
                            name
                        )));
                    }
                    path.push_str(&encode_label(value, *greedy));
                }
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// Returns the label names in this pattern.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Label { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl fmt::Display for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str("/")?;
            match segment {
                Segment::Literal(literal) => f.write_str(literal)?,
                Segment::Label { name, greedy } => {
                    write!(f, "{{{}{}}}", name, if *greedy { "+" } else { "" })?
                }
            }
        }
        if self.segments.is_empty() {
            f.write_str("/")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_and_rebuilds() {
        let pattern = UriPattern::parse("/items/{id}").unwrap();
        assert_eq!(pattern.to_string(), "/items/{id}");
        assert_eq!(pattern.labels().collect::<Vec<_>>(), ["id"]);
        assert_eq!(
            pattern.build(&labels(&[("id", "a1")])).unwrap(),
            "/items/a1"
        );
    }

    #[test]
    fn non_greedy_labels_encode_slashes() {
        let pattern = UriPattern::parse("/items/{id}").unwrap();
        assert_eq!(
            pattern.build(&labels(&[("id", "a/b")])).unwrap(),
            "/items/a%2Fb"
        );
    }

    #[test]
    fn greedy_labels_keep_slashes() {
        let pattern = UriPattern::parse("/files/{path+}").unwrap();
        assert_eq!(
            pattern.build(&labels(&[("path", "a/b c/d")])).unwrap(),
            "/files/a/b%20c/d"
        );
    }

    #[test]
    fn missing_label_is_a_protocol_fault() {
        let pattern = UriPattern::parse("/items/{id}").unwrap();
        let err = pattern.build(&HashMap::new()).unwrap_err();
        assert_eq!(err.kind(), quiver_schema::ErrorKind::ProtocolFault);
    }

    #[test]
    fn root_pattern() {
        let pattern = UriPattern::parse("/").unwrap();
        assert_eq!(pattern.build(&HashMap::new()).unwrap(), "/");
    }

    #[test]
    fn rejects_relative_patterns() {
        assert!(UriPattern::parse("items/{id}").is_err());
        assert!(UriPattern::parse("/items/{}").is_err());
    }
}
