/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Byte sinks owned by serializers.
//!
//! A serializer owns exactly one sink and releases it when it finishes.
//! Three flavors exist: a resizing in-memory buffer (`Vec<u8>`), a
//! [`StreamSink`] forwarding to an external writer, and a [`DiscardSink`]
//! that counts and drops everything it receives.

use crate::SerdeError;

/// A byte receiver owned by a serializer.
pub trait ByteSink {
    /// Writes all of `bytes` to the sink.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerdeError>;
}

impl ByteSink for Vec<u8> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerdeError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// A sink that streams bytes to an external [`std::io::Write`].
#[derive(Debug)]
pub struct StreamSink<W> {
    writer: W,
}

impl<W: std::io::Write> StreamSink<W> {
    /// Creates a sink streaming to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Releases the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: std::io::Write> ByteSink for StreamSink<W> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerdeError> {
        self.writer.write_all(bytes).map_err(SerdeError::io)
    }
}

/// A sink that discards everything written to it, tracking only the count.
#[derive(Debug, Default)]
pub struct DiscardSink {
    written: u64,
}

impl DiscardSink {
    /// Creates a new discarding sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bytes written and discarded so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }
}

impl ByteSink for DiscardSink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerdeError> {
        self.written += bytes.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn buffer_sink_accumulates() {
        let mut sink = Vec::new();
        sink.write_all(b"ab").unwrap();
        sink.write_all(b"c").unwrap();
        assert_eq!(sink, b"abc");
    }

    #[test]
    fn stream_sink_forwards() {
        let mut sink = StreamSink::new(Vec::new());
        sink.write_all(b"xyz").unwrap();
        assert_eq!(sink.into_inner(), b"xyz");
    }

    #[test]
    fn discard_sink_counts() {
        let mut sink = DiscardSink::new();
        sink.write_all(b"abcd").unwrap();
        sink.write_all(b"e").unwrap();
        assert_eq!(sink.bytes_written(), 5);
    }
}
