/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Lazy byte source used for HTTP message bodies.
//!
//! A [`DataStream`] is either fully in memory or backed by a stream of byte
//! chunks. Reading a streaming body to completion is the single suspension
//! point of the runtime; callers impose cancellation or timeouts there.

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use std::fmt;
use std::pin::Pin;

/// Boxed error type carried by failed stream chunks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type BoxStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>;

/// A lazy stream of bytes.
pub struct DataStream {
    kind: Kind,
}

enum Kind {
    Inline(Bytes),
    Streaming(BoxStream),
}

/// The error returned when collecting a [`DataStream`] into memory fails.
#[derive(Debug)]
#[non_exhaustive]
pub enum CollectError {
    /// The stream produced more bytes than the caller's in-memory ceiling.
    TooLarge {
        /// The ceiling that was exceeded.
        max_bytes: usize,
    },
    /// The underlying stream failed or was cancelled.
    Io(BoxError),
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::TooLarge { max_bytes } => {
                write!(f, "body exceeded the in-memory limit of {} bytes", max_bytes)
            }
            CollectError::Io(_) => write!(f, "failed to read the data stream"),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::TooLarge { .. } => None,
            CollectError::Io(source) => Some(source.as_ref()),
        }
    }
}

impl DataStream {
    /// Creates an empty `DataStream`.
    pub fn empty() -> Self {
        Self {
            kind: Kind::Inline(Bytes::new()),
        }
    }

    /// Creates a `DataStream` from in-memory bytes.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            kind: Kind::Inline(bytes.into()),
        }
    }

    /// Creates a `DataStream` from a stream of byte chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, BoxError>> + Send + 'static,
    {
        Self {
            kind: Kind::Streaming(Box::pin(stream)),
        }
    }

    /// Returns the number of bytes in this stream when it is fully in memory.
    pub fn content_length(&self) -> Option<usize> {
        match &self.kind {
            Kind::Inline(bytes) => Some(bytes.len()),
            Kind::Streaming(_) => None,
        }
    }

    /// Returns the bytes of this stream without awaiting when it is fully in memory.
    pub fn as_inline(&self) -> Option<&Bytes> {
        match &self.kind {
            Kind::Inline(bytes) => Some(bytes),
            Kind::Streaming(_) => None,
        }
    }

    /// Reads the stream to completion, bounded by `max_bytes`.
    ///
    /// Exceeding the bound fails with [`CollectError::TooLarge`] without
    /// reading the remainder. A failed or cancelled chunk fails with
    /// [`CollectError::Io`]; no partial data is returned.
    pub async fn collect(self, max_bytes: usize) -> Result<Bytes, CollectError> {
        match self.kind {
            Kind::Inline(bytes) => {
                if bytes.len() > max_bytes {
                    Err(CollectError::TooLarge { max_bytes })
                } else {
                    Ok(bytes)
                }
            }
            Kind::Streaming(mut stream) => {
                let mut buffer = BytesMut::new();
                loop {
                    let next =
                        std::future::poll_fn(|cx| stream.as_mut().poll_next(cx)).await;
                    match next {
                        None => return Ok(buffer.freeze()),
                        Some(Ok(chunk)) => {
                            if buffer.len() + chunk.len() > max_bytes {
                                return Err(CollectError::TooLarge { max_bytes });
                            }
                            buffer.extend_from_slice(&chunk);
                        }
                        Some(Err(source)) => return Err(CollectError::Io(source)),
                    }
                }
            }
        }
    }
}

impl Default for DataStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for DataStream {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for DataStream {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&'static [u8]> for DataStream {
    fn from(bytes: &'static [u8]) -> Self {
        Self::from_bytes(Bytes::from_static(bytes))
    }
}

impl From<&'static str> for DataStream {
    fn from(value: &'static str) -> Self {
        Self::from_bytes(Bytes::from_static(value.as_bytes()))
    }
}

impl fmt::Debug for DataStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Inline(bytes) => f.debug_tuple("Inline").field(&bytes.len()).finish(),
            Kind::Streaming(_) => f.debug_tuple("Streaming").finish(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Chunks(Vec<Result<Bytes, BoxError>>);

    impl Stream for Chunks {
        type Item = Result<Bytes, BoxError>;

        fn poll_next(
            mut self: Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Option<Self::Item>> {
            std::task::Poll::Ready(if self.0.is_empty() {
                None
            } else {
                Some(self.0.remove(0))
            })
        }
    }

    #[tokio::test]
    async fn collect_inline() {
        let stream = DataStream::from_bytes(&b"hello"[..]);
        assert_eq!(stream.collect(16).await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn collect_streaming() {
        let stream = DataStream::from_stream(Chunks(vec![
            Ok(Bytes::from_static(b"hel")),
            Ok(Bytes::from_static(b"lo")),
        ]));
        assert_eq!(stream.collect(16).await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn collect_enforces_limit() {
        let stream = DataStream::from_stream(Chunks(vec![
            Ok(Bytes::from_static(b"hel")),
            Ok(Bytes::from_static(b"lo")),
        ]));
        assert!(matches!(
            stream.collect(4).await,
            Err(CollectError::TooLarge { max_bytes: 4 })
        ));
    }

    #[tokio::test]
    async fn collect_surfaces_io_failure() {
        let stream = DataStream::from_stream(Chunks(vec![
            Ok(Bytes::from_static(b"hel")),
            Err("connection reset".into()),
        ]));
        assert!(matches!(stream.collect(16).await, Err(CollectError::Io(_))));
    }
}
