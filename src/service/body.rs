//! Response bodies. Everything sent back to clients is boxed into [`Body`] so
//! that files, listings and error pages share one response type.

use std::io;

use bytes::Bytes;
use futures::TryStreamExt;
use http_body_util::{combinators::BoxBody, BodyExt, Full, StreamBody};
use hyper::body::Frame;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

pub type Body = BoxBody<Bytes, io::Error>;

/// Body made of a single chunk that is already in memory.
pub fn full(chunk: impl Into<Bytes>) -> Body {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Body that reads `file` in chunks while it is being sent. The file handle is
/// closed when the body is dropped, whether or not it was read to the end.
pub fn stream(file: File) -> Body {
    StreamBody::new(ReaderStream::new(file).map_ok(Frame::data)).boxed()
}
