//! Stream objects.

use crate::data::{ByteSource, PartialSource, SliceSource};
use crate::object::Dict;
use std::sync::Arc;

/// A stream object: a dictionary plus its decoded byte payload.
///
/// The payload may be only partially fetched; reading past the fetched
/// prefix through [`Stream::source`] fails with a retryable error.
#[derive(Clone, PartialEq)]
pub struct Stream {
    dict: Dict,
    data: Arc<Vec<u8>>,
    available: Option<usize>,
}

impl Stream {
    /// Create a stream whose payload is fully resident.
    pub fn new(dict: Dict, data: Vec<u8>) -> Self {
        Self {
            dict,
            data: Arc::new(data),
            available: None,
        }
    }

    /// Create a stream of which only the first `available` payload bytes
    /// have been fetched so far.
    pub fn with_available(dict: Dict, data: Vec<u8>, available: usize) -> Self {
        Self {
            dict,
            data: Arc::new(data),
            available: Some(available),
        }
    }

    /// The stream dictionary.
    pub fn dict(&self) -> &Dict {
        &self.dict
    }

    /// The full payload. Only meaningful once the stream is fully fetched.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// A byte source over the payload honoring the fetched prefix.
    pub fn source(&self) -> StreamSource<'_> {
        match self.available {
            Some(available) => StreamSource::Partial(PartialSource::new(&self.data, available)),
            None => StreamSource::Full(SliceSource::new(&self.data)),
        }
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("dict", &self.dict)
            .field("len", &self.data.len())
            .finish()
    }
}

/// The byte source of a [`Stream`].
pub enum StreamSource<'a> {
    /// All payload bytes are resident.
    Full(SliceSource<'a>),
    /// Only a prefix of the payload has arrived.
    Partial(PartialSource<'a>),
}

impl ByteSource for StreamSource<'_> {
    fn get_byte(&mut self) -> crate::Result<Option<u8>> {
        match self {
            StreamSource::Full(s) => s.get_byte(),
            StreamSource::Partial(s) => s.get_byte(),
        }
    }

    fn pos(&self) -> usize {
        match self {
            StreamSource::Full(s) => s.pos(),
            StreamSource::Partial(s) => s.pos(),
        }
    }
}
