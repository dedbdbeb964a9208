/*!
Low-level building blocks for decoding the shading subsystem of PDF-style
documents.

This crate provides the machinery that the shading decoders in
`ombra-interpret` are built on, without implementing any decoding policy
itself:

- An owned [object model](object) (`Object`, `Dict`, `Stream`, interned
  names) together with a compact [parser](reader) for objects written in
  the document syntax.
- An [indirect-object resolver](xref) mapping object references to their
  definitions.
- [Byte sources](data) that can report a retryable "data not yet available"
  condition for streams whose tail has not been fetched.
- A [bit-level reader](bit) for the packed mesh bitstreams, with widths of
  up to 32 bits per field.
- [Numeric functions](function) (sampled, exponential and stitching) used
  as black-box color evaluators by the gradient and mesh decoders.
*/

use std::fmt;

pub mod bit;
pub mod data;
pub mod function;
pub mod object;
pub mod reader;
pub mod xref;

/// The error type shared by all decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required byte has not been fetched yet. The caller is expected to
    /// retry the whole operation once more data is available.
    MissingData,
    /// The input is malformed.
    Format(String),
    /// An internal invariant was violated.
    Internal(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingData => write!(f, "required data is not available yet"),
            Error::Format(msg) => write!(f, "malformed input: {msg}"),
            Error::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// The result type shared by all decoders.
pub type Result<T> = std::result::Result<T, Error>;
