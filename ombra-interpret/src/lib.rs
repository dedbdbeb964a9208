/*!
Decoding of shading patterns into a flat intermediate representation.

The entry point is [`shading::parse_shading`], which takes a shading
dictionary (or stream), an optional pattern matrix and an
[xref table](ombra_syntax::xref::XRef), and produces a
[`PatternIr`](ir::PatternIr) value for a downstream rasterizer:

- Axial and radial gradients (shading types 2 and 3) are sampled into a
  list of color stops.
- Mesh shadings (types 4 through 7) are decoded from their packed
  bitstream, bicubic patches are tessellated into triangle lattices, and
  coordinates and colors are packed into contiguous buffers.

Decode failures degrade to a `Dummy` placeholder and a diagnostic event;
the retryable "data not yet available" condition of partially fetched
streams propagates to the caller instead, so that the whole parse can be
re-run once more bytes have arrived.

The [`pattern`] module adds the pattern-level envelope distinguishing
shading patterns from tiling patterns.
*/

pub mod color;
pub mod ir;
pub mod pattern;
pub mod shading;
pub(crate) mod util;

pub use ombra_syntax::{Error, Result};

/// A feature identifier reported through [`EventSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// A shading pattern that could not be decoded.
    ShadingPattern,
}

/// A one-way diagnostic event emitted while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A feature of the document is not supported; a placeholder was
    /// emitted in place of the real decode result.
    UnsupportedFeature(Feature),
}

/// A sink for diagnostic events.
pub trait EventSink {
    /// Deliver a single event.
    fn send(&mut self, event: Event);
}

/// A sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn send(&mut self, _: Event) {}
}

impl EventSink for Vec<Event> {
    fn send(&mut self, event: Event) {
        self.push(event);
    }
}
