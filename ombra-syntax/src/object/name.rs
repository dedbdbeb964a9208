//! Name objects.

use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// A name object: a short, cheaply clonable byte string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Name(Arc<[u8]>);

impl Name {
    /// Create a name from raw (already unescaped) bytes.
    pub fn new(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }

    /// The raw bytes of the name.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", String::from_utf8_lossy(&self.0))
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Deduplicates name allocations within one parse context.
///
/// Entries are immutable after write and live as long as the interner; there
/// is deliberately no global table shared between documents.
#[derive(Default)]
pub struct Interner {
    map: FxHashMap<Vec<u8>, Name>,
}

impl Interner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the interned name for the given bytes.
    pub fn intern(&mut self, bytes: &[u8]) -> Name {
        if let Some(name) = self.map.get(bytes) {
            return name.clone();
        }

        let name = Name::new(bytes);
        self.map.insert(bytes.to_vec(), name.clone());

        name
    }
}
