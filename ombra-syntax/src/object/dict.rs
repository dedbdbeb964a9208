//! Dictionaries.

use crate::object::name::Name;
use crate::object::{FromObject, Object};
use crate::xref::XRef;
use rustc_hash::FxHashMap;
use std::fmt::{self, Debug, Formatter};

/// The dictionary keys understood by this workspace.
pub mod keys {
    macro_rules! key {
        ($i:ident, $e:expr) => {
            pub const $i: &[u8] = $e;
        };
    }

    key!(ALTERNATE, b"Alternate");
    key!(BACKGROUND, b"Background");
    key!(BBOX, b"BBox");
    key!(BITS_PER_COMPONENT, b"BitsPerComponent");
    key!(BITS_PER_COORDINATE, b"BitsPerCoordinate");
    key!(BITS_PER_FLAG, b"BitsPerFlag");
    key!(BITS_PER_SAMPLE, b"BitsPerSample");
    key!(BOUNDS, b"Bounds");
    key!(C0, b"C0");
    key!(C1, b"C1");
    key!(COLORSPACE, b"ColorSpace");
    key!(COORDS, b"Coords");
    key!(CS, b"CS");
    key!(DECODE, b"Decode");
    key!(DOMAIN, b"Domain");
    key!(ENCODE, b"Encode");
    key!(EXTEND, b"Extend");
    key!(FUNCTION, b"Function");
    key!(FUNCTIONS, b"Functions");
    key!(FUNCTION_TYPE, b"FunctionType");
    key!(LENGTH, b"Length");
    key!(MATRIX, b"Matrix");
    key!(N, b"N");
    key!(PAINT_TYPE, b"PaintType");
    key!(PATTERN_TYPE, b"PatternType");
    key!(RANGE, b"Range");
    key!(SHADING, b"Shading");
    key!(SHADING_TYPE, b"ShadingType");
    key!(SIZE, b"Size");
    key!(TILING_TYPE, b"TilingType");
    key!(VERTICES_PER_ROW, b"VerticesPerRow");
    key!(X_STEP, b"XStep");
    key!(Y_STEP, b"YStep");
}

/// A dictionary: a bag of name-keyed objects. Insertion order carries no
/// meaning.
#[derive(Clone, Default, PartialEq)]
pub struct Dict {
    entries: FxHashMap<Name, Object>,
}

impl Dict {
    /// Create a new empty dictionary.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a dictionary from raw object syntax.
    pub fn from_bytes(data: &[u8]) -> Option<Dict> {
        match Object::from_bytes(data)? {
            Object::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Insert an entry, replacing any previous value for the key.
    pub fn insert(&mut self, key: Name, value: Object) {
        self.entries.insert(key, value);
    }

    /// Returns the number of entries in the dictionary.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks whether the dictionary contains an entry with a specific key.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Return the raw entry for a specific key, without resolving
    /// references.
    pub fn get_raw(&self, key: &[u8]) -> Option<&Object> {
        self.entries.get(key)
    }

    /// Return the entry for a key as a specific type, resolving an indirect
    /// reference through `xref` first.
    pub fn get<T>(&self, key: &[u8], xref: &XRef) -> Option<T>
    where
        T: FromObject,
    {
        T::from_object(xref.resolve(self.get_raw(key)?))
    }

    /// Return an array entry with each element resolved one level deep.
    pub fn get_array(&self, key: &[u8], xref: &XRef) -> Option<Vec<Object>> {
        match xref.resolve(self.get_raw(key)?) {
            Object::Array(items) => Some(items.iter().map(|o| xref.resolve(o).clone()).collect()),
            _ => None,
        }
    }
}

impl Debug for Dict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut entries = self.entries.iter().collect::<Vec<_>>();
        entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

        f.debug_map().entries(entries).finish()
    }
}
