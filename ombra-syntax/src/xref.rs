//! The indirect-object resolver.

use crate::object::Object;
use log::warn;
use rustc_hash::FxHashMap;

static NULL: Object = Object::Null;

/// A reference to an indirect object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjRef {
    /// The object number.
    pub num: i32,
    /// The generation number.
    pub gen: u16,
}

impl ObjRef {
    /// Create a new object reference.
    pub fn new(num: i32, gen: u16) -> Self {
        Self { num, gen }
    }
}

/// A table of indirect objects.
#[derive(Default, Debug, Clone)]
pub struct XRef {
    entries: FxHashMap<ObjRef, Object>,
}

impl XRef {
    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register an object under the given reference.
    pub fn insert(&mut self, obj_ref: ObjRef, obj: Object) {
        self.entries.insert(obj_ref, obj);
    }

    /// Look up an object by reference.
    pub fn get(&self, obj_ref: ObjRef) -> Option<&Object> {
        self.entries.get(&obj_ref)
    }

    /// Follow reference chains until a non-reference object is reached.
    ///
    /// Unresolvable or circular references yield the null object.
    pub fn resolve<'a>(&'a self, mut obj: &'a Object) -> &'a Object {
        let mut depth = 0;

        while let Object::Ref(obj_ref) = obj {
            if depth > 32 {
                warn!("too deeply nested object reference");
                return &NULL;
            }

            obj = match self.entries.get(obj_ref) {
                Some(obj) => obj,
                None => return &NULL,
            };
            depth += 1;
        }

        obj
    }
}
