//! A compact parser for objects written in the document syntax.

use crate::object::dict::keys::LENGTH;
use crate::object::{Dict, Interner, Name, Object, Stream};
use crate::xref::{ObjRef, XRef};

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\0' | b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// A reader over raw object syntax.
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    interner: Interner,
}

impl<'a> Reader<'a> {
    /// Create a new reader over the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            interner: Interner::new(),
        }
    }

    /// The current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.data.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;

        Some(byte)
    }

    /// Skip over whitespace and `%` comments.
    pub fn skip_whitespace_and_comments(&mut self) {
        while let Some(byte) = self.peek() {
            if is_whitespace(byte) {
                self.pos += 1;
            } else if byte == b'%' {
                while let Some(byte) = self.bump() {
                    if byte == b'\n' || byte == b'\r' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn forward_tag(&mut self, tag: &[u8]) -> Option<()> {
        if self.data[self.pos..].starts_with(tag) {
            self.pos += tag.len();

            Some(())
        } else {
            None
        }
    }

    /// Parse a single object, leaving the position right after it.
    pub fn read_object(&mut self) -> Option<Object> {
        self.skip_whitespace_and_comments();

        match self.peek()? {
            b'n' => {
                self.forward_tag(b"null")?;
                Some(Object::Null)
            }
            b't' => {
                self.forward_tag(b"true")?;
                Some(Object::Bool(true))
            }
            b'f' => {
                self.forward_tag(b"false")?;
                Some(Object::Bool(false))
            }
            b'/' => Some(Object::Name(self.read_name()?)),
            b'(' => Some(Object::String(self.read_literal_string()?)),
            b'<' => {
                if self.peek_at(1) == Some(b'<') {
                    self.read_dict_or_stream()
                } else {
                    Some(Object::String(self.read_hex_string()?))
                }
            }
            b'[' => self.read_array(),
            b'.' | b'+' | b'-' | b'0'..=b'9' => self.read_number_or_ref(),
            _ => None,
        }
    }

    fn read_number_token(&mut self) -> Option<Object> {
        let start = self.pos;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let mut has_digits = false;
        let mut has_dot = false;
        while let Some(byte) = self.peek() {
            match byte {
                b'0'..=b'9' => {
                    has_digits = true;
                    self.pos += 1;
                }
                b'.' if !has_dot => {
                    has_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        if !has_digits {
            return None;
        }

        let text = std::str::from_utf8(&self.data[start..self.pos]).ok()?;

        if has_dot {
            Some(Object::Real(text.parse().ok()?))
        } else {
            Some(Object::Int(text.parse().ok()?))
        }
    }

    fn read_number_or_ref(&mut self) -> Option<Object> {
        let first = self.read_number_token()?;

        // An integer might be the start of an `obj gen R` reference.
        if let Object::Int(num) = first {
            if (0..=i32::MAX as i64).contains(&num) {
                let save = self.pos;
                if let Some(obj_ref) = self.try_read_ref_tail(num as i32) {
                    return Some(Object::Ref(obj_ref));
                }
                self.pos = save;
            }
        }

        Some(first)
    }

    fn try_read_ref_tail(&mut self, num: i32) -> Option<ObjRef> {
        self.skip_whitespace_and_comments();

        if !matches!(self.peek(), Some(b'0'..=b'9')) {
            return None;
        }

        let Object::Int(gen) = self.read_number_token()? else {
            return None;
        };
        if !(0..=u16::MAX as i64).contains(&gen) {
            return None;
        }

        self.skip_whitespace_and_comments();
        if self.peek() != Some(b'R') {
            return None;
        }
        if self.peek_at(1).is_some_and(is_regular) {
            return None;
        }
        self.pos += 1;

        Some(ObjRef::new(num, gen as u16))
    }

    fn read_name(&mut self) -> Option<Name> {
        self.forward_tag(b"/")?;

        let mut bytes = Vec::new();
        while let Some(byte) = self.peek() {
            if !is_regular(byte) {
                break;
            }
            self.pos += 1;

            if byte == b'#' {
                let hi = hex_digit(self.bump()?)?;
                let lo = hex_digit(self.bump()?)?;
                bytes.push(hi << 4 | lo);
            } else {
                bytes.push(byte);
            }
        }

        Some(self.interner.intern(&bytes))
    }

    fn read_literal_string(&mut self) -> Option<Vec<u8>> {
        self.forward_tag(b"(")?;

        let mut out = Vec::new();
        let mut depth = 1u32;

        loop {
            let byte = self.bump()?;
            match byte {
                b'(' => {
                    depth += 1;
                    out.push(byte);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    out.push(byte);
                }
                b'\\' => {
                    let escaped = self.bump()?;
                    match escaped {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0C),
                        b'(' | b')' | b'\\' => out.push(escaped),
                        // A line continuation swallows the end of line.
                        b'\r' => {
                            if self.peek() == Some(b'\n') {
                                self.pos += 1;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut value = (escaped - b'0') as u16;
                            for _ in 0..2 {
                                match self.peek() {
                                    Some(digit @ b'0'..=b'7') => {
                                        value = value * 8 + (digit - b'0') as u16;
                                        self.pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            out.push(value as u8);
                        }
                        _ => out.push(escaped),
                    }
                }
                _ => out.push(byte),
            }
        }

        Some(out)
    }

    fn read_hex_string(&mut self) -> Option<Vec<u8>> {
        self.forward_tag(b"<")?;

        let mut digits = Vec::new();
        loop {
            let byte = self.bump()?;
            if byte == b'>' {
                break;
            }
            if is_whitespace(byte) {
                continue;
            }
            digits.push(hex_digit(byte)?);
        }

        // An odd final digit behaves as if followed by zero.
        if digits.len() % 2 == 1 {
            digits.push(0);
        }

        Some(digits.chunks_exact(2).map(|c| c[0] << 4 | c[1]).collect())
    }

    fn read_array(&mut self) -> Option<Object> {
        self.forward_tag(b"[")?;

        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.peek()? == b']' {
                self.pos += 1;
                break;
            }
            items.push(self.read_object()?);
        }

        Some(Object::Array(items))
    }

    fn read_dict_or_stream(&mut self) -> Option<Object> {
        self.forward_tag(b"<<")?;

        let mut dict = Dict::empty();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek()? {
                b'>' => {
                    self.forward_tag(b">>")?;
                    break;
                }
                b'/' => {
                    let key = self.read_name()?;
                    let value = self.read_object()?;
                    dict.insert(key, value);
                }
                _ => return None,
            }
        }

        let save = self.pos;
        self.skip_whitespace_and_comments();
        if self.forward_tag(b"stream").is_some() {
            if self.peek() == Some(b'\r') {
                self.pos += 1;
            }
            if self.peek() == Some(b'\n') {
                self.pos += 1;
            }

            // This compact parser requires a direct /Length.
            let length = dict.get::<usize>(LENGTH, &XRef::empty())?;
            let data = self.data.get(self.pos..self.pos + length)?.to_vec();
            self.pos += length;

            self.skip_whitespace_and_comments();
            self.forward_tag(b"endstream")?;

            return Some(Object::Stream(Stream::new(dict, data)));
        }
        self.pos = save;

        Some(Object::Dict(dict))
    }
}

impl Object {
    /// Parse a single object from raw object syntax.
    pub fn from_bytes(data: &[u8]) -> Option<Object> {
        Reader::new(data).read_object()
    }
}

#[cfg(test)]
mod tests {
    use crate::object::Object;
    use crate::xref::ObjRef;

    #[test]
    fn null() {
        assert!(matches!(Object::from_bytes(b"null").unwrap(), Object::Null));
    }

    #[test]
    fn bool() {
        assert!(matches!(
            Object::from_bytes(b"true").unwrap(),
            Object::Bool(true)
        ));
        assert!(matches!(
            Object::from_bytes(b"false").unwrap(),
            Object::Bool(false)
        ));
    }

    #[test]
    fn numbers() {
        assert_eq!(Object::from_bytes(b"34").unwrap(), Object::Int(34));
        assert_eq!(Object::from_bytes(b"-7").unwrap(), Object::Int(-7));
        assert_eq!(Object::from_bytes(b"34.5").unwrap(), Object::Real(34.5));
        assert_eq!(Object::from_bytes(b"-.5").unwrap(), Object::Real(-0.5));
        assert_eq!(Object::from_bytes(b"4.").unwrap(), Object::Real(4.0));
    }

    #[test]
    fn string_literal() {
        assert_eq!(
            Object::from_bytes(b"(Hi (nested) \\(esc\\) \\101)").unwrap(),
            Object::String(b"Hi (nested) (esc) A".to_vec())
        );
    }

    #[test]
    fn string_hex() {
        assert_eq!(
            Object::from_bytes(b"<34 35 3>").unwrap(),
            Object::String(vec![0x34, 0x35, 0x30])
        );
    }

    #[test]
    fn name_with_escape() {
        let Object::Name(name) = Object::from_bytes(b"/Name#20A").unwrap() else {
            panic!("expected a name");
        };
        assert_eq!(name.as_bytes(), b"Name A");
    }

    #[test]
    fn array() {
        let Object::Array(items) = Object::from_bytes(b"[45 /Two (three)]").unwrap() else {
            panic!("expected an array");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn reference() {
        assert_eq!(
            Object::from_bytes(b"12 0 R").unwrap(),
            Object::Ref(ObjRef::new(12, 0))
        );
        // Two plain integers are not a reference.
        assert_eq!(Object::from_bytes(b"12 0 4").unwrap(), Object::Int(12));
    }

    #[test]
    fn dict() {
        let Object::Dict(dict) = Object::from_bytes(b"<< /Entry 45 % comment\n >>").unwrap()
        else {
            panic!("expected a dict");
        };
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn stream() {
        let Object::Stream(stream) =
            Object::from_bytes(b"<< /Length 3 >> stream\nabc\nendstream").unwrap()
        else {
            panic!("expected a stream");
        };
        assert_eq!(stream.data(), b"abc");
    }

    #[test]
    fn nested_dict() {
        let data = b"<< /A << /B [1 2 3] >> /C /Name >>";
        let Object::Dict(dict) = Object::from_bytes(data).unwrap() else {
            panic!("expected a dict");
        };
        assert!(dict.contains_key(b"A"));
        assert!(dict.contains_key(b"C"));
    }
}
