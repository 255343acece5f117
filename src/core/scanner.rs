//! SIMD-accelerated byte cursor using memchr
//!
//! Uses memchr crate for fast byte searching with SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)

use memchr::{memchr, memchr_iter};

/// Byte range `[start, end)` into the scanned input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Slice the input this span was produced from
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start..self.end]
    }
}

/// 1-based line number of a byte offset
pub fn line_at(input: &[u8], offset: usize) -> usize {
    let end = offset.min(input.len());
    memchr_iter(b'\n', &input[..end]).count() + 1
}

/// Cursor for XML delimiter detection
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.input[self.pos..]).map(|i| self.pos + i)
    }

    /// Find next '<' (tag start) using SIMD
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        self.find_byte(b'<')
    }

    /// Find a terminator sequence such as `-->` or `]]>`, returning its start
    pub fn find_sequence(&self, needle: &[u8]) -> Option<usize> {
        let first = *needle.first()?;
        let mut from = self.pos;
        while let Some(i) = memchr(first, &self.input[from..]) {
            let at = from + i;
            if self.input[at..].starts_with(needle) {
                return Some(at);
            }
            from = at + 1;
        }
        None
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Read an XML name (starts with letter/underscore/colon, continues with
    /// letters/digits/hyphens/underscores/periods/colons)
    pub fn read_name(&mut self) -> Option<Span> {
        let start = self.pos;
        let first = *self.input.get(start)?;
        if !is_name_start_char(first) {
            return None;
        }

        self.pos += 1;
        while self.pos < self.input.len() && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }

        Some(Span::new(start, self.pos))
    }
}

/// Check if byte is valid XML name start character
/// Allows ASCII letters, underscore, colon, and non-ASCII (UTF-8 Unicode)
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Check if byte is valid XML name character
/// Allows ASCII alphanumeric, punctuation, and non-ASCII (UTF-8 Unicode)
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tag_start() {
        let scanner = Scanner::new(b"hello <world>");
        assert_eq!(scanner.find_tag_start(), Some(6));
    }

    #[test]
    fn test_find_sequence() {
        let scanner = Scanner::new(b"a - b -- c -->rest");
        assert_eq!(scanner.find_sequence(b"-->"), Some(11));
        assert_eq!(scanner.find_sequence(b"]]>"), None);
    }

    #[test]
    fn test_read_name() {
        let mut scanner = Scanner::new(b"element-name>");
        assert_eq!(scanner.read_name(), Some(Span::new(0, 12)));
        assert_eq!(scanner.position(), 12);
    }

    #[test]
    fn test_read_name_rejects_digit_start() {
        let mut scanner = Scanner::new(b"1abc");
        assert_eq!(scanner.read_name(), None);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new(b"  \t\n hello");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
    }

    #[test]
    fn test_line_at() {
        let input = b"<a>\n<b/>\n</a>";
        assert_eq!(line_at(input, 0), 1);
        assert_eq!(line_at(input, 4), 2);
        assert_eq!(line_at(input, input.len()), 3);
    }
}
