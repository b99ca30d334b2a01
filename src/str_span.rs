//! A non-owning view of a run of byte characters.
//!
//! [`StrSpan`] borrows its bytes and never copies them. Searches report
//! positions as byte offsets and use `None` for "not found". Every search
//! takes the position to start from, so a search can resume after a
//! previous match.
//!
//! Needles are anything that is [`AsRef<[u8]>`]: a `&str`, a byte string
//! such as `b"x"`, or another [`StrSpan`].

use core::{cmp::Ordering, fmt};

use crate::errors::OutOfRange;

/// A borrowed, immutable span of byte characters.
///
/// # Examples
///
/// ```
/// use rudiments::StrSpan;
///
/// let mut span = StrSpan::new("  key=value  ");
/// let start = span.find_first_not_of(" ", 0).unwrap();
/// span.remove_prefix(start);
/// let end = span.find_last_not_of(" ", usize::MAX).unwrap();
/// span.remove_suffix(span.len() - end - 1);
/// assert_eq!(span, "key=value");
///
/// let eq = span.find("=", 0).unwrap();
/// assert_eq!(span.substr(0, eq).unwrap(), "key");
/// assert_eq!(span.substr(eq + 1, usize::MAX).unwrap(), "value");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrSpan<'a> {
    /// The viewed bytes
    bytes: &'a [u8],
}

impl<'a> StrSpan<'a> {
    /// Creates a span over the bytes of `s`.
    #[inline]
    #[must_use]
    pub const fn new(s: &'a str) -> Self {
        Self::from_bytes(s.as_bytes())
    }

    /// Creates a span over `bytes`.
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Returns the viewed bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the number of bytes in the span.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the span is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the largest length a span can have.
    #[inline]
    #[must_use]
    pub const fn max_size(&self) -> usize {
        (usize::MAX - 2 * size_of::<usize>()) / 2
    }

    /// Returns the byte at `pos`, or [`OutOfRange`] if `pos >= len`.
    #[inline]
    pub fn at(&self, pos: usize) -> Result<u8, OutOfRange> {
        self.bytes.get(pos).copied().ok_or(OutOfRange {
            index: pos,
            len: self.len(),
        })
    }

    /// Returns the first byte, or `None` if the span is empty.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Returns the last byte, or `None` if the span is empty.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<u8> {
        self.bytes.last().copied()
    }

    /// Shrinks the span by moving its start `n` bytes forward.
    ///
    /// # Panics
    ///
    /// Panics if `n > len`.
    #[inline]
    #[track_caller]
    pub fn remove_prefix(&mut self, n: usize) {
        self.bytes = &self.bytes[n..];
    }

    /// Shrinks the span by moving its end `n` bytes back.
    ///
    /// # Panics
    ///
    /// Panics if `n > len`.
    #[inline]
    #[track_caller]
    pub fn remove_suffix(&mut self, n: usize) {
        let len = self.len();
        assert!(n <= len, "cannot remove {n} bytes from a span of {len}");
        self.bytes = &self.bytes[..len - n];
    }

    /// Returns the span of at most `count` bytes starting at `pos`. Pass
    /// `usize::MAX` to keep everything after `pos`.
    ///
    /// Returns [`OutOfRange`] if `pos >= len`.
    #[inline]
    pub fn substr(&self, pos: usize, count: usize) -> Result<Self, OutOfRange> {
        let rest = self.rest_from(pos)?;
        Ok(Self::from_bytes(&rest[..count.min(rest.len())]))
    }

    /// Copies at most `dest.len()` bytes starting at `pos` into `dest` and
    /// returns how many were copied.
    ///
    /// Returns [`OutOfRange`] if `pos >= len`.
    #[inline]
    pub fn copy_to(&self, dest: &mut [u8], pos: usize) -> Result<usize, OutOfRange> {
        let rest = self.rest_from(pos)?;
        let count = dest.len().min(rest.len());
        dest[..count].copy_from_slice(&rest[..count]);
        Ok(count)
    }

    /// Compares the bytes lexicographically with `other`; a proper prefix
    /// orders first.
    #[inline]
    #[must_use]
    pub fn compare(&self, other: impl AsRef<[u8]>) -> Ordering {
        self.bytes.cmp(other.as_ref())
    }

    /// Compares `self.substr(pos, count)` with `other`.
    ///
    /// Returns [`OutOfRange`] if `pos >= len`.
    #[inline]
    pub fn compare_substr(
        &self,
        pos: usize,
        count: usize,
        other: impl AsRef<[u8]>,
    ) -> Result<Ordering, OutOfRange> {
        Ok(self.substr(pos, count)?.compare(other))
    }

    /// Returns `true` if the span begins with `needle`.
    #[inline]
    #[must_use]
    pub fn starts_with(&self, needle: impl AsRef<[u8]>) -> bool {
        self.bytes.starts_with(needle.as_ref())
    }

    /// Returns `true` if the span ends with `needle`.
    #[inline]
    #[must_use]
    pub fn ends_with(&self, needle: impl AsRef<[u8]>) -> bool {
        self.bytes.ends_with(needle.as_ref())
    }

    /// Returns the position of the first occurrence of `needle` that starts
    /// at or after `pos`.
    ///
    /// An empty needle is found at `pos` itself as long as `pos <= len`.
    #[must_use]
    pub fn find(&self, needle: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let needle = needle.as_ref();
        if needle.is_empty() {
            return (pos <= self.len()).then_some(pos);
        }

        self.bytes
            .get(pos..)?
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|offset| pos + offset)
    }

    /// Returns the position of the last occurrence of `needle` that starts
    /// at or before `pos`. Pass `usize::MAX` to search the whole span.
    ///
    /// An empty needle is found at `min(pos, len)`.
    #[must_use]
    pub fn rfind(&self, needle: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let needle = needle.as_ref();
        if needle.is_empty() {
            return Some(pos.min(self.len()));
        }

        let last_start = self.len().checked_sub(needle.len())?.min(pos);
        self.bytes[..last_start + needle.len()]
            .windows(needle.len())
            .rposition(|window| window == needle)
    }

    /// Returns the position of the first byte at or after `pos` that appears
    /// in `set`.
    #[must_use]
    pub fn find_first_of(&self, set: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let set = set.as_ref();
        self.position_from(pos, |byte| set.contains(&byte))
    }

    /// Returns the position of the last byte at or before `pos` that appears
    /// in `set`. Pass `usize::MAX` to search the whole span.
    #[must_use]
    pub fn find_last_of(&self, set: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let set = set.as_ref();
        self.rposition_to(pos, |byte| set.contains(&byte))
    }

    /// Returns the position of the first byte at or after `pos` that does
    /// not appear in `set`.
    #[must_use]
    pub fn find_first_not_of(&self, set: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let set = set.as_ref();
        self.position_from(pos, |byte| !set.contains(&byte))
    }

    /// Returns the position of the last byte at or before `pos` that does
    /// not appear in `set`. Pass `usize::MAX` to search the whole span.
    #[must_use]
    pub fn find_last_not_of(&self, set: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let set = set.as_ref();
        self.rposition_to(pos, |byte| !set.contains(&byte))
    }

    /// Returns the bytes from `pos` on, or [`OutOfRange`] if `pos >= len`.
    #[inline]
    fn rest_from(&self, pos: usize) -> Result<&'a [u8], OutOfRange> {
        match self.bytes.get(pos..) {
            Some(rest) if pos < self.len() => Ok(rest),
            _ => Err(OutOfRange {
                index: pos,
                len: self.len(),
            }),
        }
    }

    #[inline]
    fn position_from(&self, pos: usize, predicate: impl Fn(u8) -> bool) -> Option<usize> {
        self.bytes
            .get(pos..)?
            .iter()
            .position(|&byte| predicate(byte))
            .map(|offset| pos + offset)
    }

    #[inline]
    fn rposition_to(&self, pos: usize, predicate: impl Fn(u8) -> bool) -> Option<usize> {
        let end = pos.saturating_add(1).min(self.len());
        self.bytes[..end].iter().rposition(|&byte| predicate(byte))
    }
}

impl<'a> From<&'a str> for StrSpan<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Self::new(s)
    }
}

impl<'a> From<&'a [u8]> for StrSpan<'a> {
    #[inline]
    fn from(bytes: &'a [u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for StrSpan<'_> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> IntoIterator for StrSpan<'a> {
    type IntoIter = core::slice::Iter<'a, u8>;
    type Item = &'a u8;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.bytes.iter()
    }
}

impl PartialEq<str> for StrSpan<'_> {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for StrSpan<'_> {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<StrSpan<'_>> for &str {
    #[inline]
    fn eq(&self, other: &StrSpan<'_>) -> bool {
        self.as_bytes() == other.bytes
    }
}

/// Writes the bytes as UTF-8, replacing invalid sequences with U+FFFD.
impl fmt::Display for StrSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.bytes.utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}
