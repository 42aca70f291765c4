//! Byte View Module
//!
//! Immutable view over a cached value.

use std::fmt;

use bytes::Bytes;

// == Byte View ==
/// An immutable byte sequence held by the cache.
///
/// Cloning a view is cheap and shares the underlying buffer. Callers that need
/// an owned, mutable buffer get a copy through [`ByteView::byte_slice`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    // == Constructor ==
    /// Creates a view by copying the given bytes.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(data),
        }
    }

    // == Length ==
    /// Returns the number of bytes in the view.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == Byte Slice ==
    /// Returns a copy of the data as an owned vector.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Borrows the data without copying.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the shared buffer, for handing to an HTTP body without a copy.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(value: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(value),
        }
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<&str> for ByteView {
    fn from(value: &str) -> Self {
        Self::copy_from_slice(value.as_bytes())
    }
}

impl From<String> for ByteView {
    fn from(value: String) -> Self {
        Self::from(value.into_bytes())
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_slice_is_a_copy() {
        let view = ByteView::from("630");
        let mut copy = view.byte_slice();
        copy[0] = b'9';

        assert_eq!(view.to_string(), "630");
        assert_eq!(copy, b"930");
    }

    #[test]
    fn test_len_and_display() {
        let view = ByteView::from(vec![b'h', b'i']);
        assert_eq!(view.len(), 2);
        assert!(!view.is_empty());
        assert_eq!(view.to_string(), "hi");
        assert!(ByteView::default().is_empty());
    }

    #[test]
    fn test_clone_shares_contents() {
        let view = ByteView::from("shared".to_string());
        let other = view.clone();
        assert_eq!(view, other);
        assert_eq!(other.as_bytes(), b"shared");
    }
}
