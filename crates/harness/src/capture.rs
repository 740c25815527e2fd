//! Fixed-capacity capture of everything the host sends to any connection.
//!
//! The buffer is allocated once at init and never grows. Writes either land
//! completely or not at all. After every successful append the byte following
//! the payload is zero, so consumers may read the contents as a sized region
//! or as a NUL-terminated string.

/// Monotonic byte log of host output, in emission order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaptureBuffer {
    storage: Vec<u8>,
    len: usize,
}

impl CaptureBuffer {
    /// Allocates a zeroed buffer of `capacity` bytes, terminator included.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0u8; capacity],
            len: 0,
        }
    }

    /// Returns the fixed capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of captured payload bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when nothing has been captured since the last clear.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `line` followed by a newline.
    ///
    /// Needs room for the payload, the newline and the terminator. Returns
    /// `false` and leaves the buffer untouched otherwise.
    pub fn append_line(&mut self, line: &[u8]) -> bool {
        let Some(needed) = self.len.checked_add(line.len()).and_then(|n| n.checked_add(2)) else {
            return false;
        };
        if needed > self.capacity() {
            return false;
        }

        let end = self.len + line.len();
        self.storage[self.len..end].copy_from_slice(line);
        self.storage[end] = b'\n';
        self.len = end + 1;
        self.storage[self.len] = 0;
        true
    }

    /// Appends `bytes` verbatim.
    ///
    /// Needs room for the payload and the terminator. Returns `false` and
    /// leaves the buffer untouched otherwise.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> bool {
        let Some(needed) = self.len.checked_add(bytes.len()).and_then(|n| n.checked_add(1)) else {
            return false;
        };
        if needed > self.capacity() {
            return false;
        }

        let end = self.len + bytes.len();
        self.storage[self.len..end].copy_from_slice(bytes);
        self.len = end;
        self.storage[self.len] = 0;
        true
    }

    /// Returns the captured bytes without clearing them.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Returns the captured bytes followed by their zero terminator.
    ///
    /// Empty when the buffer has been released.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.storage.is_empty() {
            return &[];
        }
        &self.storage[..=self.len]
    }

    /// Resets the length to zero and terminates at position zero.
    pub fn clear(&mut self) {
        self.len = 0;
        if let Some(first) = self.storage.first_mut() {
            *first = 0;
        }
    }

    /// Frees the storage. Every later append fails until the buffer is
    /// replaced.
    pub fn release(&mut self) {
        self.storage = Vec::new();
        self.len = 0;
    }
}
