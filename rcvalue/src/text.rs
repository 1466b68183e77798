//! Growable, null-terminated text storage backing [`Value::Text`](crate::value::Value::Text).
//!
//! The buffer always holds its content followed by exactly one `'\0'`, so the storage can be
//! handed to anything expecting a C-style string via [`TextBuffer::as_bytes_with_nul`]. Appends
//! follow C-string semantics: the appended text ends at its first NUL byte.
//!
//! Growth is governed by a [`GrowthPolicy`]. The default, [`GrowthPolicy::ExactFit`], resizes
//! the storage to exactly `len + addition + 1` bytes on every append. Repeated single-character
//! appends therefore cost one reallocation each (quadratic over the whole sequence). Use
//! [`GrowthPolicy::Amortized`] when throughput matters more than memory exactness; the observable
//! content is the same under both policies.
use std::{collections::TryReserveError, fmt};

use serde::Deserialize;
use strum::{Display, EnumString};

const TERMINATOR: char = '\0';

/// How a [`TextBuffer`] grows its storage on append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GrowthPolicy {
    /// Reserve exactly the new requirement on every append.
    #[default]
    ExactFit,
    /// Let the storage grow geometrically.
    Amortized,
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    storage: String,
    policy: GrowthPolicy,
}

impl TextBuffer {
    /// Create an empty buffer holding only the terminator.
    pub fn new() -> Self {
        let mut storage = String::with_capacity(1);
        storage.push(TERMINATOR);
        Self {
            storage,
            policy: GrowthPolicy::default(),
        }
    }

    /// Create an empty buffer with at least `capacity` bytes of storage (never less than one, for
    /// the terminator). Allocation failure is reported instead of aborting.
    pub fn try_with_capacity(
        policy: GrowthPolicy,
        capacity: usize,
    ) -> Result<Self, TryReserveError> {
        let mut storage = String::new();
        storage.try_reserve_exact(capacity.max(1))?;
        storage.push(TERMINATOR);
        Ok(Self { storage, policy })
    }

    /// Append `text` after the current content and re-terminate.
    ///
    /// Only the part of `text` before its first NUL byte is copied. Appending an empty string is
    /// a no-op. On allocation failure the buffer is left untouched.
    pub fn append(&mut self, text: &str) -> Result<(), TryReserveError> {
        let addition = match text.find(TERMINATOR) {
            Some(end) => &text[..end],
            None => text,
        };
        if addition.is_empty() {
            return Ok(());
        }

        match self.policy {
            GrowthPolicy::ExactFit => self.storage.try_reserve_exact(addition.len())?,
            GrowthPolicy::Amortized => self.storage.try_reserve(addition.len())?,
        }

        self.storage.pop();
        self.storage.push_str(addition);
        self.storage.push(TERMINATOR);

        debug_assert!(self.storage.ends_with(TERMINATOR));
        debug_assert!(self.capacity() > self.len());
        Ok(())
    }

    /// Content length in bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.storage.len() - TERMINATOR.len_utf8()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes of backing storage currently allocated, terminator included.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub fn as_str(&self) -> &str {
        &self.storage[..self.len()]
    }

    /// Content followed by its terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        self.storage.as_bytes()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<str> for TextBuffer {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TextBuffer {}

impl PartialEq<str> for TextBuffer {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TextBuffer {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
