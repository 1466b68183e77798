//! Reference-counted value storage.
//!
//! Every value lives in a slot of a [`ValueHeap`] and is addressed through a [`ValueRef`]
//! handle. A freshly created value has a refcount of one: the creator is its first owner.
//! Further owners are added with [`ValueHeap::retain`] and each owner gives its share back with
//! exactly one [`ValueHeap::release`]. The release that brings the count to zero finalizes the
//! value synchronously and vacates its slot.
//!
//! Handles carry the generation of the slot they were issued for. Once a value is destroyed its
//! slot generation moves on, so any later use of an old handle is detected and reported as
//! [`RcError::StaleHandle`] instead of touching whatever value reuses the slot.
//!
//! The heap is a plain single-owner structure: operations take `&self`/`&mut self` and nothing
//! is synchronised. Share it across threads only behind external locking.
//!
//! ```
//! use rcvalue::heap::{Released, ValueHeap};
//!
//! let mut heap = ValueHeap::new();
//! let text = heap.create_text()?;
//! heap.append(text, "hello")?;
//! heap.append(text, " world")?;
//! assert_eq!(heap.read(text)?.as_text(), Some("hello world"));
//!
//! heap.retain(text)?;
//! assert!(matches!(heap.release(text)?, Released::Retained { refcount: 1 }));
//! assert!(matches!(heap.release(text)?, Released::Destroyed { .. }));
//! assert!(heap.read(text).is_err());
//! # Ok::<(), rcvalue::utils::error::RcError>(())
//! ```
use std::{fmt, io};

use log::{debug, trace, warn};

use crate::{
    fmt::{emit, substitute},
    text::TextBuffer,
    utils::{
        conf::HeapConfig,
        error::{RcError, RcResult},
    },
    value::{Value, ValueKind, ValueView},
};

/// Handle to a value stored in a [`ValueHeap`].
///
/// Handles are plain copyable tokens: copying one does not add an owner. Ownership is tracked
/// solely by the heap's refcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueRef {
    index: u32,
    generation: u32,
}

impl ValueRef {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Outcome of [`ValueHeap::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    /// Other owners remain.
    Retained { refcount: usize },
    /// This was the last owner; the value has been finalized.
    Destroyed { kind: ValueKind },
}

impl Released {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, Released::Destroyed { .. })
    }
}

/// Lifetime counters of a heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub created: u64,
    pub destroyed: u64,
    pub live: usize,
}

#[derive(Debug)]
struct Entry {
    refcount: usize,
    value: Value,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug, Default)]
pub struct ValueHeap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    config: HeapConfig,
    stats: HeapStats,
}

impl ValueHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeapConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    /// Number of values currently alive.
    pub fn live_count(&self) -> usize {
        self.stats.live
    }

    /// Create an integer value with a refcount of one.
    pub fn create_integer(&mut self, value: i64) -> RcResult<ValueRef> {
        self.insert(Value::Integer(value))
    }

    /// Create an empty text value with a refcount of one.
    pub fn create_text(&mut self) -> RcResult<ValueRef> {
        let buffer =
            TextBuffer::try_with_capacity(self.config.growth, self.config.initial_text_capacity)
                .map_err(|err| RcError::alloc("creating a text buffer", err))?;
        self.insert(Value::Text(buffer))
    }

    fn insert(&mut self, value: Value) -> RcResult<ValueRef> {
        if let Some(max) = self.config.max_live_values {
            if self.stats.live >= max {
                return Err(RcError::AllocationFailed {
                    context: "creating a value beyond the configured live value limit",
                    source: None,
                });
            }
        }

        let kind = value.kind();
        let entry = Entry { refcount: 1, value };
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.entry.is_none());
                slot.entry = Some(entry);
                ValueRef {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len()).map_err(|_| {
                    RcError::AllocationFailed {
                        context: "creating a value beyond the addressable slot count",
                        source: None,
                    }
                })?;
                self.slots
                    .try_reserve(1)
                    .map_err(|err| RcError::alloc("growing the value heap", err))?;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                ValueRef {
                    index,
                    generation: 0,
                }
            }
        };

        self.stats.created += 1;
        self.stats.live += 1;
        trace!("Created {} value {}", kind, handle);
        Ok(handle)
    }

    fn entry(&self, handle: ValueRef) -> RcResult<&Entry> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(RcError::StaleHandle(handle))
    }

    fn entry_mut(&mut self, handle: ValueRef) -> RcResult<&mut Entry> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(RcError::StaleHandle(handle))
    }

    /// Whether `handle` still refers to a live value.
    pub fn is_live(&self, handle: ValueRef) -> bool {
        self.entry(handle).is_ok()
    }

    pub fn refcount(&self, handle: ValueRef) -> RcResult<usize> {
        Ok(self.entry(handle)?.refcount)
    }

    pub fn kind(&self, handle: ValueRef) -> RcResult<ValueKind> {
        Ok(self.entry(handle)?.value.kind())
    }

    /// Add an owner to a live value and return the new refcount.
    ///
    /// Retaining a destroyed value is a contract violation and fails with
    /// [`RcError::StaleHandle`].
    pub fn retain(&mut self, handle: ValueRef) -> RcResult<usize> {
        let entry = match self.entry_mut(handle) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Attempted to retain destroyed value {}", handle);
                return Err(err);
            }
        };
        debug_assert!(entry.refcount > 0);
        entry.refcount = entry
            .refcount
            .checked_add(1)
            .ok_or(RcError::RefcountOverflow(handle))?;
        trace!("Retained {} (refcount {})", handle, entry.refcount);
        Ok(entry.refcount)
    }

    /// Give back one owner's share of a value, finalizing it when no owner remains.
    ///
    /// Releasing a destroyed value is a contract violation and fails with
    /// [`RcError::StaleHandle`]; it never finalizes anything a second time.
    pub fn release(&mut self, handle: ValueRef) -> RcResult<Released> {
        let entry = match self.entry_mut(handle) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Attempted to release destroyed value {}", handle);
                return Err(err);
            }
        };
        debug_assert!(entry.refcount > 0);
        entry.refcount -= 1;
        if entry.refcount > 0 {
            trace!("Released {} (refcount {})", handle, entry.refcount);
            return Ok(Released::Retained {
                refcount: entry.refcount,
            });
        }

        let slot = &mut self.slots[handle.index as usize];
        let Some(Entry { value, .. }) = slot.entry.take() else {
            return Err(RcError::StaleHandle(handle));
        };
        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free.push(handle.index);
            }
            // The slot is retired so that no future handle can alias an old one.
            None => debug!("Retiring slot {} after generation exhaustion", handle.index),
        }

        let kind = finalize(handle, value);
        self.stats.destroyed += 1;
        self.stats.live -= 1;
        Ok(Released::Destroyed { kind })
    }

    /// Borrow the payload of a live value.
    pub fn read(&self, handle: ValueRef) -> RcResult<ValueView<'_>> {
        Ok(self.entry(handle)?.value.view())
    }

    /// Mutable access to the buffer of a live text value.
    pub fn text_mut(&mut self, handle: ValueRef) -> RcResult<&mut TextBuffer> {
        match &mut self.entry_mut(handle)?.value {
            Value::Text(buffer) => Ok(buffer),
            Value::Integer(_) => Err(RcError::KindMismatch {
                handle,
                expected: ValueKind::Text,
                found: ValueKind::Integer,
            }),
        }
    }

    /// Append `text` to a live text value.
    pub fn append(&mut self, handle: ValueRef, text: &str) -> RcResult<()> {
        self.text_mut(handle)?
            .append(text)
            .map_err(|err| RcError::alloc("appending to a text buffer", err))
    }

    /// Render a value through `template`, substituting its payload for the first `{}`.
    pub fn display(&self, handle: ValueRef, template: &str) -> RcResult<String> {
        Ok(substitute(template, [self.read(handle)?]))
    }

    /// Like [`ValueHeap::display`], writing the rendered text to `out`.
    pub fn show<W: io::Write + ?Sized>(
        &self,
        handle: ValueRef,
        template: &str,
        out: &mut W,
    ) -> RcResult<()> {
        emit(out, template, [self.read(handle)?])?;
        Ok(())
    }
}

/// Drop a value whose last owner is gone. Text storage is released before the slot itself is
/// reused.
fn finalize(handle: ValueRef, value: Value) -> ValueKind {
    match value {
        Value::Integer(i) => {
            debug!("Destroyed integer value {} ({})", handle, i);
            ValueKind::Integer
        }
        Value::Text(buffer) => {
            let freed = buffer.capacity();
            drop(buffer);
            debug!("Destroyed text value {} ({} bytes freed)", handle, freed);
            ValueKind::Text
        }
    }
}
