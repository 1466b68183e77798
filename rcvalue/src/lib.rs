//! Reference-counted dynamic values: integers and growable, null-terminated text.
//!
//! Values are owned by a [`heap::ValueHeap`] and addressed through copyable
//! [`heap::ValueRef`] handles. Lifetime is governed by an explicit refcount: creation yields
//! one owner, [`heap::ValueHeap::retain`] adds owners and [`heap::ValueHeap::release`] removes
//! them, finalizing the value exactly once when the last owner is gone. Use of a handle after
//! its value was destroyed is reported as an error rather than reaching freed storage.
//!
//! ```
//! use rcvalue::heap::ValueHeap;
//!
//! let mut heap = ValueHeap::new();
//! let five = heap.create_integer(5)?;
//! assert_eq!(heap.display(five, "value={}")?, "value=5");
//! heap.release(five)?;
//! # Ok::<(), rcvalue::utils::error::RcError>(())
//! ```

/// `{}` template substitution used to display values.
pub mod fmt;
/// Value storage, handles and the retain/release protocol.
pub mod heap;
/// Line assembly from byte sources.
pub mod input;
/// Text payload storage.
pub mod text;
/// Errors and configuration.
pub mod utils;
/// Value kinds, payloads and borrowed views.
pub mod value;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::fmt::{INT_SENTINEL, substitute, substitute_ints, substitute_texts};
    pub use crate::heap::{HeapStats, Released, ValueHeap, ValueRef};
    pub use crate::input::read_line;
    pub use crate::text::{GrowthPolicy, TextBuffer};
    pub use crate::utils::conf::HeapConfig;
    pub use crate::utils::error::{RcError, RcResult};
    pub use crate::value::{Value, ValueKind, ValueView};
}
