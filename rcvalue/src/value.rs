//! Payloads stored behind a [`ValueRef`](crate::heap::ValueRef).
//!
//! A value is a closed union over two kinds. The kind is decided when the value is created and
//! never changes afterwards; the heap selects how a value is finalized by matching on it.
use std::fmt;

use strum::{Display, EnumIs};

use crate::text::TextBuffer;

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Integer,
    Text,
}

/// Owned payload of a live value.
///
/// The payload is stored by value inside its heap slot. A `Text` value exclusively owns the
/// storage of its [`TextBuffer`].
#[derive(Debug)]
pub enum Value {
    Integer(i64),
    Text(TextBuffer),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn view(&self) -> ValueView<'_> {
        match self {
            Value::Integer(i) => ValueView::Integer(*i),
            Value::Text(buffer) => ValueView::Text(buffer.as_str()),
        }
    }
}

/// Borrowed view of a value's payload. Holding a view does not count as owning the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum ValueView<'a> {
    Integer(i64),
    Text(&'a str),
}

impl ValueView<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueView::Integer(_) => ValueKind::Integer,
            ValueView::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ValueView::Integer(i) => Some(*i),
            ValueView::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ValueView::Integer(_) => None,
            ValueView::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ValueView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueView::Integer(i) => write!(f, "{}", i),
            ValueView::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_payload() {
        assert_eq!(Value::Integer(3).kind(), ValueKind::Integer);
        assert_eq!(Value::Text(TextBuffer::new()).kind(), ValueKind::Text);
        assert!(Value::Integer(3).view().is_integer());
    }

    #[test]
    fn kind_display_is_lowercase() {
        assert_eq!(ValueKind::Integer.to_string(), "integer");
        assert_eq!(ValueKind::Text.to_string(), "text");
    }

    #[test]
    fn view_accessors() {
        let view = ValueView::Text("abc");
        assert_eq!(view.as_text(), Some("abc"));
        assert_eq!(view.as_integer(), None);
        assert_eq!(ValueView::Integer(-4).to_string(), "-4");
    }
}
