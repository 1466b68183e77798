use std::collections::TryReserveError;

use thiserror::Error;

use crate::{heap::ValueRef, value::ValueKind};

#[derive(Debug, Error)]
pub enum RcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration '{file}': {source}")]
    ConfigParse {
        source: toml::de::Error,
        file: String,
    },

    /// Backing storage could not be obtained. No value was constructed.
    #[error("Allocation failed while {context}")]
    AllocationFailed {
        context: &'static str,
        #[source]
        source: Option<TryReserveError>,
    },

    /// The handle refers to a value whose refcount already reached zero.
    #[error(
        "Handle {0} refers to a destroyed value. Retaining, releasing or reading a value after its last release is a contract violation."
    )]
    StaleHandle(ValueRef),

    #[error("Refcount of {0} would overflow")]
    RefcountOverflow(ValueRef),

    #[error("Value {handle} is of kind `{found}`, expected `{expected}`")]
    KindMismatch {
        handle: ValueRef,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Input is not valid UTF-8 at byte offset {offset}")]
    InvalidInput { offset: usize },
}

impl RcError {
    pub(crate) fn alloc(context: &'static str, source: TryReserveError) -> Self {
        RcError::AllocationFailed {
            context,
            source: Some(source),
        }
    }
}

pub type RcResult<T> = Result<T, RcError>;
