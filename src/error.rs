//! Error type shared by every fallible heap operation
//!
//! All variants are precondition violations raised before the heap is touched,
//! so a returned error always means the heap is exactly as it was before the call.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The requested arity is below 2
    InvalidArity,
    /// An element with the same identity is already in the heap
    DuplicateIdentity,
    /// No element with the given identity is in the heap
    NotFound,
    /// The new cost does not move strictly in the direction the operation requires
    InvalidTransition,
    /// A slot position is not below the heap's length
    IndexOutOfBounds,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidArity => write!(f, "heap arity must be at least 2"),
            HeapError::DuplicateIdentity => {
                write!(f, "an element with this identity is already in the heap")
            }
            HeapError::NotFound => write!(f, "no element with this identity is in the heap"),
            HeapError::InvalidTransition => {
                write!(f, "new cost does not move in the required direction")
            }
            HeapError::IndexOutOfBounds => {
                write!(f, "slot position is past the end of the heap")
            }
        }
    }
}

impl std::error::Error for HeapError {}
