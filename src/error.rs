//! Error types for the codec.
//!
//! Compression and decompression are pure transforms, so every failure is
//! reported to the caller as-is and would fail identically on retry.

use thiserror::Error;

/// Top-level error returned by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The leading fields of a compressed stream could not be read.
    #[error("malformed header: {0}")]
    MalformedHeader(#[from] HeaderError),

    /// The serialized tree is not a valid prefix-notation tree.
    #[error("malformed tree: {0}")]
    MalformedTree(#[from] TreeError),

    /// The packed payload does not decode cleanly against the tree.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// A code table was asked to encode a symbol it holds no code for.
    #[error("no code for symbol {0:?}")]
    UnknownSymbol(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("no `#` delimiter after the {field} field")]
    MissingDelimiter { field: &'static str },

    #[error("{field} field {value:?} is not a decimal integer")]
    InvalidNumber { field: &'static str, value: String },

    #[error("padding of {0} bits is outside 0..=7")]
    PaddingOutOfRange(u32),

    #[error("single-symbol stream carries no symbol")]
    MissingSymbol,

    #[error("repeat count {count} is too large to restore")]
    CountTooLarge { count: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tree string ends at offset {offset} before the tree is complete")]
    UnexpectedEnd { offset: usize },

    #[error("unexpected marker {marker:?} at offset {offset}")]
    UnexpectedMarker { offset: usize, marker: char },

    #[error("tree is complete at offset {offset} but the tree string continues")]
    TrailingInput { offset: usize },

    #[error("header declares {declared} tree chars but only {available} follow")]
    Truncated { declared: usize, available: usize },

    #[error("tree root is a leaf, which cannot carry a prefix code")]
    LeafRoot,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload unit {value:#x} at offset {offset} does not fit in a byte")]
    UnitOutOfRange { offset: usize, value: u32 },

    #[error("padding of {padding} bits exceeds the {available} payload bits")]
    PaddingExceedsPayload { padding: u8, available: usize },

    #[error("payload ends {dangling} bits into an incomplete code")]
    IncompleteCode { dangling: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
