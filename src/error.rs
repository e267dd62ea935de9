//! Unified error types for the eLoad firmware.
//!
//! A single `Error` enum that every subsystem converts into.  All variants
//! are `Copy` so they can be handed back from interrupt-adjacent code
//! without allocation.
//!
//! Tick processing never produces an error: every failure in this crate is
//! a rejected configuration call, reported synchronously to the caller with
//! the engine state left as it was.

use core::fmt;

use crate::load::Param;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A rule slot or timer index is outside the fixed table size.
    IndexOutOfRange(IndexOutOfRange),
    /// A `SetParam` destination targets a measurement.
    ReadOnlyParameter(Param),
    /// The shared engine is already borrowed (re-entrant access).
    Busy,
    /// Configuration is invalid or could not be loaded / stored.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange(e) => write!(f, "index: {e}"),
            Self::ReadOnlyParameter(p) => write!(f, "parameter {p} is read-only"),
            Self::Busy => write!(f, "engine busy"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Index errors
// ---------------------------------------------------------------------------

/// Which fixed-size table an out-of-range index referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Rule,
    Timer,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule => write!(f, "rule"),
            Self::Timer => write!(f, "timer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfRange {
    pub kind: SlotKind,
    pub index: usize,
    /// Size of the table the index was checked against.
    pub len: usize,
}

impl IndexOutOfRange {
    /// Returns `Ok(index)` when `index < len`, otherwise the error.
    pub const fn check(kind: SlotKind, index: usize, len: usize) -> core::result::Result<usize, Self> {
        if index < len {
            Ok(index)
        } else {
            Err(Self { kind, index, len })
        }
    }
}

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} out of range (0..{})", self.kind, self.index, self.len)
    }
}

impl From<IndexOutOfRange> for Error {
    fn from(e: IndexOutOfRange) -> Self {
        Self::IndexOutOfRange(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from [`ConfigPort`](crate::app::ports::ConfigPort) operations and
/// configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
