//! Pin-level drivers for the instrument's digital I/O.

pub mod trigger;
