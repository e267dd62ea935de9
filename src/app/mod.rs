//! Application core: configuration commands and the tick entry point.
//!
//! The event engine itself lives in [`crate::events`]; this layer is what
//! the outside world (command parser, front panel, tick interrupt) talks
//! to.  All interaction with hardware and storage happens through the
//! **port traits** defined in [`ports`].

pub mod commands;
pub mod ports;
pub mod service;
