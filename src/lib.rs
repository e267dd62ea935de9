//! Electronic load firmware library.
//!
//! Exposes the event engine, its configuration and the host-side adapters
//! for integration testing and the `eload-sim` binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod load;
