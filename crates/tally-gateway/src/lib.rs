//! tally gateway library entry.
//!
//! Wires config, store backends, the visitor and likes counter services, and
//! the HTTP surface into one router. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
pub mod store;
