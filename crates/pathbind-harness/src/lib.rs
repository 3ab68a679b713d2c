#![forbid(unsafe_code)]

//! Test fixtures for pathbind.
//!
//! - [`log_capture`]: record `tracing` events emitted during a closure.
//! - [`spy`]: a factory wrapper that counts disposals and subscriptions of
//!   the bindings it creates.
//! - [`fixtures`]: small object graphs used across the integration tests.

pub mod fixtures;
pub mod log_capture;
pub mod spy;

pub use log_capture::{CapturedEvent, LogCapture, capture_logs};
pub use spy::{BindingProbe, SpyBinding, SpyFactory};
