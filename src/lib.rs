#![doc(test(attr(deny(warnings))))]

//! Schedule Core computes when recurring payments fall due, when a series
//! ends, how a payment stands relative to today, and which reminders fire.
//!
//! Every scheduling operation is a pure function of its inputs; "today" is
//! always passed in explicitly.

pub mod config;
pub mod errors;
pub mod schedule;
pub mod utils;

use std::sync::Once;

pub use errors::{ConfigError, PatternError, ScheduleError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Schedule Core tracing initialized.");
    });
}
