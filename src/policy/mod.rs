//! Optional dump-and-exit behavior on fatal reports.

pub mod exit;

pub use exit::{ExitPolicy, TerminateHook};
