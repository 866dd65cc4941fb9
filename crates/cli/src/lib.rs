//! s4 library
//!
//! The browser's state machine, dispatcher and renderer, exported for the
//! integration tests.

pub mod app;
pub mod cli;
pub mod dispatch;
pub mod exit_code;
pub mod output;
pub mod setup;
pub mod ui;
