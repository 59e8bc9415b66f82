//! Terminal User Interface (TUI) module.
//!
//! This module provides an interactive terminal-based front end for
//! running a scan using the `ratatui` library.

mod app;

pub use app::App;
