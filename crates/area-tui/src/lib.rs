//! area-tui - Terminal UI for the AREA client
//!
//! This crate provides the ratatui-based terminal interface. It drives an
//! [`area_app::Engine`] and adds terminal rendering, event polling, and the
//! page and dialog widgets.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry point
pub use runner::run;
