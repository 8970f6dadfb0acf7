//! Theme for the terminal client.
//!
//! - `palette`: raw color constants
//! - `styles`: semantic style builders and service colors

pub mod palette;
pub mod styles;
