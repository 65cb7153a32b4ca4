//! HTTP handlers

pub mod health;
pub mod panel;

pub use health::*;
pub use panel::*;
