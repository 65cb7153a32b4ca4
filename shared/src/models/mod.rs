//! Domain models for the Pointcast weather panel service

mod alert;
mod panel;

pub use alert::*;
pub use panel::*;
