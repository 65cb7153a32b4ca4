//! Shared types and models for the Pointcast weather panel service
//!
//! This crate contains types shared between the backend and any
//! presentation-layer consumers of the panel API.

pub mod models;
pub mod presentation;
pub mod types;
pub mod validation;

pub use models::*;
pub use presentation::*;
pub use types::*;
pub use validation::*;
