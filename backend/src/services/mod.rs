//! Core services for the panel pipeline

pub mod alerts;
pub mod climate;
pub mod horizon;
pub mod panel;
pub mod series;
pub mod time;
