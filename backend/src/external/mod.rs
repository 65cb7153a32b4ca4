//! External API integrations

pub mod provider;

pub use provider::{MeteomaticsClient, WeatherProvider};
