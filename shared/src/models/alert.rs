//! Weather alert models

use serde::{Deserialize, Serialize};

/// Alert severity, ordered so that `Danger` ranks above `Warning`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
        }
    }
}

/// A single alert produced for one panel request
///
/// Alerts are request-scoped: produced fresh by the alert engine and
/// never persisted. `source` names the rule category that fired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub level: AlertLevel,
    pub text: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Alert {
    pub fn new(level: AlertLevel, source: &str, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            source: source.to_string(),
            href: None,
        }
    }
}
