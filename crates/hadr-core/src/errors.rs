//! Structured error types shared across HADR crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`HadrError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable code, e.g. `dispatch_gap`.
    pub code: String,
    /// What went wrong.
    pub message: String,
    /// Contextual key value pairs (particle names, energies, paths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// How to fix the input, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Attaches a key/value pair such as a particle name or an energy.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets the remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for model dispatch and spectrum scoring.
///
/// Every family is fatal for the operation that raised it. Dispatch failures in
/// particular must abort the run instead of falling back to some other model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HadrError {
    /// The dispatcher has no bindings for the requested particle.
    #[error("unknown species: {0}")]
    UnknownSpecies(ErrorInfo),
    /// No registered energy domain contains the requested energy.
    #[error("no applicable model: {0}")]
    NoApplicableModel(ErrorInfo),
    /// The scorer was changed after the accumulator had been used in a run.
    #[error("reconfiguration not allowed: {0}")]
    ReconfigurationNotAllowed(ErrorInfo),
    /// The registered domains leave part of the production window uncovered.
    #[error("configuration gap: {0}")]
    ConfigurationGap(ErrorInfo),
    /// Invalid configuration values or unresolved names.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization, parsing and I/O errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl HadrError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HadrError::UnknownSpecies(info)
            | HadrError::NoApplicableModel(info)
            | HadrError::ReconfigurationNotAllowed(info)
            | HadrError::ConfigurationGap(info)
            | HadrError::Config(info)
            | HadrError::Serde(info) => info,
        }
    }

    /// Stable family name used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            HadrError::UnknownSpecies(_) => "unknown_species",
            HadrError::NoApplicableModel(_) => "no_applicable_model",
            HadrError::ReconfigurationNotAllowed(_) => "reconfiguration_not_allowed",
            HadrError::ConfigurationGap(_) => "configuration_gap",
            HadrError::Config(_) => "config",
            HadrError::Serde(_) => "serde",
        }
    }
}

/// Wraps an I/O or parser failure into a [`HadrError::Serde`] payload.
pub fn serde_error(code: &str, err: impl ToString) -> HadrError {
    HadrError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Shorthand for a [`HadrError::Config`] payload.
pub fn config_error(code: &str, message: impl Into<String>) -> HadrError {
    HadrError::Config(ErrorInfo::new(code, message))
}
