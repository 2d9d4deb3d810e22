//! Common error infrastructure for model-core.
//!
//! Domain-specific errors (`RegistryError`, `RenderError`, ...) live next to the
//! operations that raise them. This module holds the shared severity
//! classification and the umbrella [`ModelError`] used by [`crate::ControlModel`].
//!
//! # Design Principles
//!
//! - **Type Safety**: each stage has its own error enum with specific variants
//! - **Positional Context**: structural errors carry the entry position they refer to
//! - **Severity Classification**: errors are categorized for caller recovery strategies

use crate::entry::EntryError;
use crate::model::BuildError;
use crate::part::RegistryError;
use crate::query::LookupError;
use crate::render::RenderError;
use crate::scenario::ScenarioError;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller asked for something that is simply absent
/// - **Validation**: invalid input handed to the load phase
/// - **Internal**: the model violates one of its own invariants
/// - **Fatal**: the model cannot be used for the requested operation at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - a lookup missed, try another key.
    ///
    /// Examples: identifier not present in this control file
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: payload does not match its tag, duplicate identifier
    Validation,

    /// Internal error - the model's invariants do not hold.
    ///
    /// Examples: two entries share an identifier, chain link points nowhere
    Internal,

    /// Fatal error - the structure cannot be rendered.
    ///
    /// Examples: unmatched `END IF`, unclosed scenario group
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if the stored model itself is inconsistent.
    ///
    /// `Fatal` counts: a group that cannot be rendered was stored with an
    /// unmatched or unclosed block, so the file cannot be trusted for any
    /// query either. Only `Recoverable` and `Validation` leave it usable.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all model-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait ControlError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Any error raised by the control-file model.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("no model file with identifier {0}")]
    UnknownModelFile(crate::part::Ident),
}

impl ControlError for ModelError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Registry(e) => e.severity(),
            Self::Entry(e) => e.severity(),
            Self::Scenario(e) => e.severity(),
            Self::Build(e) => e.severity(),
            Self::Render(e) => e.severity(),
            Self::Lookup(e) => e.severity(),
            Self::UnknownModelFile(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Registry(e) => e.error_code(),
            Self::Entry(e) => e.error_code(),
            Self::Scenario(e) => e.error_code(),
            Self::Build(e) => e.error_code(),
            Self::Render(e) => e.error_code(),
            Self::Lookup(e) => e.error_code(),
            Self::UnknownModelFile(_) => "MODEL_UNKNOWN_FILE",
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
