//! # Error Module
//!
//! ## Purpose
//! Crate-wide error type for physisorb. The taxonomy is deliberately small:
//! - **Parameter errors** - the caller supplied a semantically invalid
//!   combination (missing required property, unknown enumeration, basis
//!   incompatible with an operation, mismatched array lengths).
//! - **Calculation errors** - the numerics failed (non-convergent solver,
//!   too few points for a regression, a required thermodynamic quantity
//!   could not be obtained, a kernel does not cover the data).
//! - **Parsing errors** - only raised at the parser boundary when a unit
//!   or mode string cannot be resolved; analysis paths never raise them.
//!
//! Everything else (region heuristics landing on unusual values, unphysical
//! fitted constants) is a *warning*: the computation still returns a valid
//! result together with the warning list, and also logs it via `log::warn!`.
//! Errors bubble up to the public entry point unchanged and are never
//! caught internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhysisorbError {
    /// A required property or argument is absent.
    #[error("missing required parameter: {0}")]
    ParameterMissing(String),

    /// An argument is present but semantically invalid.
    #[error("invalid parameter '{name}': {reason}")]
    ParameterInvalid { name: String, reason: String },

    /// A string does not resolve to a known enumeration value.
    #[error("unknown {kind} '{value}'")]
    UnknownEnum { kind: &'static str, value: String },

    /// Numerics failed: non-convergent solver, too few points, a
    /// thermodynamic quantity that could not be obtained, and so on.
    #[error("calculation failed: {0}")]
    CalculationFailed(String),

    /// A model fit did not converge. Carries the model name, the starting
    /// guess and the solver message so the caller can adjust.
    #[error("fit of model '{model}' failed (guess {guess:?}): {message}")]
    FitFailed {
        model: String,
        guess: Vec<f64>,
        message: String,
    },

    /// The operation has no implementation for this variant.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Raised only at the parser boundary.
    #[error("parsing error: {0}")]
    Parsing(String),
}

pub type Result<T> = std::result::Result<T, PhysisorbError>;

impl PhysisorbError {
    /// Shorthand used by calculation paths when a property lookup fails.
    pub fn missing(what: impl Into<String>) -> Self {
        PhysisorbError::ParameterMissing(what.into())
    }

    pub fn calculation(what: impl Into<String>) -> Self {
        PhysisorbError::CalculationFailed(what.into())
    }
}
