//! Error types for model construction and checking.

use thiserror::Error;

use crate::formula::TemporalOp;

/// Boxed error returned by custom operator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by [`Model`][crate::model::Model] and [`Checker`][crate::checker::Checker].
///
/// Every error is terminal for the call that produced it: no partial
/// satisfaction set is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum Error {
    /// A state name that does not exist in the model.
    #[error("unknown state '{0}'")]
    UnknownState(String),

    /// An operator name that is not one of the eight temporal operators.
    #[error("invalid operator '{0}': expected one of AX, EX, AF, EF, AG, EG, AU, EU")]
    InvalidOperator(String),

    /// A transition pointing at a state that does not exist.
    #[error("malformed model: transition {from} -> {to} targets an unknown state")]
    MalformedModel { from: String, to: String },

    /// Two states share the same name.
    #[error("duplicate state '{0}'")]
    DuplicateState(String),

    /// A state without an entry in the transition relation.
    #[error("state '{0}' has no transition entry")]
    MissingTransitions(String),

    /// A fixpoint loop did not stabilise within its round cap.
    #[error("fixpoint for {op} did not converge within {rounds} rounds")]
    NonConvergence { op: TemporalOp, rounds: usize },

    /// A custom operator implementation failed.
    #[error("custom {op} operator failed: {source}")]
    CustomOperator {
        op: TemporalOp,
        #[source]
        source: BoxError,
    },
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
