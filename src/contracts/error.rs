//! Error types for the contract rewrite engine

use thiserror::Error;

use crate::error::MarkupError;

use super::pipeline::Artifact;

/// A single contract failed
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("markup error: {0}")]
    Markup(#[from] MarkupError),

    /// The input violates an assumption the contract relies on
    #[error("invariant violated: {reason}")]
    Invariant { reason: String },
}

impl ContractError {
    pub fn invariant(reason: impl Into<String>) -> Self {
        ContractError::Invariant {
            reason: reason.into(),
        }
    }
}

/// Errors raised while building or running a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A contract failed; the whole rewrite is aborted
    #[error("contract {contract} failed: {source}")]
    ContractFailure {
        contract: &'static str,
        #[source]
        source: ContractError,
    },

    /// A consumer of an artifact is scheduled before its producer
    #[error("contract {consumer} reads {artifact:?} before {producer} writes it")]
    OrderViolation {
        consumer: &'static str,
        producer: &'static str,
        artifact: Artifact,
    },

    #[error("unknown contract: {0}")]
    UnknownContract(String),
}
