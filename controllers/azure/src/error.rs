//! Controller-specific error types.
//!
//! This module defines error types specific to the Azure sync controller
//! that are not covered by upstream library errors.

use crate::reconciler::ReconcileError;
use arm_client::ArmError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Azure sync controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// ARM API error outside a reconciliation pass (startup validation)
    #[error("ARM error: {0}")]
    Arm(#[from] ArmError),

    /// A reconciliation pass failed; carries the kind-tagged message
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Status patch serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Finalizer bookkeeping failed
    #[error("Finalizer error: {0}")]
    Finalizer(#[source] Box<kube_runtime::finalizer::Error<ControllerError>>),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

impl From<kube_runtime::finalizer::Error<ControllerError>> for ControllerError {
    fn from(err: kube_runtime::finalizer::Error<ControllerError>) -> Self {
        Self::Finalizer(Box::new(err))
    }
}

impl ControllerError {
    /// Whether the scheduler should requeue the pass. Configuration errors
    /// are wiring mistakes and wait for a spec change instead of a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        use kube_runtime::finalizer::Error as FinalizerError;
        match self {
            Self::InvalidConfig(_) => false,
            Self::Reconcile(err) => err.is_retryable(),
            Self::Finalizer(err) => match err.as_ref() {
                FinalizerError::ApplyFailed(inner) | FinalizerError::CleanupFailed(inner) => {
                    inner.is_retryable()
                }
                _ => true,
            },
            _ => true,
        }
    }
}
