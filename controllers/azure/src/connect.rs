//! Connect factory
//!
//! Resolves provider credentials and produces a bound ARM client for each
//! reconciliation pass. Credential acquisition itself (service principal
//! flows, token refresh) is the deployment's concern; the controller only
//! consumes a ready bearer token.

use crate::error::ControllerError;
use arm_client::{ArmClient, ArmClientTrait, ArmError};
use std::env;
use std::sync::Arc;

/// Default ARM management endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Credentials for one provider account.
#[derive(Clone)]
pub struct ArmCredentials {
    /// Management endpoint base URL
    pub endpoint: String,
    /// Subscription holding the managed resources
    pub subscription_id: String,
    /// Bearer token for the management endpoint
    pub token: String,
}

impl std::fmt::Debug for ArmCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("ArmCredentials")
            .field("endpoint", &self.endpoint)
            .field("subscription_id", &self.subscription_id)
            .finish_non_exhaustive()
    }
}

impl ArmCredentials {
    /// Load credentials from the environment.
    ///
    /// `AZURE_SUBSCRIPTION_ID` and `AZURE_TOKEN` are required;
    /// `ARM_ENDPOINT` falls back to the public cloud endpoint.
    pub fn from_env() -> Result<Self, ControllerError> {
        let endpoint = env::var("ARM_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let subscription_id = env::var("AZURE_SUBSCRIPTION_ID").map_err(|_| {
            ControllerError::InvalidConfig(
                "AZURE_SUBSCRIPTION_ID environment variable is required".to_string(),
            )
        })?;
        let token = env::var("AZURE_TOKEN").map_err(|_| {
            ControllerError::InvalidConfig(
                "AZURE_TOKEN environment variable is required".to_string(),
            )
        })?;

        Ok(Self {
            endpoint,
            subscription_id,
            token,
        })
    }
}

/// Produces a bound ARM client per reconciliation pass.
#[derive(Debug, Clone)]
pub struct ArmConnecter {
    credentials: ArmCredentials,
}

impl ArmConnecter {
    /// Create a connect factory over a credentials snapshot.
    #[must_use]
    pub fn new(credentials: ArmCredentials) -> Self {
        Self { credentials }
    }

    /// Build a client bound to the credentials' subscription.
    pub(crate) fn client(&self) -> Result<Arc<dyn ArmClientTrait>, ArmError> {
        let client = ArmClient::new(
            self.credentials.endpoint.clone(),
            self.credentials.subscription_id.clone(),
            self.credentials.token.clone(),
        )?;
        Ok(Arc::new(client))
    }
}
