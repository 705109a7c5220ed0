//! ARM API client
//!
//! Implements the ARM REST client for network resources. Resources are
//! addressed as
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/{type}/{name}`
//! with a pinned api-version.

use crate::arm_trait::ArmClientTrait;
use crate::error::ArmError;
use crate::models::*;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Pinned ARM api-version for Microsoft.Network resources
const NETWORK_API_VERSION: &str = "2020-03-01";

/// Response header carrying the URL of a long-running operation
const ASYNC_OPERATION_HEADER: &str = "Azure-AsyncOperation";

/// ARM API client bound to one subscription
pub struct ArmClient {
    client: Client,
    endpoint: String,
    subscription_id: String,
    token: String,
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("ArmClient")
            .field("endpoint", &self.endpoint)
            .field("subscription_id", &self.subscription_id)
            .finish_non_exhaustive()
    }
}

impl ArmClient {
    /// Create a new ARM client
    ///
    /// # Arguments
    /// * `endpoint` - Management endpoint (e.g. "https://management.azure.com")
    /// * `subscription_id` - Subscription the client is bound to
    /// * `token` - Bearer token for authentication
    pub fn new(endpoint: String, subscription_id: String, token: String) -> Result<Self, ArmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ArmError::Http)?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subscription_id,
            token,
        })
    }

    /// Path of one resource under this client's subscription
    fn resource_path(&self, resource_group: &str, resource_type: &str, name: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/{}/{}",
            self.endpoint, self.subscription_id, resource_group, resource_type, name
        )
    }

    async fn send(&self, method: Method, url: &str, body: Option<String>) -> Result<Response, ArmError> {
        debug!("{} {}", method, url);
        let mut request = self
            .client
            .request(method, url)
            .query(&[("api-version", NETWORK_API_VERSION)])
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }
        request.send().await.map_err(ArmError::Http)
    }

    /// Map a non-success response to the error taxonomy. 404 is the
    /// documented not-found classification; 401/403 are authentication
    /// failures; everything else is a generic API error.
    async fn classify_failure(url: &str, response: Response) -> ArmError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => ArmError::NotFound(url.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ArmError::Authentication(format!("{status} - {body}"))
            }
            _ => ArmError::Api {
                status: status.as_u16(),
                message: body,
            },
        }
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        resource_group: &str,
        resource_type: &str,
        name: &str,
    ) -> Result<T, ArmError> {
        let url = self.resource_path(resource_group, resource_type, name);
        let response = self.send(Method::GET, &url, None).await?;
        if !response.status().is_success() {
            return Err(Self::classify_failure(&url, response).await);
        }
        let body = response.text().await.map_err(ArmError::Http)?;
        serde_json::from_str(&body).map_err(ArmError::Serialization)
    }

    async fn put_resource<T: Serialize>(
        &self,
        resource_group: &str,
        resource_type: &str,
        name: &str,
        payload: &T,
    ) -> Result<AsyncHandle, ArmError> {
        let url = self.resource_path(resource_group, resource_type, name);
        let body = serde_json::to_string(payload).map_err(ArmError::Serialization)?;
        let response = self.send(Method::PUT, &url, Some(body)).await?;
        if !response.status().is_success() {
            return Err(Self::classify_failure(&url, response).await);
        }
        Ok(Self::async_handle(&response))
    }

    async fn delete_resource(
        &self,
        resource_group: &str,
        resource_type: &str,
        name: &str,
    ) -> Result<AsyncHandle, ArmError> {
        let url = self.resource_path(resource_group, resource_type, name);
        let response = self.send(Method::DELETE, &url, None).await?;
        if !response.status().is_success() {
            return Err(Self::classify_failure(&url, response).await);
        }
        Ok(Self::async_handle(&response))
    }

    fn async_handle(response: &Response) -> AsyncHandle {
        AsyncHandle {
            operation_url: response
                .headers()
                .get(ASYNC_OPERATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

#[async_trait::async_trait]
impl ArmClientTrait for ArmClient {
    fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Validate the bearer token by reading the bound subscription.
    async fn validate_credentials(&self) -> Result<(), ArmError> {
        let url = format!("{}/subscriptions/{}", self.endpoint, self.subscription_id);
        debug!("Validating ARM credentials");

        let response = self
            .client
            .get(&url)
            .query(&[("api-version", "2020-01-01")])
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ArmError::Http)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ArmError::Authentication(format!("{status} - {body}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ArmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!("ARM credentials validated");
        Ok(())
    }

    async fn get_virtual_network(&self, resource_group: &str, name: &str) -> Result<VirtualNetwork, ArmError> {
        self.get_resource(resource_group, "virtualNetworks", name).await
    }

    async fn create_or_update_virtual_network(&self, resource_group: &str, name: &str, network: &VirtualNetwork) -> Result<AsyncHandle, ArmError> {
        self.put_resource(resource_group, "virtualNetworks", name, network).await
    }

    async fn delete_virtual_network(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        self.delete_resource(resource_group, "virtualNetworks", name).await
    }

    async fn get_public_ip_address(&self, resource_group: &str, name: &str) -> Result<PublicIpAddress, ArmError> {
        self.get_resource(resource_group, "publicIPAddresses", name).await
    }

    async fn create_or_update_public_ip_address(&self, resource_group: &str, name: &str, address: &PublicIpAddress) -> Result<AsyncHandle, ArmError> {
        self.put_resource(resource_group, "publicIPAddresses", name, address).await
    }

    async fn delete_public_ip_address(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        self.delete_resource(resource_group, "publicIPAddresses", name).await
    }

    async fn get_route_table(&self, resource_group: &str, name: &str) -> Result<RouteTable, ArmError> {
        self.get_resource(resource_group, "routeTables", name).await
    }

    async fn create_or_update_route_table(&self, resource_group: &str, name: &str, table: &RouteTable) -> Result<AsyncHandle, ArmError> {
        self.put_resource(resource_group, "routeTables", name, table).await
    }

    async fn delete_route_table(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError> {
        self.delete_resource(resource_group, "routeTables", name).await
    }
}
