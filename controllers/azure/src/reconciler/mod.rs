//! Generic reconciliation protocol for externally managed Azure resources.
//!
//! Every managed kind runs the same pass: Connect, Observe, then exactly
//! one of Create, Update, or Delete. The kind contributes only its record
//! accessors and three pure mapping functions through [`ManagedResource`];
//! the sequencing, condition lifecycle, not-found classification, and
//! error tagging live here once.
//!
//! This module performs no logging and no retries. Raw errors surface
//! through the returned `Result`; the watcher layer attaches logging and
//! requeue backoff.

pub mod network;

#[cfg(test)]
mod engine_test;

use crate::connect::ArmConnecter;
use arm_client::{ArmError, AsyncHandle};
use crds::{Condition, ResourceState, ResourceStatus};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Closed set of resource kinds this controller manages.
///
/// The tag identifies which adapter applies and attributes errors to a
/// kind without inspecting payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// An Azure virtual network
    VirtualNetwork,
    /// An Azure public IP address
    PublicIPAddress,
    /// An Azure route table
    RouteTable,
}

impl ResourceKind {
    /// Kind name as it appears in error tags and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VirtualNetwork => "VirtualNetwork",
            Self::PublicIPAddress => "PublicIPAddress",
            Self::RouteTable => "RouteTable",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from one reconciliation pass.
///
/// Every provider call error is wrapped with a fixed, kind-specific
/// message tag so logs and metrics can attribute failures without parsing
/// provider error strings.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Could not produce a bound provider client; the pass was aborted
    /// before any state mutation
    #[error("cannot connect provider client for {kind}")]
    Connect {
        /// Kind whose pass failed to connect
        kind: ResourceKind,
        /// Underlying client error
        #[source]
        source: ArmError,
    },

    /// Observe failed with a transport or provider error
    #[error("cannot get {kind}")]
    Get {
        /// Kind whose Get failed
        kind: ResourceKind,
        /// Underlying client error
        #[source]
        source: ArmError,
    },

    /// Create failed; the Creating condition remains set for retry
    #[error("cannot create {kind}")]
    Create {
        /// Kind whose Create failed
        kind: ResourceKind,
        /// Underlying client error
        #[source]
        source: ArmError,
    },

    /// Update failed
    #[error("cannot update {kind}")]
    Update {
        /// Kind whose Update failed
        kind: ResourceKind,
        /// Underlying client error
        #[source]
        source: ArmError,
    },

    /// Delete failed; the Deleting condition remains set for retry
    #[error("cannot delete {kind}")]
    Delete {
        /// Kind whose Delete failed
        kind: ResourceKind,
        /// Underlying client error
        #[source]
        source: ArmError,
    },

    /// The record is mis-wired (unresolved resource group reference,
    /// missing name); surfaced immediately and not retried
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ReconcileError {
    /// Configuration errors are wiring mistakes and are not retried;
    /// every other class is retryable by the scheduler.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

/// Uniform record access plus the per-kind pure mapping functions.
///
/// Implemented once per CRD kind; everything else in the protocol is
/// shared. The three mapping functions are total, deterministic, and free
/// of I/O.
pub trait ManagedResource: Clone + Send + Sync + 'static {
    /// Kind-specific read-only status fields.
    type Observed: Clone + Default + Send + Sync;
    /// Wire payload exchanged with the provider for this kind.
    type Payload: Clone + PartialEq + Send + Sync;

    /// Kind tag used for error attribution and registry wiring.
    const KIND: ResourceKind;

    /// Stable external name, used as the provider lookup key.
    fn external_name(&self) -> Result<&str, ReconcileError>;

    /// Resolved parent resource group. Errors when the deferred reference
    /// was never resolved by the upstream resolver.
    fn resource_group(&self) -> Result<&str, ReconcileError>;

    /// Whether the user has requested deletion of the record.
    fn deletion_requested(&self) -> bool;

    /// Status as last persisted, if any.
    fn status(&self) -> Option<&ResourceStatus<Self::Observed>>;

    /// Status for this pass, initialized on first access.
    fn status_mut(&mut self) -> &mut ResourceStatus<Self::Observed>;

    /// Project the desired spec into a full provider payload. Absent
    /// optional spec fields map to absent payload fields.
    fn to_payload(&self) -> Self::Payload;

    /// Copy observed provider-side fields into status. Never touches
    /// conditions; fields absent from a partial payload keep their
    /// previous status values.
    fn apply_observed(status: &mut ResourceStatus<Self::Observed>, payload: &Self::Payload);

    /// Whether the observed payload's mutable fields diverge from the
    /// desired spec. Read-only provider-assigned fields are excluded.
    fn needs_update(&self, observed: &Self::Payload) -> bool;
}

/// The provider capability one pass is bound to. Supplied externally; the
/// protocol only ever calls these three operations.
#[async_trait::async_trait]
pub trait ExternalApi<P>: Send + Sync {
    /// Read the external resource by identity.
    async fn get(&self, resource_group: &str, name: &str) -> Result<P, ArmError>;
    /// Upsert the external resource; idempotent by identity.
    async fn create_or_update(&self, resource_group: &str, name: &str, payload: &P) -> Result<AsyncHandle, ArmError>;
    /// Delete the external resource by identity.
    async fn delete(&self, resource_group: &str, name: &str) -> Result<AsyncHandle, ArmError>;
}

/// Resolves credentials and produces a bound [`ExternalApi`] for one pass.
#[async_trait::async_trait]
pub trait Connecter<K: ManagedResource>: Send + Sync {
    /// Client type produced for this kind.
    type Api: ExternalApi<K::Payload>;

    /// Produce a client bound to the record's provider account. Failure
    /// aborts the pass without mutating any state.
    async fn connect(&self, record: &K) -> Result<Self::Api, ReconcileError>;
}

/// Result of observing the external resource.
#[derive(Debug)]
pub struct Observation<P> {
    /// Whether the external resource exists
    pub resource_exists: bool,
    /// Payload observed on this pass. A derived, non-authoritative view
    /// used to decide whether an update is needed; never persisted.
    pub external: Option<P>,
}

/// Result of a create call.
#[derive(Debug)]
pub struct Creation {
    /// Handle to the provider's asynchronous provisioning operation
    pub handle: AsyncHandle,
}

/// Result of an update call.
#[derive(Debug)]
pub struct Update {
    /// Whether an upsert was actually issued; false when the fresh
    /// observation showed no drift
    pub issued: bool,
    /// Handle to the provider operation, when one was issued
    pub handle: Option<AsyncHandle>,
}

/// A client bound for one pass, exposing the four operations the
/// scheduler layer drives.
pub struct External<K, C> {
    client: C,
    _record: PhantomData<fn() -> K>,
}

impl<K, C> fmt::Debug for External<K, C>
where
    K: ManagedResource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("External").field("kind", &K::KIND).finish()
    }
}

impl<K, C> External<K, C>
where
    K: ManagedResource,
    C: ExternalApi<K::Payload>,
{
    /// Bind the four operations to a connected client.
    pub fn new(client: C) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    /// Observe the external resource.
    ///
    /// Not-found is not an error: it reports absence, leaves conditions
    /// untouched, and upstream proceeds to Create. A found resource has
    /// its observed fields applied to status and the Available condition
    /// set, overwriting any prior lifecycle condition.
    pub async fn observe(&self, record: &mut K) -> Result<Observation<K::Payload>, ReconcileError> {
        let resource_group = record.resource_group()?.to_string();
        let name = record.external_name()?.to_string();

        match self.client.get(&resource_group, &name).await {
            Err(err) if err.is_not_found() => Ok(Observation {
                resource_exists: false,
                external: None,
            }),
            Err(source) => Err(ReconcileError::Get {
                kind: K::KIND,
                source,
            }),
            Ok(payload) => {
                let status = record.status_mut();
                K::apply_observed(status, &payload);
                status.set_condition(Condition::available());
                Ok(Observation {
                    resource_exists: true,
                    external: Some(payload),
                })
            }
        }
    }

    /// Create the external resource.
    ///
    /// The Creating condition is set before the call is issued, so a crash
    /// mid-call leaves a durably observable marker. The provider upsert is
    /// idempotent by identity: a retried create against the same name
    /// overwrites rather than duplicates. Success is not confirmed here;
    /// the next pass's Observe does that.
    pub async fn create(&self, record: &mut K) -> Result<Creation, ReconcileError> {
        let resource_group = record.resource_group()?.to_string();
        let name = record.external_name()?.to_string();

        record.status_mut().set_condition(Condition::creating());

        let payload = record.to_payload();
        match self
            .client
            .create_or_update(&resource_group, &name, &payload)
            .await
        {
            Ok(handle) => Ok(Creation { handle }),
            Err(source) => {
                // The condition stays Creating for retry; the provider's
                // failure detail is the user-visible signal.
                record
                    .status_mut()
                    .set_condition(Condition::creating().with_message(source.to_string()));
                Err(ReconcileError::Create {
                    kind: K::KIND,
                    source,
                })
            }
        }
    }

    /// Update the external resource when its mutable fields drifted.
    ///
    /// Re-fetches the current payload immediately before deciding: the
    /// payload observed earlier in the pass may be stale under
    /// at-least-once redelivery of overlapping passes. When drift is
    /// confirmed, the full desired payload is sent — the provider PUT is a
    /// total replacement, not a patch. Conditions are not changed.
    pub async fn update(&self, record: &mut K) -> Result<Update, ReconcileError> {
        let resource_group = record.resource_group()?.to_string();
        let name = record.external_name()?.to_string();

        let current = self
            .client
            .get(&resource_group, &name)
            .await
            .map_err(|source| ReconcileError::Get {
                kind: K::KIND,
                source,
            })?;
        if !record.needs_update(&current) {
            return Ok(Update {
                issued: false,
                handle: None,
            });
        }

        let payload = record.to_payload();
        let handle = self
            .client
            .create_or_update(&resource_group, &name, &payload)
            .await
            .map_err(|source| ReconcileError::Update {
                kind: K::KIND,
                source,
            })?;
        Ok(Update {
            issued: true,
            handle: Some(handle),
        })
    }

    /// Delete the external resource.
    ///
    /// The Deleting condition is set before the call. A not-found response
    /// is success: deleting an already-gone resource is not an error.
    pub async fn delete(&self, record: &mut K) -> Result<(), ReconcileError> {
        let resource_group = record.resource_group()?.to_string();
        let name = record.external_name()?.to_string();

        record.status_mut().set_condition(Condition::deleting());

        match self.client.delete(&resource_group, &name).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => Ok(()),
            Err(source) => {
                record
                    .status_mut()
                    .set_condition(Condition::deleting().with_message(source.to_string()));
                Err(ReconcileError::Delete {
                    kind: K::KIND,
                    source,
                })
            }
        }
    }
}

/// Drives one reconciliation pass for a kind.
///
/// Ordering rules: Observe always precedes any mutating call; Create and
/// Update are mutually exclusive within one pass; a requested deletion
/// short-circuits both regardless of observed existence.
pub struct ExternalReconciler<K, F> {
    connecter: F,
    _record: PhantomData<fn() -> K>,
}

impl<K, F> fmt::Debug for ExternalReconciler<K, F>
where
    K: ManagedResource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalReconciler")
            .field("kind", &K::KIND)
            .finish()
    }
}

impl<K, F> ExternalReconciler<K, F>
where
    K: ManagedResource,
    F: Connecter<K>,
{
    /// Create a pass driver over a connect factory.
    pub fn new(connecter: F) -> Self {
        Self {
            connecter,
            _record: PhantomData,
        }
    }

    /// Run one pass and report the reconcile state it ended in. The state
    /// is also recorded into `status.state` for operator visibility.
    pub async fn reconcile(&self, record: &mut K) -> Result<ResourceState, ReconcileError> {
        let external = External::new(self.connecter.connect(record).await?);

        if record.deletion_requested() {
            external.delete(record).await?;
            record.status_mut().state = ResourceState::Deleting;
            return Ok(ResourceState::Deleting);
        }

        let observation = external.observe(record).await?;
        let state = if observation.resource_exists {
            let drifted = observation
                .external
                .as_ref()
                .is_some_and(|observed| record.needs_update(observed));
            if drifted {
                let update = external.update(record).await?;
                if update.issued {
                    ResourceState::Updating
                } else {
                    ResourceState::Exists
                }
            } else {
                ResourceState::Exists
            }
        } else {
            external.create(record).await?;
            ResourceState::Creating
        };

        record.status_mut().state = state;
        Ok(state)
    }
}

/// Explicit per-kind handler registry.
///
/// Constructed once at process start from a connect factory and passed by
/// reference to the watchers; there is no global registration and no
/// runtime type inspection in shared logic.
pub struct Registry {
    /// VirtualNetwork pass driver
    pub virtual_network: Arc<ExternalReconciler<crds::VirtualNetwork, ArmConnecter>>,
    /// PublicIPAddress pass driver
    pub public_ip_address: Arc<ExternalReconciler<crds::PublicIPAddress, ArmConnecter>>,
    /// RouteTable pass driver
    pub route_table: Arc<ExternalReconciler<crds::RouteTable, ArmConnecter>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").finish_non_exhaustive()
    }
}

impl Registry {
    /// Register one pass driver per managed kind.
    #[must_use]
    pub fn new(connecter: ArmConnecter) -> Self {
        Self {
            virtual_network: Arc::new(ExternalReconciler::new(connecter.clone())),
            public_ip_address: Arc::new(ExternalReconciler::new(connecter.clone())),
            route_table: Arc::new(ExternalReconciler::new(connecter)),
        }
    }
}
