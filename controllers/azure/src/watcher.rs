//! Kubernetes resource watchers.
//!
//! This module handles watching the managed CRDs for changes and driving
//! reconciliation passes through `kube_runtime::Controller`. It is the
//! scheduler layer of the system: it attaches logging, requeue backoff,
//! finalizer bookkeeping, and status persistence around the pass — the
//! reconciliation engine itself does none of those.

use crate::backoff::FibonacciBackoff;
use crate::error::ControllerError;
use crate::reconciler::{Connecter, ExternalReconciler, ManagedResource, Registry};
use futures::StreamExt;
use kube::api::{Patch, PatchParams};
use kube::{Api, ResourceExt};
use kube_runtime::finalizer::{finalizer, Event as FinalizerEvent};
use kube_runtime::{
    controller::{Action, Config as ControllerConfig},
    watcher, Controller,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info};

/// Finalizer gating user deletion until the external resource is gone.
pub const CLEANUP_FINALIZER: &str = "azure.cloudops.io/cleanup";

/// How long to wait before re-observing an in-sync resource for drift.
const SYNC_PERIOD: Duration = Duration::from_secs(300);

struct Context<K, F>
where
    K: ManagedResource,
    F: Connecter<K>,
{
    api: Api<K>,
    engine: Arc<ExternalReconciler<K, F>>,
    /// Requeue backoff per resource (namespace/name)
    backoffs: Mutex<HashMap<String, FibonacciBackoff>>,
}

fn resource_key<K>(obj: &K) -> String
where
    K: kube::Resource<DynamicType = ()>,
{
    format!(
        "{}/{}",
        obj.namespace().unwrap_or_else(|| "default".to_string()),
        obj.name_any()
    )
}

/// Run one reconciliation pass and persist the resulting status.
///
/// Status is patched even when the pass failed: a condition set before a
/// failed mutating call (Creating, Deleting) must stay durably observable.
async fn run_pass<K, F>(ctx: &Context<K, F>, obj: &K) -> Result<crds::ResourceState, ControllerError>
where
    K: ManagedResource + kube::Resource<DynamicType = ()> + DeserializeOwned + std::fmt::Debug,
    K::Observed: Serialize,
    F: Connecter<K>,
{
    let name = obj
        .external_name()
        .map_err(ControllerError::Reconcile)?
        .to_string();

    let mut record = obj.clone();
    let outcome = ctx.engine.reconcile(&mut record).await;

    patch_status_if_changed(&ctx.api, &name, obj, &record).await?;

    outcome.map_err(ControllerError::Reconcile)
}

/// Patch the record's status when the pass changed it. Skipping no-op
/// patches keeps status-only watch events from re-triggering passes.
async fn patch_status_if_changed<K>(
    api: &Api<K>,
    name: &str,
    before: &K,
    after: &K,
) -> Result<(), ControllerError>
where
    K: ManagedResource + kube::Resource<DynamicType = ()> + DeserializeOwned + std::fmt::Debug,
    K::Observed: Serialize,
{
    let current = serde_json::to_value(before.status())?;
    let desired = serde_json::to_value(after.status())?;
    if current == desired {
        debug!("{} {} status unchanged, skipping patch", K::KIND, name);
        return Ok(());
    }

    let patch = serde_json::json!({ "status": desired });
    api.patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

async fn reconcile_managed<K, F>(
    obj: Arc<K>,
    ctx: Arc<Context<K, F>>,
) -> Result<Action, ControllerError>
where
    K: ManagedResource
        + kube::Resource<DynamicType = ()>
        + Serialize
        + DeserializeOwned
        + std::fmt::Debug,
    K::Observed: Serialize,
    F: Connecter<K> + 'static,
{
    let key = resource_key(obj.as_ref());
    debug!("Reconciling {} {}", K::KIND, key);

    let result = finalizer(&ctx.api, CLEANUP_FINALIZER, obj, |event| {
        let ctx = Arc::clone(&ctx);
        async move {
            match event {
                FinalizerEvent::Apply(obj) => {
                    let state = run_pass(ctx.as_ref(), obj.as_ref()).await?;
                    debug!("{} {} pass finished in state {:?}", K::KIND, resource_key(obj.as_ref()), state);
                    Ok(Action::requeue(SYNC_PERIOD))
                }
                FinalizerEvent::Cleanup(obj) => {
                    info!("Deleting external resource for {} {}", K::KIND, resource_key(obj.as_ref()));
                    run_pass(ctx.as_ref(), obj.as_ref()).await?;
                    Ok(Action::await_change())
                }
            }
        }
    })
    .await
    .map_err(ControllerError::from)?;

    if let Ok(mut backoffs) = ctx.backoffs.lock() {
        backoffs.remove(&key);
    }
    Ok(result)
}

fn error_policy<K, F>(obj: Arc<K>, error: &ControllerError, ctx: Arc<Context<K, F>>) -> Action
where
    K: ManagedResource + kube::Resource<DynamicType = ()>,
    F: Connecter<K>,
{
    let key = resource_key(obj.as_ref());
    error!("Reconciliation error for {} {}: {}", K::KIND, key, error);

    if !error.is_retryable() {
        // A wiring error will not fix itself; wait for a spec change.
        return Action::await_change();
    }

    let seconds = match ctx.backoffs.lock() {
        Ok(mut backoffs) => backoffs
            .entry(key)
            .or_insert_with(|| FibonacciBackoff::new(1, 10))
            .next_backoff_seconds(),
        Err(_) => 60,
    };
    Action::requeue(Duration::from_secs(seconds))
}

/// Watch one managed kind and reconcile its objects until the stream ends.
async fn watch_resource<K, F>(
    api: Api<K>,
    engine: Arc<ExternalReconciler<K, F>>,
) -> Result<(), ControllerError>
where
    K: ManagedResource
        + kube::Resource<DynamicType = ()>
        + Serialize
        + DeserializeOwned
        + std::fmt::Debug,
    K::Observed: Serialize,
    F: Connecter<K> + 'static,
{
    info!("Starting {} watcher", K::KIND);

    let context = Arc::new(Context {
        api: api.clone(),
        engine,
        backoffs: Mutex::new(HashMap::new()),
    });

    // Debounce batches bursts of watch events; concurrency bounds the
    // number of in-flight passes per kind.
    let controller_config = ControllerConfig::default()
        .debounce(Duration::from_secs(5))
        .concurrency(3);

    Controller::new(api, watcher::Config::default())
        .with_config(controller_config)
        .run(reconcile_managed, error_policy, context)
        .for_each(|res| async move {
            if let Err(e) = res {
                error!("Controller error for {}: {}", K::KIND, e);
            }
        })
        .await;

    Ok(())
}

/// Watches the managed CRDs for changes.
pub struct Watcher {
    registry: Arc<Registry>,
    virtual_network_api: Api<crds::VirtualNetwork>,
    public_ip_address_api: Api<crds::PublicIPAddress>,
    route_table_api: Api<crds::RouteTable>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(
        registry: Arc<Registry>,
        virtual_network_api: Api<crds::VirtualNetwork>,
        public_ip_address_api: Api<crds::PublicIPAddress>,
        route_table_api: Api<crds::RouteTable>,
    ) -> Self {
        Self {
            registry,
            virtual_network_api,
            public_ip_address_api,
            route_table_api,
        }
    }

    /// Starts watching VirtualNetwork resources.
    pub async fn watch_virtual_networks(&self) -> Result<(), ControllerError> {
        watch_resource(
            self.virtual_network_api.clone(),
            Arc::clone(&self.registry.virtual_network),
        )
        .await
    }

    /// Starts watching PublicIPAddress resources.
    pub async fn watch_public_ip_addresses(&self) -> Result<(), ControllerError> {
        watch_resource(
            self.public_ip_address_api.clone(),
            Arc::clone(&self.registry.public_ip_address),
        )
        .await
    }

    /// Starts watching RouteTable resources.
    pub async fn watch_route_tables(&self) -> Result<(), ControllerError> {
        watch_resource(
            self.route_table_api.clone(),
            Arc::clone(&self.registry.route_table),
        )
        .await
    }
}
