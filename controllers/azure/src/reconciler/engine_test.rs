//! Unit tests for the generic reconciliation protocol, driven through the
//! VirtualNetwork kind and the mock ARM client.

#[cfg(test)]
mod tests {
    use crate::reconciler::network::virtual_network::VirtualNetworkApi;
    use crate::reconciler::{
        Connecter, External, ExternalReconciler, ManagedResource, ReconcileError, ResourceKind,
    };
    use crate::test_utils::{mark_for_deletion, tags, test_virtual_network};
    use arm_client::{ArmError, MockArmClient};
    use crds::{Condition, ConditionReason, ConditionStatus, ConditionType, ResourceState, VirtualNetwork};
    use std::sync::Arc;

    fn external(client: &MockArmClient) -> External<VirtualNetwork, VirtualNetworkApi> {
        External::new(VirtualNetworkApi::new(Arc::new(client.clone())))
    }

    struct MockConnecter {
        client: MockArmClient,
    }

    #[async_trait::async_trait]
    impl Connecter<VirtualNetwork> for MockConnecter {
        type Api = VirtualNetworkApi;

        async fn connect(&self, _record: &VirtualNetwork) -> Result<Self::Api, ReconcileError> {
            Ok(VirtualNetworkApi::new(Arc::new(self.client.clone())))
        }
    }

    struct FailingConnecter;

    #[async_trait::async_trait]
    impl Connecter<VirtualNetwork> for FailingConnecter {
        type Api = VirtualNetworkApi;

        async fn connect(&self, _record: &VirtualNetwork) -> Result<Self::Api, ReconcileError> {
            Err(ReconcileError::Connect {
                kind: ResourceKind::VirtualNetwork,
                source: ArmError::Authentication("token expired".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn observe_not_found_reports_absence_without_touching_conditions() {
        let client = MockArmClient::new("sub-1");
        let mut record = test_virtual_network("vnet-1", "eastus");

        let observation = external(&client).observe(&mut record).await.unwrap();

        assert!(!observation.resource_exists);
        assert!(observation.external.is_none());
        assert!(record.status.is_none());
    }

    #[tokio::test]
    async fn observe_found_applies_status_and_sets_available() {
        let client = MockArmClient::new("sub-1");
        let mut record = test_virtual_network("vnet-1", "eastus");

        let mut payload = record.to_payload();
        payload.id = Some("/subscriptions/sub-1/resourceGroups/test-rg/providers/Microsoft.Network/virtualNetworks/vnet-1".to_string());
        payload.etag = Some("W/\"etag-1\"".to_string());
        if let Some(properties) = payload.properties.as_mut() {
            properties.provisioning_state = Some("Succeeded".to_string());
            properties.resource_guid = Some("guid-1".to_string());
        }
        client.add_virtual_network("test-rg", "vnet-1", payload);

        // A prior lifecycle condition is overwritten by type.
        record.status_mut().set_condition(Condition::creating());

        let observation = external(&client).observe(&mut record).await.unwrap();

        assert!(observation.resource_exists);
        let status = record.status.as_ref().unwrap();
        assert_eq!(status.provisioning_state.as_deref(), Some("Succeeded"));
        assert_eq!(status.etag.as_deref(), Some("W/\"etag-1\""));
        assert_eq!(status.observed.resource_guid.as_deref(), Some("guid-1"));
        assert_eq!(status.conditions.len(), 1);
        let ready = status.condition(ConditionType::Ready).unwrap();
        assert_eq!(ready.reason, ConditionReason::Available);
        assert_eq!(ready.status, ConditionStatus::True);
    }

    #[tokio::test]
    async fn observe_transport_error_aborts_without_mutation() {
        let client = MockArmClient::new("sub-1");
        client.fail_gets(true);
        let mut record = test_virtual_network("vnet-1", "eastus");

        let err = external(&client).observe(&mut record).await.unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Get {
                kind: ResourceKind::VirtualNetwork,
                ..
            }
        ));
        assert!(err.is_retryable());
        assert!(record.status.is_none());
    }

    #[tokio::test]
    async fn create_sets_creating_even_when_provider_call_fails() {
        let client = MockArmClient::new("sub-1");
        client.fail_mutations(true);
        let mut record = test_virtual_network("vnet-1", "eastus");

        let err = external(&client).create(&mut record).await.unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Create {
                kind: ResourceKind::VirtualNetwork,
                ..
            }
        ));
        let ready = record
            .status
            .as_ref()
            .unwrap()
            .condition(ConditionType::Ready)
            .unwrap();
        assert_eq!(ready.reason, ConditionReason::Creating);
        // The provider's failure detail is surfaced through the condition.
        assert!(ready.message.is_some());
    }

    #[tokio::test]
    async fn create_sends_location_and_tags() {
        let client = MockArmClient::new("sub-1");
        let mut record = test_virtual_network("vnet-1", "eastus");
        record.spec.tags = Some(tags(&[("env", "prod")]));

        let observation = external(&client).observe(&mut record).await.unwrap();
        assert!(!observation.resource_exists);

        external(&client).create(&mut record).await.unwrap();

        let upserts = client.virtual_network_upserts();
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0].location.as_deref(), Some("eastus"));
        assert_eq!(upserts[0].tags, Some(tags(&[("env", "prod")])));
        let ready = record
            .status
            .as_ref()
            .unwrap()
            .condition(ConditionType::Ready)
            .unwrap();
        assert_eq!(ready.reason, ConditionReason::Creating);
    }

    #[tokio::test]
    async fn update_skips_upsert_when_observed_matches_desired() {
        let client = MockArmClient::new("sub-1");
        let mut record = test_virtual_network("vnet-1", "eastus");
        client.add_virtual_network("test-rg", "vnet-1", record.to_payload());

        let update = external(&client).update(&mut record).await.unwrap();

        assert!(!update.issued);
        assert!(client.virtual_network_upserts().is_empty());
    }

    #[tokio::test]
    async fn update_issues_one_full_upsert_on_tag_drift() {
        let client = MockArmClient::new("sub-1");
        let mut record = test_virtual_network("vnet-1", "eastus");
        record.spec.tags = Some(tags(&[("env", "prod")]));

        let mut observed = record.to_payload();
        observed.tags = Some(tags(&[("env", "stale")]));
        client.add_virtual_network("test-rg", "vnet-1", observed);

        let update = external(&client).update(&mut record).await.unwrap();

        assert!(update.issued);
        let upserts = client.virtual_network_upserts();
        assert_eq!(upserts.len(), 1);
        // Full desired payload, not a tags-only patch.
        assert_eq!(upserts[0], record.to_payload());
    }

    #[tokio::test]
    async fn delete_treats_not_found_as_success() {
        let client = MockArmClient::new("sub-1");
        let mut record = test_virtual_network("vnet-1", "eastus");

        external(&client).delete(&mut record).await.unwrap();

        let ready = record
            .status
            .as_ref()
            .unwrap()
            .condition(ConditionType::Ready)
            .unwrap();
        assert_eq!(ready.reason, ConditionReason::Deleting);
    }

    #[tokio::test]
    async fn delete_failure_keeps_deleting_condition() {
        let client = MockArmClient::new("sub-1");
        client.fail_mutations(true);
        let mut record = test_virtual_network("vnet-1", "eastus");

        let err = external(&client).delete(&mut record).await.unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Delete {
                kind: ResourceKind::VirtualNetwork,
                ..
            }
        ));
        let ready = record
            .status
            .as_ref()
            .unwrap()
            .condition(ConditionType::Ready)
            .unwrap();
        assert_eq!(ready.reason, ConditionReason::Deleting);
        assert!(ready.message.is_some());
    }

    #[tokio::test]
    async fn reconcile_creates_absent_resource() {
        let client = MockArmClient::new("sub-1");
        let engine = ExternalReconciler::new(MockConnecter {
            client: client.clone(),
        });
        let mut record = test_virtual_network("vnet-1", "eastus");

        let state = engine.reconcile(&mut record).await.unwrap();

        assert_eq!(state, ResourceState::Creating);
        assert_eq!(record.status.as_ref().unwrap().state, ResourceState::Creating);
        assert_eq!(client.virtual_network_upserts().len(), 1);
    }

    #[tokio::test]
    async fn reconcile_converges_to_exists() {
        let client = MockArmClient::new("sub-1");
        let engine = ExternalReconciler::new(MockConnecter {
            client: client.clone(),
        });
        let mut record = test_virtual_network("vnet-1", "eastus");

        let first = engine.reconcile(&mut record).await.unwrap();
        assert_eq!(first, ResourceState::Creating);

        let second = engine.reconcile(&mut record).await.unwrap();
        assert_eq!(second, ResourceState::Exists);

        let status = record.status.as_ref().unwrap();
        assert_eq!(status.state, ResourceState::Exists);
        assert!(status.id.is_some());
        let ready = status.condition(ConditionType::Ready).unwrap();
        assert_eq!(ready.reason, ConditionReason::Available);
        // No spurious second upsert: the echoed payload matches the spec.
        assert_eq!(client.virtual_network_upserts().len(), 1);
    }

    #[tokio::test]
    async fn reconcile_deletion_short_circuits_create_and_update() {
        let client = MockArmClient::new("sub-1");
        let engine = ExternalReconciler::new(MockConnecter {
            client: client.clone(),
        });
        let mut record = test_virtual_network("vnet-1", "eastus");
        client.add_virtual_network("test-rg", "vnet-1", record.to_payload());
        mark_for_deletion(&mut record.metadata);

        let state = engine.reconcile(&mut record).await.unwrap();

        assert_eq!(state, ResourceState::Deleting);
        assert_eq!(client.deletes().len(), 1);
        assert!(client.virtual_network_upserts().is_empty());
        let ready = record
            .status
            .as_ref()
            .unwrap()
            .condition(ConditionType::Ready)
            .unwrap();
        assert_eq!(ready.reason, ConditionReason::Deleting);
    }

    #[tokio::test]
    async fn connect_failure_aborts_pass_without_mutation() {
        let engine = ExternalReconciler::new(FailingConnecter);
        let mut record = test_virtual_network("vnet-1", "eastus");

        let err = engine.reconcile(&mut record).await.unwrap_err();

        assert!(matches!(err, ReconcileError::Connect { .. }));
        assert!(record.status.is_none());
    }

    #[tokio::test]
    async fn unresolved_resource_group_is_a_fatal_config_error() {
        let client = MockArmClient::new("sub-1");
        let mut record = test_virtual_network("vnet-1", "eastus");
        record.spec.resource_group_name = None;

        let err = external(&client).observe(&mut record).await.unwrap_err();

        assert!(matches!(err, ReconcileError::Config(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn errors_carry_kind_specific_tags() {
        let err = ReconcileError::Create {
            kind: ResourceKind::VirtualNetwork,
            source: ArmError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        };
        assert_eq!(err.to_string(), "cannot create VirtualNetwork");

        let err = ReconcileError::Get {
            kind: ResourceKind::RouteTable,
            source: ArmError::NotFound("gone".to_string()),
        };
        assert_eq!(err.to_string(), "cannot get RouteTable");
    }
}
