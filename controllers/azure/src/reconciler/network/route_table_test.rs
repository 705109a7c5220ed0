//! Unit tests for the RouteTable adapter

#[cfg(test)]
mod tests {
    use crate::reconciler::ManagedResource;
    use crate::test_utils::{tags, test_route_table};
    use crds::{RouteNextHopType, RouteSpec, RouteTable, RouteTableStatus};

    fn routes() -> Vec<RouteSpec> {
        vec![
            RouteSpec {
                name: "to-appliance".to_string(),
                address_prefix: "0.0.0.0/0".to_string(),
                next_hop_type: RouteNextHopType::VirtualAppliance,
                next_hop_ip_address: Some("10.0.0.4".to_string()),
            },
            RouteSpec {
                name: "local".to_string(),
                address_prefix: "10.0.0.0/16".to_string(),
                next_hop_type: RouteNextHopType::VnetLocal,
                next_hop_ip_address: None,
            },
        ]
    }

    #[test]
    fn to_payload_maps_routes_element_wise_in_order() {
        let record = test_route_table("rt-1", "eastus", routes());

        let payload = record.to_payload();

        let mapped = payload.properties.unwrap().routes.unwrap();
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].name.as_deref(), Some("to-appliance"));
        let first = mapped[0].properties.as_ref().unwrap();
        assert_eq!(first.address_prefix.as_deref(), Some("0.0.0.0/0"));
        assert_eq!(first.next_hop_type.as_deref(), Some("VirtualAppliance"));
        assert_eq!(first.next_hop_ip_address.as_deref(), Some("10.0.0.4"));
        assert_eq!(mapped[1].name.as_deref(), Some("local"));
        let second = mapped[1].properties.as_ref().unwrap();
        assert_eq!(second.next_hop_type.as_deref(), Some("VnetLocal"));
        assert!(second.next_hop_ip_address.is_none());
    }

    #[test]
    fn to_payload_maps_empty_routes_to_absent() {
        let record = test_route_table("rt-1", "eastus", Vec::new());

        let payload = record.to_payload();

        assert!(payload.properties.unwrap().routes.is_none());
    }

    #[test]
    fn needs_update_is_false_against_own_payload() {
        let mut record = test_route_table("rt-1", "eastus", routes());
        record.spec.disable_bgp_route_propagation = Some(true);
        record.spec.tags = Some(tags(&[("env", "prod")]));

        assert!(!record.needs_update(&record.to_payload()));
    }

    #[test]
    fn needs_update_ignores_provider_assigned_route_fields() {
        let record = test_route_table("rt-1", "eastus", routes());

        let mut observed = record.to_payload();
        observed.etag = Some("W/\"etag-3\"".to_string());
        if let Some(properties) = observed.properties.as_mut() {
            properties.provisioning_state = Some("Succeeded".to_string());
            properties.subnets = Some(vec![arm_client::SubResource {
                id: Some("/subscriptions/sub-1/subnets/subnet-1".to_string()),
            }]);
            for route in properties.routes.as_mut().into_iter().flatten() {
                route.id = Some("/subscriptions/sub-1/routes/r".to_string());
                route.etag = Some("W/\"etag-4\"".to_string());
                if let Some(route_properties) = route.properties.as_mut() {
                    route_properties.provisioning_state = Some("Succeeded".to_string());
                }
            }
        }

        assert!(!record.needs_update(&observed));
    }

    #[test]
    fn needs_update_is_order_sensitive_for_routes() {
        let record = test_route_table("rt-1", "eastus", routes());

        let mut observed = record.to_payload();
        if let Some(observed_routes) = observed.properties.as_mut().and_then(|p| p.routes.as_mut())
        {
            observed_routes.reverse();
        }

        assert!(record.needs_update(&observed));
    }

    #[test]
    fn needs_update_detects_route_drift() {
        let record = test_route_table("rt-1", "eastus", routes());

        let mut observed = record.to_payload();
        if let Some(first) = observed
            .properties
            .as_mut()
            .and_then(|p| p.routes.as_mut())
            .and_then(|r| r.first_mut())
        {
            if let Some(route_properties) = first.properties.as_mut() {
                route_properties.next_hop_ip_address = Some("10.0.0.9".to_string());
            }
        }

        assert!(record.needs_update(&observed));
    }

    #[test]
    fn apply_observed_collects_associated_subnet_ids() {
        let record = test_route_table("rt-1", "eastus", routes());
        let mut payload = record.to_payload();
        payload.id = Some("/subscriptions/sub-1/routeTables/rt-1".to_string());
        if let Some(properties) = payload.properties.as_mut() {
            properties.provisioning_state = Some("Succeeded".to_string());
            properties.subnets = Some(vec![
                arm_client::SubResource {
                    id: Some("/subscriptions/sub-1/subnets/subnet-1".to_string()),
                },
                arm_client::SubResource { id: None },
            ]);
        }

        let mut status = RouteTableStatus::default();
        RouteTable::apply_observed(&mut status, &payload);

        assert_eq!(
            status.observed.subnets,
            Some(vec!["/subscriptions/sub-1/subnets/subnet-1".to_string()])
        );
        assert_eq!(status.provisioning_state.as_deref(), Some("Succeeded"));
    }

    #[test]
    fn apply_observed_tolerates_partial_payload() {
        let record = test_route_table("rt-1", "eastus", routes());
        let mut payload = record.to_payload();
        if let Some(properties) = payload.properties.as_mut() {
            properties.provisioning_state = Some("Succeeded".to_string());
            properties.subnets = Some(vec![arm_client::SubResource {
                id: Some("/subscriptions/sub-1/subnets/subnet-1".to_string()),
            }]);
        }

        let mut status = RouteTableStatus::default();
        RouteTable::apply_observed(&mut status, &payload);

        let partial = arm_client::RouteTable::default();
        RouteTable::apply_observed(&mut status, &partial);

        assert_eq!(status.provisioning_state.as_deref(), Some("Succeeded"));
        assert!(status.observed.subnets.is_some());
    }
}
