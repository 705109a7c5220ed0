//! Unit tests for the PublicIPAddress adapter

#[cfg(test)]
mod tests {
    use crate::reconciler::ManagedResource;
    use crate::test_utils::{tags, test_public_ip_address};
    use crds::{
        IPVersion, PublicIPAddress, PublicIPAddressDnsSettings, PublicIPAddressSkuName,
        PublicIPAddressStatus,
    };

    #[test]
    fn unset_sku_defaults_to_basic_at_the_single_mapping_point() {
        let record = test_public_ip_address("ip-1", "eastus");
        assert!(record.spec.sku.is_none());

        let payload = record.to_payload();

        assert_eq!(payload.sku.unwrap().name.as_deref(), Some("Basic"));
    }

    #[test]
    fn explicit_sku_is_respected() {
        let mut record = test_public_ip_address("ip-1", "eastus");
        record.spec.sku = Some(PublicIPAddressSkuName::Standard);

        let payload = record.to_payload();

        assert_eq!(payload.sku.unwrap().name.as_deref(), Some("Standard"));
    }

    #[test]
    fn to_payload_leaves_absent_optionals_absent() {
        let record = test_public_ip_address("ip-1", "eastus");

        let payload = record.to_payload();

        let properties = payload.properties.unwrap();
        assert_eq!(
            properties.public_ip_allocation_method.as_deref(),
            Some("Static")
        );
        assert!(properties.public_ip_address_version.is_none());
        assert!(properties.idle_timeout_in_minutes.is_none());
        assert!(properties.dns_settings.is_none());
        assert!(payload.tags.is_none());
    }

    #[test]
    fn version_maps_when_set() {
        let mut record = test_public_ip_address("ip-1", "eastus");
        record.spec.version = Some(IPVersion::IPv6);

        let payload = record.to_payload();

        assert_eq!(
            payload
                .properties
                .unwrap()
                .public_ip_address_version
                .as_deref(),
            Some("IPv6")
        );
    }

    #[test]
    fn needs_update_is_false_against_own_payload() {
        let mut record = test_public_ip_address("ip-1", "eastus");
        record.spec.idle_timeout_in_minutes = Some(10);
        record.spec.tags = Some(tags(&[("env", "prod")]));
        record.spec.dns_settings = Some(PublicIPAddressDnsSettings {
            domain_name_label: "app".to_string(),
            reverse_fqdn: None,
        });

        assert!(!record.needs_update(&record.to_payload()));
    }

    #[test]
    fn needs_update_ignores_provider_assigned_fqdn_and_address() {
        let mut record = test_public_ip_address("ip-1", "eastus");
        record.spec.dns_settings = Some(PublicIPAddressDnsSettings {
            domain_name_label: "app".to_string(),
            reverse_fqdn: None,
        });

        let mut observed = record.to_payload();
        observed.id = Some("/subscriptions/sub-1/publicIPAddresses/ip-1".to_string());
        if let Some(properties) = observed.properties.as_mut() {
            properties.ip_address = Some("52.0.0.1".to_string());
            properties.provisioning_state = Some("Succeeded".to_string());
            if let Some(dns) = properties.dns_settings.as_mut() {
                dns.fqdn = Some("app.eastus.cloudapp.azure.com".to_string());
            }
        }

        assert!(!record.needs_update(&observed));
    }

    #[test]
    fn needs_update_detects_idle_timeout_drift() {
        let mut record = test_public_ip_address("ip-1", "eastus");
        record.spec.idle_timeout_in_minutes = Some(15);

        let mut observed = record.to_payload();
        if let Some(properties) = observed.properties.as_mut() {
            properties.idle_timeout_in_minutes = Some(4);
        }

        assert!(record.needs_update(&observed));
    }

    #[test]
    fn apply_observed_copies_assigned_address_and_fqdn() {
        let record = test_public_ip_address("ip-1", "eastus");
        let mut payload = record.to_payload();
        payload.id = Some("/subscriptions/sub-1/publicIPAddresses/ip-1".to_string());
        if let Some(properties) = payload.properties.as_mut() {
            properties.ip_address = Some("52.0.0.1".to_string());
            properties.provisioning_state = Some("Succeeded".to_string());
            properties.dns_settings = Some(arm_client::PublicIpAddressDnsSettings {
                domain_name_label: Some("app".to_string()),
                fqdn: Some("app.eastus.cloudapp.azure.com".to_string()),
                reverse_fqdn: None,
            });
        }

        let mut status = PublicIPAddressStatus::default();
        PublicIPAddress::apply_observed(&mut status, &payload);

        assert_eq!(status.observed.ip_address.as_deref(), Some("52.0.0.1"));
        assert_eq!(
            status.observed.fqdn.as_deref(),
            Some("app.eastus.cloudapp.azure.com")
        );
        assert_eq!(status.provisioning_state.as_deref(), Some("Succeeded"));
    }

    #[test]
    fn apply_observed_tolerates_partial_payload() {
        let record = test_public_ip_address("ip-1", "eastus");
        let mut payload = record.to_payload();
        if let Some(properties) = payload.properties.as_mut() {
            properties.ip_address = Some("52.0.0.1".to_string());
            properties.provisioning_state = Some("Succeeded".to_string());
        }

        let mut status = PublicIPAddressStatus::default();
        PublicIPAddress::apply_observed(&mut status, &payload);

        let partial = arm_client::PublicIpAddress::default();
        PublicIPAddress::apply_observed(&mut status, &partial);

        assert_eq!(status.observed.ip_address.as_deref(), Some("52.0.0.1"));
        assert_eq!(status.provisioning_state.as_deref(), Some("Succeeded"));
    }
}
