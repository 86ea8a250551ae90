//! Record set assembly

use vrops_client::AdapterInstance;

use crate::types::{COMMITTER, Record, RecordSet, RecordSetContext, record_set_type, timestamp_now};

/// Identifier type holding the vCenter URL of an adapter
pub const VCURL_IDENTIFIER: &str = "VCURL";

/// Shared context derived from an adapter
#[must_use]
pub fn adapter_context(adapter: &AdapterInstance) -> RecordSetContext {
    RecordSetContext {
        vc_name: adapter.resource_key.name.clone(),
        vc_url: adapter
            .resource_key
            .identifier(VCURL_IDENTIFIER)
            .map(ToString::to_string),
        vc_desc: Some(adapter.description.clone()).filter(|d| !d.is_empty()),
    }
}

/// Wrap an adapter's records into one record set
#[must_use]
pub fn build_record_set(adapter: &AdapterInstance, records: Vec<Record>) -> RecordSet {
    RecordSet {
        set_type: record_set_type(&adapter.resource_key.adapter_kind_key),
        timestamp: timestamp_now(),
        context: adapter_context(adapter),
        committer: COMMITTER.to_string(),
        records,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vrops_client::{IdentifierType, ResourceIdentifier, ResourceKey};

    use super::*;

    fn identifier(name: &str, value: &str) -> ResourceIdentifier {
        ResourceIdentifier {
            identifier_type: IdentifierType {
                name: name.to_string(),
                data_type: "STRING".to_string(),
                is_part_of_uniqueness: true,
            },
            value: value.to_string(),
        }
    }

    fn adapter(identifiers: Vec<ResourceIdentifier>, description: &str) -> AdapterInstance {
        AdapterInstance {
            id: "test-123".to_string(),
            description: description.to_string(),
            resource_key: ResourceKey {
                name: "test".to_string(),
                adapter_kind_key: "VMWARE".to_string(),
                resource_kind_key: "VMwareAdapter Instance".to_string(),
                resource_identifiers: identifiers,
            },
            ..Default::default()
        }
    }

    fn record(hostname: &str) -> Record {
        Record {
            id: String::new(),
            record_type: "vrops-vmware-virtualmachine".to_string(),
            hostname: hostname.to_string(),
            ip: String::new(),
            timestamp: "2019-01-01 00:00:00".to_string(),
            committer: COMMITTER.to_string(),
            context: None,
            data: json!({}),
            hash: String::new(),
        }
    }

    #[test]
    fn test_full_context() {
        let adapter = adapter(
            vec![identifier("VCURL", "vcenter.test.pdxfixit.com")],
            "fancy",
        );

        let context = adapter_context(&adapter);
        assert_eq!(
            context,
            RecordSetContext {
                vc_name: "test".to_string(),
                vc_url: Some("vcenter.test.pdxfixit.com".to_string()),
                vc_desc: Some("fancy".to_string()),
            }
        );
    }

    #[test]
    fn test_first_vcurl_wins() {
        let adapter = adapter(
            vec![
                identifier("VMEntityName", "ignored"),
                identifier("VCURL", "first.example.com"),
                identifier("VCURL", "second.example.com"),
            ],
            "",
        );

        let context = adapter_context(&adapter);
        assert_eq!(context.vc_url.as_deref(), Some("first.example.com"));
        assert!(context.vc_desc.is_none());
    }

    #[test]
    fn test_name_only_context() {
        let context = adapter_context(&adapter(Vec::new(), ""));
        assert_eq!(context.vc_name, "test");
        assert!(context.vc_url.is_none());
        assert!(context.vc_desc.is_none());
    }

    #[test]
    fn test_build_record_set() {
        let adapter = adapter(vec![identifier("VCURL", "vc.example.com")], "test");
        let records = vec![record("foo"), record("bar"), record("baz")];

        let set = build_record_set(&adapter, records.clone());

        assert_eq!(set.set_type, "vrops-vmware");
        assert_eq!(set.committer, COMMITTER);
        assert!(!set.timestamp.is_empty());
        assert_eq!(set.context.key(), "vc.example.com");
        assert_eq!(set.records, records);
        for record in &set.records {
            assert!(record.record_type.starts_with(&format!("{}-", set.set_type)));
        }
    }

    #[test]
    fn test_empty_record_set() {
        let set = build_record_set(&adapter(Vec::new(), ""), Vec::new());
        assert!(set.records.is_empty());
    }

    #[test]
    fn test_adapter_kind_with_spaces() {
        let mut adapter = adapter(Vec::new(), "");
        adapter.resource_key.adapter_kind_key = "VMware Cloud".to_string();
        assert_eq!(build_record_set(&adapter, Vec::new()).set_type, "vrops-vmware_cloud");
    }
}
