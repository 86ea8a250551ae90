use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vrops_client::{
    AdapterInstance, ClientError, IdentifierType, PageInfo, Property, Resource,
    ResourceIdentifier, ResourceKey, ResourcePage, ResourceProperties, VropsApi,
};
use vrops_inventory::*;

// Mock implementations
#[derive(Default)]
struct MockApi {
    adapters: Option<Vec<AdapterInstance>>,
    resources: HashMap<String, Vec<Resource>>,
    properties: HashMap<String, Vec<Property>>,
    failing_pages: HashSet<(String, u64)>,
}

impl MockApi {
    fn adapter(mut self, adapter: AdapterInstance, resources: Vec<Resource>) -> Self {
        self.resources.insert(adapter.id.clone(), resources);
        self.adapters.get_or_insert_with(Vec::new).push(adapter);
        self
    }

    fn properties(mut self, resource_id: &str, properties: Vec<Property>) -> Self {
        self.properties.insert(resource_id.to_string(), properties);
        self
    }

    fn failing_page(mut self, adapter_id: &str, page: u64) -> Self {
        self.failing_pages.insert((adapter_id.to_string(), page));
        self
    }
}

#[async_trait]
impl VropsApi for MockApi {
    async fn list_adapters(&self) -> Result<Vec<AdapterInstance>, ClientError> {
        self.adapters.clone().ok_or_else(|| ClientError::Api {
            status: 500,
            message: "catalog down".to_string(),
        })
    }

    async fn resource_page(
        &self,
        adapter_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<ResourcePage, ClientError> {
        if self.failing_pages.contains(&(adapter_id.to_string(), page)) {
            return Err(ClientError::Api {
                status: 503,
                message: "busy".to_string(),
            });
        }

        let all = self.resources.get(adapter_id).cloned().unwrap_or_default();
        let resource_list = all
            .iter()
            .skip(usize::try_from(page * page_size).unwrap())
            .take(usize::try_from(page_size).unwrap())
            .cloned()
            .collect();

        Ok(ResourcePage {
            page_info: PageInfo {
                total_count: all.len() as u64,
                page,
                page_size,
            },
            links: Vec::new(),
            resource_list,
        })
    }

    async fn resource_properties(
        &self,
        resource_id: &str,
    ) -> Result<ResourceProperties, ClientError> {
        self.properties
            .get(resource_id)
            .map(|property| ResourceProperties {
                resource_id: resource_id.to_string(),
                property: property.clone(),
            })
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: "no such resource".to_string(),
            })
    }
}

#[derive(Default)]
struct MockSink {
    stored: Mutex<Vec<RecordSet>>,
    fail_for: Option<String>,
}

impl MockSink {
    fn failing_for(key: &str) -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            fail_for: Some(key.to_string()),
        }
    }

    fn stored(&self) -> Vec<RecordSet> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sink for MockSink {
    async fn store(&self, record_set: &RecordSet) -> Result<(), SinkError> {
        if self.fail_for.as_deref() == Some(record_set.context.key()) {
            return Err(SinkError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }
        self.stored.lock().unwrap().push(record_set.clone());
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "mock"
    }
}

fn adapter(id: &str, kind: &str, vc_url: &str) -> AdapterInstance {
    AdapterInstance {
        id: id.to_string(),
        description: format!("{id} description"),
        resource_key: ResourceKey {
            name: id.to_string(),
            adapter_kind_key: kind.to_string(),
            resource_kind_key: "VMwareAdapter Instance".to_string(),
            resource_identifiers: vec![ResourceIdentifier {
                identifier_type: IdentifierType {
                    name: "VCURL".to_string(),
                    data_type: "STRING".to_string(),
                    is_part_of_uniqueness: true,
                },
                value: vc_url.to_string(),
            }],
        },
        ..Default::default()
    }
}

fn resource(id: &str, kind: &str) -> Resource {
    Resource {
        identifier: id.to_string(),
        resource_key: ResourceKey {
            name: id.to_string(),
            adapter_kind_key: "VMWARE".to_string(),
            resource_kind_key: kind.to_string(),
            resource_identifiers: Vec::new(),
        },
        ..Default::default()
    }
}

fn vm_properties(hostname: &str, ip: &str) -> Vec<Property> {
    vec![
        Property::new("summary|guest|hostName", hostname),
        Property::new("summary|guest|ipAddress", ip),
    ]
}

fn settings(page_size: u64, on_sink_error: SinkFailurePolicy) -> CollectorSettings {
    CollectorSettings {
        adapter_kind: "VMWARE".to_string(),
        resource_kinds: vec!["VirtualMachine".to_string(), "HostSystem".to_string()],
        page_size,
        on_sink_error,
    }
}

fn collector(api: MockApi, sink: &Arc<MockSink>, settings: CollectorSettings) -> Collector {
    Collector::new(Arc::new(api), sink.clone(), settings)
}

#[tokio::test]
async fn test_collects_matching_adapters_only() {
    let api = MockApi::default()
        .adapter(
            adapter("vc01", "VMWARE", "vc01.example.com"),
            vec![
                resource("vm-1", "VirtualMachine"),
                resource("ds-1", "Datastore"),
                resource("host-1", "HostSystem"),
            ],
        )
        .adapter(
            adapter("nsx", "NSXTAdapter", "nsx.example.com"),
            vec![resource("vm-9", "VirtualMachine")],
        )
        .properties("vm-1", vm_properties("web01", "10.1.2.3"))
        .properties("ds-1", vec![Property::new("config|name", "ds01")])
        .properties(
            "host-1",
            vec![
                Property::new("config|name", "esx01"),
                Property::new("net:vmk0|ip_address", "10.0.0.5"),
            ],
        )
        .properties("vm-9", vm_properties("nsx-vm", "10.9.9.9"));

    let sink = Arc::new(MockSink::default());
    let summary = collector(api, &sink, settings(1000, SinkFailurePolicy::Abort))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.adapters_seen, 2);
    assert_eq!(summary.adapters_collected, 1);
    assert_eq!(summary.records, 2);

    let stored = sink.stored();
    assert_eq!(stored.len(), 1);

    let set = &stored[0];
    assert_eq!(set.set_type, "vrops-vmware");
    assert_eq!(set.context.vc_name, "vc01");
    assert_eq!(set.context.vc_url.as_deref(), Some("vc01.example.com"));
    assert_eq!(set.context.vc_desc.as_deref(), Some("vc01 description"));

    let hosts: Vec<(&str, &str, &str)> = set
        .records
        .iter()
        .map(|r| (r.record_type.as_str(), r.hostname.as_str(), r.ip.as_str()))
        .collect();
    assert_eq!(
        hosts,
        vec![
            ("vrops-vmware-virtualmachine", "web01", "10.1.2.3"),
            ("vrops-vmware-hostsystem", "esx01", "10.0.0.5"),
        ]
    );
}

#[tokio::test]
async fn test_records_follow_page_order() {
    let resources: Vec<Resource> = (0..23)
        .map(|i| resource(&format!("vm-{i}"), "VirtualMachine"))
        .collect();
    let mut api = MockApi::default().adapter(adapter("vc01", "VMWARE", "vc01"), resources);
    for i in 0..23 {
        api = api.properties(&format!("vm-{i}"), vm_properties(&format!("host{i}"), "10.0.0.1"));
    }

    let sink = Arc::new(MockSink::default());
    let summary = collector(api, &sink, settings(5, SinkFailurePolicy::Abort))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.records, 23);
    let hostnames: Vec<String> = sink.stored()[0]
        .records
        .iter()
        .map(|r| r.hostname.clone())
        .collect();
    let expected: Vec<String> = (0..23).map(|i| format!("host{i}")).collect();
    assert_eq!(hostnames, expected);
}

#[tokio::test]
async fn test_catalog_failure_is_fatal() {
    let sink = Arc::new(MockSink::default());
    let err = collector(MockApi::default(), &sink, settings(10, SinkFailurePolicy::Skip))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, CollectError::Catalog(_)));
    assert!(err.is_fatal());
    assert!(sink.stored().is_empty());
}

#[tokio::test]
async fn test_first_page_failure_skips_adapter() {
    let api = MockApi::default()
        .adapter(
            adapter("vc01", "VMWARE", "vc01"),
            vec![resource("vm-1", "VirtualMachine")],
        )
        .adapter(
            adapter("vc02", "VMWARE", "vc02"),
            vec![resource("vm-2", "VirtualMachine")],
        )
        .properties("vm-1", vm_properties("a", "10.0.0.1"))
        .properties("vm-2", vm_properties("b", "10.0.0.2"))
        .failing_page("vc01", 0);

    let sink = Arc::new(MockSink::default());
    let summary = collector(api, &sink, settings(10, SinkFailurePolicy::Abort))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.adapters_skipped, 1);
    assert_eq!(summary.adapters_collected, 1);
    assert_eq!(sink.stored()[0].context.vc_name, "vc02");
}

#[tokio::test]
async fn test_later_page_failure_loses_that_page_only() {
    let resources: Vec<Resource> = (0..6)
        .map(|i| resource(&format!("vm-{i}"), "VirtualMachine"))
        .collect();
    let mut api = MockApi::default()
        .adapter(adapter("vc01", "VMWARE", "vc01"), resources)
        .failing_page("vc01", 1);
    for i in 0..6 {
        api = api.properties(&format!("vm-{i}"), vm_properties(&format!("h{i}"), "10.0.0.1"));
    }

    let sink = Arc::new(MockSink::default());
    let summary = collector(api, &sink, settings(2, SinkFailurePolicy::Abort))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.pages_skipped, 1);
    assert_eq!(summary.records, 4);
    let hostnames: Vec<String> = sink.stored()[0]
        .records
        .iter()
        .map(|r| r.hostname.clone())
        .collect();
    assert_eq!(hostnames, vec!["h0", "h1", "h4", "h5"]);
}

#[tokio::test]
async fn test_property_failure_skips_resource() {
    let api = MockApi::default()
        .adapter(
            adapter("vc01", "VMWARE", "vc01"),
            vec![
                resource("vm-1", "VirtualMachine"),
                resource("vm-gone", "VirtualMachine"),
                resource("vm-3", "VirtualMachine"),
            ],
        )
        .properties("vm-1", vm_properties("a", "10.0.0.1"))
        .properties("vm-3", vm_properties("c", "10.0.0.3"));

    let sink = Arc::new(MockSink::default());
    let summary = collector(api, &sink, settings(10, SinkFailurePolicy::Abort))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.resources_skipped, 1);
    assert_eq!(summary.records, 2);
}

#[tokio::test]
async fn test_sink_failure_aborts_by_default() {
    let api = MockApi::default()
        .adapter(adapter("vc01", "VMWARE", "vc01.example.com"), Vec::new())
        .adapter(adapter("vc02", "VMWARE", "vc02.example.com"), Vec::new());

    let sink = Arc::new(MockSink::failing_for("vc01.example.com"));
    let err = collector(api, &sink, settings(10, SinkFailurePolicy::default()))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, CollectError::Sink { ref key, .. } if key == "vc01.example.com"));
    assert!(sink.stored().is_empty());
}

#[tokio::test]
async fn test_sink_failure_can_skip_adapter() {
    let api = MockApi::default()
        .adapter(adapter("vc01", "VMWARE", "vc01.example.com"), Vec::new())
        .adapter(adapter("vc02", "VMWARE", "vc02.example.com"), Vec::new());

    let sink = Arc::new(MockSink::failing_for("vc01.example.com"));
    let summary = collector(api, &sink, settings(10, SinkFailurePolicy::Skip))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.adapters_skipped, 1);
    assert_eq!(summary.adapters_collected, 1);

    let stored = sink.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].context.key(), "vc02.example.com");
    assert!(stored[0].records.is_empty());
}
