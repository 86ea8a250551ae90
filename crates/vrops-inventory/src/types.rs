//! Normalized HostDB record types

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Committer label stamped on every record and record set
pub const COMMITTER: &str = "hostdb-collector-vrops";

/// HostDB timestamp layout, always UTC
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time in [`TIMESTAMP_FORMAT`]
#[must_use]
pub fn timestamp_now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Record set type for an adapter kind, e.g. `vrops-vmware`
#[must_use]
pub fn record_set_type(adapter_kind: &str) -> String {
    format!("vrops-{}", kind_token(adapter_kind))
}

/// Record type for a resource, e.g. `vrops-vmware-virtualmachine`
#[must_use]
pub fn record_type(adapter_kind: &str, resource_kind: &str) -> String {
    format!(
        "vrops-{}-{}",
        kind_token(adapter_kind),
        kind_token(resource_kind)
    )
}

fn kind_token(kind: &str) -> String {
    kind.replace(' ', "_").to_lowercase()
}

/// One normalized inventory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by HostDB; always empty here
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    /// Empty unless an extraction rule matched a non-placeholder value
    pub hostname: String,
    /// Empty unless an extraction rule matched a non-placeholder value
    pub ip: String,
    pub timestamp: String,
    pub committer: String,
    /// Records carry no context of their own; the record set does
    pub context: Option<BTreeMap<String, Value>>,
    /// Full property set of the resource
    pub data: Value,
    /// Computed by HostDB; always empty here
    pub hash: String,
}

/// Shared context of a record set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSetContext {
    /// Adapter (vCenter) name
    pub vc_name: String,
    /// Value of the adapter's first `VCURL` identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_url: Option<String>,
    /// Adapter description, when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_desc: Option<String>,
}

impl RecordSetContext {
    /// Key the record set is stored under: `vc_url`, else `vc_name`
    #[must_use]
    pub fn key(&self) -> &str {
        self.vc_url.as_deref().unwrap_or(&self.vc_name)
    }
}

/// All records produced for one adapter in one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(rename = "type")]
    pub set_type: String,
    pub timestamp: String,
    pub context: RecordSetContext,
    pub committer: String,
    pub records: Vec<Record>,
}
