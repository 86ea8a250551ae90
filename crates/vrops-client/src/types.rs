//! Wire types for the vROps suite API
//!
//! Every struct defaults missing fields: the API omits empty arrays and
//! optional strings rather than sending them as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Authentication
// ============================================================================

/// Body of `POST /suite-api/api/auth/token/acquire`
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    /// Login name
    pub username: &'a str,
    /// Password
    pub password: &'a str,
}

/// Session token returned by the acquire endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionToken {
    /// Opaque token, sent back verbatim in the authorization header
    pub token: String,
    /// Expiry as epoch milliseconds
    pub validity: i64,
    /// Human readable expiry
    pub expires_at: String,
    /// Roles granted to the session
    pub roles: Vec<String>,
}

// ============================================================================
// Adapters
// ============================================================================

/// Response of `GET /suite-api/api/adapters`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterList {
    /// Every configured adapter instance, infrastructure or not
    #[serde(rename = "adapterInstancesInfoDto")]
    pub instances: Vec<AdapterInstance>,
}

/// A configured data source within vROps, e.g. one vCenter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdapterInstance {
    pub resource_key: ResourceKey,
    pub description: String,
    pub collector_id: i64,
    pub collector_group_id: String,
    pub credential_instance_id: String,
    pub monitoring_interval: i64,
    pub number_of_metrics_collected: i64,
    pub number_of_resources_collected: i64,
    /// Epoch milliseconds
    pub last_heartbeat: i64,
    /// Epoch milliseconds
    pub last_collected: i64,
    pub message_from_adapter_instance: String,
    pub links: Vec<Link>,
    pub id: String,
}

/// Hypermedia link attached to most API objects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub name: String,
}

// ============================================================================
// Resources
// ============================================================================

/// Identity of an adapter or resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceKey {
    pub name: String,
    /// e.g. `VMWARE`
    pub adapter_kind_key: String,
    /// e.g. `VirtualMachine`
    pub resource_kind_key: String,
    pub resource_identifiers: Vec<ResourceIdentifier>,
}

impl ResourceKey {
    /// Value of the first identifier whose type is named `name`
    #[must_use]
    pub fn identifier(&self, name: &str) -> Option<&str> {
        self.resource_identifiers
            .iter()
            .find(|id| id.identifier_type.name == name)
            .map(|id| id.value.as_str())
    }
}

/// Typed key/value tag on a resource key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceIdentifier {
    pub identifier_type: IdentifierType,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentifierType {
    /// e.g. `VCURL`
    pub name: String,
    pub data_type: String,
    pub is_part_of_uniqueness: bool,
}

/// Paging metadata of a resource listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

/// One page of `GET /suite-api/api/adapters/{id}/resources`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcePage {
    pub page_info: PageInfo,
    pub links: Vec<Link>,
    pub resource_list: Vec<Resource>,
}

/// One monitored entity: host, cluster, datastore, virtual machine...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    /// Epoch milliseconds
    pub creation_time: i64,
    pub resource_key: ResourceKey,
    pub resource_status_states: Vec<ResourceStatusState>,
    /// GREEN, YELLOW, ...
    pub resource_health: String,
    pub resource_health_value: f32,
    pub dt_enabled: bool,
    pub badges: Vec<Badge>,
    pub related_resources: Vec<Value>,
    pub links: Vec<Link>,
    /// Stable ID used to fetch properties
    pub identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceStatusState {
    pub adapter_instance_id: String,
    pub resource_status: String,
    pub resource_state: String,
    pub status_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Badge {
    #[serde(rename = "type")]
    pub badge_type: String,
    pub color: String,
    pub score: f32,
}

// ============================================================================
// Properties
// ============================================================================

/// Response of `GET /suite-api/api/resources/{id}/properties`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceProperties {
    pub resource_id: String,
    pub property: Vec<Property>,
}

/// Flat name/value datum, e.g. `summary|guest|hostName`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
