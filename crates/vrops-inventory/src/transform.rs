//! Resource to record transformation

use tracing::{debug, instrument};
use vrops_client::{Resource, ResourceProperties, VropsApi};

use crate::error::CollectError;
use crate::extract::{Extracted, extract, rules_for};
use crate::types::{COMMITTER, Record, record_type, timestamp_now};

/// Turns allow-listed resources into HostDB records
///
/// Resources whose kind is not in the allow-list are dropped before any
/// request is made for them.
pub struct RecordTransformer<'a> {
    api: &'a dyn VropsApi,
    allowed_kinds: &'a [String],
}

impl<'a> RecordTransformer<'a> {
    /// Create a transformer fetching properties through `api`
    pub fn new(api: &'a dyn VropsApi, allowed_kinds: &'a [String]) -> Self {
        Self { api, allowed_kinds }
    }

    /// Exact, case-sensitive allow-list membership of the resource kind
    #[must_use]
    pub fn is_wanted(&self, resource: &Resource) -> bool {
        self.allowed_kinds
            .iter()
            .any(|kind| *kind == resource.resource_key.resource_kind_key)
    }

    /// Produce the record for `resource`, or `None` if its kind is not wanted
    ///
    /// # Errors
    /// Returns an error if the properties cannot be fetched or serialized.
    /// Either way the resource yields no record.
    #[instrument(skip_all, fields(resource = %resource.identifier))]
    pub async fn transform(&self, resource: &Resource) -> Result<Option<Record>, CollectError> {
        if !self.is_wanted(resource) {
            debug!(kind = %resource.resource_key.resource_kind_key, "skipping");
            return Ok(None);
        }

        let properties = self
            .api
            .resource_properties(&resource.identifier)
            .await
            .map_err(|source| CollectError::PropertyFetch {
                resource_id: resource.identifier.clone(),
                source,
            })?;

        debug!(count = properties.property.len(), "found properties");

        build_record(resource, &properties).map(Some)
    }
}

/// Build the record for a resource from its fetched properties
///
/// # Errors
/// Returns an error if the property set cannot be serialized.
pub fn build_record(
    resource: &Resource,
    properties: &ResourceProperties,
) -> Result<Record, CollectError> {
    let data = serde_json::to_value(properties).map_err(|source| CollectError::Serialize {
        resource_id: resource.identifier.clone(),
        source,
    })?;

    let record_type = record_type(
        &resource.resource_key.adapter_kind_key,
        &resource.resource_key.resource_kind_key,
    );
    let Extracted { hostname, ip } = extract(rules_for(&record_type), &properties.property);

    Ok(Record {
        id: String::new(),
        record_type,
        hostname,
        ip,
        timestamp: timestamp_now(),
        committer: COMMITTER.to_string(),
        context: None,
        data,
        hash: String::new(),
    })
}
