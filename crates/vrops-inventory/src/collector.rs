//! Collection run: catalog, resources, records, sink

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use vrops_client::{AdapterInstance, VropsApi};

use crate::error::CollectError;
use crate::pagination::ResourcePaginator;
use crate::recordset::build_record_set;
use crate::sink::Sink;
use crate::transform::RecordTransformer;
use crate::types::RecordSet;

/// What to do when a record set cannot be stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkFailurePolicy {
    /// Stop the run; later adapters are not collected
    #[default]
    Abort,
    /// Log and carry on with the next adapter
    Skip,
}

/// Collection settings
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Adapter kind to collect, e.g. `VMWARE`; other adapters are ignored
    pub adapter_kind: String,
    /// Resource kinds turned into records
    pub resource_kinds: Vec<String>,
    /// Resources requested per page
    pub page_size: u64,
    pub on_sink_error: SinkFailurePolicy,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            adapter_kind: "VMWARE".to_string(),
            resource_kinds: Vec::new(),
            page_size: 1000,
            on_sink_error: SinkFailurePolicy::default(),
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Adapter instances in the catalog
    pub adapters_seen: usize,
    /// Adapters whose record set reached the sink
    pub adapters_collected: usize,
    /// Matching adapters dropped on a first-page or sink failure
    pub adapters_skipped: usize,
    /// Records handed to the sink
    pub records: usize,
    pub pages_skipped: usize,
    pub resources_skipped: usize,
}

/// Inventory collector
///
/// Walks the adapter catalog and hands one record set per matching adapter
/// to the sink. Everything runs sequentially in catalog, page and resource
/// order.
pub struct Collector {
    api: Arc<dyn VropsApi>,
    sink: Arc<dyn Sink>,
    settings: CollectorSettings,
}

impl Collector {
    /// Create a collector over an authorized API client
    pub fn new(api: Arc<dyn VropsApi>, sink: Arc<dyn Sink>, settings: CollectorSettings) -> Self {
        Self {
            api,
            sink,
            settings,
        }
    }

    /// Collect every matching adapter
    ///
    /// # Errors
    /// Returns an error if the adapter catalog cannot be listed, or if a
    /// record set cannot be stored under [`SinkFailurePolicy::Abort`].
    /// Failures scoped to one adapter, page or resource are logged and
    /// counted in the summary instead.
    pub async fn run(&self) -> Result<RunSummary, CollectError> {
        info!("getting a list of adapter instances");

        let adapters = self
            .api
            .list_adapters()
            .await
            .map_err(CollectError::Catalog)?;

        let total = adapters.len();
        info!(
            count = total,
            adapter_kind = %self.settings.adapter_kind,
            "found adapter instances, only the configured kind is collected"
        );

        let mut summary = RunSummary {
            adapters_seen: total,
            ..Default::default()
        };

        for (n, adapter) in adapters.iter().enumerate() {
            if adapter.resource_key.adapter_kind_key != self.settings.adapter_kind {
                continue;
            }

            info!(adapter = %adapter.resource_key.name, "adapter {}/{}", n + 1, total);
            debug!(?adapter);

            let record_set = match self.collect_adapter(adapter, &mut summary).await {
                Ok(set) => set,
                Err(e) => {
                    warn!(error = %e, adapter = %adapter.id, "skipping adapter");
                    summary.adapters_skipped += 1;
                    continue;
                }
            };

            self.store(record_set, &mut summary).await?;
        }

        info!(
            collected = summary.adapters_collected,
            skipped = summary.adapters_skipped,
            records = summary.records,
            "all done"
        );

        Ok(summary)
    }

    /// Build the record set of one adapter
    ///
    /// # Errors
    /// Returns an error if the first resource page cannot be fetched.
    #[instrument(skip_all, fields(adapter = %adapter.id))]
    pub async fn collect_adapter(
        &self,
        adapter: &AdapterInstance,
        summary: &mut RunSummary,
    ) -> Result<RecordSet, CollectError> {
        let listing = ResourcePaginator::new(self.api.as_ref(), self.settings.page_size)
            .fetch_all(&adapter.id)
            .await?;
        summary.pages_skipped += listing.skipped_pages.len();

        let transformer = RecordTransformer::new(self.api.as_ref(), &self.settings.resource_kinds);
        let count = listing.resources.len();
        let mut records = Vec::new();

        for (i, resource) in listing.resources.iter().enumerate() {
            debug!(
                kind = %resource.resource_key.resource_kind_key,
                "resource {}/{}", i + 1, count
            );

            match transformer.transform(resource).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "skipping resource");
                    summary.resources_skipped += 1;
                }
            }
        }

        info!(resources = count, records = records.len(), "adapter collected");

        Ok(build_record_set(adapter, records))
    }

    async fn store(&self, record_set: RecordSet, summary: &mut RunSummary) -> Result<(), CollectError> {
        match self.sink.store(&record_set).await {
            Ok(()) => {
                summary.adapters_collected += 1;
                summary.records += record_set.records.len();
                Ok(())
            }
            Err(source) => {
                let e = CollectError::Sink {
                    key: record_set.context.key().to_string(),
                    source,
                };
                match self.settings.on_sink_error {
                    SinkFailurePolicy::Abort => {
                        error!(error = %e, sink = self.sink.sink_type(), "aborting run");
                        Err(e)
                    }
                    SinkFailurePolicy::Skip => {
                        warn!(error = %e, sink = self.sink.sink_type(), "skipping adapter");
                        summary.adapters_skipped += 1;
                        Ok(())
                    }
                }
            }
        }
    }
}
