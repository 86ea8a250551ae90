//! Paged resource discovery for one adapter

use tracing::{info, instrument, warn};
use vrops_client::{Resource, VropsApi};

use crate::error::CollectError;

/// Number of pages needed to list `total_count` resources
///
/// An exact multiple of `page_size` needs no extra page, and an empty
/// listing needs none at all.
#[must_use]
pub fn page_count(total_count: u64, page_size: u64) -> u64 {
    total_count.div_ceil(page_size)
}

/// Every resource of one adapter, in page order
#[derive(Debug, Clone, Default)]
pub struct AdapterResources {
    pub resources: Vec<Resource>,
    /// `pageInfo.totalCount` reported with the first page
    pub total_count: u64,
    /// Pages that failed after the first and were left out
    pub skipped_pages: Vec<u64>,
}

impl AdapterResources {
    /// Whether every resource the first page announced was fetched
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.resources.len() as u64 == self.total_count
    }
}

/// Walks the resource pages of an adapter
pub struct ResourcePaginator<'a> {
    api: &'a dyn VropsApi,
    page_size: u64,
}

impl<'a> ResourcePaginator<'a> {
    /// Create a paginator requesting `page_size` resources per page
    ///
    /// A zero page size is raised to one.
    pub fn new(api: &'a dyn VropsApi, page_size: u64) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
        }
    }

    /// Fetch every page of `adapter_id`'s resources sequentially
    ///
    /// Pages after the first that fail are logged and skipped, so the result
    /// may hold fewer than `total_count` resources.
    ///
    /// # Errors
    /// Returns [`CollectError::Pagination`] if the first page cannot be fetched.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self, adapter_id: &str) -> Result<AdapterResources, CollectError> {
        let first = self
            .api
            .resource_page(adapter_id, 0, self.page_size)
            .await
            .map_err(|source| CollectError::Pagination {
                adapter_id: adapter_id.to_string(),
                page: 0,
                source,
            })?;

        let total_count = first.page_info.total_count;
        let iterations = page_count(total_count, self.page_size);

        info!(
            total_count,
            iterations, "found resources for the adapter"
        );

        let mut listing = AdapterResources {
            resources: first.resource_list,
            total_count,
            skipped_pages: Vec::new(),
        };

        for page in 1..iterations {
            info!("iteration {}/{}", page + 1, iterations);

            match self.api.resource_page(adapter_id, page, self.page_size).await {
                Ok(next) => listing.resources.extend(next.resource_list),
                Err(source) => {
                    let e = CollectError::Pagination {
                        adapter_id: adapter_id.to_string(),
                        page,
                        source,
                    };
                    warn!(error = %e, "skipping page");
                    listing.skipped_pages.push(page);
                }
            }
        }

        Ok(listing)
    }
}
