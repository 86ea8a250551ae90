//! vROps API trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AdapterInstance, ResourcePage, ResourceProperties};

/// Authorized read access to the inventory endpoints
///
/// Implemented by [`crate::VropsClient`]; the collector only depends on this
/// trait so the pipeline can run against an in-memory fake.
#[async_trait]
pub trait VropsApi: Send + Sync {
    /// List every adapter instance (unpaginated)
    async fn list_adapters(&self) -> Result<Vec<AdapterInstance>>;

    /// Fetch one zero-based page of an adapter's resources
    async fn resource_page(
        &self,
        adapter_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<ResourcePage>;

    /// Fetch the property set of one resource
    async fn resource_properties(&self, resource_id: &str) -> Result<ResourceProperties>;
}
