//! vrops-client: vRealize Operations suite API client
//!
//! Typed access to the handful of suite API endpoints the inventory collector
//! needs: token acquisition, the adapter catalog, paged resource listings and
//! per-resource properties.
//!
//! # Example
//!
//! ```no_run
//! use vrops_client::{VropsApi, VropsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = VropsClient::new("https://vrops.example.com")?;
//! let session = client.acquire_token("username", "password").await?;
//! let client = client.with_token(&session.token);
//!
//! for adapter in client.list_adapters().await? {
//!     let page = client.resource_page(&adapter.id, 0, 1000).await?;
//!     println!("{}: {} resources", adapter.resource_key.name, page.page_info.total_count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::{ClientError, Result};
pub use http::{TOKEN_SCHEME, TransportOptions, VropsClient};
pub use traits::VropsApi;
pub use types::{
    AdapterInstance, IdentifierType, PageInfo, Property, Resource, ResourceIdentifier,
    ResourceKey, ResourcePage, ResourceProperties, SessionToken,
};
