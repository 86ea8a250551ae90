//! Error types for vrops-inventory

use thiserror::Error;
use vrops_client::ClientError;

/// Errors raised while collecting inventory
///
/// Only [`CollectError::Auth`] and [`CollectError::Catalog`] end a run on
/// their own; see [`CollectError::is_fatal`]. Sink failures end it or not
/// depending on the configured [`crate::SinkFailurePolicy`].
#[derive(Error, Debug)]
pub enum CollectError {
    /// Session token could not be acquired
    #[error("failed to acquire a session token: {0}")]
    Auth(#[source] ClientError),

    /// Adapter catalog could not be listed
    #[error("failed to list adapter instances: {0}")]
    Catalog(#[source] ClientError),

    /// A resource page could not be fetched
    #[error("failed to fetch page {page} of adapter {adapter_id}: {source}")]
    Pagination {
        /// Adapter whose resources were being listed
        adapter_id: String,
        /// Zero-based page number
        page: u64,
        #[source]
        source: ClientError,
    },

    /// Properties of a resource could not be fetched
    #[error("failed to fetch properties of resource {resource_id}: {source}")]
    PropertyFetch {
        resource_id: String,
        #[source]
        source: ClientError,
    },

    /// Properties of a resource could not be serialized into a record payload
    #[error("failed to serialize properties of resource {resource_id}: {source}")]
    Serialize {
        resource_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// Record set could not be persisted or transmitted
    #[error("failed to store record set {key}: {source}")]
    Sink {
        /// `vc_url` (or `vc_name`) the record set is keyed by
        key: String,
        #[source]
        source: SinkError,
    },
}

impl CollectError {
    /// Check if the error aborts the whole run regardless of policy
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, CollectError::Auth(_) | CollectError::Catalog(_))
    }
}

/// Errors raised by a [`crate::Sink`]
#[derive(Error, Debug)]
pub enum SinkError {
    /// Filesystem write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record set could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Record store rejected the record set
    #[error("record store error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}
