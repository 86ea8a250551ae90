//! Record set sinks
//!
//! A sink receives one fully built [`RecordSet`] per adapter. The collector
//! ships two: [`FileSink`] for sample-data runs and [`HostDbSink`] for the
//! HostDB records API.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::error::SinkError;
use crate::types::RecordSet;

/// Destination for record sets
#[async_trait]
pub trait Sink: Send + Sync {
    /// Persist or transmit one record set
    async fn store(&self, record_set: &RecordSet) -> Result<(), SinkError>;

    /// Short name used in logs
    fn sink_type(&self) -> &'static str;
}

/// Writes each record set to `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a record set is written to
    #[must_use]
    pub fn path_for(&self, record_set: &RecordSet) -> PathBuf {
        let name = record_set.context.key().replace(['/', '\\'], "_");
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn store(&self, record_set: &RecordSet) -> Result<(), SinkError> {
        let path = self.path_for(record_set);
        let body = serde_json::to_vec_pretty(record_set)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, body).await?;

        info!(path = %path.display(), records = record_set.records.len(), "saved record set");
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "file"
    }
}

/// Posts each record set to the HostDB records API
#[derive(Clone)]
pub struct HostDbSink {
    client: Client,
    records_url: Url,
    credentials: Option<(String, String)>,
}

impl std::fmt::Debug for HostDbSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostDbSink")
            .field("records_url", &self.records_url.as_str())
            .field("authenticated", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl HostDbSink {
    /// Path of the records endpoint, relative to the HostDB base URL
    pub const RECORDS_PATH: &'static str = "v0/records/";

    /// Create a sink for the HostDB instance at `base_url`
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: impl AsRef<str>, client: Client) -> Result<Self, SinkError> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let records_url = base_url.join(Self::RECORDS_PATH)?;
        Ok(Self {
            client,
            records_url,
            credentials: None,
        })
    }

    /// Authenticate with HTTP basic auth
    #[must_use]
    pub fn with_basic_auth(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), pass.into()));
        self
    }

    fn url_for(&self, record_set: &RecordSet) -> Url {
        let mut url = self.records_url.clone();
        url.query_pairs_mut()
            .append_pair("vc_url", record_set.context.key());
        url
    }
}

#[async_trait]
impl Sink for HostDbSink {
    async fn store(&self, record_set: &RecordSet) -> Result<(), SinkError> {
        let url = self.url_for(record_set);
        debug!(%url, records = record_set.records.len(), "POST");

        let mut request = self.client.post(url).json(record_set);
        if let Some((user, pass)) = &self.credentials {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SinkError::Api { status, message });
        }

        info!(key = record_set.context.key(), records = record_set.records.len(), "sent record set");
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "hostdb"
    }
}
