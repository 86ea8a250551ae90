//! HTTP client for the vROps suite API

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, Result};
use crate::traits::VropsApi;
use crate::types::{
    AdapterInstance, AdapterList, ResourcePage, ResourceProperties, SessionToken, TokenRequest,
};

/// Scheme prefixed to the session token in the `Authorization` header
pub const TOKEN_SCHEME: &str = "vRealizeOpsToken";

// Relative to the base URL so a path prefix on the host is kept
const TOKEN_ACQUIRE_PATH: &str = "suite-api/api/auth/token/acquire";
const ADAPTERS_PATH: &str = "suite-api/api/adapters";

/// Transport parameters for the underlying `reqwest::Client`
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

impl TransportOptions {
    /// Build a `reqwest::Client` honouring these options
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn build_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()?)
    }
}

/// HTTP client for one vROps host
///
/// Cloning is cheap. The authorization header is fixed once a token has been
/// attached with [`VropsClient::with_token`] and reused for every request.
#[derive(Clone)]
pub struct VropsClient {
    client: Client,
    base_url: Url,
    authorization: Option<String>,
}

impl fmt::Debug for VropsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VropsClient")
            .field("base_url", &self.base_url.as_str())
            .field("authorized", &self.authorization.is_some())
            .finish_non_exhaustive()
    }
}

impl VropsClient {
    /// Create a new client with default transport options
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    ///
    /// # Example
    /// ```no_run
    /// use vrops_client::VropsClient;
    ///
    /// let client = VropsClient::new("https://vrops.example.com")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_options(base_url, &TransportOptions::default())
    }

    /// Create a new client with explicit transport options
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the TLS backend fails.
    pub fn with_options(base_url: impl AsRef<str>, options: &TransportOptions) -> Result<Self> {
        Self::with_client(base_url, options.build_client()?)
    }

    /// Create a new client with custom `reqwest::Client`
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client,
            base_url,
            authorization: None,
        })
    }

    /// Host this client talks to
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return a client that authorizes every request with `token`
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.authorization = Some(format!("{TOKEN_SCHEME} {token}"));
        self
    }

    /// Whether a session token is attached
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.authorization.is_some()
    }

    /// Build a full URL from a path relative to the base URL
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(ClientError::Url)
    }

    /// Start a request carrying the JSON headers and, when held, the session token
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        match &self.authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    /// Send a request and decode the JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Perform a GET request and deserialize the response
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        self.send(self.request(Method::GET, url)).await
    }

    /// Acquire a session token
    ///
    /// Only the `token` field of the response is interpreted.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status or an
    /// unparseable body.
    pub async fn acquire_token(&self, username: &str, password: &str) -> Result<SessionToken> {
        let url = self.url(TOKEN_ACQUIRE_PATH)?;
        debug!(%url, username, "POST");

        let body = TokenRequest { username, password };
        let token: SessionToken = self
            .send(self.request(Method::POST, url).json(&body))
            .await?;

        if token.token.is_empty() {
            return Err(ClientError::InvalidResponse(
                "token acquire response has no token".to_string(),
            ));
        }

        Ok(token)
    }

    /// URL of one page of an adapter's resources
    fn resources_url(&self, adapter_id: &str, page: u64, page_size: u64) -> Result<Url> {
        let mut url = self.url(&format!("{ADAPTERS_PATH}/{adapter_id}/resources"))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());
        Ok(url)
    }
}

#[async_trait]
impl VropsApi for VropsClient {
    async fn list_adapters(&self) -> Result<Vec<AdapterInstance>> {
        let list: AdapterList = self.get(self.url(ADAPTERS_PATH)?).await?;
        Ok(list.instances)
    }

    async fn resource_page(
        &self,
        adapter_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<ResourcePage> {
        self.get(self.resources_url(adapter_id, page, page_size)?)
            .await
    }

    async fn resource_properties(&self, resource_id: &str) -> Result<ResourceProperties> {
        let url = self.url(&format!("suite-api/api/resources/{resource_id}/properties"))?;
        self.get(url).await
    }
}
