//! Session acquisition

use tracing::{debug, info, instrument};
use vrops_client::VropsClient;

use crate::error::CollectError;

/// Acquire a session token and return a client that sends it on every request
///
/// The token is used as-is for the rest of the run; its expiry is not tracked.
///
/// # Errors
/// Returns [`CollectError::Auth`] if the token cannot be acquired.
#[instrument(skip_all, fields(host = %client.base_url()))]
pub async fn authenticate(
    client: VropsClient,
    username: &str,
    password: &str,
) -> Result<VropsClient, CollectError> {
    info!("acquiring session token");

    let session = client
        .acquire_token(username, password)
        .await
        .map_err(CollectError::Auth)?;

    debug!(roles = ?session.roles, expires_at = %session.expires_at, "session acquired");

    Ok(client.with_token(&session.token))
}
