#[cfg(test)]
mod turn_client_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use turn::client::{Client, ClientConfig};

use crate::error::Result;
use crate::url::Url;

/// A TURN server reference shared by every [`crate::discovery::CandidateDiscovery`]
/// and relayed [`crate::candidate::candidate_base::CandidateBase`] that was
/// allocated against it, so refresh/teardown only needs one allocation
/// handle regardless of how many components use the relay (spec.md §3,
/// "TurnServer").
pub struct TurnServer {
    pub url: Url,
    pub username: String,
    pub credential: String,
    client: Mutex<Option<Arc<Client>>>,
}

impl TurnServer {
    #[must_use]
    pub fn new(url: Url, username: String, credential: String) -> Self {
        Self {
            url,
            username,
            credential,
            client: Mutex::new(None),
        }
    }

    /// Lazily builds and caches the underlying `turn::client::Client` used
    /// for allocation and refresh, following `turn::client::ClientConfig`'s
    /// field set directly.
    async fn client(&self, conn: Arc<dyn util::Conn + Send + Sync>) -> Result<Arc<Client>> {
        let mut guard = self.client.lock().await;
        if let Some(c) = guard.as_ref() {
            return Ok(c.clone());
        }
        let cfg = ClientConfig {
            stun_serv_addr: self.url.host.clone(),
            turn_serv_addr: format!("{}:{}", self.url.host, self.url.port),
            username: self.username.clone(),
            password: self.credential.clone(),
            realm: String::new(),
            software: String::new(),
            rto_in_ms: 0,
            conn,
            vnet: None,
        };
        let client = Arc::new(Client::new(cfg).await?);
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Performs a TURN Allocate request and returns the resulting relay
    /// transport plus the lifetime to schedule a refresh against (spec.md
    /// §4.5/§4.6: refresh fires at `lifetime - 60s`, matching the teacher
    /// crate's `DEFAULT_*` timer conventions).
    pub async fn allocate(
        &self,
        conn: Arc<dyn util::Conn + Send + Sync>,
    ) -> Result<(Arc<dyn util::Conn + Send + Sync>, Duration)> {
        let client = self.client(conn).await?;
        client.listen().await?;
        let relay_conn = client.allocate().await?;
        Ok((Arc::new(relay_conn), DEFAULT_ALLOCATION_LIFETIME))
    }

    pub async fn close(&self) -> Result<()> {
        let mut guard = self.client.lock().await;
        if let Some(c) = guard.take() {
            c.close().await?;
        }
        Ok(())
    }
}

/// RFC 5766 §2.2 default allocation lifetime.
pub const DEFAULT_ALLOCATION_LIFETIME: Duration = Duration::from_secs(600);

/// Time to leave before an allocation's lifetime expires before sending a
/// Refresh, matching libnice's `STUN_AGENT_MAX_STUN_MESSAGE_SIZE`-adjacent
/// "refresh early" margin for the same request class.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[must_use]
pub fn refresh_interval(lifetime: Duration) -> Duration {
    lifetime.saturating_sub(REFRESH_MARGIN)
}
