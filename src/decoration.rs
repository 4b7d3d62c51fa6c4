// Decorative background loader.
//
// Purely cosmetic and fire-and-forget. The controller holds no reference to
// any of this, so a missing or broken decoration can never change how an
// upload behaves.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Capability for starting a best-effort visual enhancement.
pub trait Decoration: Send + Sync {
    /// Kick off loading. Must return immediately and never fail.
    fn start(&self);

    /// The asset, if loading has already finished. Never waits.
    fn loaded(&self) -> Option<String> {
        None
    }
}

/// No decoration at all.
pub struct NoDecoration;

impl Decoration for NoDecoration {
    fn start(&self) {}
}

/// Fetches a remote decoration asset in a detached task.
///
/// The asset is kept in memory once loaded so a front end can pick it up
/// whenever it is ready; if it never arrives nothing waits on it.
pub struct RemoteDecoration {
    client: reqwest::Client,
    url: String,
    loaded: Arc<RwLock<Option<String>>>,
}

impl RemoteDecoration {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lucid-trace/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            loaded: Arc::new(RwLock::new(None)),
        })
    }

    /// The loaded asset, if the fetch has finished successfully.
    pub async fn asset(&self) -> Option<String> {
        self.loaded.read().await.clone()
    }
}

impl Decoration for RemoteDecoration {
    fn start(&self) {
        let client = self.client.clone();
        let url = self.url.clone();
        let loaded = self.loaded.clone();

        // Outside a runtime there is nothing to spawn onto; skip quietly.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime, decoration skipped");
            return;
        };

        handle.spawn(async move {
            match fetch(&client, &url).await {
                Ok(body) => {
                    debug!(url = %url, bytes = body.len(), "Decoration loaded");
                    *loaded.write().await = Some(body);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Decoration failed to load");
                }
            }
        });
    }

    fn loaded(&self) -> Option<String> {
        // A writer holding the lock means the asset is not ready yet.
        self.loaded.try_read().ok().and_then(|asset| asset.clone())
    }
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .context("Decoration request failed")?;

    if !response.status().is_success() {
        anyhow::bail!("Decoration URL returned {}", response.status());
    }

    response
        .text()
        .await
        .context("Failed to read decoration body")
}

/// Pick the decoration for a configured URL. A bad URL or client error
/// degrades to no decoration.
pub fn from_url(url: Option<&str>) -> Box<dyn Decoration> {
    match url {
        Some(url) => match RemoteDecoration::new(url) {
            Ok(decoration) => Box::new(decoration),
            Err(e) => {
                warn!(error = %e, "Decoration disabled");
                Box::new(NoDecoration)
            }
        },
        None => Box::new(NoDecoration),
    }
}
