use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use super::{AppInfo, FetchError, FetchResponse, RequestOptions, Result, Scheme, Status, Tunnel};
use crate::ports::{HttpClientPort, StatusPort};

/// Pick the configured proxy string a request to a `target` scheme goes through.
///
/// A global proxy routes everything, preferring the HTTP proxy when both are set.
/// Otherwise the proxy matching the target scheme is used, if any.
pub fn select_proxy(status: &Status, target: Scheme) -> Option<&str> {
    if status.uses_global_proxy() {
        return status.configured_http_proxy().or_else(|| status.configured_https_proxy());
    }

    match target {
        Scheme::Http => status.configured_http_proxy(),
        Scheme::Https => status.configured_https_proxy(),
    }
}

/// Issues requests through the proxy the current status asks for.
#[derive(Clone)]
pub struct ProxyAwareFetcher {
    status: Arc<dyn StatusPort>,
    http_client: Arc<dyn HttpClientPort>,
    user_agent: String,
}

impl ProxyAwareFetcher {
    pub fn new(app: &AppInfo, status: Arc<dyn StatusPort>, http_client: Arc<dyn HttpClientPort>) -> Self {
        Self {
            status,
            http_client,
            user_agent: app.user_agent(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Decide how `target_url` would be routed under the current status.
    pub fn resolve_tunnel(&self, target_url: &Url) -> Result<Option<Tunnel>> {
        let target = Scheme::of_target(target_url)?;
        let status = self.status.status();

        match select_proxy(&status, target) {
            Some(proxy) => {
                let tunnel = Tunnel::for_target(target, proxy)?;
                debug!(
                    "Selected {} for {} (global proxy: {})",
                    tunnel,
                    target_url,
                    status.uses_global_proxy()
                );
                Ok(Some(tunnel))
            }
            None => {
                debug!("No proxy configured for {}", target_url);
                Ok(None)
            }
        }
    }

    pub async fn fetch(&self, target_url: &str, options: RequestOptions) -> Result<FetchResponse> {
        let url = parse_target(target_url)?;
        let options = options.with_user_agent(&self.user_agent);
        let tunnel = self.resolve_tunnel(&url)?;

        match &tunnel {
            Some(tunnel) => info!("{} {} (via {})", options.method, url, tunnel),
            None => info!("{} {} (via direct)", options.method, url),
        }

        self.http_client.execute(&url, &options, tunnel.as_ref()).await
    }
}

fn parse_target(target_url: &str) -> Result<Url> {
    let url = Url::parse(target_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", target_url, e)))?;
    Scheme::of_target(&url)?;
    Ok(url)
}
