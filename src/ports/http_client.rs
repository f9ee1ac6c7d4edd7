use crate::domain::{FetchResponse, RequestOptions, Result, Tunnel};
use async_trait::async_trait;
use url::Url;

/// Port for the HTTP client requests are delegated to.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    /// Issue the request, through `tunnel` when one is given.
    ///
    /// Client failures are reported as `FetchError::Transport` wrapping the client's own error.
    async fn execute(&self, url: &Url, options: &RequestOptions, tunnel: Option<&Tunnel>) -> Result<FetchResponse>;
}
