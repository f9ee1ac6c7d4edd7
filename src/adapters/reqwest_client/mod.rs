use async_trait::async_trait;
use base64::Engine;
use std::collections::HashMap;
use url::Url;

use crate::domain::{FetchError, FetchResponse, RequestOptions, Result, Scheme, Tunnel};
use crate::ports::HttpClientPort;

pub struct ReqwestHttpClient;

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttpClient {
    async fn execute(&self, url: &Url, options: &RequestOptions, tunnel: Option<&Tunnel>) -> Result<FetchResponse> {
        let builder = match tunnel {
            Some(tunnel) => reqwest::Client::builder().proxy(build_proxy(tunnel)?),
            // Explicitly disable system proxies for direct connections
            None => reqwest::Client::builder().no_proxy(),
        };

        let client = builder.build().map_err(FetchError::transport)?;

        let mut request = apply_headers(client.request(options.method.clone(), url.as_str()), &options.headers);

        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let http_response = request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(FetchError::transport)?;

        let status = http_response.status();

        let headers = http_response.headers().clone();

        let body = http_response.bytes().await.map_err(FetchError::transport)?.to_vec();

        log::debug!("{} answered {} ({} bytes)", url, status, body.len());

        Ok(FetchResponse::new(status).with_headers(headers).with_body(body))
    }
}

/// Target scheme reqwest intercepts for this tunnel, and the proxy endpoint it dials.
fn proxy_route(tunnel: &Tunnel) -> (Scheme, String) {
    (tunnel.method.target_scheme(), tunnel.proxy_endpoint())
}

fn build_proxy(tunnel: &Tunnel) -> Result<reqwest::Proxy> {
    let (intercepted, endpoint) = proxy_route(tunnel);

    let proxy = match intercepted {
        Scheme::Http => reqwest::Proxy::http(&endpoint),
        Scheme::Https => reqwest::Proxy::https(&endpoint),
    }
    .map_err(|e| FetchError::InvalidProxyUrl(format!("Failed to create proxy: {}", e)))?;

    match &tunnel.options.proxy_auth {
        Some(auth) => Ok(proxy.custom_http_auth(proxy_authorization(auth)?)),
        None => Ok(proxy),
    }
}

fn proxy_authorization(auth: &str) -> Result<reqwest::header::HeaderValue> {
    let encoded = base64::prelude::BASE64_STANDARD.encode(auth);
    let mut value = reqwest::header::HeaderValue::from_str(&format!("Basic {}", encoded))
        .map_err(|e| FetchError::InvalidProxyUrl(format!("Invalid proxy credentials: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Invalid names or values surface as a builder error when the request is sent.
fn apply_headers(mut request: reqwest::RequestBuilder, headers: &HashMap<String, String>) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    request
}
