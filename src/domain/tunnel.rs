use std::fmt;
use url::Url;

use super::{FetchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Scheme of a proxy URL. Anything that is not `https` is spoken to as plain HTTP.
    pub fn of_proxy(url: &Url) -> Self {
        match url.scheme() {
            "https" => Scheme::Https,
            _ => Scheme::Http,
        }
    }

    /// Scheme of a request target, which must be http or https.
    pub fn of_target(url: &Url) -> Result<Self> {
        match url.scheme() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(FetchError::InvalidUrl(format!("unsupported scheme {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// How a request reaches its target through a proxy: `<target>Over<proxy>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelMethod {
    HttpOverHttp,
    HttpOverHttps,
    HttpsOverHttp,
    HttpsOverHttps,
}

impl TunnelMethod {
    pub fn select(target: Scheme, proxy: Scheme) -> Self {
        match (target, proxy) {
            (Scheme::Http, Scheme::Http) => TunnelMethod::HttpOverHttp,
            (Scheme::Http, Scheme::Https) => TunnelMethod::HttpOverHttps,
            (Scheme::Https, Scheme::Http) => TunnelMethod::HttpsOverHttp,
            (Scheme::Https, Scheme::Https) => TunnelMethod::HttpsOverHttps,
        }
    }

    pub fn target_scheme(&self) -> Scheme {
        match self {
            TunnelMethod::HttpOverHttp | TunnelMethod::HttpOverHttps => Scheme::Http,
            TunnelMethod::HttpsOverHttp | TunnelMethod::HttpsOverHttps => Scheme::Https,
        }
    }

    pub fn proxy_scheme(&self) -> Scheme {
        match self {
            TunnelMethod::HttpOverHttp | TunnelMethod::HttpsOverHttp => Scheme::Http,
            TunnelMethod::HttpOverHttps | TunnelMethod::HttpsOverHttps => Scheme::Https,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TunnelMethod::HttpOverHttp => "httpOverHttp",
            TunnelMethod::HttpOverHttps => "httpOverHttps",
            TunnelMethod::HttpsOverHttp => "httpsOverHttp",
            TunnelMethod::HttpsOverHttps => "httpsOverHttps",
        }
    }
}

impl fmt::Display for TunnelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelOptions {
    pub host: String,
    /// Only set when the proxy URL names a non-default port.
    pub port: Option<u16>,
    /// `username:password`, only when both halves are present.
    pub proxy_auth: Option<String>,
}

impl TunnelOptions {
    pub fn from_proxy_url(proxy_url: &Url) -> Result<Self> {
        let host = proxy_url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| FetchError::InvalidProxyUrl("missing proxy host".into()))?;

        // Partial credentials are dropped rather than rejected.
        let proxy_auth = match (proxy_url.username(), proxy_url.password()) {
            (user, Some(pass)) if !user.is_empty() && !pass.is_empty() => Some(format!("{}:{}", user, pass)),
            _ => None,
        };

        Ok(Self {
            host: host.to_string(),
            port: proxy_url.port(),
            proxy_auth,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tunnel {
    pub method: TunnelMethod,
    pub options: TunnelOptions,
}

impl Tunnel {
    /// Build the tunnel used to reach a `target` scheme through the proxy at `proxy`.
    pub fn for_target(target: Scheme, proxy: &str) -> Result<Self> {
        // The raw proxy string may hold credentials, keep it out of the error.
        let proxy_url = Url::parse(proxy).map_err(|e| FetchError::InvalidProxyUrl(e.to_string()))?;
        let options = TunnelOptions::from_proxy_url(&proxy_url)?;

        Ok(Self {
            method: TunnelMethod::select(target, Scheme::of_proxy(&proxy_url)),
            options,
        })
    }

    /// `scheme://host[:port]` of the proxy itself, without credentials.
    pub fn proxy_endpoint(&self) -> String {
        let scheme = self.method.proxy_scheme().as_str();
        match self.options.port {
            Some(port) => format!("{}://{}:{}", scheme, self.options.host, port),
            None => format!("{}://{}", scheme, self.options.host),
        }
    }
}

impl fmt::Display for Tunnel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.method, self.proxy_endpoint())
    }
}
