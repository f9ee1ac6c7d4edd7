pub use http::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const USER_AGENT: &str = "User-Agent";

/// Proxy configuration as persisted by the owning settings subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Status {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_proxy: Option<bool>,
}

impl Status {
    pub fn with_http_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.http_proxy = Some(proxy.into());
        self
    }

    pub fn with_https_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.https_proxy = Some(proxy.into());
        self
    }

    pub fn with_global_proxy(mut self, global: bool) -> Self {
        self.global_proxy = Some(global);
        self
    }

    /// The HTTP proxy, if set to a non-empty string.
    pub fn configured_http_proxy(&self) -> Option<&str> {
        non_empty(self.http_proxy.as_deref())
    }

    /// The HTTPS proxy, if set to a non-empty string.
    pub fn configured_https_proxy(&self) -> Option<&str> {
        non_empty(self.https_proxy.as_deref())
    }

    pub fn uses_global_proxy(&self) -> bool {
        self.global_proxy.unwrap_or(false)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Identity of the calling application, announced in the User-Agent header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub homepage: String,
}

impl AppInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>, homepage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            homepage: homepage.into(),
        }
    }

    pub fn user_agent(&self) -> String {
        format!("{}/{} (+{})", self.name, self.version, self.homepage)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// Handed to the HTTP client as is.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Caller headers plus our User-Agent, which always wins whatever its casing.
    pub(crate) fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.headers.retain(|name, _| !name.eq_ignore_ascii_case(USER_AGENT));
        self.headers.insert(USER_AGENT.to_string(), user_agent.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    /// Response headers as received, repeated names and opaque values included.
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
