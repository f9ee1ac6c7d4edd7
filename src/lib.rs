//! Proxy-aware HTTP fetching.
//!
//! [`domain::ProxyAwareFetcher`] reads the stored proxy status through a
//! [`ports::StatusPort`], picks the proxy tunnel a request should use and hands
//! the request to a [`ports::HttpClientPort`].

pub mod adapters;
pub mod domain;
pub mod ports;
