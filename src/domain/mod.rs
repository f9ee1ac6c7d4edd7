pub mod errors;
pub mod models;
pub mod service;
pub mod tunnel;

pub use errors::*;
pub use models::*;
pub use service::{select_proxy, ProxyAwareFetcher};
pub use tunnel::{Scheme, Tunnel, TunnelMethod, TunnelOptions};
