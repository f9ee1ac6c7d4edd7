pub mod http_client;
pub mod status;

pub use http_client::HttpClientPort;
pub use status::StatusPort;
