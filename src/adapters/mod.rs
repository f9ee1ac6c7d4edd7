pub mod reqwest_client;
pub mod status;

pub use reqwest_client::ReqwestHttpClient;
pub use status::*;
