use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{self, AsyncWriteExt};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use proxyfetch::adapters::{ConfyStatusStore, ReqwestHttpClient};
use proxyfetch::domain::{AppInfo, Method, ProxyAwareFetcher, RequestOptions};

#[derive(Parser, Debug)]
#[clap(version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Opts {
    /// URL to fetch
    url: String,

    /// Proxy status file, defaults to the per-user proxyfetch status
    #[clap(long, short = 's')]
    status: Option<PathBuf>,

    /// Request method
    #[clap(long, short = 'X', default_value = "GET", value_parser = parse_method)]
    method: Method,

    /// Extra request header, as "Name: value"
    #[clap(long = "header", short = 'H', value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Request body
    #[clap(long, short = 'd')]
    data: Option<String>,

    /// Request timeout, in seconds
    #[clap(long)]
    timeout: Option<u64>,

    /// Print the route the request would take, without sending it
    #[clap(long)]
    dry_run: bool,
}

fn parse_method(raw: &str) -> Result<Method, String> {
    Method::from_bytes(raw.to_uppercase().as_bytes()).map_err(|e| format!("invalid method {raw:?}: {e}"))
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("invalid header {raw:?}, expected \"Name: value\""))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();

    let status = match &opts.status {
        Some(path) => ConfyStatusStore::open(path)?,
        None => ConfyStatusStore::open_default()?,
    };
    debug!("Using proxy status from {}", status.path().display());

    let app = AppInfo::new(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_HOMEPAGE"),
    );
    let fetcher = ProxyAwareFetcher::new(&app, Arc::new(status), Arc::new(ReqwestHttpClient::new()));

    if opts.dry_run {
        let url = Url::parse(&opts.url)?;
        match fetcher.resolve_tunnel(&url)? {
            Some(tunnel) => println!("{tunnel}"),
            None => println!("direct"),
        }
        return Ok(());
    }

    let mut options = RequestOptions::new(opts.method).with_headers(opts.headers.into_iter().collect());
    if let Some(data) = opts.data {
        options = options.with_body(data);
    }
    if let Some(secs) = opts.timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }

    let response = fetcher.fetch(&opts.url, options).await?;
    info!("{} ({} bytes)", response.status, response.body.len());

    let mut stdout = io::stdout();
    stdout.write_all(&response.body).await?;
    stdout.flush().await?;

    Ok(())
}
