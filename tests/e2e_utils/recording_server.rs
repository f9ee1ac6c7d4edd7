#![cfg(test)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::HeaderValue;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Request target as sent: origin-form, absolute-form or authority-form.
    pub uri: String,
    /// Header names are lowercase.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Local HTTP/1 server recording every request it sees.
///
/// Plays both the origin and a forward proxy: answers 200 "ok" to regular
/// requests, 404 to paths ending in `/missing` and refuses CONNECT with 502.
/// Paths ending in `/cookies` also get two `set-cookie` headers and an
/// `x-opaque` header whose value is not UTF-8.
pub struct RecordingServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _server_handle: JoinHandle<()>,
}

impl RecordingServer {
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let server_handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = recorded.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let recorded = recorded.clone();
                        async move { Ok::<_, Infallible>(Self::handle(req, recorded).await) }
                    });

                    if let Err(_err) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        // Silently handle errors in test
                    }
                });
            }
        });

        Ok(Self {
            addr,
            requests,
            _server_handle: server_handle,
        })
    }

    async fn handle(req: Request<Incoming>, recorded: Arc<Mutex<Vec<RecordedRequest>>>) -> Response<Full<Bytes>> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await.map(|b| b.to_bytes().to_vec()).unwrap_or_default();

        let headers = parts
            .headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.as_str().to_string(), val.to_string())))
            .collect();

        recorded.lock().unwrap().push(RecordedRequest {
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            headers,
            body,
        });

        let (status, body) = if parts.method == Method::CONNECT {
            (StatusCode::BAD_GATEWAY, Bytes::new())
        } else if parts.uri.path().ends_with("/missing") {
            (StatusCode::NOT_FOUND, Bytes::from_static(b"missing"))
        } else {
            (StatusCode::OK, Bytes::from_static(b"ok"))
        };

        let mut response = Response::builder()
            .status(status)
            .header("x-recorded-by", "recording-server");
        if parts.uri.path().ends_with("/cookies") {
            response = response
                .header("set-cookie", "session=abc; Path=/")
                .header("set-cookie", "theme=dark; Path=/")
                .header("x-opaque", HeaderValue::from_bytes(b"caf\xe9").unwrap());
        }

        response.body(Full::new(body)).unwrap()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:<port>`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}
