// In-process HTTP server standing in for the provider
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn xml(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/xml",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn pdf(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            content_type: "application/pdf",
            body: body.to_vec(),
        }
    }
}

pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn only_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

fn router(reply: Reply, requests: Arc<Mutex<Vec<Recorded>>>) -> Router {
    Router::new().fallback(
        move |method: Method,
              uri: Uri,
              Query(query): Query<Vec<(String, String)>>,
              headers: HeaderMap,
              body: Bytes| {
            let reply = reply.clone();
            let requests = Arc::clone(&requests);
            async move {
                requests.lock().push(Recorded {
                    method,
                    path: uri.path().to_string(),
                    query,
                    headers,
                    body,
                });
                (
                    StatusCode::from_u16(reply.status).unwrap(),
                    [(header::CONTENT_TYPE, reply.content_type)],
                    reply.body,
                )
            }
        },
    )
}

/// Starts a server on a random local port answering every request with `reply`.
pub async fn start(reply: Reply) -> MockServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(reply, Arc::clone(&requests));
    tokio::spawn(async move { axum::serve(listener, app).await });
    MockServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// Same as [`start`] but on a dedicated thread, for blocking clients.
pub fn start_on_thread(reply: Reply) -> MockServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let app = router(reply, Arc::clone(&requests));

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, app).await
        })
        .unwrap();
    });

    MockServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}
