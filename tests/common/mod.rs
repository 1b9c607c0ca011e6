//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use banking_agent::config::{AgentConfig, Role, ServiceKind};
use banking_agent::http::HttpServer;
use banking_agent::lifecycle::Shutdown;

pub const TOKEN: &str = "secreto123";

/// A running service; dropping it shuts the server down.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Serve `config` on an ephemeral local port.
pub async fn start_server(mut config: AgentConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = Some(addr.to_string());

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// Start one of the four keyword responders.
pub async fn start_responder(kind: ServiceKind) -> TestServer {
    let mut config = AgentConfig::default();
    config.service.role = Role::from(kind);
    start_server(config).await
}

/// Start an orchestrator pointed at the given downstream base URLs
/// (consultas, cuentas, identidad, ia).
pub async fn start_orchestrator(downstream: [String; 4]) -> TestServer {
    start_server(orchestrator_config(downstream)).await
}

/// Orchestrator configuration with a short downstream timeout.
pub fn orchestrator_config(downstream: [String; 4]) -> AgentConfig {
    let mut config = AgentConfig::default();
    config.service.role = Role::Orchestrator;
    config.timeouts.upstream_secs = 2;
    let [consultas, cuentas, identidad, ia] = downstream;
    config.downstream.consultas = consultas;
    config.downstream.cuentas = cuentas;
    config.downstream.identidad = identidad;
    config.downstream.ia = ia;
    config
}

/// One request seen by a [`RecordingBackend`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

/// Mock responder that records what it receives and echoes the question
/// prefixed with its name.
#[derive(Clone)]
pub struct RecordingBackend {
    pub name: &'static str,
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingBackend {
    pub async fn start(name: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let backend = Self {
            name,
            addr,
            seen: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/respuesta", post(record))
            .with_state(backend.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        backend
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn seen(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }
}

async fn record(
    State(backend): State<RecordingBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let pregunta = body["pregunta"].as_str().unwrap_or_default().to_string();
    backend.seen.lock().unwrap().push(Recorded {
        authorization: header("authorization"),
        request_id: header("x-request-id"),
        body,
    });
    Json(json!({ "respuesta": format!("{}: {}", backend.name, pregunta) }))
}

/// Start a programmable raw-HTTP backend; `f` yields status and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// POST `{"pregunta": ..}` with the default bearer token.
pub async fn ask(url: &str, pregunta: &str) -> reqwest::Response {
    client()
        .post(url)
        .bearer_auth(TOKEN)
        .json(&json!({ "pregunta": pregunta }))
        .send()
        .await
        .expect("service unreachable")
}
