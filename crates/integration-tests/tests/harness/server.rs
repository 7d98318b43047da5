use std::net::SocketAddr;

use errs_config::Config;
use errs_server::Server;
use reqwest::Response;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Reference service bound to an ephemeral local port, stopped on drop
pub struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    shutdown: CancellationToken,
}

impl TestServer {
    pub async fn start() -> anyhow::Result<Self> {
        Self::with_config(&Config::default()).await
    }

    pub async fn with_config(config: &Config) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let router = Server::new(config).into_router();

        let shutdown = CancellationToken::new();
        let stopped = shutdown.clone().cancelled_owned();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).with_graceful_shutdown(stopped).await {
                eprintln!("test server on {addr} failed: {e}");
            }
        });

        Ok(Self {
            addr,
            client: reqwest::Client::new(),
            shutdown,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client.post(self.url(path)).json(body).send().await.unwrap()
    }

    /// Post `body` verbatim as `application/json`, well-formed or not
    pub async fn post_raw_json(&self, path: &str, body: &'static str) -> Response {
        self.client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
