#![allow(dead_code)]

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use gym_journal_api::{app, config::AppConfig, AppState};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub const USER_HEADER: &str = "x-user-id";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Serve from a dedicated runtime so the server outlives each test's runtime
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build server runtime");
            runtime.block_on(async move {
                let state = AppState::in_memory(&AppConfig::default());
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                    .await
                    .expect("failed to bind test port");
                axum::serve(listener, app(state)).await.expect("server");
            });
        });

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client acting as one user; tests use distinct ids to stay isolated on the shared server
pub struct UserClient {
    pub user_id: String,
    client: reqwest::Client,
    server: &'static TestServer,
}

impl UserClient {
    pub async fn new(user_id: &str) -> Result<Self> {
        Ok(Self {
            user_id: user_id.to_string(),
            client: reqwest::Client::new(),
            server: ensure_server().await?,
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(USER_HEADER, &self.user_id)
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        send(self.authed(self.client.get(self.server.url(path)))).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        send(self.authed(self.client.post(self.server.url(path))).json(&body)).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<(StatusCode, Value)> {
        send(self.authed(self.client.post(self.server.url(path)))).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        send(self.authed(self.client.put(self.server.url(path))).json(&body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        send(self.authed(self.client.patch(self.server.url(path))).json(&body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        send(self.authed(self.client.delete(self.server.url(path)))).await
    }
}

async fn send(builder: RequestBuilder) -> Result<(StatusCode, Value)> {
    let resp = builder.send().await?;
    let status = resp.status();
    let text = resp.text().await?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).with_context(|| format!("non-JSON body: {}", text))?
    };
    Ok((status, body))
}
