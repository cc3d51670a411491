//! Pact-style mock provider for consumer contract tests.
//!
//! # Design
//! Each test starts its own [`MockProvider`] on a random local port,
//! registers the interactions it expects, drives the client against
//! [`MockProvider::base_uri`], and finally calls [`MockProvider::verify`].
//! There is no shared instance; dropping the provider stops its server.
//!
//! Incoming requests are matched against registered interactions in
//! registration order, preferring interactions that have not been hit yet.
//! A request that matches nothing gets a 500 with a diagnostic body and
//! fails verification.

pub mod interaction;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::{net::TcpListener, sync::oneshot, sync::RwLock};
use tracing::{debug, warn};

pub use interaction::{ExpectedRequest, Interaction, ReceivedRequest, StubResponse};

pub const PACT_SPECIFICATION_VERSION: &str = "2.0.0";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("contract not satisfied: {}", .0.join("; "))]
    Verification(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
struct Registered {
    interaction: Interaction,
    hits: usize,
}

#[derive(Debug, Default)]
pub struct Ledger {
    registered: Vec<Registered>,
    received: Vec<ReceivedRequest>,
    unexpected: Vec<(ReceivedRequest, Vec<String>)>,
}

impl Ledger {
    pub fn register(&mut self, interaction: Interaction) {
        self.registered.push(Registered {
            interaction,
            hits: 0,
        });
    }

    pub fn clear(&mut self) {
        *self = Ledger::default();
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.registered.iter().map(|r| r.interaction.clone()).collect()
    }

    /// Record `request` and return the stub it matched, if any.
    fn dispatch(&mut self, request: ReceivedRequest) -> Result<StubResponse, Vec<String>> {
        self.received.push(request.clone());

        let mut candidates: Vec<usize> = Vec::new();
        let mut problems = Vec::new();
        for (index, registered) in self.registered.iter().enumerate() {
            let mismatches = registered.interaction.request.mismatches(&request);
            if mismatches.is_empty() {
                candidates.push(index);
            } else {
                problems.extend(
                    mismatches
                        .into_iter()
                        .map(|m| format!("{}: {m}", registered.interaction.description)),
                );
            }
        }

        let chosen = candidates
            .iter()
            .copied()
            .min_by_key(|&index| self.registered[index].hits);
        match chosen {
            Some(index) => {
                let registered = &mut self.registered[index];
                registered.hits += 1;
                Ok(registered.interaction.response.clone())
            }
            None => {
                self.unexpected.push((request, problems.clone()));
                Err(problems)
            }
        }
    }

    /// Every interaction received exactly once and nothing else.
    pub fn verify(&self) -> Result<(), ProviderError> {
        let mut problems = Vec::new();
        for registered in &self.registered {
            match registered.hits {
                1 => {}
                0 => problems.push(format!(
                    "interaction `{}` was never received",
                    registered.interaction.description
                )),
                n => problems.push(format!(
                    "interaction `{}` was received {n} times",
                    registered.interaction.description
                )),
            }
        }
        for (request, _) in &self.unexpected {
            problems.push(format!("unexpected request {} {}", request.method, request.path));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Verification(problems))
        }
    }

    pub fn pact(&self, consumer: &str, provider: &str) -> Value {
        json!({
            "consumer": { "name": consumer },
            "provider": { "name": provider },
            "interactions": self.interactions(),
            "metadata": { "pactSpecification": { "version": PACT_SPECIFICATION_VERSION } }
        })
    }
}

pub type SharedLedger = Arc<RwLock<Ledger>>;

/// Mock provider routes. Admin endpoints live under `/__admin`; every other
/// path is matched against registered interactions.
pub fn router(ledger: SharedLedger) -> Router {
    Router::new()
        .route(
            "/__admin/interactions",
            get(list_interactions)
                .post(register_interaction)
                .delete(clear_interactions),
        )
        .route("/__admin/verification", get(verification))
        .route("/__admin/pact", get(pact_document))
        .fallback(handle)
        .with_state(ledger)
}

/// Serve a fixed set of interactions until the listener is closed.
pub async fn run(listener: TcpListener, interactions: Vec<Interaction>) -> Result<(), std::io::Error> {
    let ledger = SharedLedger::default();
    {
        let mut ledger = ledger.write().await;
        for interaction in interactions {
            ledger.register(interaction);
        }
    }
    axum::serve(listener, router(ledger)).await
}

async fn handle(
    State(ledger): State<SharedLedger>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request = ReceivedRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect(),
        body,
    };
    debug!(method = %request.method, path = %request.path, "mock provider received request");

    let outcome = ledger.write().await.dispatch(request.clone());
    match outcome {
        Ok(stub) => stub_response(stub),
        Err(problems) => {
            warn!(method = %request.method, path = %request.path, "no interaction matched");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "no interaction matched",
                    "request": request,
                    "mismatches": problems,
                })),
            )
                .into_response()
        }
    }
}

fn stub_response(stub: StubResponse) -> Response {
    let status = StatusCode::from_u16(stub.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    let has_content_type = stub
        .headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case(header::CONTENT_TYPE.as_str()));
    for (name, value) in &stub.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let body = match stub.body {
        Some(value) => {
            if !has_content_type {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
            }
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn list_interactions(State(ledger): State<SharedLedger>) -> Json<Vec<Interaction>> {
    Json(ledger.read().await.interactions())
}

async fn register_interaction(
    State(ledger): State<SharedLedger>,
    Json(interaction): Json<Interaction>,
) -> StatusCode {
    ledger.write().await.register(interaction);
    StatusCode::CREATED
}

async fn clear_interactions(State(ledger): State<SharedLedger>) -> StatusCode {
    ledger.write().await.clear();
    StatusCode::NO_CONTENT
}

async fn verification(State(ledger): State<SharedLedger>) -> (StatusCode, Json<Value>) {
    match ledger.read().await.verify() {
        Ok(()) => (StatusCode::OK, Json(json!({ "verified": true }))),
        Err(ProviderError::Verification(problems)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "verified": false, "problems": problems })),
        ),
        Err(other) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "verified": false, "problems": [other.to_string()] })),
        ),
    }
}

async fn pact_document(State(ledger): State<SharedLedger>) -> Json<Value> {
    Json(ledger.read().await.pact("consumer", "provider"))
}

/// A mock provider bound to a random local port for one test.
pub struct MockProvider {
    consumer: String,
    provider: String,
    addr: SocketAddr,
    ledger: SharedLedger,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockProvider {
    pub async fn start(consumer: &str, provider: &str) -> Result<Self, ProviderError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let ledger = SharedLedger::default();
        let (shutdown, stopped) = oneshot::channel::<()>();

        let app = router(ledger.clone());
        tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = stopped.await;
            });
            if let Err(err) = serve.await {
                warn!(%err, "mock provider stopped with an error");
            }
        });
        debug!(%addr, "mock provider listening");

        Ok(Self {
            consumer: consumer.to_string(),
            provider: provider.to_string(),
            addr,
            ledger,
            shutdown: Some(shutdown),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URI with a trailing slash, suitable for joining relative hrefs.
    pub fn base_uri(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub async fn register(&self, interaction: Interaction) {
        self.ledger.write().await.register(interaction);
    }

    pub async fn received(&self) -> Vec<ReceivedRequest> {
        self.ledger.read().await.received.clone()
    }

    pub async fn verify(&self) -> Result<(), ProviderError> {
        self.ledger.read().await.verify()
    }

    pub async fn pact(&self) -> Value {
        self.ledger.read().await.pact(&self.consumer, &self.provider)
    }

    /// Write the pact to `<dir>/<consumer>-<provider>.json`.
    pub async fn write_pact(&self, dir: &Path) -> Result<PathBuf, ProviderError> {
        let pact = self.pact().await;
        let path = dir.join(format!(
            "{}-{}.json",
            self.consumer.to_lowercase().replace(' ', "_"),
            self.provider.to_lowercase().replace(' ', "_")
        ));
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, serde_json::to_vec_pretty(&pact)?).await?;
        Ok(path)
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
