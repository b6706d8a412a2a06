#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use godown_api::{
    auth::{AdminSession, DEFAULT_ADMIN_PASSCODE},
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    middleware_helpers::request_id_middleware,
    models::{Feed, FeedCategory, NewFeed},
    store::{Collection, Document, DocumentStore, Fields, InMemoryStore, SeaOrmStore, StoreError},
    AppState,
};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;
use tower::ServiceExt;

pub fn test_config() -> AppConfig {
    AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    )
}

/// A SQL-backed store over a fresh in-memory SQLite database.
pub async fn sqlite_store() -> SeaOrmStore {
    let mut cfg = test_config();
    // every pooled connection to sqlite::memory: would see its own database
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .expect("failed to create test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations in tests");
    SeaOrmStore::new(pool)
}

/// Which write a [`FailingStore`] should break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
}

#[derive(Debug)]
struct FailureRule {
    op: WriteOp,
    collection: Collection,
    remaining: usize,
}

/// In-memory store that fails one chosen write with `StoreError::Unavailable`.
/// Reads and every other write pass through.
#[derive(Default)]
pub struct FailingStore {
    inner: InMemoryStore,
    rule: Mutex<Option<FailureRule>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the `nth` (1-based) matching write from now on, once.
    pub fn fail_nth(&self, op: WriteOp, collection: Collection, nth: usize) {
        *self.rule.lock().unwrap() = Some(FailureRule {
            op,
            collection,
            remaining: nth,
        });
    }

    fn check(&self, op: WriteOp, collection: Collection) -> Result<(), StoreError> {
        let mut guard = self.rule.lock().unwrap();
        let Some(rule) = guard.as_mut() else {
            return Ok(());
        };
        if rule.op != op || rule.collection != collection {
            return Ok(());
        }
        rule.remaining -= 1;
        if rule.remaining == 0 {
            *guard = None;
            return Err(StoreError::Unavailable(format!(
                "injected {:?} failure on {}",
                op, collection
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn list_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        self.inner.list_all(collection).await
    }

    async fn create(&self, collection: Collection, fields: Fields) -> Result<Document, StoreError> {
        self.check(WriteOp::Create, collection)?;
        self.inner.create(collection, fields).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        self.check(WriteOp::Update, collection)?;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }
}

/// Helper harness for spinning up an application over a document store.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Application over a fresh in-memory store.
    pub async fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    /// Application over a fresh SQLite database.
    pub async fn with_sqlite() -> Self {
        Self::with_store(Arc::new(sqlite_store().await))
    }

    /// Application over a [`FailingStore`], returned alongside it for arming.
    pub fn with_failing_store() -> (Self, Arc<FailingStore>) {
        let store = Arc::new(FailingStore::new());
        (Self::with_store(store.clone()), store)
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let cfg = test_config();
        let (event_sender, event_rx) = EventSender::channel(256);
        let event_task = tokio::spawn(events::process_events(event_rx, cfg.low_stock_threshold));

        let state = AppState::new(store, cfg, event_sender);
        let router = Router::new()
            .nest("/api/v1", godown_api::api_v1_routes())
            .layer(axum::middleware::from_fn(request_id_middleware))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    pub fn admin_session(&self) -> AdminSession {
        self.state
            .admin_gate
            .authenticate(DEFAULT_ADMIN_PASSCODE)
            .expect("default passcode opens a session")
    }

    pub fn admin_token(&self) -> String {
        let session = self.admin_session();
        self.state
            .admin_gate
            .issue_token(&session)
            .expect("token signs")
    }

    /// Adds a feed through the catalog service, returning it.
    pub async fn add_feed(
        &self,
        name: &str,
        category: FeedCategory,
        initial_quantity: Option<u32>,
    ) -> Feed {
        let session = self.admin_session();
        self.services()
            .catalog
            .add_feed(
                &session,
                NewFeed {
                    name: name.to_string(),
                    category,
                    price: Decimal::new(1250, 0),
                    initial_quantity,
                },
            )
            .await
            .expect("feed added")
            .feed
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body), None).await
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
