#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::Utc;
use products_api::{
    app_router,
    config::AppConfig,
    db::{self, DbConfig},
    entities::ProductModel,
    handlers::AppServices,
    repositories::{ProductRepository, RepositoryError},
    AppState,
};
use sea_orm::DbErr;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up the application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let state = AppState::new(Arc::new(Self::fresh_pool().await), Self::config());
        Self::from_state(state)
    }

    /// Construct a test application whose product service runs on `repository`.
    pub async fn with_repository(repository: Arc<dyn ProductRepository>) -> Self {
        let state = AppState {
            db: Arc::new(Self::fresh_pool().await),
            config: Self::config(),
            services: AppServices::with_repository(repository),
        };
        Self::from_state(state)
    }

    fn from_state(state: AppState) -> Self {
        Self {
            router: app_router(state.clone()),
            state,
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            environment: "test".to_string(),
            db_max_connections: 1,
            db_min_connections: 1,
            ..AppConfig::default()
        }
    }

    async fn fresh_pool() -> db::DbPool {
        let pool = db::establish_connection_with_config(&DbConfig::in_memory_sqlite())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        pool
    }

    /// Sends a request with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    /// Sends a request with a raw body and explicit headers.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        self.send(
            builder
                .body(Body::from(body.to_owned()))
                .expect("failed to build request"),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Creates a product through the API and returns its JSON body.
    pub async fn create_product(&self, name: &str, price: i64, stock: i32) -> Value {
        let response = self
            .request(
                Method::POST,
                "/products",
                Some(serde_json::json!({ "name": name, "price": price, "stock": stock })),
            )
            .await;
        assert_eq!(response.status(), 201, "product creation should succeed");
        response_json(response).await
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = response_bytes(response).await;
    serde_json::from_slice(&bytes).expect("json response")
}

pub async fn response_bytes(response: Response) -> Vec<u8> {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes")
        .to_vec()
}

/// Product repository kept in a vector, with switchable failures.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<ProductModel>>,
    fail_reads: AtomicBool,
    fail_creates: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `find_all` fail with a database error.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent insert fail with a constraint error.
    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent update and delete fail with a database error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Every stored row, soft-deleted ones included.
    pub fn snapshot(&self) -> Vec<ProductModel> {
        self.products.lock().unwrap().clone()
    }

    fn check(flag: &AtomicBool, message: &str) -> Result<(), RepositoryError> {
        if flag.load(Ordering::SeqCst) {
            Err(RepositoryError::Database(DbErr::Custom(message.to_string())))
        } else {
            Ok(())
        }
    }

    fn check_writes(&self) -> Result<(), RepositoryError> {
        Self::check(&self.fail_writes, "disk I/O error")
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        Self::check(&self.fail_reads, "database is locked")?;
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !p.is_deleted())
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<ProductModel, RepositoryError> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && !p.is_deleted())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, mut product: ProductModel) -> Result<ProductModel, RepositoryError> {
        Self::check(&self.fail_creates, "UNIQUE constraint failed: products.id")?;
        if product.id.is_empty() {
            product.id = Uuid::new_v4().to_string();
        }
        let now = Utc::now();
        product.created_at = now;
        product.updated_at = now;
        product.deleted_at = None;

        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: &str,
        mut product: ProductModel,
    ) -> Result<ProductModel, RepositoryError> {
        self.check_writes()?;

        let mut products = self.products.lock().unwrap();
        let stored = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        product.id = stored.id.clone();
        product.created_at = stored.created_at;
        product.updated_at = Utc::now();
        *stored = product.clone();
        Ok(product)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.check_writes()?;

        let now = Utc::now();
        for product in self
            .products
            .lock()
            .unwrap()
            .iter_mut()
            .filter(|p| p.id == id && !p.is_deleted())
        {
            product.deleted_at = Some(now);
        }
        Ok(())
    }
}
