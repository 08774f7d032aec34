//! In-memory app harness for handler tests.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use rusqlite::Connection;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use weekplan_core::config::{DatabaseConfig, WeekplanConfig};

use crate::app::{build_router, AppState};

#[derive(Clone)]
pub(crate) struct TestApp {
    pub state: Arc<AppState>,
    router: Router,
    db: Arc<Mutex<Connection>>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = WeekplanConfig {
            database: DatabaseConfig {
                path: ":memory:".to_string(),
            },
            ..WeekplanConfig::default()
        };
        let db = crate::store::open_store(&config.database).unwrap();
        let state = Arc::new(AppState::with_store(config, db.clone()));
        Self {
            router: build_router(state.clone()),
            state,
            db,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_raw(method, uri, &body.to_string()).await
    }

    pub async fn send_empty(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        self.send_raw(method, uri, "").await
    }

    pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Check in `email` and return the user id.
    pub async fn check_in(&self, email: &str) -> i64 {
        let (status, json) = self
            .send(Method::POST, "/checkin", serde_json::json!({ "email": email }))
            .await;
        assert_eq!(status, StatusCode::OK, "check-in failed: {json}");
        json["data"]["id"].as_i64().unwrap()
    }

    /// Add a schedule and return its `data` object.
    pub async fn add(&self, email: &str, title: &str, day: &str) -> Value {
        let (status, json) = self
            .send(
                Method::POST,
                &format!("/schedule?email={email}"),
                serde_json::json!({ "title": title, "day": day }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add failed: {json}");
        json["data"].clone()
    }

    pub fn user_rows(&self) -> i64 {
        self.count("users")
    }

    pub fn schedule_rows(&self) -> i64 {
        self.count("schedules")
    }

    /// Raw SQL access, bypassing the directory.
    pub fn exec(&self, sql: &str) {
        self.db.lock().unwrap().execute_batch(sql).unwrap();
    }

    fn count(&self, table: &str) -> i64 {
        self.db
            .lock()
            .unwrap()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }
}
