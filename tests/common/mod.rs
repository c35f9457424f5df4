//! Mock CRM server shared by the integration tests.
//!
//! Serves canned JSON on an ephemeral port and records what it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use crm_client::notify::ChannelNotifier;
use crm_client::{Config, CrmContext, Notice};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;

pub const CSRF_TOKEN: &str = "test-token";

/// Query whose suggestions arrive late.
pub const SLOW_QUERY: &str = "ab";

#[derive(Clone, Default)]
pub struct MockState {
    hits: Arc<Mutex<HashMap<String, usize>>>,
    list_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    bulk_requests: Arc<Mutex<Vec<Value>>>,
}

impl MockState {
    fn hit(&self, key: impl Into<String>) {
        *self.hits.lock().unwrap().entry(key.into()).or_default() += 1;
    }

    /// Requests served under `key` (endpoint name, or `endpoint:argument`).
    pub fn hits(&self, key: &str) -> usize {
        self.hits.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    /// Query parameters of every `/leads/` request, oldest first.
    pub fn list_queries(&self) -> Vec<HashMap<String, String>> {
        self.list_queries.lock().unwrap().clone()
    }

    pub fn bulk_requests(&self) -> Vec<Value> {
        self.bulk_requests.lock().unwrap().clone()
    }
}

pub struct MockServer {
    pub base_url: String,
    pub state: MockState,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            csrf_token: Some(CSRF_TOKEN.to_string()),
            debounce_ms: 30,
            blur_grace_ms: 30,
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    /// Context reporting notices to the returned receiver.
    pub fn context(&self) -> (CrmContext, UnboundedReceiver<Notice>) {
        self.context_with(self.config())
    }

    pub fn context_with(&self, config: Config) -> (CrmContext, UnboundedReceiver<Notice>) {
        let (notifier, rx) = ChannelNotifier::channel();
        let ctx = CrmContext::with_notifier(&config, Arc::new(notifier)).unwrap();
        (ctx, rx)
    }
}

/// Every notice received so far.
pub fn drain(rx: &mut UnboundedReceiver<Notice>) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        messages.push(notice.message);
    }
    messages
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/search-items/", get(search_items))
        .route("/api/get-item/", get(get_item))
        .route("/api/get-prospect/", get(get_prospect))
        .route("/api/get-quotation/", get(get_quotation))
        .route("/api/dashboard-data/", get(dashboard_data))
        .route("/api/broken/", get(broken))
        .route("/api/not-json/", get(not_json))
        .route("/api/bulk-delete/", post(bulk_delete))
        .route("/api/bulk-explode/", post(bulk_explode))
        .route("/leads/", get(list_leads))
        .route("/leads/:id/delete/", post(delete_lead))
        .with_state(state)
}

// == Handlers ==

async fn search_items(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    state.hit("search-items");
    state.hit(format!("search-items:{}", q));

    if q == SLOW_QUERY {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    if q == "none" {
        return Json(json!({ "items": [] }));
    }

    Json(json!({
        "items": [
            { "name": format!("{} item", q), "item_code": q.to_uppercase() },
            { "description": format!("{} spare", q), "item_code": format!("{}-2", q.to_uppercase()) }
        ]
    }))
}

async fn get_item(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let code = params.get("item_code").cloned().unwrap_or_default();
    state.hit(format!("get-item:{}", code));

    if code != "AB-100" {
        return Json(json!({ "success": false, "error": "Item not found" }));
    }
    Json(json!({
        "success": true,
        "item": {
            "id": 7,
            "item_code": "AB-100",
            "description": "Anchor bolt",
            "unit_of_measurement": "PCS",
            "standard_price": "12.50",
            "default_tax_percentage": "18.00"
        }
    }))
}

async fn get_prospect(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default();
    state.hit(format!("get-prospect:{}", name));

    if name != "Acme Ltd" {
        return Json(json!({ "success": false, "error": "Prospect not found" }));
    }
    Json(json!({
        "success": true,
        "prospect": {
            "id": 3,
            "name": "Acme Ltd",
            "contact_person": "Jane Roe",
            "email": "jane@acme.test",
            "phone": "+1 555 123 4567",
            "address": "1 Main St"
        }
    }))
}

async fn get_quotation(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let number = params.get("quote_number").cloned().unwrap_or_default();
    state.hit(format!("get-quotation:{}", number));

    if number != "Q-2024-001" {
        return Json(json!({ "success": false, "error": "Quotation not found" }));
    }
    Json(json!({
        "success": true,
        "quotation": { "quote_number": "Q-2024-001", "prospect_name": "Acme Ltd", "currency": "USD" },
        "items": [
            { "line_number": 1, "item_code": "AB-100", "quantity": "2", "unit_price": "25.00",
              "discount_percentage": "10", "tax_percentage": "20" },
            { "line_number": 2, "item_code": "CD-200", "quantity": "1", "unit_price": "6.50" }
        ]
    }))
}

async fn dashboard_data(State(state): State<MockState>) -> Json<Value> {
    state.hit("dashboard-data");
    Json(json!({
        "visits_today": 4,
        "visits_month": 38,
        "total_leads": 120,
        "conversion_rate": 12.5,
        "converted_count": 15,
        "leads_by_stage": [ { "status": "new", "count": 7 }, { "status": "qualified", "count": 3 } ],
        "upcoming_followups": [],
        "timestamp": "2024-03-09T10:00:00Z"
    }))
}

async fn broken(State(state): State<MockState>) -> StatusCode {
    state.hit("broken");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn not_json(State(state): State<MockState>) -> &'static str {
    state.hit("not-json");
    "<html>login</html>"
}

async fn bulk_delete(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    bulk_action(state, "delete", headers, body)
}

async fn bulk_explode(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    bulk_action(state, "explode", headers, body)
}

fn bulk_action(state: MockState, action: &str, headers: HeaderMap, body: Value) -> Response {
    state.hit(format!("bulk-{}", action));

    let token = headers.get("X-CSRFToken").and_then(|v| v.to_str().ok());
    if token != Some(CSRF_TOKEN) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if action == "explode" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    state.bulk_requests.lock().unwrap().push(body);
    Json(json!({ "success": true })).into_response()
}

async fn list_leads(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.hit("leads");
    state.list_queries.lock().unwrap().push(params.clone());

    if let Some(format) = params.get("export") {
        return format!("id,name,format={}\n1,Acme\n", format).into_response();
    }
    if params.get("search").map(String::as_str) == Some("fail") {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if headers.get("X-Requested-With").and_then(|v| v.to_str().ok()) != Some("XMLHttpRequest") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let page: u64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "items": [
            { "id": page * 10 + 1, "name": "Acme" },
            { "id": page * 10 + 2, "name": "Globex" }
        ],
        "total_count": 45
    }))
    .into_response()
}

async fn delete_lead(State(state): State<MockState>, Path(id): Path<String>, headers: HeaderMap) -> StatusCode {
    state.hit(format!("delete:{}", id));
    match headers.get("X-CSRFToken").and_then(|v| v.to_str().ok()) {
        Some(CSRF_TOKEN) => StatusCode::OK,
        _ => StatusCode::FORBIDDEN,
    }
}
