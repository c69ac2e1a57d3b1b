//! In-process fake of the inventory backend, bound to an ephemeral port.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use shelfline_auth::{MemoryTokenStore, Session, TokenStore};
use shelfline_client::{ClientConfig, Clock, Dashboard, ManualClock, RecordingNavigator};

pub const VALID_TOKEN: &str = "valid-token";
pub const PASSWORD: &str = "secret";

#[derive(Clone)]
struct Refusal {
    status: StatusCode,
    detail: Option<String>,
}

#[derive(Default)]
pub struct Backend {
    hits: Mutex<HashMap<String, usize>>,
    warehouse: Mutex<Vec<Value>>,
    store: Mutex<Vec<Value>>,
    refusals: Mutex<HashMap<String, Refusal>>,
    stalls: Mutex<HashMap<String, Duration>>,
    pub revoke_tokens: AtomicBool,
    next_id: AtomicI64,
}

impl Backend {
    pub fn seeded() -> Arc<Self> {
        let backend = Backend {
            next_id: AtomicI64::new(1000),
            ..Default::default()
        };
        *backend.warehouse.lock().unwrap() = vec![
            warehouse_item(1, "Milk", 20),
            warehouse_item(2, "Bread", 5),
        ];
        *backend.store.lock().unwrap() = vec![
            store_item(10, "Milk", 8, 4.0),
            store_item(11, "Cheese", 2, 10.0),
        ];
        Arc::new(backend)
    }

    /// How many times `"METHOD /path"` was requested.
    pub fn hits(&self, key: &str) -> usize {
        self.hits.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn hit(&self, key: &str) {
        *self.hits.lock().unwrap().entry(key.to_string()).or_insert(0) += 1;
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Answer `"METHOD /path"` with 400 and this `detail` from now on.
    pub fn reject(&self, key: &str, detail: &str) {
        self.refuse(key, StatusCode::BAD_REQUEST, Some(detail));
    }

    /// Answer `"METHOD /path"` with `status` and a body that carries no `detail`.
    pub fn fail(&self, key: &str, status: StatusCode) {
        self.refuse(key, status, None);
    }

    pub fn recover(&self, key: &str) {
        self.refusals.lock().unwrap().remove(key);
    }

    fn refuse(&self, key: &str, status: StatusCode, detail: Option<&str>) {
        self.refusals.lock().unwrap().insert(
            key.to_string(),
            Refusal {
                status,
                detail: detail.map(str::to_string),
            },
        );
    }

    /// Hold every `"METHOD /path"` request for `by` before answering.
    pub fn stall(&self, key: &str, by: Duration) {
        self.stalls.lock().unwrap().insert(key.to_string(), by);
    }

    /// Count the request, reject it unless it carries the valid token, then
    /// apply any configured stall or refusal.
    async fn guard(&self, key: &str, headers: &HeaderMap) -> Result<(), Response> {
        self.hit(key);
        let presented = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if self.revoke_tokens.load(Ordering::SeqCst) || presented != Some(VALID_TOKEN) {
            return Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"));
        }
        self.stall_and_refuse(key).await
    }

    async fn stall_and_refuse(&self, key: &str) -> Result<(), Response> {
        let stall = self.stalls.lock().unwrap().get(key).copied();
        if let Some(by) = stall {
            tokio::time::sleep(by).await;
        }
        let refusal = self.refusals.lock().unwrap().get(key).cloned();
        match refusal {
            Some(Refusal { status, detail: Some(msg) }) => Err(detail(status, &msg)),
            Some(Refusal { status, detail: None }) => {
                Err((status, "<html>upstream down</html>").into_response())
            }
            None => Ok(()),
        }
    }
}

pub fn warehouse_item(id: i64, name: &str, quantity: i64) -> Value {
    json!({
        "id": id,
        "product": {"id": id, "name": name, "barcode": format!("460{id}")},
        "quantity": quantity,
        "batch_code": format!("B-{id}"),
        "expire_date": "2030-01-01",
        "status": "in_stock",
        "urgency_level": "normal"
    })
}

pub fn store_item(id: i64, name: &str, quantity: i64, price: f64) -> Value {
    json!({
        "id": id,
        "product": {"id": id, "name": name},
        "quantity": quantity,
        "price": price,
        "status": "active",
        "discounts": []
    })
}

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

fn user() -> Value {
    json!({"id": 1, "username": "jdoe", "email": "john.doe@x.com", "role": "manager"})
}

type Shared = State<Arc<Backend>>;

async fn login(State(b): Shared, Json(body): Json<Value>) -> Response {
    b.hit("POST /auth/login");
    if body["password"] == PASSWORD {
        Json(json!({"access_token": VALID_TOKEN, "token_type": "bearer", "user": user()}))
            .into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect username or password")
    }
}

async fn register(State(b): Shared, Json(body): Json<Value>) -> Response {
    b.hit("POST /auth/register");
    if body["username"] == "jdoe" {
        return detail(StatusCode::BAD_REQUEST, "Username already registered");
    }
    Json(json!({
        "id": b.next_id(),
        "username": body["username"],
        "email": body["email"],
        "full_name": body.get("full_name").cloned().unwrap_or(Value::Null)
    }))
    .into_response()
}

async fn verify(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("POST /auth/verify", &headers).await {
        return resp;
    }
    Json(user()).into_response()
}

async fn logout(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("POST /auth/logout", &headers).await {
        return resp;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_warehouse(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("GET /warehouse/items", &headers).await {
        return resp;
    }
    Json(Value::Array(b.warehouse.lock().unwrap().clone())).into_response()
}

async fn delete_warehouse(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = b.guard("DELETE /warehouse/items", &headers).await {
        return resp;
    }
    let ids: Vec<i64> = body["item_ids"]
        .as_array()
        .map(|a| a.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();
    let mut items = b.warehouse.lock().unwrap();
    let before = items.len();
    items.retain(|i| !ids.contains(&i["id"].as_i64().unwrap()));
    Json(json!({"deleted": before - items.len()})).into_response()
}

async fn upload(State(b): Shared, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(resp) = b.guard("POST /warehouse/upload", &headers).await {
        return resp;
    }
    let text = String::from_utf8_lossy(&body);
    let rows = text.lines().filter(|l| l.starts_with("sku-")).count() as i64;
    let mut items = b.warehouse.lock().unwrap();
    for _ in 0..rows {
        let id = b.next_id();
        items.push(warehouse_item(id, "Imported", 1));
    }
    Json(json!({"created": rows, "skipped": 0, "errors": []})).into_response()
}

/// Take `qty` units off the first warehouse batch matching `pick` and put them
/// on the floor at `price`.
fn transfer(b: &Backend, pick: impl Fn(&Value) -> bool, qty: i64, price: f64) -> Response {
    let mut warehouse = b.warehouse.lock().unwrap();
    let Some(pos) = warehouse.iter().position(pick) else {
        return detail(StatusCode::NOT_FOUND, "Warehouse item not found");
    };
    let have = warehouse[pos]["quantity"].as_i64().unwrap();
    if qty > have {
        return detail(StatusCode::BAD_REQUEST, "Not enough quantity in warehouse");
    }
    if have == qty {
        warehouse.remove(pos);
    } else {
        warehouse[pos]["quantity"] = json!(have - qty);
    }

    let created = store_item(b.next_id(), "Moved", qty, price);
    b.store.lock().unwrap().push(created.clone());
    Json(created).into_response()
}

async fn to_store(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = b.guard("POST /warehouse/to-store", &headers).await {
        return resp;
    }
    let wid = body["warehouse_item_id"].as_i64().unwrap_or_default();
    let qty = body["quantity"].as_i64().unwrap_or_default();
    let price = body["price"].as_f64().unwrap_or_default();
    transfer(&b, |i| i["id"] == wid, qty, price)
}

async fn to_store_by_barcode(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = b.guard("POST /warehouse/to-store-by-barcode", &headers).await {
        return resp;
    }
    let barcode = body["barcode"].as_str().unwrap_or_default().to_string();
    let qty = body["quantity"].as_i64().unwrap_or_default();
    let price = body["price"].as_f64().unwrap_or_default();
    transfer(&b, |i| i["product"]["barcode"] == barcode.as_str(), qty, price)
}

async fn add_warehouse(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = b.guard("POST /warehouse/items", &headers).await {
        return resp;
    }
    let mut item = warehouse_item(
        b.next_id(),
        "Received",
        body["quantity"].as_i64().unwrap_or_default(),
    );
    item["product"]["id"] = body["product_id"].clone();
    item["batch_code"] = body["batch_code"].clone();
    item["expire_date"] = body["expire_date"].clone();
    b.warehouse.lock().unwrap().push(item.clone());
    Json(item).into_response()
}

async fn create_store(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = b.guard("POST /store/items", &headers).await {
        return resp;
    }
    let item = store_item(
        b.next_id(),
        "Direct",
        body["quantity"].as_i64().unwrap_or_default(),
        body["price"].as_f64().unwrap_or_default(),
    );
    b.store.lock().unwrap().push(item.clone());
    Json(item).into_response()
}

async fn list_store(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("GET /store/items", &headers).await {
        return resp;
    }
    Json(Value::Array(b.store.lock().unwrap().clone())).into_response()
}

async fn list_sales(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("GET /store/sales", &headers).await {
        return resp;
    }
    Json(json!([])).into_response()
}

async fn record_sale(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = b.guard("POST /store/sales", &headers).await {
        return resp;
    }
    let sid = body["store_item_id"].as_i64().unwrap_or_default();
    let qty = body["quantity"].as_i64().unwrap_or_default();
    let price = body["price"].as_f64().unwrap_or_default();

    let mut store = b.store.lock().unwrap();
    if let Some(pos) = store.iter().position(|i| i["id"] == sid) {
        let left = store[pos]["quantity"].as_i64().unwrap() - qty;
        if left <= 0 {
            store.remove(pos);
        } else {
            store[pos]["quantity"] = json!(left);
        }
    }
    Json(json!({
        "id": b.next_id(),
        "store_item_id": sid,
        "quantity": qty,
        "price": price,
        "total": price * qty as f64,
        "sold_at": "2024-05-01T10:00:00"
    }))
    .into_response()
}

async fn discount(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = b.guard("POST /store/discount", &headers).await {
        return resp;
    }
    Json(json!({
        "id": b.next_id(),
        "store_item_id": body["store_item_id"],
        "percentage": body["percentage"]
    }))
    .into_response()
}

async fn expire(State(b): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(resp) = b.guard("POST /store/expire", &headers).await {
        return resp;
    }
    let mut store = b.store.lock().unwrap();
    let Some(pos) = store.iter().position(|i| i["id"] == id) else {
        return detail(StatusCode::NOT_FOUND, "Store item not found");
    };
    let mut item = store.remove(pos);
    item["status"] = json!("expired");
    Json(item).into_response()
}

async fn remove(
    State(b): Shared,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = b.guard("POST /store/remove", &headers).await {
        return resp;
    }
    let mut store = b.store.lock().unwrap();
    let Some(pos) = store.iter().position(|i| i["id"] == id) else {
        return detail(StatusCode::NOT_FOUND, "Store item not found");
    };
    let item = store.remove(pos);
    Json(json!({
        "id": b.next_id(),
        "store_item_id": id,
        "quantity": item["quantity"],
        "reason": body.get("reason").cloned().unwrap_or(Value::Null)
    }))
    .into_response()
}

async fn reports(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("GET /store/reports", &headers).await {
        return resp;
    }
    let sales = b.hits("POST /store/sales") as i64;
    Json(json!({"total_sales": sales, "total_revenue": 0.0, "active_items": b.store.lock().unwrap().len()}))
        .into_response()
}

async fn forecast(State(b): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(resp) = b.guard(&format!("GET /prediction/forecast/{id}"), &headers).await {
        return resp;
    }
    Json(json!([
        {"period_start": "2024-05-01", "period_end": "2024-05-07", "forecast_qty": 10.0 * id as f64,
         "lower_bound": 5.0, "upper_bound": 15.0}
    ]))
    .into_response()
}

async fn products(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("GET /prediction/products", &headers).await {
        return resp;
    }
    Json(json!([{"id": 1, "name": "Milk", "category": "Dairy"}])).into_response()
}

async fn categories(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("GET /prediction/categories", &headers).await {
        return resp;
    }
    Json(json!([{"name": "Dairy", "product_count": 2}, {"name": "Bakery", "product_count": 1}]))
        .into_response()
}

async fn stats(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("GET /prediction/stats", &headers).await {
        return resp;
    }
    Json(json!({"products_tracked": 3, "forecasts_generated": 12, "mean_absolute_error": 1.5}))
        .into_response()
}

async fn analytics(State(b): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(resp) = b.guard(&format!("GET /prediction/analytics/{id}"), &headers).await {
        return resp;
    }
    Json(json!({"product_id": id, "total_sold": 40 * id, "average_daily_sales": 2.5, "waste_rate": 0.1}))
        .into_response()
}

async fn trends(State(b): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(resp) = b.guard(&format!("GET /prediction/trends/{id}"), &headers).await {
        return resp;
    }
    Json(json!([
        {"date": "2024-05-01", "quantity": 3.0, "direction": "up"},
        {"date": "2024-05-02", "quantity": 2.0 + id as f64, "direction": "flat"}
    ]))
    .into_response()
}

async fn insights(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.guard("GET /prediction/insights", &headers).await {
        return resp;
    }
    (StatusCode::BAD_GATEWAY, "<html>upstream down</html>").into_response()
}

pub fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/verify", post(verify))
        .route("/auth/logout", post(logout))
        .route(
            "/warehouse/items",
            get(list_warehouse).post(add_warehouse).delete(delete_warehouse),
        )
        .route("/warehouse/upload", post(upload))
        .route("/warehouse/to-store", post(to_store))
        .route("/warehouse/to-store-by-barcode", post(to_store_by_barcode))
        .route("/store/items", get(list_store).post(create_store))
        .route("/store/sales", get(list_sales).post(record_sale))
        .route("/store/discount", post(discount))
        .route("/store/expire/:id", post(expire))
        .route("/store/remove/:id", post(remove))
        .route("/store/reports", get(reports))
        .route("/prediction/forecast/:id", get(forecast))
        .route("/prediction/products", get(products))
        .route("/prediction/categories", get(categories))
        .route("/prediction/stats", get(stats))
        .route("/prediction/analytics/:id", get(analytics))
        .route("/prediction/trends/:id", get(trends))
        .route("/prediction/insights", get(insights))
        .with_state(backend)
}

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(backend: Arc<Backend>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let app = router(backend);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct Harness {
    pub backend: Arc<Backend>,
    pub dashboard: Dashboard,
    pub clock: Arc<ManualClock>,
    pub navigator: Arc<RecordingNavigator>,
    pub tokens: Arc<MemoryTokenStore>,
    _server: TestServer,
}

impl Harness {
    /// Dashboard already holding a valid token.
    pub async fn signed_in() -> Self {
        Self::build(Arc::new(MemoryTokenStore::with_token(VALID_TOKEN))).await
    }

    pub async fn signed_out() -> Self {
        Self::build(Arc::new(MemoryTokenStore::new())).await
    }

    async fn build(tokens: Arc<MemoryTokenStore>) -> Self {
        let backend = Backend::seeded();
        let server = TestServer::spawn(backend.clone()).await;

        let mut config = ClientConfig::with_base_url(&server.base_url);
        config.refetch_delay = Duration::from_millis(5);

        let clock = Arc::new(ManualClock::default());
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Arc::new(Session::new(tokens.clone() as Arc<dyn TokenStore>));

        let dashboard = Dashboard::with_clock(
            &config,
            session,
            navigator.clone(),
            clock.clone() as Arc<dyn Clock>,
        )
        .expect("dashboard builds");

        Self {
            backend,
            dashboard,
            clock,
            navigator,
            tokens,
            _server: server,
        }
    }
}
