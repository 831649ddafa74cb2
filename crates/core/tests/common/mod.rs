// ═══════════════════════════════════════════════════════════════════
// Shared test doubles: an in-memory backend and a counting renderer
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use finance_tracker_core::api::gateway::Gateway;
use finance_tracker_core::api::traits::{ApiRequest, ApiResponse, RequestBody, Transport};
use finance_tracker_core::errors::ClientError;
use finance_tracker_core::models::chart::ChartSpec;
use finance_tracker_core::models::transaction::{NewTransaction, Transaction};
use finance_tracker_core::navigation::RouteRecorder;
use finance_tracker_core::services::chart_service::ChartRenderer;
use finance_tracker_core::storage::credential_store::{CredentialStore, MemoryCredentialStore};

// ═══════════════════════════════════════════════════════════════════
// Fake backend
// ═══════════════════════════════════════════════════════════════════

struct Account {
    id: i64,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    transactions: Vec<Transaction>,
    next_user_id: i64,
    next_tx_id: i64,
    requests: Vec<ApiRequest>,
    /// (method, path) → (status, body), served once
    failures: Vec<(Method, String, u16, String)>,
    offline: bool,
}

/// Behaves like the real API for the endpoints the client uses, and
/// records every request it receives.
#[derive(Default)]
pub struct FakeServer {
    state: Mutex<State>,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register `username` and hand back a valid token for it.
    pub fn seed_user(&self, username: &str, password: &str) -> String {
        let mut s = self.state.lock().unwrap();
        s.next_user_id += 1;
        let id = s.next_user_id;
        s.accounts.insert(
            username.to_string(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        let token = format!("token-{username}-{id}");
        s.tokens.insert(token.clone(), username.to_string());
        token
    }

    /// Insert a transaction directly on the server side.
    pub fn seed_transaction(&self, username: &str, amount: f64, class_name: &str, time: &str) -> i64 {
        let mut s = self.state.lock().unwrap();
        s.next_tx_id += 1;
        let id = s.next_tx_id;
        s.transactions.push(Transaction {
            id,
            amount,
            class_name: class_name.to_string(),
            time: NaiveDate::parse_from_str(time, "%Y-%m-%d").unwrap().into(),
            userid: Some(username.to_string()),
        });
        id
    }

    /// Invalidate every issued token (server-side expiry).
    pub fn expire_tokens(&self) {
        self.state.lock().unwrap().tokens.clear();
    }

    /// Answer the next `method path` request with `status` and `body`.
    pub fn fail_once(&self, method: Method, path: &str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((method, path.to_string(), status, body.to_string()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests_to(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn transactions_of(&self, username: &str) -> Vec<Transaction> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .filter(|t| t.userid.as_deref() == Some(username))
            .cloned()
            .collect()
    }

    pub fn has_account(&self, username: &str) -> bool {
        self.state.lock().unwrap().accounts.contains_key(username)
    }

    fn respond(status: u16, body: serde_json::Value) -> ApiResponse {
        ApiResponse {
            status,
            body: body.to_string(),
        }
    }

    fn detail(status: u16, detail: &str) -> ApiResponse {
        Self::respond(status, json!({ "detail": detail }))
    }

    fn json_body(request: &ApiRequest) -> serde_json::Value {
        match &request.body {
            Some(RequestBody::Json(v)) => v.clone(),
            _ => serde_json::Value::Null,
        }
    }

    fn handle(s: &mut State, request: &ApiRequest) -> ApiResponse {
        let method = request.method.clone();
        let path = request.path.as_str();

        // ── Public endpoints ────────────────────────────────────────
        if method == Method::POST && path == "/token" {
            let form: HashMap<String, String> = match &request.body {
                Some(RequestBody::Form(fields)) => fields.iter().cloned().collect(),
                _ => return Self::detail(422, "form data required"),
            };
            let username = form.get("username").cloned().unwrap_or_default();
            let password = form.get("password").cloned().unwrap_or_default();
            return match s.accounts.get(&username) {
                Some(acc) if acc.password == password => {
                    let token = format!("token-{username}-{}", s.tokens.len() + 100);
                    s.tokens.insert(token.clone(), username);
                    Self::respond(200, json!({ "access_token": token, "token_type": "bearer" }))
                }
                _ => Self::detail(401, "Incorrect username or password"),
            };
        }
        if method == Method::POST && path == "/register" {
            let body = Self::json_body(request);
            let username = body["username"].as_str().unwrap_or_default().to_string();
            let password = body["password"].as_str().unwrap_or_default().to_string();
            if s.accounts.contains_key(&username) {
                return Self::detail(400, "Username already registered");
            }
            s.next_user_id += 1;
            let id = s.next_user_id;
            s.accounts.insert(username.clone(), Account { id, password });
            return Self::respond(200, json!({ "id": id, "username": username }));
        }

        // ── Protected endpoints ─────────────────────────────────────
        let user = match request.bearer.as_ref().and_then(|t| s.tokens.get(t)) {
            Some(u) => u.clone(),
            None => return Self::detail(401, "Could not validate credentials"),
        };

        match (method.as_str(), path) {
            ("GET", "/users/me") => {
                let id = s.accounts.get(&user).map(|a| a.id).unwrap_or_default();
                Self::respond(200, json!({ "id": id, "username": user }))
            }
            ("DELETE", "/users/me") => {
                s.transactions.retain(|t| t.userid.as_deref() != Some(user.as_str()));
                s.accounts.remove(&user);
                s.tokens.retain(|_, u| *u != user);
                Self::respond(200, json!({ "message": format!("User {user} and all data have been deleted.") }))
            }
            ("POST", "/query") => {
                let body = Self::json_body(request);
                let query = body["query"].as_str().unwrap_or_default().to_lowercase();
                let reply = if query.contains("total spending") {
                    let total: f64 = s
                        .transactions
                        .iter()
                        .filter(|t| t.userid.as_deref() == Some(user.as_str()))
                        .map(|t| t.amount)
                        .sum();
                    format!("Your total spending across all transactions is ${total:.2}.")
                } else {
                    format!("You asked: {query}")
                };
                Self::respond(200, json!({ "response": reply }))
            }
            ("GET", "/transactions") => {
                let rows: Vec<&Transaction> = s
                    .transactions
                    .iter()
                    .filter(|t| t.userid.as_deref() == Some(user.as_str()))
                    .collect();
                Self::respond(200, serde_json::to_value(rows).unwrap())
            }
            ("POST", "/add_transaction") => {
                let new_tx: NewTransaction = match serde_json::from_value(Self::json_body(request)) {
                    Ok(tx) => tx,
                    Err(_) => {
                        return Self::respond(
                            422,
                            json!({ "detail": [{ "loc": ["body"], "msg": "field required", "type": "missing" }] }),
                        )
                    }
                };
                s.next_tx_id += 1;
                let tx = Transaction {
                    id: s.next_tx_id,
                    amount: new_tx.amount,
                    class_name: new_tx.class_name,
                    time: new_tx.time.into(),
                    userid: Some(user),
                };
                s.transactions.push(tx.clone());
                Self::respond(200, serde_json::to_value(tx).unwrap())
            }
            ("DELETE", p) if p.starts_with("/transactions/") => {
                let id: i64 = match p.trim_start_matches("/transactions/").parse() {
                    Ok(id) => id,
                    Err(_) => return Self::detail(422, "invalid id"),
                };
                match s.transactions.iter().position(|t| t.id == id) {
                    None => Self::detail(404, "Transaction not found"),
                    Some(idx) if s.transactions[idx].userid.as_deref() != Some(user.as_str()) => {
                        Self::detail(403, "Not authorized to delete this transaction")
                    }
                    Some(idx) => {
                        s.transactions.remove(idx);
                        Self::respond(200, json!({ "message": "Transaction deleted successfully" }))
                    }
                }
            }
            ("GET", "/plot/spending_by_category") => {
                let mut labels: Vec<String> = Vec::new();
                let mut data: Vec<f64> = Vec::new();
                for t in s.transactions.iter().filter(|t| t.userid.as_deref() == Some(user.as_str())) {
                    match labels.iter().position(|l| *l == t.class_name) {
                        Some(i) => data[i] += t.amount,
                        None => {
                            labels.push(t.class_name.clone());
                            data.push(t.amount);
                        }
                    }
                }
                Self::respond(200, json!({ "labels": labels, "data": data }))
            }
            ("GET", "/plot/spending_over_time") => {
                let mut by_date: BTreeMap<String, f64> = BTreeMap::new();
                for t in s.transactions.iter().filter(|t| t.userid.as_deref() == Some(user.as_str())) {
                    *by_date.entry(t.time.to_string()).or_insert(0.0) += t.amount;
                }
                let labels: Vec<String> = by_date.keys().cloned().collect();
                let data: Vec<f64> = by_date.values().copied().collect();
                Self::respond(200, json!({ "labels": labels, "data": data }))
            }
            _ => Self::detail(404, "Not Found"),
        }
    }
}

#[async_trait]
impl Transport for FakeServer {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut s = self.state.lock().unwrap();
        s.requests.push(request.clone());

        if s.offline {
            return Err(ClientError::Transport("connection refused".into()));
        }

        if let Some(pos) = s
            .failures
            .iter()
            .position(|(m, p, _, _)| *m == request.method && *p == request.path)
        {
            let (_, _, status, body) = s.failures.remove(pos);
            return Ok(ApiResponse { status, body });
        }

        Ok(Self::handle(&mut s, &request))
    }
}

/// Accepts requests and never answers them.
pub struct StalledTransport;

#[async_trait]
impl Transport for StalledTransport {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, ClientError> {
        std::future::pending().await
    }
}

/// Gateway over [`StalledTransport`] with a stored token.
pub fn stalled_gateway() -> Gateway {
    Gateway::new(
        Arc::new(StalledTransport),
        Arc::new(MemoryCredentialStore::with_token("abc")),
        Arc::new(RouteRecorder::new()),
    )
}

// ═══════════════════════════════════════════════════════════════════
// Counting renderer
// ═══════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone)]
pub struct RenderStats {
    pub created: usize,
    pub disposed: usize,
    pub live: usize,
    pub max_live: usize,
    pub last_spec: Option<ChartSpec>,
}

/// Renderer that only counts instances. Clones share the same stats.
#[derive(Debug, Default, Clone)]
pub struct CountingRenderer {
    stats: Arc<Mutex<RenderStats>>,
    fail: bool,
}

impl CountingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats.lock().unwrap().clone()
    }
}

impl ChartRenderer for CountingRenderer {
    type Handle = usize;

    fn create(&mut self, spec: &ChartSpec) -> Result<usize, ClientError> {
        if self.fail {
            return Err(ClientError::Chart("canvas unavailable".into()));
        }
        let mut s = self.stats.lock().unwrap();
        s.created += 1;
        s.live += 1;
        s.max_live = s.max_live.max(s.live);
        s.last_spec = Some(spec.clone());
        Ok(s.created)
    }

    fn dispose(&mut self, _handle: usize) {
        let mut s = self.stats.lock().unwrap();
        s.disposed += 1;
        s.live -= 1;
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wiring helpers
// ═══════════════════════════════════════════════════════════════════

pub struct Harness {
    pub server: Arc<FakeServer>,
    pub store: Arc<MemoryCredentialStore>,
    pub navigator: Arc<RouteRecorder>,
    pub gateway: Gateway,
}

/// Gateway over a fresh fake server, with `alice` registered and logged in.
pub fn logged_in() -> Harness {
    let server = FakeServer::new();
    let token = server.seed_user("alice", "wonderland");
    let store = Arc::new(MemoryCredentialStore::with_token(token));
    build(server, store)
}

/// Gateway over a fresh fake server with no credential.
pub fn anonymous() -> Harness {
    build(FakeServer::new(), Arc::new(MemoryCredentialStore::new()))
}

fn build(server: Arc<FakeServer>, store: Arc<MemoryCredentialStore>) -> Harness {
    let navigator = Arc::new(RouteRecorder::new());
    let gateway = Gateway::new(server.clone(), store.clone(), navigator.clone());
    Harness {
        server,
        store,
        navigator,
        gateway,
    }
}

impl Harness {
    pub fn token(&self) -> Option<String> {
        self.store.load()
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}
