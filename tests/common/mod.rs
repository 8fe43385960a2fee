#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use meroshare_backend::entities::accounts::{self, AccountStatus};
use meroshare_backend::entities::{applied_share_errors, applied_shares};
use meroshare_backend::error::StoreError;
use meroshare_backend::services::meroshare::MeroShareClient;
use meroshare_backend::services::store::{AccountPreferences, AccountStore, ShareStore};
use meroshare_backend::services::store_memory::MemoryStore;
use parking_lot::Mutex;
use sea_orm::DbErr;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_TOKEN: &str = "test-auth-token";
pub const WRONG_PIN: &str = "You have entered wrong transaction PIN.";
pub const IN_PROCESS: &str = "Application in process. Please try again later.";

/// How the mock platform answers a submission for one issue.
#[derive(Debug, Clone)]
pub enum ApplyReply {
    Applied,
    JsonConflict(String),
    XmlConflict(String),
    Status(u16),
}

/// Scriptable stand-in for the MeroShare web backend.
pub struct MockPlatform {
    pub login_status: u16,
    pub own_details_status: u16,
    pub bank_records: Vec<Value>,
    pub issues: Vec<Value>,
    /// Answer the issue listing with an error page instead of JSON.
    pub issues_malformed: bool,
    pub apply_replies: HashMap<i64, ApplyReply>,
    pub login_calls: usize,
    pub apply_calls: Vec<Value>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            login_status: 200,
            own_details_status: 200,
            bank_records: vec![bank_record()],
            issues: Vec::new(),
            issues_malformed: false,
            apply_replies: HashMap::new(),
            login_calls: 0,
            apply_calls: Vec::new(),
        }
    }
}

pub type SharedPlatform = Arc<Mutex<MockPlatform>>;

/// Serve the mock platform on an ephemeral local port and return its base URL.
pub async fn spawn_platform(platform: MockPlatform) -> (String, SharedPlatform) {
    let shared = Arc::new(Mutex::new(platform));

    let app = Router::new()
        .route("/api/meroShare/auth/", post(login))
        .route("/api/meroShare/ownDetail/", get(own_detail))
        .route("/api/meroShare/bank/{bank_id}", get(bank))
        .route(
            "/api/meroShare/companyShare/applicableIssue/",
            post(applicable_issues),
        )
        .route("/api/meroShare/applicantForm/share/apply/", post(apply))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock platform");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/meroShare", addr), shared)
}

pub fn client(base_url: &str) -> MeroShareClient {
    MeroShareClient::new(base_url, std::time::Duration::from_secs(5)).unwrap()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(TEST_TOKEN)
}

async fn login(State(platform): State<SharedPlatform>) -> Response {
    let status = {
        let mut platform = platform.lock();
        platform.login_calls += 1;
        platform.login_status
    };

    if status == 200 {
        (
            StatusCode::OK,
            [(header::AUTHORIZATION, TEST_TOKEN)],
            Json(json!({ "statusCode": 200, "message": "Log in successful." })),
        )
            .into_response()
    } else {
        (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({ "message": "Invalid username or password" })),
        )
            .into_response()
    }
}

async fn own_detail(State(platform): State<SharedPlatform>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let status = platform.lock().own_details_status;
    if status != 200 {
        return StatusCode::from_u16(status).unwrap().into_response();
    }

    Json(json!({
        "boid": "01737395",
        "contact": "9800000000",
        "demat": "1301580001737395",
        "email": "sita@example.com",
        "name": "Sita Sharma",
        "dematExpiryDate": "2084-01-01",
        "passwordExpiryDate": "2026-09-01T00:00:00Z",
        "expiredDate": "2027-03-01T00:00:00Z"
    }))
    .into_response()
}

async fn bank(
    State(platform): State<SharedPlatform>,
    Path(_bank_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(Value::Array(platform.lock().bank_records.clone())).into_response()
}

async fn applicable_issues(State(platform): State<SharedPlatform>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let platform = platform.lock();
    if platform.issues_malformed {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>Internal Server Error</body></html>",
        )
            .into_response();
    }
    Json(json!({ "object": platform.issues.clone(), "totalCount": 0 })).into_response()
}

async fn apply(
    State(platform): State<SharedPlatform>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let company_share_id = body["companyShareId"]
        .as_str()
        .and_then(|id| id.parse::<i64>().ok())
        .unwrap_or_default();

    let reply = {
        let mut platform = platform.lock();
        platform.apply_calls.push(body.clone());
        platform
            .apply_replies
            .get(&company_share_id)
            .cloned()
            .unwrap_or(ApplyReply::Applied)
    };

    match reply {
        ApplyReply::Applied => Json(json!({
            "message": "Share has been applied successfully.",
            "status": "CREATED"
        }))
        .into_response(),
        ApplyReply::JsonConflict(message) => (
            StatusCode::CONFLICT,
            Json(json!({ "message": message, "status": "CONFLICT" })),
        )
            .into_response(),
        ApplyReply::XmlConflict(message) => (
            StatusCode::CONFLICT,
            [(header::CONTENT_TYPE, "application/xml")],
            format!("<Error><message>{}</message><status>CONFLICT</status></Error>", message),
        )
            .into_response(),
        ApplyReply::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
    }
}

pub fn bank_record() -> Value {
    json!({
        "accountBranchId": 4117,
        "accountNumber": "023011060008386",
        "accountTypeId": 1,
        "accountTypeName": "SAVING ACCOUNT",
        "branchName": "KATHMANDU",
        "id": 6050709
    })
}

pub fn issue(company_share_id: i64, scrip: &str, group: &str, action: &str) -> Value {
    json!({
        "companyShareId": company_share_id,
        "subGroup": "For General Public",
        "scrip": scrip,
        "companyName": format!("{} Limited", scrip),
        "shareTypeName": "IPO",
        "shareGroupName": group,
        "statusName": "CREATE_APPROVE",
        "action": action,
        "issueOpenDate": "May 29, 2025 10:00:00 AM",
        "issueCloseDate": "Jun 2, 2025 5:00:00 PM"
    })
}

pub fn ordinary_issue(company_share_id: i64, scrip: &str) -> Value {
    issue(company_share_id, scrip, "Ordinary Shares", "")
}

/// Fixed run time for batch tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 15, 0).unwrap()
}

/// An active account that passes every eligibility check at `now()`.
pub fn account(user_id: Uuid, username: &str) -> accounts::Model {
    let now = now();
    accounts::Model {
        id: Uuid::new_v4(),
        user_id,
        name: "Sita Sharma".to_string(),
        email: "sita@example.com".to_string(),
        contact: "9800000000".to_string(),
        client_id: 128,
        username: username.to_string(),
        password: "secret".to_string(),
        bank_id: "54".to_string(),
        crn_number: "SNMAR001030199".to_string(),
        transaction_pin: "1997".to_string(),
        account_type_id: 1,
        preferred_kitta: 10,
        demat: "1301580001737395".to_string(),
        boid: "01737395".to_string(),
        account_number: "023011060008386".to_string(),
        customer_id: 6050709,
        account_branch_id: 4117,
        // 2027-04-14
        dmat_expiry_date: "2084-01-01".to_string(),
        expired_date: now + Duration::days(365),
        password_expiry_date: now + Duration::days(90),
        status: AccountStatus::Active,
        created_at: now - Duration::days(30),
        updated_at: now - Duration::days(30),
        deleted_at: None,
    }
}

/// Calls that `FaultyStore` fails instead of forwarding.
#[derive(Debug, Default)]
pub struct StoreFaults {
    pub find_applied_share: HashSet<i64>,
    pub insert_applied_share: HashSet<i64>,
    pub set_account_status: HashSet<Uuid>,
}

/// `MemoryStore` that returns a database error for the calls listed in its faults.
pub struct FaultyStore {
    pub inner: Arc<MemoryStore>,
    pub faults: StoreFaults,
}

fn injected_failure() -> StoreError {
    StoreError::Db(DbErr::Custom("connection reset".to_string()))
}

#[async_trait]
impl AccountStore for FaultyStore {
    async fn create_account(&self, account: accounts::Model) -> Result<Uuid, StoreError> {
        self.inner.create_account(account).await
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<accounts::Model>, StoreError> {
        self.inner.get_account(id).await
    }

    async fn list_accounts(&self) -> Result<Vec<accounts::Model>, StoreError> {
        self.inner.list_accounts().await
    }

    async fn list_accounts_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<accounts::Model>, StoreError> {
        self.inner.list_accounts_by_user(user_id).await
    }

    async fn set_account_status(&self, id: Uuid, status: AccountStatus) -> Result<(), StoreError> {
        if self.faults.set_account_status.contains(&id) {
            return Err(injected_failure());
        }
        self.inner.set_account_status(id, status).await
    }

    async fn update_preferences(
        &self,
        id: Uuid,
        preferences: AccountPreferences,
    ) -> Result<accounts::Model, StoreError> {
        self.inner.update_preferences(id, preferences).await
    }

    async fn delete_account(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_account(id).await
    }
}

#[async_trait]
impl ShareStore for FaultyStore {
    async fn insert_applied_share(
        &self,
        share: applied_shares::Model,
    ) -> Result<applied_shares::Model, StoreError> {
        if self.faults.insert_applied_share.contains(&share.company_share_id) {
            return Err(injected_failure());
        }
        self.inner.insert_applied_share(share).await
    }

    async fn insert_applied_share_error(
        &self,
        error: applied_share_errors::Model,
    ) -> Result<applied_share_errors::Model, StoreError> {
        self.inner.insert_applied_share_error(error).await
    }

    async fn get_applied_share(
        &self,
        id: Uuid,
    ) -> Result<Option<applied_shares::Model>, StoreError> {
        self.inner.get_applied_share(id).await
    }

    async fn find_applied_share(
        &self,
        account_id: Uuid,
        company_share_id: i64,
    ) -> Result<Option<applied_shares::Model>, StoreError> {
        if self.faults.find_applied_share.contains(&company_share_id) {
            return Err(injected_failure());
        }
        self.inner.find_applied_share(account_id, company_share_id).await
    }

    async fn list_applied_shares_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<applied_shares::Model>, StoreError> {
        self.inner.list_applied_shares_by_user(user_id).await
    }

    async fn list_applied_share_errors_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<applied_share_errors::Model>, StoreError> {
        self.inner.list_applied_share_errors_by_user(user_id).await
    }

    async fn find_error_by_applied_share(
        &self,
        applied_share_id: Uuid,
    ) -> Result<Option<applied_share_errors::Model>, StoreError> {
        self.inner.find_error_by_applied_share(applied_share_id).await
    }

    async fn mark_errors_seen_by_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        self.inner.mark_errors_seen_by_user(user_id).await
    }
}
