//! API integration tests
//!
//! Run against a live server on a freshly migrated database. The seeded
//! security and `hr` accounts are used; override their passwords with
//! GATEPASS_TEST_SECURITY_PASSWORD and GATEPASS_TEST_HR_PASSWORD.

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn password(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Client keeping session cookies and not following redirects
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Helper to get a client logged in with the given role
async fn logged_in(body: Value) -> Client {
    let client = client();
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success(), "login failed: {}", response.status());
    client
}

async fn security() -> Client {
    logged_in(json!({
        "role": "security",
        "password": password("GATEPASS_TEST_SECURITY_PASSWORD", "security123")
    }))
    .await
}

async fn hr() -> Client {
    logged_in(json!({
        "role": "department",
        "departmentId": "hr",
        "password": password("GATEPASS_TEST_HR_PASSWORD", "hr123")
    }))
    .await
}

async fn first_employee(client: &Client, department_id: &str) -> Value {
    let employees: Value = client
        .get(format!("{}/employees?departmentId={}", BASE_URL, department_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    employees[0].clone()
}

async fn register(client: &Client, email: &str) -> Value {
    let employee = first_employee(client, "hr").await;
    let response = client
        .post(format!("{}/visits", BASE_URL))
        .json(&json!({
            "visitorName": "Jane Doe",
            "visitorEmail": email,
            "visitorPhone": "+15550001111",
            "visitorType": "EXTERNAL",
            "employeeId": employee["id"],
            "departmentId": "hr",
            "purpose": "Job interview",
            "timeAllotted": 60
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

async fn patch_status(client: &Client, id: &str, status: &str) -> reqwest::Response {
    client
        .patch(format!("{}/visits/{}", BASE_URL, id))
        .json(&json!({ "status": status }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_ready_checks_database() {
    let response = client()
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_seeded_departments() {
    let departments: Value = client()
        .get(format!("{}/departments", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let ids: Vec<&str> = departments
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|d| d["id"].as_str())
        .collect();
    for id in ["rd", "steel_prod", "quality", "hr", "automation"] {
        assert!(ids.contains(&id), "missing department {id}");
    }
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let response = client()
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "role": "security", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_registration_validation() {
    let response = client()
        .post(format!("{}/visits", BASE_URL))
        .json(&json!({
            "visitorName": "J",
            "visitorEmail": "nope",
            "visitorPhone": "1",
            "visitorType": "EXTERNAL",
            "employeeId": "00000000-0000-0000-0000-000000000000",
            "departmentId": "hr",
            "purpose": "hi",
            "timeAllotted": 0
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_visit_lifecycle() {
    let security = security().await;
    let email = format!("jane+{}@example.com", chrono::Utc::now().timestamp_millis());
    let visit = register(&security, &email).await;
    let id = visit["id"].as_str().expect("visit id").to_string();

    assert_eq!(visit["status"], "PENDING");
    assert_eq!(visit["uniqueCode"].as_str().map(str::len), Some(6));
    assert_eq!(visit["visitor"]["name"], "Jane Doe");

    // Illegal jump
    let response = patch_status(&security, &id, "COMPLETED").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let approved: Value = patch_status(&security, &id, "APPROVED").await.json().await.unwrap();
    assert_eq!(approved["status"], "APPROVED");
    assert!(approved["approvalTime"].is_string());
    assert!(approved["checkInTime"].is_null());

    let checked_in: Value = patch_status(&security, &id, "CHECKED_IN").await.json().await.unwrap();
    assert!(checked_in["checkInTime"].is_string());
    assert_eq!(checked_in["isOverstayed"], false);

    let completed: Value = patch_status(&security, &id, "COMPLETED").await.json().await.unwrap();
    assert!(completed["checkOutTime"].is_string());
    assert_eq!(completed["approvalTime"], approved["approvalTime"]);

    // Terminal
    let response = patch_status(&security, &id, "CANCELLED").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_department_cannot_check_in() {
    let hr = hr().await;
    let email = format!("dept+{}@example.com", chrono::Utc::now().timestamp_millis());
    let visit = register(&hr, &email).await;
    let id = visit["id"].as_str().expect("visit id").to_string();

    let response = patch_status(&hr, &id, "APPROVED").await;
    assert!(response.status().is_success());

    let response = patch_status(&hr, &id, "CHECKED_IN").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_department_scope_redirects() {
    let hr = hr().await;
    let response = hr
        .get(format!("{}/visits?departmentId=rd", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/login");
}

#[tokio::test]
#[ignore]
async fn test_dashboards() {
    let security = security().await;
    let response = security
        .get(format!("{}/dashboard?type=security", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["view"], "security");
    assert!(body["summary"]["total"].is_number());

    let hr = hr().await;
    let body: Value = hr
        .get(format!("{}/dashboard?type=employee&departmentId=hr", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .unwrap();
    assert_eq!(body["departmentId"], "hr");
    for visit in body["visits"].as_array().expect("visits") {
        assert_eq!(visit["departmentId"], "hr");
    }
}

#[tokio::test]
#[ignore]
async fn test_returning_visitor_is_reused() {
    let security = security().await;
    let email = format!("repeat+{}@example.com", chrono::Utc::now().timestamp_millis());

    let first = register(&security, &email).await;
    let second = register(&security, &email).await;

    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["visitor"]["id"], second["visitor"]["id"]);
}

#[tokio::test]
#[ignore]
async fn test_unknown_visit_is_not_found() {
    let security = security().await;
    let response = patch_status(&security, "00000000-0000-0000-0000-000000000000", "APPROVED").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_repeated_approval_conflicts_with_current_status() {
    let security = security().await;
    let email = format!("twice+{}@example.com", chrono::Utc::now().timestamp_millis());
    let visit = register(&security, &email).await;
    let id = visit["id"].as_str().expect("visit id").to_string();

    assert!(patch_status(&security, &id, "APPROVED").await.status().is_success());

    let response = patch_status(&security, &id, "APPROVED").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid transition from APPROVED to APPROVED");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_approvals_apply_once() {
    let security = security().await;
    let hr = hr().await;
    let email = format!("race+{}@example.com", chrono::Utc::now().timestamp_millis());
    let visit = register(&security, &email).await;
    let id = visit["id"].as_str().expect("visit id").to_string();

    let (a, b) = tokio::join!(
        patch_status(&security, &id, "APPROVED"),
        patch_status(&hr, &id, "APPROVED")
    );
    let mut statuses = [a.status().as_u16(), b.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, [200, 409]);
}

#[tokio::test]
#[ignore]
async fn test_department_dashboard_redirects_to_own() {
    let hr = hr().await;
    let response = hr
        .get(format!("{}/dashboard?type=employee&departmentId=rd", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        "/api/v1/dashboard?type=employee&departmentId=hr"
    );
}

#[tokio::test]
#[ignore]
async fn test_empty_department_filter_is_ignored() {
    let hr = hr().await;
    let visits: Value = hr
        .get(format!("{}/visits?departmentId=", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    for visit in visits.as_array().expect("visits") {
        assert_eq!(visit["departmentId"], "hr");
    }
}

#[tokio::test]
#[ignore]
async fn test_export_today_as_csv() {
    let security = security().await;
    let email = format!("export+{}@example.com", chrono::Utc::now().timestamp_millis());
    register(&security, &email).await;

    let today = chrono::Utc::now().date_naive();
    let response = security
        .get(format!("{}/visits/export?from={}&to={}", BASE_URL, today, today))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains(&format!("visitor_data_{}.csv", today)));

    let body = response.text().await.unwrap();
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("Visitor,Company,Employee,Department,Purpose,Status,Date")
    );
    assert!(lines.any(|line| line.starts_with("Jane Doe,N/A,")));
}
