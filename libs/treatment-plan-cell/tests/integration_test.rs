use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use shared_config::AppConfig;
use shared_utils::test_utils::{TestConfig, TestUser, JwtTestUtils, MockSupabaseResponses};
use treatment_plan_cell::router::treatment_plan_routes;

fn create_test_app(config: AppConfig) -> Router {
    treatment_plan_routes(Arc::new(config))
}

async fn send(app: Router, method: &str, uri: &str, user: &TestUser, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", JwtTestUtils::bearer_for(user));

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn mount_linked_doctor(mock_server: &MockServer, user_id: &str, doctor_id: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("user_id", format!("eq.{}", user_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(doctor_id, user_id)
        ])))
        .mount(mock_server)
        .await;
}

async fn mount_linked_patient(mock_server: &MockServer, user_id: &str, patient_id: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("user_id", format!("eq.{}", user_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_response(patient_id, user_id)
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_doctor_adds_own_plan() {
    let mock_server = MockServer::start().await;
    let user = TestUser::doctor("doctor@example.com").with_id("U200");

    mount_linked_doctor(&mock_server, "U200", "D001").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/treatment_plans"))
        .and(query_param("select", "treatment_plan_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "treatment_plan_id": "TP000041" }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/treatment_plans"))
        .and(body_partial_json(json!({ "treatment_plan_id": "TP000042", "doctor_id": "D001", "treatment_line": 1 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::treatment_plan_response("TP000042", "P001", "D001")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "POST", "/", &user, Some(json!({
        "patient_id": "P001",
        "doctor_id": "D001",
        "arv_protocol": "AP000001",
        "treatment_line": 1,
        "diagnosis": "HIV Positive"
    }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Thêm kế hoạch điều trị thành công");
    assert_eq!(body["data"]["treatment_plan_id"], "TP000042");
    assert_eq!(body["data"]["treatment_line"], 1);
}

#[tokio::test]
async fn test_missing_patient_is_invalid() {
    let mock_server = MockServer::start().await;
    let user = TestUser::manager("manager@example.com");

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "POST", "/", &user, Some(json!({ "doctor_id": "D001" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Dữ liệu không hợp lệ");
}

#[tokio::test]
async fn test_staff_cannot_add_plan() {
    let mock_server = MockServer::start().await;
    let user = TestUser::staff("staff@example.com");

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, _) = send(app, "POST", "/", &user, Some(json!({
        "patient_id": "P001",
        "doctor_id": "D001"
    }))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_of_unknown_plan_fails() {
    let mock_server = MockServer::start().await;
    let user = TestUser::admin("admin@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/treatment_plans"))
        .and(query_param("treatment_plan_id", "eq.TP999999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "PUT", "/", &user, Some(json!({
        "treatment_plan_id": "TP999999",
        "patient_id": "P001",
        "doctor_id": "D001"
    }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cập nhật kế hoạch điều trị thất bại");
}

#[tokio::test]
async fn test_patient_reads_own_plan() {
    let mock_server = MockServer::start().await;
    let user = TestUser::patient("patient@example.com").with_id("U100");

    mount_linked_patient(&mock_server, "U100", "P001").await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/treatment_plans"))
        .and(query_param("treatment_plan_id", "eq.TP000001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::treatment_plan_response("TP000001", "P001", "D001")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "GET", "/TP000001", &user, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient_id"], "P001");
    assert_eq!(body["treatment_line"], 1);
}

#[tokio::test]
async fn test_patient_cannot_read_other_patients_plans() {
    let mock_server = MockServer::start().await;
    let user = TestUser::patient("patient@example.com").with_id("U100");

    mount_linked_patient(&mock_server, "U100", "P001").await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, _) = send(app, "GET", "/patient/P002", &user, None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_plan_is_not_found() {
    let mock_server = MockServer::start().await;
    let user = TestUser::staff("staff@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/treatment_plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "GET", "/TP000404", &user, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Không tìm thấy kế hoạch điều trị.");
}
