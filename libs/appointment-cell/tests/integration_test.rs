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
use chrono::{Duration, Local, NaiveDate};

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{TestConfig, TestUser, JwtTestUtils, MockSupabaseResponses};

fn create_test_app(config: AppConfig) -> Router {
    appointment_routes(Arc::new(config))
}

fn tomorrow() -> NaiveDate {
    Local::now().date_naive() + Duration::days(1)
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

async fn mount_patient_and_doctor(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("user_id", "eq.U100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_response("P001", "U100")
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("doctor_id", "eq.D001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response("D001", "U200")
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_work_schedules"))
        .and(query_param("doctor_id", "eq.D001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::work_schedule_response("WS001", "D001", &tomorrow().to_string())
        ])))
        .mount(mock_server)
        .await;
}

fn booking_body(date: NaiveDate) -> Value {
    json!({
        "doctor_id": "D001",
        "booking_type": "Consultation",
        "book_date": format!("{}T09:00:00", date),
        "note": "First visit"
    })
}

#[tokio::test]
async fn test_patient_books_tomorrow() {
    let mock_server = MockServer::start().await;
    let user = TestUser::patient("patient@example.com").with_id("U100");
    let book_date = format!("{}T09:00:00", tomorrow());

    mount_patient_and_doctor(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/books_appointments"))
        .and(query_param("doctor_id", "eq.D001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response("BK000003", "P002", "D001", &book_date, "Đã hủy")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/books_appointments"))
        .and(query_param("select", "book_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "book_id": "BK000004" }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/books_appointments"))
        .and(body_partial_json(json!({
            "book_id": "BK000005",
            "patient_id": "P001",
            "status": "Thành công"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment_response("BK000005", "P001", "D001", &book_date, "Thành công")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "POST", "/book", &user, Some(booking_body(tomorrow()))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["book_id"], "BK000005");
    assert_eq!(body["data"]["status"], "Thành công");
}

#[tokio::test]
async fn test_second_booking_same_day_conflicts() {
    let mock_server = MockServer::start().await;
    let user = TestUser::patient("patient@example.com").with_id("U100");
    let book_date = format!("{}T10:00:00", tomorrow());

    mount_patient_and_doctor(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/books_appointments"))
        .and(query_param("doctor_id", "eq.D001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response("BK000005", "P001", "D001", &book_date, "Thành công")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/books_appointments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "POST", "/book", &user, Some(booking_body(tomorrow()))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bác sĩ đã có lịch hẹn trong ngày này");
}

#[tokio::test]
async fn test_booking_in_the_past_is_rejected() {
    let mock_server = MockServer::start().await;
    let user = TestUser::patient("patient@example.com").with_id("U100");
    let yesterday = Local::now().date_naive() - Duration::days(1);

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "POST", "/book", &user, Some(booking_body(yesterday))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Ngày đặt lịch không hợp lệ");
}

#[tokio::test]
async fn test_doctor_cannot_book() {
    let mock_server = MockServer::start().await;
    let user = TestUser::doctor("doctor@example.com");

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, _) = send(app, "POST", "/book", &user, Some(booking_body(tomorrow()))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patient_check_in() {
    let mock_server = MockServer::start().await;
    let user = TestUser::patient("patient@example.com").with_id("U100");
    let book_date = format!("{}T09:00:00", tomorrow());

    mount_patient_and_doctor(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/books_appointments"))
        .and(query_param("book_id", "eq.BK000002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response("BK000002", "P001", "D001", &book_date, "Thành công")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/books_appointments"))
        .and(query_param("status", "eq.Thành công"))
        .and(body_partial_json(json!({ "status": "Đã xác nhận" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response("BK000002", "P001", "D001", &book_date, "Đã xác nhận")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "PUT", "/BK000002/check-in", &user, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient check-in confirmed.");
    assert_eq!(body["data"]["status"], "Đã xác nhận");
}

#[tokio::test]
async fn test_check_in_after_concurrent_cancel_conflicts() {
    let mock_server = MockServer::start().await;
    let user = TestUser::patient("patient@example.com").with_id("U100");
    let book_date = format!("{}T09:00:00", tomorrow());

    mount_patient_and_doctor(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/books_appointments"))
        .and(query_param("book_id", "eq.BK000002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response("BK000002", "P001", "D001", &book_date, "Thành công")
        ])))
        .mount(&mock_server)
        .await;

    // The row was cancelled between the read and the write, so the guarded PATCH matches nothing.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/books_appointments"))
        .and(query_param("status", "eq.Thành công"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "PUT", "/BK000002/check-in", &user, None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("đã thay đổi"));
}

#[tokio::test]
async fn test_checkout_before_check_in_is_rejected() {
    let mock_server = MockServer::start().await;
    let user = TestUser::doctor("doctor@example.com").with_id("U200");
    let book_date = format!("{}T09:00:00", tomorrow());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("user_id", "eq.U200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response("D001", "U200")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/books_appointments"))
        .and(query_param("book_id", "eq.BK000002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response("BK000002", "P001", "D001", &book_date, "Thành công")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/books_appointments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "PUT", "/BK000002/checkout", &user, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Thành công"));
}

#[tokio::test]
async fn test_patient_cannot_list_all_appointments() {
    let mock_server = MockServer::start().await;
    let user = TestUser::patient("patient@example.com");

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, _) = send(app, "GET", "/all", &user, None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_staff_lists_all_appointments() {
    let mock_server = MockServer::start().await;
    let user = TestUser::staff("staff@example.com");
    let book_date = format!("{}T09:00:00", tomorrow());

    Mock::given(method("GET"))
        .and(path("/rest/v1/books_appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_response("BK000001", "P001", "D001", &book_date, "Đã khám"),
            MockSupabaseResponses::appointment_response("BK000002", "P002", "D001", &book_date, "Thành công")
        ])))
        .mount(&mock_server)
        .await;

    let app = create_test_app(TestConfig::with_supabase_url(mock_server.uri()));
    let (status, body) = send(app, "GET", "/all", &user, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}
