use std::sync::Arc;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, DEFAULT_SERVER_PORT};
use shared_models::auth::User;
use shared_models::role::Role;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// Config whose Supabase URL points at a mock server.
    pub fn with_supabase_url(url: String) -> AppConfig {
        let mut config = Self::default().to_app_config();
        config.supabase_url = url;
        config
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("test@example.com", Role::Patient.code())
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin.code())
    }

    pub fn manager(email: &str) -> Self {
        Self::new(email, Role::Manager.code())
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor.code())
    }

    pub fn staff(email: &str) -> Self {
        Self::new(email, Role::Staff.code())
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient.code())
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    /// `Authorization` header value for `user` signed with the default test secret.
    pub fn bearer_for(user: &TestUser) -> String {
        let token = Self::create_test_token(user, &TestConfig::default().jwt_secret, Some(24));
        format!("Bearer {}", token)
    }
}

/// PostgREST row fixtures for the clinic tables.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn patient_response(patient_id: &str, user_id: &str) -> serde_json::Value {
        json!({
            "patient_id": patient_id,
            "user_id": user_id,
            "date_of_birth": "1990-01-01",
            "gender": "Male",
            "phone": "1234567890",
            "blood_type": "O+",
            "allergy": "None"
        })
    }

    pub fn doctor_response(doctor_id: &str, user_id: &str) -> serde_json::Value {
        json!({
            "doctor_id": doctor_id,
            "user_id": user_id,
            "specialization": "HIV Treatment",
            "license_number": "DOC12345",
            "experience_years": 5
        })
    }

    pub fn work_schedule_response(schedule_id: &str, doctor_id: &str, date_work: &str) -> serde_json::Value {
        json!({
            "schedule_id": schedule_id,
            "doctor_id": doctor_id,
            "slot_id": "S001",
            "date_work": date_work
        })
    }

    pub fn appointment_response(
        book_id: &str,
        patient_id: &str,
        doctor_id: &str,
        book_date: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "book_id": book_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "booking_type": "Consultation",
            "book_date": book_date,
            "status": status,
            "note": "Test appointment"
        })
    }

    pub fn arv_protocol_response(arv_id: &str, arv_code: &str, arv_name: &str) -> serde_json::Value {
        json!({
            "arv_id": arv_id,
            "arv_code": arv_code,
            "arv_name": arv_name,
            "description": "First line treatment",
            "age_range": "18-65",
            "for_group": "Adults"
        })
    }

    pub fn prescription_response(prescription_id: &str) -> serde_json::Value {
        json!({
            "prescription_id": prescription_id,
            "medical_record_id": "TP000001",
            "medication_id": "MED001",
            "doctor_id": "D001",
            "dosage": "1 tablet",
            "line_of_treatment": "First line",
            "start_date": "2024-01-01",
            "end_date": "2024-01-10"
        })
    }

    pub fn treatment_plan_response(treatment_plan_id: &str, patient_id: &str, doctor_id: &str) -> serde_json::Value {
        json!({
            "treatment_plan_id": treatment_plan_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "arv_protocol": "Protocol A",
            "treatment_line": 1,
            "diagnosis": "HIV Positive",
            "treatment_result": "Stable"
        })
    }

    pub fn lab_test_response(lab_test_id: &str, patient_id: &str) -> serde_json::Value {
        json!({
            "lab_test_id": lab_test_id,
            "request_id": "RQ000001",
            "treatment_plan_id": "TP000001",
            "patient_id": patient_id,
            "test_name": "CD4 count",
            "test_code": "CD4",
            "test_type": "Blood",
            "result_value": "500",
            "cd4_initial": 350,
            "viral_load_initial": 10000,
            "status": "Completed",
            "description": "Baseline"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
