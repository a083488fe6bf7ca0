//! End-to-end tests driving the REST API the way the browser client does
//!
//! Every test starts its own server on fresh in-memory collections.

#[macro_use]
mod storage_harness;

use axum::http::StatusCode;
use axum_test::TestServer;
use bizbook::billing::period_prefix;
use bizbook::config::AppConfig;
use bizbook::core::DataService;
use bizbook::entities::{Appointment, Customer, Invoice, User};
use bizbook::schedule::{date_key, today_utc};
use bizbook::server::ServerBuilder;
use bizbook::storage::{InMemoryDataService, Storage};
use chrono::Days;
use serde_json::{Value, json};
use std::sync::Arc;
use storage_harness::Stalled;

// =============================================================================
// Helpers
// =============================================================================

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.pbkdf2_iterations = 1_000;
    config
}

fn create_test_server() -> TestServer {
    let app = ServerBuilder::new()
        .with_config(test_config())
        .build()
        .expect("router should build");
    TestServer::new(app).expect("Failed to create test server")
}

/// Sign up and return the bearer token
async fn signup(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/auth/signup")
        .json(&json!({
            "email": email,
            "password": "secret123",
            "name": "Meera",
            "businessName": "Meera Physio"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    body["token"].as_str().expect("token").to_string()
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

async fn book(server: &TestServer, token: &str, body: Value) -> Value {
    let response = server
        .post("/appointments")
        .authorization(bearer(token))
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

fn draft(rate: f64, seller_state: &str, place_of_supply: &str) -> Value {
    json!({
        "date": date_key(today_utc()),
        "sellerName": "Meera Physio",
        "sellerState": seller_state,
        "buyerName": "Asha Rao",
        "placeOfSupply": place_of_supply,
        "rate": rate
    })
}

// =============================================================================
// Health & Accounts
// =============================================================================

mod account_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let server = create_test_server();

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "bizbook");
    }

    #[tokio::test]
    async fn test_signup_normalizes_email_and_hides_secrets() {
        let server = create_test_server();

        let response = server
            .post("/auth/signup")
            .json(&json!({
                "email": "  Meera@Example.COM ",
                "password": "secret123",
                "name": "",
                "businessName": "Meera Physio"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["account"]["email"], "meera@example.com");
        assert_eq!(body["session"]["locale"], "en");
        assert!(body["account"].get("passwordHash").is_none());
        assert!(body["account"].get("salt").is_none());
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_conflicts() {
        let server = create_test_server();
        signup(&server, "meera@example.com").await;

        let response = server
            .post("/auth/signup")
            .json(&json!({ "email": "MEERA@example.com", "password": "another1" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = response.json();
        assert_eq!(body["message"], "This email is already registered.");
    }

    #[tokio::test]
    async fn test_signup_short_password_rejected() {
        let server = create_test_server();

        let response = server
            .post("/auth/signup")
            .json(&json!({ "email": "a@b.in", "password": "123" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let server = create_test_server();
        signup(&server, "meera@example.com").await;

        let response = server
            .post("/auth/login")
            .json(&json!({ "email": "meera@example.com", "password": "secret123" }))
            .await;
        response.assert_status_ok();
        let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

        server
            .get("/auth/session")
            .authorization(bearer(&token))
            .await
            .assert_status_ok();

        server
            .post("/auth/logout")
            .authorization(bearer(&token))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get("/auth/session")
            .authorization(bearer(&token))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let server = create_test_server();
        signup(&server, "meera@example.com").await;

        let wrong_password = server
            .post("/auth/login")
            .json(&json!({ "email": "meera@example.com", "password": "nope1234" }))
            .await;
        let unknown_email = server
            .post("/auth/login")
            .json(&json!({ "email": "ghost@example.com", "password": "secret123" }))
            .await;

        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        unknown_email.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            wrong_password.json::<Value>()["message"],
            unknown_email.json::<Value>()["message"]
        );
    }

    #[tokio::test]
    async fn test_locale_switch() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        let response = server
            .put("/auth/locale")
            .authorization(bearer(&token))
            .json(&json!({ "locale": "HI" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["locale"], "hi");

        let response = server
            .put("/auth/locale")
            .authorization(bearer(&token))
            .json(&json!({ "locale": "fr" }))
            .await;
        assert_eq!(response.json::<Value>()["locale"], "en");
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        let server = create_test_server();

        for path in ["/customers", "/appointments", "/invoices", "/schedule/counts"] {
            server.get(path).await.assert_status(StatusCode::UNAUTHORIZED);
        }

        server
            .get("/customers")
            .authorization(bearer(&uuid::Uuid::new_v4().to_string()))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/customers")
            .authorization("Bearer not-a-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}

// =============================================================================
// Customers
// =============================================================================

mod customer_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_list_and_search() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        for (name, phone) in [("Asha Rao", "98450 11111"), ("Ravi Kumar", "98450 22222")] {
            server
                .post("/customers")
                .authorization(bearer(&token))
                .json(&json!({ "name": format!("  {name} "), "phone": phone }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let list: Vec<Value> = server
            .get("/customers")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["name"], "Ravi Kumar");
        assert_eq!(list[1]["name"], "Asha Rao");

        let found: Vec<Value> = server
            .get("/customers?q=asha")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(found.len(), 1);

        let by_phone: Vec<Value> = server
            .get("/customers?q=22222")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0]["name"], "Ravi Kumar");
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        let response = server
            .post("/customers")
            .authorization(bearer(&token))
            .json(&json!({ "name": "   ", "phone": "" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["details"]["fields"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        server
            .get("/customers/not-a-uuid")
            .authorization(bearer(&token))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// Appointments & Schedule
// =============================================================================

mod appointment_tests {
    use super::*;

    #[tokio::test]
    async fn test_book_defaults_to_scheduled() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        let created = book(
            &server,
            &token,
            json!({
                "customerName": "Asha Rao",
                "phone": "+91 98450 11111",
                "date": "2024-03-01",
                "time": "10:30",
                "customerId": ""
            }),
        )
        .await;

        assert_eq!(created["status"], "scheduled");
        assert!(created["customerId"].is_null());
        assert!(created["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_time_rejected() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        let response = server
            .post("/appointments")
            .authorization(bearer(&token))
            .json(&json!({
                "customerName": "Asha",
                "phone": "1",
                "date": "2024-03-01",
                "time": "25:00"
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_non_ascii_digits_rejected() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        for (date, time) in [
            ("2024-03-01", "1\u{096B}:3\u{0966}"),
            ("\u{0968}\u{0966}\u{0968}\u{096A}-03-01", "10:30"),
        ] {
            let response = server
                .post("/appointments")
                .authorization(bearer(&token))
                .json(&json!({
                    "customerName": "Asha",
                    "phone": "1",
                    "date": date,
                    "time": time
                }))
                .await;
            response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        }

        let listed: Vec<Value> = server
            .get("/appointments")
            .authorization(bearer(&token))
            .await
            .json();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_chronological_and_filterable() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        for (date, time) in [
            ("2024-03-02", "09:00"),
            ("2024-03-01", "14:00"),
            ("2024-03-01", "09:30"),
        ] {
            book(
                &server,
                &token,
                json!({ "customerName": "Asha", "phone": "1", "date": date, "time": time }),
            )
            .await;
        }

        let all: Vec<Value> = server
            .get("/appointments")
            .authorization(bearer(&token))
            .await
            .json();
        let order: Vec<(String, String)> = all
            .iter()
            .map(|a| {
                (
                    a["date"].as_str().unwrap().to_string(),
                    a["time"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("2024-03-01".to_string(), "09:30".to_string()),
                ("2024-03-01".to_string(), "14:00".to_string()),
                ("2024-03-02".to_string(), "09:00".to_string()),
            ]
        );

        let on_date: Vec<Value> = server
            .get("/appointments?filter=date&date=2024-03-01")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(on_date.len(), 2);

        let unknown_mode: Vec<Value> = server
            .get("/appointments?filter=someday")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(unknown_mode.len(), 3);
    }

    #[tokio::test]
    async fn test_status_update_and_delete() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;
        let created = book(
            &server,
            &token,
            json!({ "customerName": "Asha", "phone": "1", "date": "2024-03-01", "time": "10:00" }),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let response = server
            .put(&format!("/appointments/{}/status", id))
            .authorization(bearer(&token))
            .json(&json!({ "status": " Completed " }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "completed");

        server
            .put(&format!("/appointments/{}/status", id))
            .authorization(bearer(&token))
            .json(&json!({ "status": "done" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        server
            .delete(&format!("/appointments/{}", id))
            .authorization(bearer(&token))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/appointments/{}", id))
            .authorization(bearer(&token))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_edit_keeps_status_when_unset() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;
        let created = book(
            &server,
            &token,
            json!({
                "customerName": "Asha",
                "phone": "1",
                "date": "2024-03-01",
                "time": "10:00",
                "status": "cancelled"
            }),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let response = server
            .put(&format!("/appointments/{}", id))
            .authorization(bearer(&token))
            .json(&json!({
                "customerName": "Asha Rao",
                "phone": "1",
                "date": "2024-03-05",
                "time": "11:00",
                "notes": "follow-up"
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["customerName"], "Asha Rao");
        assert_eq!(body["date"], "2024-03-05");
        assert_eq!(body["status"], "cancelled");
        assert_eq!(body["createdAt"], created["createdAt"]);
    }

    #[tokio::test]
    async fn test_reminder_link() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;
        let created = book(
            &server,
            &token,
            json!({
                "customerName": "Asha",
                "phone": "+91 98450-11111",
                "date": "2024-03-01",
                "time": "10:00"
            }),
        )
        .await;

        let body: Value = server
            .get(&format!("/appointments/{}/reminder", created["id"].as_str().unwrap()))
            .authorization(bearer(&token))
            .await
            .json();
        let url = body["url"].as_str().unwrap();
        assert!(url.starts_with("https://wa.me/919845011111?text="));
        assert!(url.contains("Asha"));
    }

    #[tokio::test]
    async fn test_schedule_views() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;
        for (date, time) in [
            ("2024-02-26", "09:00"),
            ("2024-03-01", "10:00"),
            ("2024-03-01", "11:00"),
            ("2024-03-09", "10:00"),
        ] {
            book(
                &server,
                &token,
                json!({ "customerName": "Asha", "phone": "1", "date": date, "time": time }),
            )
            .await;
        }

        let week: Vec<Value> = server
            .get("/schedule/week?center=2024-03-01&offset=0")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0]["date"], "2024-02-25");
        assert_eq!(week[0]["weekday"], "Sun");
        assert_eq!(week[1]["count"], 1);
        assert_eq!(week[5]["count"], 2);

        let next_week: Vec<Value> = server
            .get("/schedule/week?center=2024-03-01&offset=1")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(next_week[0]["date"], "2024-03-03");
        assert_eq!(next_week[6]["count"], 1);

        server
            .get("/schedule/week?offset=soon")
            .authorization(bearer(&token))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let day: Vec<Value> = server
            .get("/schedule/day?date=2024-03-01")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(day.len(), 2);

        let counts: Value = server
            .get("/schedule/counts")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(counts["2024-03-01"], 2);
        assert_eq!(counts["2024-03-09"], 1);

        let groups: Vec<Value> = server
            .get("/schedule/groups")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1]["dateKey"], "2024-03-01");
        assert_eq!(groups[1]["appointments"].as_array().unwrap().len(), 2);
    }
}

// =============================================================================
// Invoices
// =============================================================================

mod invoice_tests {
    use super::*;

    #[tokio::test]
    async fn test_numbers_are_sequential_within_period() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;
        let prefix = period_prefix(today_utc());

        let next: Value = server
            .get("/invoices/next-number")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(next["invoiceNumber"], format!("{prefix}001"));

        for expected in ["001", "002", "003"] {
            let response = server
                .post("/invoices")
                .authorization(bearer(&token))
                .json(&draft(1000.0, "29", "29"))
                .await;
            response.assert_status(StatusCode::CREATED);
            assert_eq!(
                response.json::<Value>()["invoiceNumber"],
                format!("{prefix}{expected}")
            );
        }

        let list: Vec<Value> = server
            .get("/invoices")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0]["invoiceNumber"], format!("{prefix}003"));
    }

    #[tokio::test]
    async fn test_numbering_is_per_account() {
        let server = create_test_server();
        let first = signup(&server, "meera@example.com").await;
        let second = signup(&server, "ravi@example.com").await;
        let prefix = period_prefix(today_utc());

        for token in [&first, &first, &second] {
            server
                .post("/invoices")
                .authorization(bearer(token))
                .json(&draft(500.0, "29", "29"))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let next: Value = server
            .get("/invoices/next-number")
            .authorization(bearer(&second))
            .await
            .json();
        assert_eq!(next["invoiceNumber"], format!("{prefix}002"));
    }

    #[tokio::test]
    async fn test_intrastate_and_interstate_amounts() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        let intrastate: Value = server
            .post("/invoices")
            .authorization(bearer(&token))
            .json(&draft(1000.0, "29", "29"))
            .await
            .json();
        assert_eq!(intrastate["taxableValue"], 1000.0);
        assert_eq!(intrastate["cgst"], 90.0);
        assert_eq!(intrastate["sgst"], 90.0);
        assert_eq!(intrastate["igst"], 0.0);
        assert_eq!(intrastate["totalAmount"], 1180.0);
        assert_eq!(intrastate["sacCode"], "998313");
        assert_eq!(intrastate["gstRate"], 18.0);
        assert_eq!(intrastate["quantity"], 1.0);

        let interstate: Value = server
            .post("/invoices")
            .authorization(bearer(&token))
            .json(&draft(1000.0, "29", "27"))
            .await
            .json();
        assert_eq!(interstate["cgst"], 0.0);
        assert_eq!(interstate["igst"], 180.0);
        assert_eq!(interstate["totalAmount"], 1180.0);
    }

    #[tokio::test]
    async fn test_amounts_rounded_on_create_only() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;
        let body = json!({
            "date": date_key(today_utc()),
            "sellerName": "Meera Physio",
            "sellerState": "29",
            "buyerName": "Asha",
            "placeOfSupply": "29",
            "quantity": 1,
            "rate": 999.99,
            "gstRate": 18
        });

        let preview: Value = server
            .post("/invoices/preview")
            .authorization(bearer(&token))
            .json(&body)
            .await
            .json();
        let created: Value = server
            .post("/invoices")
            .authorization(bearer(&token))
            .json(&body)
            .await
            .json();

        let unrounded_cgst = preview["cgst"].as_f64().unwrap();
        assert!((unrounded_cgst - 89.9991).abs() < 1e-9);
        assert_eq!(created["cgst"], 90.0);
        assert_eq!(created["sgst"], 90.0);
        assert_eq!(created["taxableValue"], 999.99);
        assert_eq!(created["totalAmount"], 1179.99);
    }

    #[tokio::test]
    async fn test_preview_tolerates_incomplete_draft() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        let response = server
            .post("/invoices/preview")
            .authorization(bearer(&token))
            .json(&json!({ "rate": 200 }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["totalAmount"], 236.0);

        server
            .post("/invoices")
            .authorization(bearer(&token))
            .json(&json!({ "rate": 200 }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_invalid_amounts_rejected() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;

        for (field, value) in [("rate", json!(0)), ("gstRate", json!(40)), ("quantity", json!(-1))] {
            let mut body = draft(100.0, "29", "29");
            body[field] = value;
            server
                .post("/invoices")
                .authorization(bearer(&token))
                .json(&body)
                .await
                .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn test_draft_from_appointment() {
        let server = create_test_server();
        let token = signup(&server, "meera@example.com").await;
        let appointment = book(
            &server,
            &token,
            json!({ "customerName": "Asha Rao", "phone": "98450", "date": "2024-03-01", "time": "10:00" }),
        )
        .await;
        let id = appointment["id"].as_str().unwrap();

        let draft: Value = server
            .get(&format!("/invoices/draft?appointmentId={}", id))
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(draft["buyerName"], "Asha Rao");
        assert_eq!(draft["buyerPhone"], "98450");
        assert_eq!(draft["sellerName"], "Meera");
        assert_eq!(draft["appointmentId"], id);
        assert_eq!(draft["sacCode"], "998313");
        assert_eq!(draft["date"], date_key(today_utc()));
    }

    #[tokio::test]
    async fn test_accounts_are_isolated() {
        let server = create_test_server();
        let owner = signup(&server, "meera@example.com").await;
        let intruder = signup(&server, "ravi@example.com").await;

        let appointment = book(
            &server,
            &owner,
            json!({ "customerName": "Asha", "phone": "1", "date": "2024-03-01", "time": "10:00" }),
        )
        .await;
        let appointment_id = appointment["id"].as_str().unwrap();
        let invoice: Value = server
            .post("/invoices")
            .authorization(bearer(&owner))
            .json(&draft(100.0, "29", "29"))
            .await
            .json();
        let invoice_id = invoice["id"].as_str().unwrap();

        for path in [
            format!("/appointments/{}", appointment_id),
            format!("/appointments/{}/reminder", appointment_id),
            format!("/invoices/{}", invoice_id),
            format!("/invoices/draft?appointmentId={}", appointment_id),
        ] {
            server
                .get(&path)
                .authorization(bearer(&intruder))
                .await
                .assert_status(StatusCode::NOT_FOUND);
        }

        server
            .delete(&format!("/appointments/{}", appointment_id))
            .authorization(bearer(&intruder))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let mut linked = draft(100.0, "29", "29");
        linked["appointmentId"] = json!(appointment_id);
        server
            .post("/invoices")
            .authorization(bearer(&intruder))
            .json(&linked)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let theirs: Vec<Value> = server
            .get("/appointments")
            .authorization(bearer(&intruder))
            .await
            .json();
        assert!(theirs.is_empty());
    }

    #[tokio::test]
    async fn test_previous_month_does_not_count() {
        let storage = Storage::in_memory();
        let app = ServerBuilder::new()
            .with_config(test_config())
            .with_storage(storage.clone())
            .build()
            .unwrap();
        let server = TestServer::new(app).unwrap();
        let token = signup(&server, "meera@example.com").await;

        let user = storage
            .users
            .query_by_field("email", &"meera@example.com".into())
            .await
            .unwrap()
            .remove(0);
        let last_month = today_utc().checked_sub_days(Days::new(40)).unwrap();
        let old: Invoice = serde_json::from_value(json!({
            "userId": user.id,
            "invoiceNumber": format!("{}041", period_prefix(last_month)),
            "date": date_key(last_month),
            "sellerName": "Meera Physio",
            "sellerState": "29",
            "buyerName": "Asha",
            "placeOfSupply": "29",
            "description": "Consultation",
            "sacCode": "998313",
            "quantity": 1.0,
            "rate": 100.0,
            "gstRate": 18.0,
            "taxableValue": 100.0,
            "cgst": 9.0,
            "sgst": 9.0,
            "igst": 0.0,
            "totalAmount": 118.0
        }))
        .unwrap();
        storage.invoices.insert(old).await.unwrap();

        let next: Value = server
            .get("/invoices/next-number")
            .authorization(bearer(&token))
            .await
            .json();
        assert_eq!(next["invoiceNumber"], format!("{}001", period_prefix(today_utc())));
    }
}

// =============================================================================
// Storage failures
// =============================================================================

mod storage_failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_stalled_storage_returns_gateway_timeout() {
        let storage = Storage {
            users: Arc::new(InMemoryDataService::<User>::new()),
            customers: Arc::new(InMemoryDataService::<Customer>::new()),
            appointments: Arc::new(Stalled::<Appointment>::new()),
            invoices: Arc::new(InMemoryDataService::<Invoice>::new()),
        };
        let mut config = test_config();
        config.storage.timeout_secs = 1;

        let app = ServerBuilder::new()
            .with_config(config)
            .with_storage(storage)
            .build()
            .unwrap();
        let server = TestServer::new(app).unwrap();
        let token = signup(&server, "meera@example.com").await;

        let response = server
            .get("/appointments")
            .authorization(bearer(&token))
            .await;
        response.assert_status(StatusCode::GATEWAY_TIMEOUT);

        let body: Value = response.json();
        assert_eq!(body["code"], "STORAGE_TIMEOUT");
        assert_eq!(body["details"]["operation"], "appointments.query");

        server
            .get("/customers")
            .authorization(bearer(&token))
            .await
            .assert_status_ok();
    }
}
