use axum::{routing::get, Router};

use crate::state::AppState;

pub mod expenses;
pub mod health;
pub mod leases;
pub mod payments;
pub mod properties;
pub mod receipts;
pub mod reports;
pub mod session;
pub mod settings;
pub mod users;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .merge(session::router())
        .merge(users::router())
        .merge(settings::router())
        .merge(properties::router())
        .merge(payments::router())
        .merge(expenses::router())
        .merge(leases::router())
        .merge(reports::router())
        .merge(receipts::router())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::state::AppState;

    async fn test_app() -> (Router, AppState) {
        let mut config = AppConfig::from_env();
        config.database_path = ":memory:".to_string();
        // A single pooled connection keeps the in-memory database alive
        // and shared across requests.
        config.db_pool_max_connections = 1;
        config.db_pool_min_connections = 1;
        config.bootstrap_admin_username = "admin".to_string();
        config.bootstrap_admin_password = "admin123".to_string();

        let state = AppState::build(config).await.expect("state builds");
        (super::api_router().with_state(state.clone()), state)
    }

    async fn call(
        app: &Router,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(payload) => request
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(app: &Router) -> String {
        let (status, body) = call(
            app,
            "POST",
            "/login",
            None,
            Some(json!({ "username": "admin", "password": "admin123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a property and returns (property_id, tenant_id).
    async fn seed_property(app: &Router, token: &str, name: &str, base_rent: f64) -> (i64, i64) {
        let (status, body) = call(
            app,
            "POST",
            "/properties",
            Some(token),
            Some(json!({
                "name": name,
                "label": name,
                "address": "14 Test Ave",
                "base_rent": base_rent,
                "tenant_name": "Dana Smith",
                "tenant_email": "dana@example.com",
                "tenant_phone": "(555) 123-4567",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "create property: {body}");
        let property_id = body["id"].as_i64().unwrap();

        let (_, listing) = call(app, "GET", "/properties", Some(token), None).await;
        let tenant_id = listing
            .as_array()
            .unwrap()
            .iter()
            .find(|row| row["id"].as_i64() == Some(property_id))
            .and_then(|row| row["tenant_id"].as_i64())
            .unwrap();
        (property_id, tenant_id)
    }

    #[tokio::test]
    async fn rejects_bad_credentials_and_missing_sessions() {
        let (app, _state) = test_app().await;

        let (status, body) = call(
            &app,
            "POST",
            "/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["ok"], json!(false));

        let (status, _) = call(&app, "GET", "/properties", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&app, "GET", "/properties", Some("stale-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_invalidates_the_session() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;

        let (status, _) = call(&app, "GET", "/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        call(&app, "POST", "/logout", Some(&token), None).await;
        let (_, me) = call(&app, "GET", "/me", Some(&token), None).await;
        assert_eq!(me, Value::Null);
    }

    #[tokio::test]
    async fn payment_upsert_keeps_one_row_per_period() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;
        let (property_id, tenant_id) = seed_property(&app, &token, "Oak St #2", 1200.0).await;

        for received in [500.0, 1150.0] {
            let (status, _) = call(
                &app,
                "POST",
                "/payments",
                Some(&token),
                Some(json!({
                    "property_id": property_id,
                    "tenant_id": tenant_id,
                    "month": 3,
                    "year": 2024,
                    "rent_due": 1200.0,
                    "rent_received": received,
                    "late_fee": 0.0,
                    "notes": "partial then corrected",
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, rows) = call(
            &app,
            "GET",
            &format!("/payments?property_id={property_id}&year=2024"),
            Some(&token),
            None,
        )
        .await;
        let rows = rows.as_array().unwrap().clone();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["rent_received"].as_f64(), Some(1150.0));
        assert_eq!(rows[0]["notes"], json!("partial then corrected"));
        assert!(rows[0]["paid_date"].is_string());
    }

    #[tokio::test]
    async fn clearing_a_payment_resets_paid_date() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;
        let (property_id, tenant_id) = seed_property(&app, &token, "Pine Cottage", 900.0).await;

        let record = |received: f64| {
            json!({
                "property_id": property_id,
                "tenant_id": tenant_id,
                "month": 6,
                "year": 2024,
                "rent_due": 900.0,
                "rent_received": received,
                "late_fee": 0.0,
            })
        };
        call(&app, "POST", "/payments", Some(&token), Some(record(900.0))).await;
        call(&app, "POST", "/payments", Some(&token), Some(record(0.0))).await;

        let (_, rows) = call(
            &app,
            "GET",
            &format!("/payments?property_id={property_id}&year=2024"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(rows[0]["rent_received"].as_f64(), Some(0.0));
        assert!(rows[0]["paid_date"].is_null());
    }

    #[tokio::test]
    async fn dashboard_projects_base_rent_for_empty_years() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;
        seed_property(&app, &token, "Maple House", 950.0).await;

        let (status, report) = call(&app, "GET", "/dashboard?year=2024", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let months = report["properties"][0]["months"].as_array().unwrap();
        assert_eq!(months.len(), 12);
        for entry in months {
            assert_eq!(entry["due"].as_f64(), Some(950.0));
            assert_eq!(entry["recv"].as_f64(), Some(0.0));
            assert_eq!(entry["status"], json!("unpaid"));
        }
        assert_eq!(report["properties"][0]["tDue"].as_f64(), Some(950.0 * 12.0));
        assert_eq!(report["properties"][0]["paid"].as_i64(), Some(0));
        assert_eq!(report["year"].as_i64(), Some(2024));
    }

    #[tokio::test]
    async fn dashboard_monthly_series_folds_all_properties() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;
        let (first_id, first_tenant) = seed_property(&app, &token, "Alder Flat", 800.0).await;
        seed_property(&app, &token, "Birch Flat", 600.0).await;

        call(
            &app,
            "POST",
            "/payments",
            Some(&token),
            Some(json!({
                "property_id": first_id,
                "tenant_id": first_tenant,
                "month": 2,
                "year": 2024,
                "rent_due": 800.0,
                "rent_received": 800.0,
                "late_fee": 0.0,
            })),
        )
        .await;

        let (_, report) = call(&app, "GET", "/dashboard?year=2024", Some(&token), None).await;
        let monthly = report["monthly"].as_array().unwrap();
        assert_eq!(monthly.len(), 12);

        // February: one property collected in full, the other projected.
        assert_eq!(monthly[1]["month"].as_i64(), Some(2));
        assert_eq!(monthly[1]["collected"].as_f64(), Some(800.0));
        assert_eq!(monthly[1]["due"].as_f64(), Some(1400.0));
        // An untouched month sums both base rents and no collections.
        assert_eq!(monthly[7]["collected"].as_f64(), Some(0.0));
        assert_eq!(monthly[7]["due"].as_f64(), Some(1400.0));

        // The collected series equals the per-property recv fold.
        for (index, entry) in monthly.iter().enumerate() {
            let expected: f64 = report["properties"]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p["months"][index]["recv"].as_f64().unwrap())
                .sum();
            assert_eq!(entry["collected"].as_f64(), Some(expected));
        }
    }

    #[tokio::test]
    async fn tax_report_sums_recorded_rows_without_projection() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;
        let (property_id, tenant_id) = seed_property(&app, &token, "Cedar Duplex", 1000.0).await;

        call(
            &app,
            "POST",
            "/payments",
            Some(&token),
            Some(json!({
                "property_id": property_id,
                "tenant_id": tenant_id,
                "month": 1,
                "year": 2024,
                "rent_due": 1000.0,
                "rent_received": 1000.0,
                "late_fee": 25.0,
            })),
        )
        .await;
        for (category, amount) in [("repairs", 120.0), ("repairs", 80.0), ("insurance", 300.0)] {
            call(
                &app,
                "POST",
                "/expenses",
                Some(&token),
                Some(json!({
                    "property_id": property_id,
                    "month": 1,
                    "year": 2024,
                    "amount": amount,
                    "category": category,
                    "description": "",
                })),
            )
            .await;
        }

        let (_, report) = call(&app, "GET", "/taxreport?year=2024", Some(&token), None).await;

        // Cash actually received, never the 12-month base-rent projection.
        assert_eq!(report["grandIncome"].as_f64(), Some(1025.0));
        assert_eq!(report["grandExp"].as_f64(), Some(500.0));
        assert_eq!(report["grandNet"].as_f64(), Some(525.0));

        let property = &report["properties"][0];
        assert_eq!(property["totalRecv"].as_f64(), Some(1000.0));
        assert_eq!(property["totalLate"].as_f64(), Some(25.0));
        assert_eq!(property["netIncome"].as_f64(), Some(525.0));

        let categories = report["allCategories"].as_array().unwrap();
        assert_eq!(categories[0]["category"], json!("insurance"));
        assert_eq!(categories[0]["total"].as_f64(), Some(300.0));
        assert_eq!(categories[1]["category"], json!("repairs"));
        assert_eq!(categories[1]["total"].as_f64(), Some(200.0));

        // The dashboard view of the same year reports expected income.
        let (_, dashboard) = call(&app, "GET", "/dashboard?year=2024", Some(&token), None).await;
        assert_eq!(
            dashboard["properties"][0]["tDue"].as_f64(),
            Some(12_000.0)
        );
    }

    #[tokio::test]
    async fn receipt_renders_number_and_logs_the_event() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;
        let (property_id, tenant_id) = seed_property(&app, &token, "Oak St #2", 1200.0).await;

        let (status, body) = call(
            &app,
            "POST",
            "/email-receipt",
            Some(&token),
            Some(json!({
                "property_id": property_id,
                "tenant_id": tenant_id,
                "month": 3,
                "year": 2024,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["msg"], json!("Receipt ready for dana@example.com"));

        let gmail_url = body["gmailUrl"].as_str().unwrap();
        assert!(gmail_url.starts_with("https://mail.google.com/mail/?view=cm"));
        assert!(gmail_url.contains("OAKST2-MAR-2024"));
        assert!(gmail_url.contains("to=dana%40example.com"));

        let (_, log) = call(&app, "GET", "/email-log", Some(&token), None).await;
        let entries = log.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["type"], json!("receipt"));
        assert_eq!(entries[0]["to_email"], json!("dana@example.com"));
        assert_eq!(entries[0]["amount"].as_f64(), Some(0.0));

        let (status, body) = call(
            &app,
            "POST",
            "/email-receipt",
            Some(&token),
            Some(json!({
                "property_id": property_id + 99,
                "tenant_id": tenant_id,
                "month": 3,
                "year": 2024,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], json!("Property or tenant not found."));
    }

    #[tokio::test]
    async fn property_delete_cascades_but_keeps_leases_and_log() {
        let (app, state) = test_app().await;
        let token = login(&app).await;
        let (property_id, tenant_id) = seed_property(&app, &token, "Willow Row", 700.0).await;

        call(
            &app,
            "POST",
            "/payments",
            Some(&token),
            Some(json!({
                "property_id": property_id,
                "tenant_id": tenant_id,
                "month": 1,
                "year": 2024,
                "rent_due": 700.0,
                "rent_received": 700.0,
                "late_fee": 0.0,
            })),
        )
        .await;
        call(
            &app,
            "POST",
            "/expenses",
            Some(&token),
            Some(json!({
                "property_id": property_id,
                "month": 1,
                "year": 2024,
                "amount": 50.0,
                "category": "repairs",
            })),
        )
        .await;
        call(
            &app,
            "POST",
            "/leases",
            Some(&token),
            Some(json!({
                "tenant_id": tenant_id,
                "property_id": property_id,
                "start_date": "2024-01-01",
                "end_date": "2024-12-31",
                "rent_amount": 700.0,
            })),
        )
        .await;
        call(
            &app,
            "POST",
            "/email-receipt",
            Some(&token),
            Some(json!({
                "property_id": property_id,
                "tenant_id": tenant_id,
                "month": 1,
                "year": 2024,
            })),
        )
        .await;

        let (status, _) = call(
            &app,
            "DELETE",
            &format!("/properties/{property_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, payments) = call(
            &app,
            "GET",
            &format!("/payments?property_id={property_id}&year=2024"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(payments.as_array().unwrap().len(), 0);
        let (_, expenses) = call(
            &app,
            "GET",
            &format!("/expenses?property_id={property_id}&year=2024"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(expenses.as_array().unwrap().len(), 0);

        // Leases and the email log survive the cascade.
        let orphaned_leases: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM leases WHERE property_id = ?")
                .bind(property_id)
                .fetch_one(&state.db)
                .await
                .unwrap();
        assert_eq!(orphaned_leases, 1);

        let (_, log) = call(&app, "GET", "/email-log", Some(&token), None).await;
        let entries = log.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["prop_label"], json!("—"));
        assert_eq!(entries[0]["ten_name"], json!("—"));
    }

    #[tokio::test]
    async fn second_lease_replaces_the_active_one() {
        let (app, state) = test_app().await;
        let token = login(&app).await;
        let (property_id, tenant_id) = seed_property(&app, &token, "Elm Court", 1100.0).await;

        for (start, end) in [("2023-01-01", "2023-12-31"), ("2024-01-01", "2024-12-31")] {
            call(
                &app,
                "POST",
                "/leases",
                Some(&token),
                Some(json!({
                    "tenant_id": tenant_id,
                    "property_id": property_id,
                    "start_date": start,
                    "end_date": end,
                    "rent_amount": 1100.0,
                })),
            )
            .await;
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leases WHERE tenant_id = ? AND active = 1",
        )
        .bind(tenant_id)
        .fetch_one(&state.db)
        .await
        .unwrap();
        assert_eq!(active, 1);

        let (_, roster) = call(&app, "GET", "/leases", Some(&token), None).await;
        let row = &roster.as_array().unwrap()[0];
        assert_eq!(row["start_date"], json!("2024-01-01"));
        assert_eq!(row["prop_label"], json!("Elm Court"));
    }

    #[tokio::test]
    async fn user_management_guards() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;

        let (status, _) = call(
            &app,
            "POST",
            "/users",
            Some(&token),
            Some(json!({ "username": "admin", "password": "pw123", "role": "manager" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, me) = call(&app, "GET", "/me", Some(&token), None).await;
        let my_id = me["id"].as_i64().unwrap();
        let (status, body) = call(
            &app,
            "DELETE",
            &format!("/users/{my_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], json!("Cannot delete yourself."));
    }

    #[tokio::test]
    async fn settings_upsert_round_trips() {
        let (app, _state) = test_app().await;
        let token = login(&app).await;

        call(
            &app,
            "POST",
            "/settings",
            Some(&token),
            Some(json!({ "ll_name": "New Management LLC", "ll_phone": "(555) 111-2222" })),
        )
        .await;
        call(
            &app,
            "POST",
            "/settings",
            Some(&token),
            Some(json!({ "ll_name": "New Management LLC" })),
        )
        .await;

        let (_, settings) = call(&app, "GET", "/settings", Some(&token), None).await;
        assert_eq!(settings["ll_name"], json!("New Management LLC"));
        assert_eq!(settings["ll_phone"], json!("(555) 111-2222"));
        // Seeded keys remain available.
        assert!(settings["ll_email"].is_string());
    }
}
