mod common;

use common::{TestApp, ADMIN_PIN};

#[tokio::test]
async fn admin_page_starts_with_pin_form() {
    let app = TestApp::spawn().await;

    let response = app.get("/admin").await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Admin Access"));
    assert!(body.contains(r#"name="pin" value="""#));
    assert!(!body.contains("Current Configuration"));
    assert_eq!(app.api.calls().await.total(), 0);
}

#[tokio::test]
async fn empty_pin_is_rejected_locally() {
    let app = TestApp::spawn().await;

    let response = app.verify_pin("").await;
    assert_eq!(response.status().as_u16(), 422);
    assert!(response.text().await.unwrap().contains("Admin PIN is required"));
    assert_eq!(app.api.calls().await.total(), 0);
}

#[tokio::test]
async fn wrong_pin_stays_locked_and_clears_the_field() {
    let app = TestApp::spawn().await;

    let response = app.verify_pin("9999").await;
    assert_eq!(response.status().as_u16(), 401);

    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid Admin PIN"));
    assert!(body.contains(r#"name="pin" value="""#));
    assert!(!body.contains("9999"));

    let response = app.update_config("0.6", "15", "5").await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(app.api.calls().await.update_config, 0);
}

#[tokio::test]
async fn unreachable_api_reads_as_invalid_pin() {
    let app = TestApp::spawn().await;
    app.api.set_unavailable(true).await;

    let response = app.verify_pin(ADMIN_PIN).await;
    assert_eq!(response.status().as_u16(), 401);
    assert!(response.text().await.unwrap().contains("Invalid Admin PIN"));
}

#[tokio::test]
async fn correct_pin_shows_active_configuration() {
    let app = TestApp::spawn().await;
    app.get("/admin").await;

    let response = app.verify_pin(ADMIN_PIN).await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Current Configuration"));
    assert!(body.contains("$0.50"));
    assert!(body.contains("15.00%"));
    assert!(body.contains("$5.00"));
    assert!(body.contains(r#"name="rate_per_unit" value="0.5""#));
    assert!(body.contains(r#"name="vat_percentage" value="15""#));
    assert!(body.contains(r#"name="fixed_service_charge" value="5""#));

    let calls = app.api.calls().await;
    assert_eq!(calls.config_history, 1);
    assert_eq!(calls.active_config, 1);
}

#[tokio::test]
async fn update_is_refetched_and_displayed() {
    let app = TestApp::spawn().await;
    app.login().await;

    let response = app.update_config("0.65", "20", "3.5").await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Configuration updated successfully!"));
    assert!(body.contains("$0.65"));
    assert!(body.contains("20.00%"));
    assert!(body.contains("$3.50"));
    assert!(body.contains(r#"name="rate_per_unit" value="0.65""#));

    let calls = app.api.calls().await;
    assert_eq!(calls.update_config, 1);
    assert_eq!(calls.active_config, 2);

    // The calculator now uses the new configuration
    let bill = app.calculate("100").await.text().await.unwrap();
    assert!(bill.contains("$65.00"));
    assert!(bill.contains("$13.00"));
    assert!(bill.contains("$81.50"));
}

#[tokio::test]
async fn failed_reload_after_update_keeps_previous_card() {
    let app = TestApp::spawn().await;
    app.login().await;
    app.api.fail_next_active_config().await;

    let response = app.update_config("0.65", "20", "3.5").await;
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Configuration updated successfully!"));
    assert!(body.contains("Failed to load current configuration"));
    assert!(body.contains("$0.50"));
    assert!(!body.contains("$0.65"));
    assert!(body.contains(r#"name="rate_per_unit" value="""#));
    assert!(body.contains(r#"name="vat_percentage" value="""#));
    assert!(body.contains(r#"name="fixed_service_charge" value="""#));
    assert_eq!(app.api.calls().await.update_config, 1);
}

#[tokio::test]
async fn each_invalid_field_blocks_submission() {
    let app = TestApp::spawn().await;
    app.login().await;

    for (rate, vat, fixed, message) in [
        ("0", "15", "5", "Rate per unit must be a positive number"),
        ("0.5", "100.5", "5", "VAT percentage must be between 0 and 100"),
        ("0.5", "15", "-0.01", "Fixed service charge must be a non-negative number"),
    ] {
        let response = app.update_config(rate, vat, fixed).await;
        assert_eq!(response.status().as_u16(), 422);

        let body = response.text().await.unwrap();
        assert!(body.contains(message), "missing {:?}", message);
        // Submitted values stay in the form
        assert!(body.contains(&format!(r#"name="fixed_service_charge" value="{}""#, fixed)));
        // Card still shows the active configuration
        assert!(body.contains("$0.50"));
    }

    assert_eq!(app.api.calls().await.update_config, 0);
}

#[tokio::test]
async fn every_violation_is_reported() {
    let app = TestApp::spawn().await;
    app.login().await;

    let body = app.update_config("", "150", "x").await.text().await.unwrap();
    assert!(body.contains("Rate per unit must be a positive number"));
    assert!(body.contains("VAT percentage must be between 0 and 100"));
    assert!(body.contains("Fixed service charge must be a non-negative number"));
}

#[tokio::test]
async fn server_rejection_is_shown_verbatim() {
    let app = TestApp::spawn().await;
    app.login().await;
    app.api.reject_next_update("Rates are frozen until month end").await;

    let response = app.update_config("0.9", "15", "5").await;
    assert_eq!(response.status().as_u16(), 422);

    let body = response.text().await.unwrap();
    assert!(body.contains("Rates are frozen until month end"));
    assert!(!body.contains("Configuration updated successfully!"));
    assert!(body.contains("$0.50"));
}

#[tokio::test]
async fn logout_requires_pin_again() {
    let app = TestApp::spawn().await;
    app.login().await;

    let response = app.post_form("/admin/logout", &[]).await;
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("Admin Access"));

    let response = app.update_config("0.6", "15", "5").await;
    assert_eq!(response.status().as_u16(), 401);
    assert!(response.text().await.unwrap().contains("Admin PIN is required"));
    assert_eq!(app.api.calls().await.update_config, 0);
}

#[tokio::test]
async fn reloading_admin_page_resets_the_gate() {
    let app = TestApp::spawn().await;
    app.login().await;

    app.get("/admin").await;

    let response = app.update_config("0.6", "15", "5").await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(app.api.calls().await.update_config, 0);
}

#[tokio::test]
async fn pin_verifications_are_counted() {
    let app = TestApp::spawn().await;
    app.verify_pin("").await;
    app.verify_pin("0000").await;
    app.verify_pin(ADMIN_PIN).await;

    let body = app.get("/metrics").await.text().await.unwrap();
    for outcome in ["ok", "invalid", "missing"] {
        assert!(
            body.contains(&format!(
                r#"admin_pin_verifications_total{{outcome="{}"}} 1"#,
                outcome
            )),
            "outcome {}",
            outcome
        );
    }
}
