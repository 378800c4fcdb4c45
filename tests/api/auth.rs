use serde_json::{json, Value};

use crate::helpers::{parse_uuid, TestApp, TEST_PASSWORD};

#[actix_web::test]
async fn register_vendor_creates_pending_vendor(){
    let app = TestApp::spawn_app().await;

    let response = app.register(json!({
        "email": "Wedding@Example.com",
        "full_name": "Sari Wulandari",
        "password": TEST_PASSWORD,
        "confirm_password": TEST_PASSWORD,
        "role": "VENDOR",
        "phone_number": "0812-3456-7890",
        "business_name": "Sari Wedding Organizer"
    })).await;

    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "wedding@example.com");
    assert_eq!(body["data"]["user"]["role"], "VENDOR");
    assert_eq!(body["data"]["user"]["phone_number"], "+6281234567890");
    assert_eq!(body["data"]["vendor"]["verification_status"], "PENDING");
    assert!(body["data"]["user"].get("password_hash").is_none());
    assert!(body["data"]["tokens"]["access_token"].is_string());
}

#[actix_web::test]
async fn register_vendor_without_business_name_is_rejected(){
    let app = TestApp::spawn_app().await;

    let response = app.register(json!({
        "email": "vendor@example.com",
        "full_name": "No Business",
        "password": TEST_PASSWORD,
        "confirm_password": TEST_PASSWORD,
        "role": "VENDOR"
    })).await;

    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["errors"]["business_name"].is_array());
}

#[actix_web::test]
async fn register_with_invalid_fields_returns_field_errors(){
    let app = TestApp::spawn_app().await;

    let test_cases = vec![
        (json!({ "email": "not-an-email", "full_name": "A", "password": TEST_PASSWORD, "confirm_password": TEST_PASSWORD, "role": "CLIENT" }), "email"),
        (json!({ "email": "a@example.com", "full_name": "A", "password": "short", "confirm_password": "short", "role": "CLIENT" }), "password"),
        (json!({ "email": "a@example.com", "full_name": "A", "password": TEST_PASSWORD, "confirm_password": "different-one", "role": "CLIENT" }), "password"),
        (json!({ "email": "a@example.com", "full_name": "", "password": TEST_PASSWORD, "confirm_password": TEST_PASSWORD, "role": "CLIENT" }), "full_name"),
        (json!({ "email": "a@example.com", "full_name": "A", "password": TEST_PASSWORD, "confirm_password": TEST_PASSWORD, "role": "CLIENT", "phone_number": "12" }), "phone_number"),
        (json!({ "email": "a@example.com", "full_name": "A", "password": TEST_PASSWORD, "confirm_password": TEST_PASSWORD, "role": "SUPERADMIN" }), "role"),
    ];

    for (body, field) in test_cases {
        let response = app.register(body).await;
        assert_eq!(response.status().as_u16(), 400, "expected failure on {}", field);

        let body: Value = response.json().await.unwrap();
        assert!(body["errors"][field].is_array(), "missing error for {}: {}", field, body);
    }
}

#[actix_web::test]
async fn register_with_duplicate_email_conflicts(){
    let app = TestApp::spawn_app().await;
    app.register_client("client@example.com").await;

    let response = app.register(json!({
        "email": "client@example.com",
        "full_name": "Second Client",
        "password": TEST_PASSWORD,
        "confirm_password": TEST_PASSWORD,
        "role": "CLIENT"
    })).await;

    assert_eq!(response.status().as_u16(), 409);
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized(){
    let app = TestApp::spawn_app().await;
    app.register_client("client@example.com").await;

    let response = app.login("client@example.com", "wrong-password").await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.login("nobody@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn login_returns_usable_access_token(){
    let app = TestApp::spawn_app().await;
    app.register_client("client@example.com").await;

    let response = app.login("client@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let token = body["data"]["tokens"]["access_token"].as_str().unwrap().to_string();

    let response = app.get("/auth/me", Some(&token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["user"]["email"], "client@example.com");
}

#[actix_web::test]
async fn me_without_token_is_unauthorized(){
    let app = TestApp::spawn_app().await;

    let response = app.get("/auth/me", None).await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.get("/auth/me", Some("garbage")).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn refresh_accepts_only_refresh_tokens(){
    let app = TestApp::spawn_app().await;
    let body = json!({
        "email": "client@example.com",
        "full_name": "Client",
        "password": TEST_PASSWORD,
        "confirm_password": TEST_PASSWORD,
        "role": "CLIENT"
    });
    let body: Value = app.register(body).await.json().await.unwrap();
    let access = body["data"]["tokens"]["access_token"].as_str().unwrap();
    let refresh = body["data"]["tokens"]["refresh_token"].as_str().unwrap();

    let response = app.post_json("/auth/refresh", &json!({ "refresh_token": access }), None).await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.post_json("/auth/refresh", &json!({ "refresh_token": refresh }), None).await;
    assert_eq!(response.status().as_u16(), 200);

    // Refresh tokens are not accepted as bearer tokens
    let response = app.get("/auth/me", Some(refresh)).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn change_password_requires_current_password(){
    let app = TestApp::spawn_app().await;
    let client = app.register_client("client@example.com").await;

    let response = app.put_json("/auth/change-password", &json!({
        "current_password": "not-the-password",
        "new_password": "another-secret",
        "confirm_password": "another-secret"
    }), Some(&client.token)).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.put_json("/auth/change-password", &json!({
        "current_password": TEST_PASSWORD,
        "new_password": "another-secret",
        "confirm_password": "another-secret"
    }), Some(&client.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    assert_eq!(app.login("client@example.com", TEST_PASSWORD).await.status().as_u16(), 401);
    assert_eq!(app.login("client@example.com", "another-secret").await.status().as_u16(), 200);
}

#[actix_web::test]
async fn permissions_follow_role(){
    let app = TestApp::spawn_app().await;
    let client = app.register_client("client@example.com").await;

    let response = app.get("/auth/permissions", Some(&client.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["role"], "CLIENT");
    assert_eq!(body["data"]["permissions"], json!(["VIEW_VENDORS", "UPDATE_OWN_PROFILE"]));
}

#[actix_web::test]
async fn logout_acknowledges_authenticated_user(){
    let app = TestApp::spawn_app().await;
    let client = app.register_client("client@example.com").await;

    let response = app.post_json("/auth/logout", &json!({}), Some(&client.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.post_json("/auth/logout", &json!({}), None).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn register_with_blank_full_name_is_rejected(){
    let app = TestApp::spawn_app().await;

    let response = app.register(json!({
        "email": "client@example.com",
        "full_name": "    ",
        "password": TEST_PASSWORD,
        "confirm_password": TEST_PASSWORD,
        "role": "CLIENT"
    })).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["full_name"].is_array());
}

#[actix_web::test]
async fn deactivated_user_is_locked_out(){
    let app = TestApp::spawn_app().await;
    let body: Value = app.register(json!({
        "email": "client@example.com",
        "full_name": "Client",
        "password": TEST_PASSWORD,
        "confirm_password": TEST_PASSWORD,
        "role": "CLIENT"
    })).await.json().await.unwrap();

    let user_id = parse_uuid(&body["data"]["user"]["id"]);
    let access = body["data"]["tokens"]["access_token"].as_str().unwrap();
    let refresh = body["data"]["tokens"]["refresh_token"].as_str().unwrap();

    app.deactivate_user(user_id);

    let response = app.login("client@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app.post_json("/auth/refresh", &json!({ "refresh_token": refresh }), None).await;
    assert_eq!(response.status().as_u16(), 401);

    // Tokens issued before deactivation stop working as well
    let response = app.get("/auth/me", Some(access)).await;
    assert_eq!(response.status().as_u16(), 403);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}
