use serde_json::{json, Value};

use crate::helpers::TestApp;

#[actix_web::test]
async fn superadmin_creates_category_with_derived_slug(){
    let app = TestApp::spawn_app().await;
    let admin = app.admin_token().await;

    let response = app.post_json("/categories", &json!({
        "name": "Wedding Organizer & Dekorasi",
        "description": "Dekorasi pelaminan"
    }), Some(&admin)).await;

    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["slug"], "wedding-organizer-dekorasi");

    let response = app.get("/categories", None).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn duplicate_slug_conflicts(){
    let app = TestApp::spawn_app().await;
    let admin = app.admin_token().await;

    let response = app.post_json("/categories", &json!({ "name": "Katering" }), Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 201);

    let response = app.post_json("/categories", &json!({ "name": "Katering Lain", "slug": "katering" }), Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 409);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn client_cannot_manage_categories(){
    let app = TestApp::spawn_app().await;
    let client = app.register_client("client@example.com").await;

    let response = app.post_json("/categories", &json!({ "name": "Fotografi" }), Some(&client.token)).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app.post_json("/categories", &json!({ "name": "Fotografi" }), None).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn vendor_cannot_manage_categories(){
    let app = TestApp::spawn_app().await;
    let vendor = app.register_vendor("vendor@example.com").await;

    let response = app.post_json("/categories", &json!({ "name": "Fotografi" }), Some(&vendor.token)).await;
    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
async fn update_and_delete_category(){
    let app = TestApp::spawn_app().await;
    let admin = app.admin_token().await;
    let category_id = app.create_category("Sound System").await;

    let response = app.put_json(
        &format!("/categories/{}", category_id),
        &json!({ "description": "Sewa sound system" }),
        Some(&admin)
    ).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["description"], "Sewa sound system");
    assert_eq!(body["data"]["slug"], "sound-system");

    let response = app.put_json(&format!("/categories/{}", category_id), &json!({}), Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.delete(&format!("/categories/{}", category_id), Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get(&format!("/categories/{}", category_id), None).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn invalid_category_id_is_not_found(){
    let app = TestApp::spawn_app().await;

    let response = app.get("/categories/not-a-uuid", None).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn blank_category_name_is_rejected(){
    let app = TestApp::spawn_app().await;
    let admin = app.admin_token().await;
    let category_id = app.create_category("Fotografi").await;

    let response = app.post_json("/categories", &json!({ "name": "   " }), Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.put_json(&format!("/categories/{}", category_id), &json!({ "name": "   " }), Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["name"].is_array());

    let body: Value = app.get(&format!("/categories/{}", category_id), None).await.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Fotografi");
}

#[actix_web::test]
async fn renaming_slug_to_an_existing_one_conflicts(){
    let app = TestApp::spawn_app().await;
    let admin = app.admin_token().await;
    app.create_category("Katering").await;
    let dekorasi = app.create_category("Dekorasi").await;

    let response = app.put_json(&format!("/categories/{}", dekorasi), &json!({ "slug": "katering" }), Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 409);

    let body: Value = app.get(&format!("/categories/{}", dekorasi), None).await.json().await.unwrap();
    assert_eq!(body["data"]["slug"], "dekorasi");
}
