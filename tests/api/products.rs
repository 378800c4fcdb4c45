use diesel::connection::SimpleConnection;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::helpers::{parse_uuid, png_part, TestApp, TEST_MAX_IMAGE_BYTES};

#[actix_web::test]
async fn unverified_vendor_cannot_create_products(){
    let app = TestApp::spawn_app().await;
    let vendor = app.register_vendor("vendor@example.com").await;

    let response = app.create_product(&vendor.token, "Paket Dekorasi").await;
    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
async fn rejected_vendor_cannot_create_products(){
    let app = TestApp::spawn_app().await;
    let vendor = app.register_vendor("vendor@example.com").await;

    let response = app.set_vendor_status(vendor.vendor_id.unwrap(), "REJECTED", Some("Dokumen tidak lengkap")).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.create_product(&vendor.token, "Paket Dekorasi").await;
    assert_eq!(response.status().as_u16(), 403);
}

#[actix_web::test]
async fn verified_vendor_creates_product_visible_in_catalogue(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;
    let category_id = app.create_category("Dekorasi").await;

    let response = app.post_json("/products", &json!({
        "name": "Paket Dekorasi Pelaminan",
        "description": "Dekorasi lengkap",
        "price": 25_000_000,
        "category_id": category_id
    }), Some(&vendor.token)).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    let product_id = parse_uuid(&body["data"]["id"]);

    let response = app.get(&format!("/products?category_id={}&search=pelaminan", category_id), None).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(parse_uuid(&items[0]["id"]), product_id);

    let response = app.get(&format!("/products/{}", product_id), None).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[actix_web::test]
async fn product_with_unknown_category_is_rejected(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;

    let response = app.post_json("/products", &json!({
        "name": "Paket Foto",
        "price": 5_000_000,
        "category_id": Uuid::new_v4()
    }), Some(&vendor.token)).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["category_id"].is_array());
}

#[actix_web::test]
async fn negative_price_is_rejected(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;

    let response = app.post_json("/products", &json!({ "name": "Paket Foto", "price": -1 }), Some(&vendor.token)).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn vendor_cannot_update_another_vendors_product(){
    let app = TestApp::spawn_app().await;
    let owner = app.verified_vendor("owner@example.com").await;
    let intruder = app.verified_vendor("intruder@example.com").await;

    let body: Value = app.create_product(&owner.token, "Paket Katering").await.json().await.unwrap();
    let product_id = parse_uuid(&body["data"]["id"]);

    let response = app.put_json(
        &format!("/products/{}", product_id),
        &json!({ "price": 1 }),
        Some(&intruder.token)
    ).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app.delete(&format!("/products/{}", product_id), Some(&intruder.token)).await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app.put_json(
        &format!("/products/{}", product_id),
        &json!({ "price": 2_000_000 }),
        Some(&owner.token)
    ).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["price"], 2_000_000);
}

#[actix_web::test]
async fn superadmin_can_delete_any_product(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;
    let admin = app.admin_token().await;

    let body: Value = app.create_product(&vendor.token, "Paket Katering").await.json().await.unwrap();
    let product_id = parse_uuid(&body["data"]["id"]);

    let response = app.delete(&format!("/products/{}", product_id), Some(&admin)).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get(&format!("/products/{}", product_id), None).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn inactive_products_only_show_up_for_their_vendor(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;

    let response = app.post_json("/products", &json!({
        "name": "Paket Rahasia",
        "price": 100,
        "is_active": false
    }), Some(&vendor.token)).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = app.get("/products", None).await.json().await.unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);

    let response = app.get("/products/mine", Some(&vendor.token)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn product_image_upload_validates_content(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;

    let body: Value = app.create_product(&vendor.token, "Paket Foto").await.json().await.unwrap();
    let product_id = parse_uuid(&body["data"]["id"]);
    let url = app.api_url(&format!("/products/{}/image", product_id));

    let png: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    let part = reqwest::multipart::Part::bytes(png)
        .file_name("foto.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = app.api_client.post(&url)
        .bearer_auth(&vendor.token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let image_url = body["data"]["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/products/"));

    let response = reqwest::get(format!("{}{}", app.get_app_url(), image_url)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let part = reqwest::multipart::Part::bytes(b"not an image".to_vec())
        .file_name("foto.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = app.api_client.post(&url)
        .bearer_auth(&vendor.token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 415);
}

#[actix_web::test]
async fn blank_product_name_is_rejected(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;

    let response = app.post_json("/products", &json!({ "name": "   ", "price": 100 }), Some(&vendor.token)).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["name"].is_array());

    let body: Value = app.create_product(&vendor.token, "Paket Foto").await.json().await.unwrap();
    let product_id = parse_uuid(&body["data"]["id"]);

    let response = app.put_json(&format!("/products/{}", product_id), &json!({ "name": " \t " }), Some(&vendor.token)).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.put_json(&format!("/products/{}", product_id), &json!({ "name": "  Paket Video  " }), Some(&vendor.token)).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Paket Video");
}

#[actix_web::test]
async fn page_far_past_the_end_is_empty(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;
    app.create_product(&vendor.token, "Paket Foto").await;

    let response = app.get(&format!("/products?page={}&limit=100", i64::MAX), None).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn product_image_upload_enforces_size_and_field(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;

    let body: Value = app.create_product(&vendor.token, "Paket Foto").await.json().await.unwrap();
    let path = format!("/products/{}/image", parse_uuid(&body["data"]["id"]));

    let form = reqwest::multipart::Form::new().part("file", png_part(TEST_MAX_IMAGE_BYTES + 1024));
    let response = app.upload_file(&path, &vendor.token, form).await;
    assert_eq!(response.status().as_u16(), 413);

    let form = reqwest::multipart::Form::new().part("photo", png_part(64));
    let response = app.upload_file(&path, &vendor.token, form).await;
    assert_eq!(response.status().as_u16(), 400);

    assert_eq!(app.stored_files("products"), 0);
}

#[actix_web::test]
async fn stored_image_is_removed_when_product_update_fails(){
    let app = TestApp::spawn_app().await;
    let vendor = app.verified_vendor("vendor@example.com").await;

    let body: Value = app.create_product(&vendor.token, "Paket Foto").await.json().await.unwrap();
    let path = format!("/products/{}/image", parse_uuid(&body["data"]["id"]));

    let mut conn = app.pool.get().unwrap();
    conn.batch_execute(r#"
        CREATE FUNCTION reject_product_updates() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'product updates are disabled';
        END;
        $$ LANGUAGE plpgsql;

        CREATE TRIGGER reject_product_updates BEFORE UPDATE ON products
        FOR EACH ROW EXECUTE FUNCTION reject_product_updates();
    "#).unwrap();

    let form = reqwest::multipart::Form::new().part("file", png_part(64));
    let response = app.upload_file(&path, &vendor.token, form).await;
    assert_eq!(response.status().as_u16(), 500);

    assert_eq!(app.stored_files("products"), 0);
}
