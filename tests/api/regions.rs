use serde_json::Value;

use crate::helpers::TestApp;

#[actix_web::test]
async fn region_hierarchy_can_be_browsed(){
    let app = TestApp::spawn_app().await;

    let response = app.get("/regions/provinces", None).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let provinces = body["data"].as_array().unwrap();
    assert!(provinces.iter().any(|p| p["id"] == "32"));

    let body: Value = app.get("/regions/provinces/32/regencies", None).await.json().await.unwrap();
    let regencies = body["data"].as_array().unwrap();
    assert!(regencies.iter().all(|r| r["province_id"] == "32"));
    assert!(regencies.iter().any(|r| r["id"] == "32.73"));

    let body: Value = app.get("/regions/regencies/32.73/districts", None).await.json().await.unwrap();
    let districts = body["data"].as_array().unwrap();
    assert!(districts.iter().any(|d| d["name"] == "Coblong"));
}

#[actix_web::test]
async fn unknown_regions_are_not_found(){
    let app = TestApp::spawn_app().await;

    let response = app.get("/regions/provinces/99/regencies", None).await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.get("/regions/regencies/99.99/districts", None).await;
    assert_eq!(response.status().as_u16(), 404);
}
