use actix_web::HttpResponse;

use crate::response::ApiResponse;

#[tracing::instrument(
    "Checking if api is online"
)]
pub async fn health_check() -> HttpResponse{
    HttpResponse::Ok().json(ApiResponse::message("IndoVendor API is running"))
}
