use actix_web::HttpResponse;

use crate::{auth::AuthenticatedUser, response::ApiResponse};

// Tokens are not tracked server side, the client drops them
#[tracing::instrument(
    "Logging out currently logged in user",
    skip_all,
    fields(user_id = %user.user_id)
)]
pub async fn logout(
    user: AuthenticatedUser
) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::message("Logged out"))
}
