use actix_web::{web, HttpResponse};
use anyhow::Context;

use crate::{auth::AuthenticatedUser, db_interaction::get_user_by_id, models::UserProfileInfo, response::ApiResponse, utils::{get_pooled_connection, DbPool}};

use super::ProfileError;

#[tracing::instrument(
    "Get profile data of logged in user",
    skip(pool, user),
    fields(user_id = %user.user_id)
)]
pub async fn get_profile(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser
) -> Result<HttpResponse, ProfileError>{
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let profile: UserProfileInfo = get_user_by_id(conn, user.user_id)
        .await?
        .ok_or(ProfileError::NotFound)?
        .into();

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Profile fetched", profile)))
}
