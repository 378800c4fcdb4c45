use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{auth::AuthenticatedUser, db_interaction::{get_user_by_id, update_password_hash}, domain::NewPassword, password::{hash_password, verify_password}, response::{field_error, ApiResponse}, utils::{get_pooled_connection, DbPool}};

use super::AuthenticationError;

#[derive(Deserialize, Debug)]
pub struct ChangePasswordForm{
    current_password: SecretString,
    new_password: SecretString,
    confirm_password: SecretString
}

#[tracing::instrument(
    "Changing password",
    skip(pool, user, form),
    fields(user_id = %user.user_id)
)]
pub async fn change_password(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    form: web::Json<ChangePasswordForm>
) -> Result<HttpResponse, AuthenticationError>{
    let form = form.into_inner();

    let new_password = NewPassword::parse(form.new_password, &form.confirm_password)
        .map_err(|e| AuthenticationError::Validation(field_error("new_password", e)))?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let account = get_user_by_id(conn, user.user_id)
        .await?
        .ok_or(AuthenticationError::UserNotFound)?;

    if !verify_password(form.current_password, account.password_hash).await? {
        return Err(AuthenticationError::Validation(
            field_error("current_password", "current password is incorrect")
        ))
    }

    let password_hash = hash_password(new_password.into_secret()).await?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    update_password_hash(conn, user.user_id, password_hash.expose_secret().to_string()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password changed")))
}
