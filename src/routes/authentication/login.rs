use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::SecretString;
use serde::Deserialize;

use crate::{auth::Tokenizer, db_interaction::{get_user_by_email, get_vendor_by_user_id}, domain::UserEmail, password::verify_password, response::ApiResponse, utils::{get_pooled_connection, DbPool}};

use super::{AuthSession, AuthenticationError};

#[derive(Deserialize, Debug)]
pub struct LoginForm{
    pub email: String,
    pub password: SecretString
}

#[tracing::instrument(
    "Logging in user",
    skip(pool, tokenizer, form),
    fields(email = %form.email)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    form: web::Json<LoginForm>
) -> Result<HttpResponse, AuthenticationError>{
    let form = form.into_inner();

    let email = UserEmail::parse(form.email)
        .map_err(|_| AuthenticationError::InvalidCredentials)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = match get_user_by_email(conn, email.inner()).await? {
        Some(user) => user,
        None => {
            tracing::info!("No user registered with this email");
            return Err(AuthenticationError::InvalidCredentials)
        }
    };

    if !verify_password(form.password, user.password_hash.clone()).await? {
        tracing::info!("Passwords did not match");
        return Err(AuthenticationError::InvalidCredentials)
    }

    if !user.is_active {
        return Err(AuthenticationError::Deactivated)
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let vendor = get_vendor_by_user_id(conn, user.id).await?;

    let tokens = tokenizer.generate_pair(&user)
        .context("Failed to generate tokens")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Login successful",
        AuthSession{
            user: user.into(),
            vendor,
            tokens
        }
    )))
}
