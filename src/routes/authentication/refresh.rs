use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;

use crate::{auth::{TokenType, Tokenizer}, db_interaction::{get_user_by_id, get_vendor_by_user_id}, response::ApiResponse, utils::{get_pooled_connection, DbPool}};

use super::{AuthSession, AuthenticationError};

#[derive(Deserialize)]
pub struct RefreshForm{
    pub refresh_token: String
}

// Trades a refresh token for a fresh pair. Access tokens are refused here.
#[tracing::instrument(
    "Refreshing tokens",
    skip_all
)]
pub async fn refresh(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    form: web::Json<RefreshForm>
) -> Result<HttpResponse, AuthenticationError>{
    let claims = tokenizer
        .decode_typed(form.refresh_token.trim(), TokenType::Refresh)
        .ok_or(AuthenticationError::InvalidRefreshToken)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = get_user_by_id(conn, claims.sub)
        .await?
        .filter(|user| user.is_active)
        .ok_or(AuthenticationError::InvalidRefreshToken)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let vendor = get_vendor_by_user_id(conn, user.id).await?;

    let tokens = tokenizer.generate_pair(&user)
        .context("Failed to generate tokens")?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Token refreshed",
        AuthSession{
            user: user.into(),
            vendor,
            tokens
        }
    )))
}
