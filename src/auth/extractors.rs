use actix_web::{http::header, web, FromRequest, HttpRequest};
use anyhow::Context;
use futures_util::future::{ready, LocalBoxFuture};
use uuid::Uuid;

use crate::{db_interaction::get_user_by_id, domain::UserRole, utils::{get_pooled_connection, DbPool}};

use super::{errors::AuthError, jwt::{TokenType, Tokenizer}};

// Caller identified by a valid access token whose account is still active
#[derive(Debug, Clone)]
pub struct AuthenticatedUser{
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole
}

pub fn bearer_token(req: &HttpRequest) -> Option<&str>{
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let (tokenizer, pool) = match (req.app_data::<web::Data<Tokenizer>>(), req.app_data::<web::Data<DbPool>>()) {
            (Some(t), Some(p)) => (t, p.clone()),
            _ => return Box::pin(ready(Err(AuthError::UnexpectedError(anyhow::anyhow!("Tokenizer or pool is not registered")))))
        };

        let claims = match bearer_token(req).map(|token| tokenizer.decode_typed(token, TokenType::Access)) {
            Some(Some(claims)) => claims,
            Some(None) => return Box::pin(ready(Err(AuthError::InvalidToken))),
            None => return Box::pin(ready(Err(AuthError::MissingToken)))
        };

        // The account may have been deactivated since the token was issued
        Box::pin(async move {
            let conn = get_pooled_connection(&pool)
                .await
                .context("Failed to get connection from pool")?;

            let user = get_user_by_id(conn, claims.sub)
                .await?
                .ok_or(AuthError::InvalidToken)?;

            if !user.is_active {
                tracing::info!(user_id = %user.id, "Deactivated user presented an access token");
                return Err(AuthError::Deactivated)
            }

            Ok(AuthenticatedUser{
                role: user.user_role(),
                user_id: user.id,
                email: user.email
            })
        })
    }
}
