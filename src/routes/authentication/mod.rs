use std::{error::Error, fmt::Debug};

use actix_web::{body::BoxBody, http::StatusCode, web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{auth::{AuthError, TokenPair}, models::{UserProfileInfo, Vendor}, response::{error_response, validation_response, FieldErrors}, utils::error_fmt_chain};

mod change_password;
mod login;
mod logout;
mod me;
mod permissions;
mod refresh;
mod register;

pub use change_password::change_password;
pub use login::login;
pub use logout::logout;
pub use me::me;
pub use permissions::permissions;
pub use refresh::refresh;
pub use register::register;

pub fn auth_config(cfg: &mut web::ServiceConfig){
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me))
            .route("/change-password", web::put().to(change_password))
            .route("/permissions", web::get().to(permissions))
    );
}

// Returned by register, login and refresh
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthSession{
    pub user: UserProfileInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>,
    pub tokens: TokenPair
}

#[derive(Error)]
pub enum AuthenticationError{
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("An account with this email already exists")]
    EmailTaken,
    #[error("Email or password is incorrect")]
    InvalidCredentials,
    #[error("This account has been deactivated")]
    Deactivated,
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthenticationError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthenticationError::EmailTaken => StatusCode::CONFLICT,
            AuthenticationError::InvalidCredentials
                | AuthenticationError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AuthenticationError::Deactivated => StatusCode::FORBIDDEN,
            AuthenticationError::UserNotFound => StatusCode::NOT_FOUND,
            AuthenticationError::Auth(e) => e.status_code(),
            AuthenticationError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            AuthenticationError::Validation(errors) => validation_response(errors),
            _ => error_response(self.status_code(), self.to_string())
        }
    }
}
