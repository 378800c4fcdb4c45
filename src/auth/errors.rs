use std::{error::Error, fmt::Debug};

use actix_web::{body::BoxBody, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{response::error_response, utils::error_fmt_chain};

use super::permissions::Permission;

// Failures while identifying the caller or checking what they may do
#[derive(Error)]
pub enum AuthError{
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("This account has been deactivated")]
    Deactivated,
    #[error("Your role does not have the {0} permission")]
    MissingPermission(Permission),
    #[error("You do not own this resource")]
    NotOwner,
    #[error("Unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Deactivated | AuthError::MissingPermission(_) | AuthError::NotOwner => StatusCode::FORBIDDEN,
            AuthError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        error_response(self.status_code(), self.to_string())
    }
}
