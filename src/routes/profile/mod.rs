use std::{error::Error, fmt::Debug};

use actix_web::{body::BoxBody, http::StatusCode, web, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{auth::AuthError, response::{error_response, validation_response, FieldErrors}, uploads::UploadError, utils::error_fmt_chain};

mod get;
mod post;

pub use get::get_profile;
pub use post::{update_profile, upload_avatar};

pub fn profile_config(cfg: &mut web::ServiceConfig){
    cfg.service(
        web::scope("/profile")
            .route("", web::get().to(get_profile))
            .route("", web::put().to(update_profile))
            .route("/avatar", web::post().to(upload_avatar))
    );
}

#[derive(Error)]
pub enum ProfileError{
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("User not found")]
    NotFound,
    #[error("Nothing to update")]
    NothingToUpdate,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ProfileError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProfileError::Validation(_) | ProfileError::NothingToUpdate => StatusCode::BAD_REQUEST,
            ProfileError::NotFound => StatusCode::NOT_FOUND,
            ProfileError::Auth(e) => e.status_code(),
            ProfileError::Upload(e) => e.status_code(),
            ProfileError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            ProfileError::Validation(errors) => validation_response(errors),
            _ => error_response(self.status_code(), self.to_string())
        }
    }
}
