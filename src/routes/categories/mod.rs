use std::{error::Error, fmt::Debug};

use actix_web::{body::BoxBody, http::StatusCode, web, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{auth::AuthError, db_interaction::CategoryWriteError, response::{error_response, validation_response, FieldErrors}, utils::error_fmt_chain};

mod delete;
mod get;
mod post;
mod update;

pub use delete::delete_category;
pub use get::{get_category, list_categories};
pub use post::create_category;
pub use update::update_category;

pub fn categories_config(cfg: &mut web::ServiceConfig){
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(list_categories))
            .route("", web::post().to(create_category))
            .route("/{id}", web::get().to(get_category))
            .route("/{id}", web::put().to(update_category))
            .route("/{id}", web::delete().to(delete_category))
    );
}

#[derive(Error)]
pub enum CategoryError{
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Category not found")]
    NotFound,
    #[error("Nothing to update")]
    NothingToUpdate,
    #[error("A category with this slug already exists")]
    SlugTaken,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl From<CategoryWriteError> for CategoryError {
    fn from(e: CategoryWriteError) -> Self {
        match e {
            CategoryWriteError::SlugNotUnique(_) => CategoryError::SlugTaken,
            e => CategoryError::UnexpectedError(e.into())
        }
    }
}

impl Debug for CategoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for CategoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            CategoryError::Validation(_) | CategoryError::NothingToUpdate => StatusCode::BAD_REQUEST,
            CategoryError::NotFound => StatusCode::NOT_FOUND,
            CategoryError::SlugTaken => StatusCode::CONFLICT,
            CategoryError::Auth(e) => e.status_code(),
            CategoryError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            CategoryError::Validation(errors) => validation_response(errors),
            _ => error_response(self.status_code(), self.to_string())
        }
    }
}
