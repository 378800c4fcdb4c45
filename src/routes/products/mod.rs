use std::{error::Error, fmt::Debug};

use actix_web::{body::BoxBody, http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::AuthError, db_interaction::get_category_by_id, response::{error_response, field_error, validation_response, FieldErrors}, uploads::UploadError, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

mod delete;
mod get;
mod image;
mod post;
mod update;

pub use delete::delete_product;
pub use get::{get_product, list_my_products, list_products};
pub use image::upload_product_image;
pub use post::create_product;
pub use update::update_product;

pub fn products_config(cfg: &mut web::ServiceConfig){
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/mine", web::get().to(list_my_products))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product))
            .route("/{id}/image", web::post().to(upload_product_image))
    );
}

#[derive(Error)]
pub enum ProductError{
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Product not found")]
    NotFound,
    #[error("Nothing to update")]
    NothingToUpdate,
    #[error("No vendor profile is linked to this account")]
    VendorProfileMissing,
    #[error("Only verified vendors can manage products")]
    VendorNotVerified,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ProductError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProductError::Validation(_) | ProductError::NothingToUpdate => StatusCode::BAD_REQUEST,
            ProductError::NotFound | ProductError::VendorProfileMissing => StatusCode::NOT_FOUND,
            ProductError::VendorNotVerified => StatusCode::FORBIDDEN,
            ProductError::Auth(e) => e.status_code(),
            ProductError::Upload(e) => e.status_code(),
            ProductError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            ProductError::Validation(errors) => validation_response(errors),
            _ => error_response(self.status_code(), self.to_string())
        }
    }
}

// A product may only reference an existing category
async fn ensure_category_exists(pool: &web::Data<DbPool>, category_id: Option<Uuid>) -> Result<(), ProductError>{
    let category_id = match category_id {
        Some(id) => id,
        None => return Ok(())
    };

    let conn = get_pooled_connection(pool)
        .await
        .context("Failed to get connection from pool")?;

    match get_category_by_id(conn, category_id).await? {
        Some(_) => Ok(()),
        None => Err(ProductError::Validation(field_error("category_id", "category does not exist")))
    }
}
