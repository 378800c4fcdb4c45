use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{auth::{AuthenticatedUser, Permission}, db_interaction, domain::Slug, models::CategoryChanges, response::{collect_errors, push_error, ApiResponse}, utils::{get_pooled_connection, DbPool}};

use super::CategoryError;

#[derive(Deserialize, Debug, Validate)]
pub struct CategoryUpdateForm{
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    pub slug: Option<String>,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>
}

#[tracing::instrument(
    "Updating category",
    skip(pool, user, form),
    fields(user_id = %user.user_id)
)]
pub async fn update_category(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    form: web::Json<CategoryUpdateForm>
) -> Result<HttpResponse, CategoryError>{
    user.require(Permission::ManageCategories)?;

    let mut form = form.into_inner();
    form.name = form.name.map(|n| n.trim().to_string());
    let mut errors = collect_errors(form.validate());

    let slug = match form.slug {
        Some(slug) => Slug::parse(slug.trim().to_string())
            .map(|s| Some(s.inner()))
            .map_err(|e| push_error(&mut errors, "slug", e))
            .unwrap_or(None),
        None => None
    };

    if !errors.is_empty() {
        return Err(CategoryError::Validation(errors))
    }

    let changes = CategoryChanges{
        name: form.name,
        slug,
        description: form.description
    };

    if changes.is_empty() {
        return Err(CategoryError::NothingToUpdate)
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let category = db_interaction::update_category(conn, path.into_inner(), changes)
        .await?
        .ok_or(CategoryError::NotFound)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Category updated", category)))
}
