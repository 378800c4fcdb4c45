use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;
use validator::Validate;

use crate::{auth::{AuthenticatedUser, Permission}, db_interaction::insert_category, domain::Slug, response::{collect_errors, push_error, ApiResponse}, utils::{get_pooled_connection, DbPool}};

use super::CategoryError;

#[derive(Deserialize, Debug, Validate)]
pub struct CategoryForm{
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,
    pub slug: Option<String>,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>
}

#[tracing::instrument(
    "Creating category",
    skip(pool, user),
    fields(user_id = %user.user_id)
)]
pub async fn create_category(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    form: web::Json<CategoryForm>
) -> Result<HttpResponse, CategoryError>{
    user.require(Permission::ManageCategories)?;

    let mut form = form.into_inner();
    form.name = form.name.trim().to_string();
    let mut errors = collect_errors(form.validate());
    let name = form.name;

    // Without an explicit slug one is derived from the name
    let slug = match form.slug.filter(|s| !s.trim().is_empty()) {
        Some(slug) => Slug::parse(slug.trim().to_string()),
        None => Slug::from_name(&name)
    };

    let slug = match slug {
        Ok(slug) if errors.is_empty() => slug,
        Ok(_) => return Err(CategoryError::Validation(errors)),
        Err(e) => {
            push_error(&mut errors, "slug", e);
            return Err(CategoryError::Validation(errors))
        }
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let category = insert_category(conn, name, slug.inner(), form.description).await?;

    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(ApiResponse::ok("Category created", category)))
}
