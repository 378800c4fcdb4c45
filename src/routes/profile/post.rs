use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use anyhow::Context;
use serde::Deserialize;
use validator::Validate;

use crate::{auth::{AuthenticatedUser, Permission}, configuration::UploadSettings, db_interaction::{get_user_by_id, update_user_profile}, domain::PhoneNumberDomain, models::{UserProfileChanges, UserProfileInfo}, response::{collect_errors, push_error, ApiResponse}, uploads::{read_image, remove_image, store_image, UploadKind}, utils::{get_pooled_connection, DbPool}};

use super::ProfileError;

#[derive(Deserialize, Debug, Validate)]
pub struct ProfileForm{
    #[validate(length(min = 1, max = 100, message = "full_name must be between 1 and 100 characters"))]
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>
}

#[tracing::instrument(
    "Updating profile of logged in user",
    skip(pool, user),
    fields(user_id = %user.user_id)
)]
pub async fn update_profile(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    form: web::Json<ProfileForm>
) -> Result<HttpResponse, ProfileError>{
    user.require(Permission::UpdateOwnProfile)?;

    let mut form = form.into_inner();
    form.full_name = form.full_name.map(|n| n.trim().to_string());
    let mut errors = collect_errors(form.validate());

    let phone_number = match form.phone_number {
        Some(number) => PhoneNumberDomain::parse(number)
            .map(|p| Some(p.inner()))
            .map_err(|e| push_error(&mut errors, "phone_number", e))
            .unwrap_or(None),
        None => None
    };

    if !errors.is_empty() {
        return Err(ProfileError::Validation(errors))
    }

    let changes = UserProfileChanges{
        full_name: form.full_name,
        phone_number,
        address: form.address,
        avatar_url: None
    };

    if changes.is_empty() {
        return Err(ProfileError::NothingToUpdate)
    }

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let profile: UserProfileInfo = update_user_profile(conn, user.user_id, changes)
        .await?
        .ok_or(ProfileError::NotFound)?
        .into();

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Profile updated", profile)))
}

#[tracing::instrument(
    "Uploading avatar",
    skip(pool, uploads, user, payload),
    fields(user_id = %user.user_id)
)]
pub async fn upload_avatar(
    pool: web::Data<DbPool>,
    uploads: web::Data<UploadSettings>,
    user: AuthenticatedUser,
    payload: Multipart
) -> Result<HttpResponse, ProfileError>{
    user.require(Permission::UpdateOwnProfile)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let account = get_user_by_id(conn, user.user_id)
        .await?
        .ok_or(ProfileError::NotFound)?;

    let image = read_image(payload, uploads.max_image_bytes).await?;
    let avatar_url = store_image(&uploads, UploadKind::Avatar, image).await?;

    let changes = UserProfileChanges{
        avatar_url: Some(avatar_url.clone()),
        ..Default::default()
    };

    let result = async {
        let conn = get_pooled_connection(&pool)
            .await
            .context("Failed to get connection from pool")?;

        let updated = update_user_profile(conn, user.user_id, changes).await?;
        Ok::<_, ProfileError>(updated)
    }.await;

    let profile: UserProfileInfo = match result {
        Ok(Some(account)) => account.into(),
        Ok(None) => {
            remove_image(&uploads, &avatar_url).await;
            return Err(ProfileError::NotFound)
        },
        Err(e) => {
            remove_image(&uploads, &avatar_url).await;
            return Err(e)
        }
    };

    if let Some(previous) = account.avatar_url {
        remove_image(&uploads, &previous).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Avatar uploaded", profile)))
}
