use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use validator::Validate;

use crate::{auth::Tokenizer, db_interaction::{insert_user_into_database, NewUser, UserInsertError}, domain::{NewPassword, PhoneNumberDomain, UserEmail, UserRole}, password::hash_password, response::{collect_errors, push_error, ApiResponse}, utils::{get_pooled_connection, DbPool}};

use super::{AuthSession, AuthenticationError};

#[derive(Deserialize, Debug, Validate)]
pub struct RegistrationForm{
    email: String,
    #[validate(length(min = 1, max = 100, message = "full_name must be between 1 and 100 characters"))]
    full_name: String,
    password: SecretString,
    confirm_password: SecretString,
    role: UserRole,
    phone_number: Option<String>,
    #[validate(length(min = 1, max = 150, message = "business_name must be between 1 and 150 characters"))]
    business_name: Option<String>
}

#[tracing::instrument(
    "User registration started",
    skip(pool, tokenizer, form),
    fields(email = %form.email, role = %form.role)
)]
pub async fn register(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    form: web::Json<RegistrationForm>
) -> Result<HttpResponse, AuthenticationError>{
    let mut form = form.into_inner();
    form.full_name = form.full_name.trim().to_string();
    let mut errors = collect_errors(form.validate());

    let email = UserEmail::parse(form.email)
        .map_err(|e| push_error(&mut errors, "email", e))
        .ok();

    let password = NewPassword::parse(form.password, &form.confirm_password)
        .map_err(|e| push_error(&mut errors, "password", e))
        .ok();

    let phone_number = match form.phone_number.filter(|p| !p.trim().is_empty()) {
        Some(number) => PhoneNumberDomain::parse(number)
            .map(|p| Some(p.inner()))
            .map_err(|e| push_error(&mut errors, "phone_number", e))
            .unwrap_or(None),
        None => None
    };

    let business_name = match form.role {
        UserRole::SuperAdmin => {
            push_error(&mut errors, "role", "role must be VENDOR or CLIENT");
            None
        },
        UserRole::Vendor => {
            let name = form.business_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
            if name.is_none() {
                push_error(&mut errors, "business_name", "business_name is required for vendors");
            }
            name
        },
        UserRole::Client => None
    };

    let (email, password) = match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => (email, password),
        _ => return Err(AuthenticationError::Validation(errors))
    };

    let password_hash = hash_password(password.into_secret()).await?;

    let new_user = NewUser{
        email: email.inner(),
        password_hash: password_hash.expose_secret().to_string(),
        full_name: form.full_name,
        role: form.role,
        phone_number,
        business_name
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let (user, vendor) = insert_user_into_database(conn, new_user)
        .await
        .map_err(|e| match e {
            UserInsertError::EmailNotUnique(_) => AuthenticationError::EmailTaken,
            e => AuthenticationError::UnexpectedError(e.into())
        })?;

    let tokens = tokenizer.generate_pair(&user)
        .context("Failed to generate tokens")?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "Registration successful",
        AuthSession{
            user: user.into(),
            vendor,
            tokens
        }
    )))
}
