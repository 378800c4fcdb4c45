use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::{UserRole, VerificationStatus}, models::{User, UserProfileChanges, Vendor}, schema::{users, vendors}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

// Fields collected at registration time
#[derive(Debug)]
pub struct NewUser{
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    // Only set for vendors, creates the vendor row alongside the user
    pub business_name: Option<String>
}

#[tracing::instrument(
    "Getting user by email",
    skip(conn)
)]
pub async fn get_user_by_email(
    mut conn: DbConnection,
    email: String
) -> Result<Option<User>, anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()
            .context("Failed to get user by email")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Getting user by id",
    skip(conn)
)]
pub async fn get_user_by_id(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Option<User>, anyhow::Error> {
    spawn_blocking_with_tracing(move || {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first::<User>(&mut conn)
            .optional()
            .context("Failed to get user by id")
    })
    .await
    .context("Failed due to threadpool error")?
}

// Error associated with inserting user to users table
#[derive(Error)]
pub enum UserInsertError{
    #[error("email field is not unique")]
    EmailNotUnique(#[source] diesel::result::Error),
    #[error("Failed to run query")]
    QueryError(#[from] diesel::result::Error),
    #[error("unexpected database error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into the database",
    skip(conn, new_user),
    fields(email = %new_user.email, role = %new_user.role)
)]
pub async fn insert_user_into_database(
    mut conn: DbConnection,
    new_user: NewUser
) -> Result<(User, Option<Vendor>), UserInsertError> {
    let now = Utc::now();
    let user = User{
        id: Uuid::new_v4(),
        email: new_user.email,
        password_hash: new_user.password_hash,
        full_name: new_user.full_name,
        role: new_user.role.as_str().to_string(),
        phone_number: new_user.phone_number.clone(),
        address: None,
        avatar_url: None,
        is_active: true,
        created_at: now,
        updated_at: now
    };

    let vendor = new_user.business_name.map(|business_name| Vendor{
        id: Uuid::new_v4(),
        user_id: user.id,
        business_name,
        description: None,
        address: None,
        phone_number: new_user.phone_number,
        website: None,
        logo_url: None,
        verification_status: VerificationStatus::Pending.as_str().to_string(),
        rejection_reason: None,
        created_at: now,
        updated_at: now
    });

    spawn_blocking_with_tracing(move || {
        conn.transaction::<_, UserInsertError, _>(|conn| {
            let user = diesel::insert_into(users::table)
                .values(&user)
                .returning(User::as_returning())
                .get_result::<User>(conn)
                .map_err(|e| {
                    match e {
                        diesel::result::Error::DatabaseError(
                            diesel::result::DatabaseErrorKind::UniqueViolation,
                            _
                        ) => UserInsertError::EmailNotUnique(e),
                        _ => UserInsertError::QueryError(e)
                    }
                })?;

            let vendor = match vendor {
                Some(vendor) => Some(
                    diesel::insert_into(vendors::table)
                        .values(&vendor)
                        .returning(Vendor::as_returning())
                        .get_result::<Vendor>(conn)?
                ),
                None => None
            };

            Ok((user, vendor))
        })
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Updating user profile in db",
    skip(conn)
)]
pub async fn update_user_profile(
    mut conn: DbConnection,
    user_id: Uuid,
    changes: UserProfileChanges
) -> Result<Option<User>, anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set((&changes, users::updated_at.eq(Utc::now())))
            .returning(User::as_returning())
            .get_result::<User>(&mut conn)
            .optional()
            .context("Failed to update user profile")
    })
    .await
    .context("Failed due to threadpool error")?
}

#[tracing::instrument(
    "Updating password hash",
    skip(conn, password_hash)
)]
pub async fn update_password_hash(
    mut conn: DbConnection,
    user_id: Uuid,
    password_hash: String
) -> Result<(), anyhow::Error>{
    spawn_blocking_with_tracing(move || {
        diesel::update(users::table.find(user_id))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_at.eq(Utc::now())
            ))
            .execute(&mut conn)
            .context("Failed to update password hash")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(())
}

// Creates the bootstrap superadmin unless a user with that email exists. Returns true when a user was created.
#[tracing::instrument(
    "Ensuring superadmin account exists",
    skip(conn, password_hash)
)]
pub async fn ensure_superadmin(
    mut conn: DbConnection,
    email: String,
    full_name: String,
    password_hash: String
) -> Result<bool, anyhow::Error>{
    let now = Utc::now();
    let user = User{
        id: Uuid::new_v4(),
        email,
        password_hash,
        full_name,
        role: UserRole::SuperAdmin.as_str().to_string(),
        phone_number: None,
        address: None,
        avatar_url: None,
        is_active: true,
        created_at: now,
        updated_at: now
    };

    let inserted = spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(&user)
            .on_conflict(users::email)
            .do_nothing()
            .execute(&mut conn)
            .context("Failed to insert superadmin")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(inserted > 0)
}
