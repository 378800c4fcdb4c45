use std::net::TcpListener;

use actix_files::Files;
use actix_web::{dev::Server, web, App, HttpServer};
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use secrecy::ExposeSecret;
use tracing_actix_web::TracingLogger;

use crate::{auth::Tokenizer, configuration::{DatabaseSettings, Settings, SuperAdminSettings, UploadSettings}, db_interaction::{ensure_superadmin, get_user_by_email}, password::hash_password, response::{json_error_handler, path_error_handler, query_error_handler}, routes::{api_config, health_check}, telemetry::spawn_blocking_with_tracing, uploads::PUBLIC_PREFIX, utils::{get_pooled_connection, DbPool}};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    // Prepares the database and binds the listener. Port 0 picks a free port.
    pub async fn new(settings: Settings) -> Result<Application, anyhow::Error>{
        let pool = get_connection_pool(&settings.database)?;
        let pool = web::Data::new(pool);

        run_migrations(&pool).await?;
        bootstrap_superadmin(&pool, &settings.superadmin).await?;

        std::fs::create_dir_all(&settings.uploads.directory)
            .with_context(|| format!("Failed to create upload directory {}", settings.uploads.directory))?;

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))
            .context("Failed to bind listener")?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}:{}", settings.application.host, port);

        let tokenizer = Tokenizer::new(&settings.jwt);
        let server = run(listener, pool, tokenizer, settings.uploads)?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }
}

pub fn get_connection_pool(settings: &DatabaseSettings) -> Result<DbPool, anyhow::Error>{
    let manager = ConnectionManager::<PgConnection>::new(settings.get_database_table_url());

    DbPool::builder()
        .max_size(settings.max_connections)
        .build(manager)
        .context("Failed to build connection pool")
}

#[tracing::instrument("Running pending migrations", skip_all)]
async fn run_migrations(pool: &web::Data<DbPool>) -> Result<(), anyhow::Error>{
    let mut conn = get_pooled_connection(pool)
        .await
        .context("Failed to get connection from pool")?;

    spawn_blocking_with_tracing(move || {
        let conn: &mut PgConnection = &mut conn;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))
    })
    .await
    .context("Failed due to threadpool error")?
}

// Superadmins cannot register, the first one comes from configuration
#[tracing::instrument("Bootstrapping superadmin", skip_all, fields(email = %settings.email))]
async fn bootstrap_superadmin(pool: &web::Data<DbPool>, settings: &SuperAdminSettings) -> Result<(), anyhow::Error>{
    let email = settings.email.trim().to_lowercase();

    let conn = get_pooled_connection(pool)
        .await
        .context("Failed to get connection from pool")?;

    if get_user_by_email(conn, email.clone()).await?.is_some() {
        return Ok(())
    }

    let password_hash = hash_password(settings.password.clone()).await?;

    let conn = get_pooled_connection(pool)
        .await
        .context("Failed to get connection from pool")?;

    let created = ensure_superadmin(
        conn,
        email,
        settings.full_name.clone(),
        password_hash.expose_secret().to_string()
    ).await?;

    if created {
        tracing::info!("Superadmin account created");
    }

    Ok(())
}

pub fn run(
    listener: TcpListener,
    pool: web::Data<DbPool>,
    tokenizer: Tokenizer,
    uploads: UploadSettings
) -> Result<Server, anyhow::Error>{
    let tokenizer = web::Data::new(tokenizer);
    let upload_directory = uploads.directory.clone();
    let uploads = web::Data::new(uploads);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(pool.clone())
            .app_data(tokenizer.clone())
            .app_data(uploads.clone())
            .route("/health", web::get().to(health_check))
            .service(web::scope("/api").configure(api_config))
            .service(Files::new(PUBLIC_PREFIX, &upload_directory))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
