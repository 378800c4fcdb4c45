use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings{
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JWTSettings,
    pub uploads: UploadSettings,
    pub superadmin: SuperAdminSettings
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApplicationSettings{
    pub host: String,
    pub port: u16
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings{
    pub username: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32
}

impl DatabaseSettings {
    // Url of the postgres server without a database, used to create databases
    pub fn get_database_url(&self) -> String{
        format!(
            "postgres://{}:{}@{}:{}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port
        )
    }

    pub fn get_database_table_url(&self) -> String{
        format!("{}/{}", self.get_database_url(), self.name)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct JWTSettings{
    pub secret: SecretString,
    pub access_expiry_minutes: i64,
    pub refresh_expiry_days: i64
}

#[derive(Deserialize, Debug, Clone)]
pub struct UploadSettings{
    pub directory: String,
    pub max_image_bytes: usize
}

#[derive(Deserialize, Debug, Clone)]
pub struct SuperAdminSettings{
    pub email: String,
    pub password: SecretString,
    pub full_name: String
}

/// Deployment environment, picked from `APP_ENVIRONMENT`.
pub enum AppEnvironment{
    Local,
    Production
}

impl AppEnvironment {
    pub fn as_str(&self) -> &'static str{
        match self {
            AppEnvironment::Local => "local",
            AppEnvironment::Production => "production"
        }
    }
}

impl TryFrom<String> for AppEnvironment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(AppEnvironment::Local),
            "production" => Ok(AppEnvironment::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`",
                other
            ))
        }
    }
}

impl Settings{
    pub fn get() -> Result<Self, ConfigError>{
        let environment: AppEnvironment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        Config::builder()
            .add_source(File::with_name("configuration/base.yaml"))
            .add_source(
                File::with_name(&format!("configuration/{}.yaml", environment.as_str()))
                    .required(false)
            )
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
            )
            .build()?
            .try_deserialize::<Settings>()
    }
}
