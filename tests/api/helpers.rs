use std::path::PathBuf;

use diesel::{Connection, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use indovendor::{configuration::{DatabaseSettings, Settings}, schema::users, startup::{get_connection_pool, Application}, telemetry::{get_subscriber, init_subscriber}, utils::DbPool};
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use uuid::Uuid;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "indovendor-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const TEST_PASSWORD: &str = "rahasia-sekali";
pub const TEST_MAX_IMAGE_BYTES: usize = 64 * 1024;
pub const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub api_client: reqwest::Client,
    pub admin_email: String,
    pub admin_password: SecretString,
    pub upload_dir: PathBuf
}

// A registered account along with its access token
pub struct TestUser{
    pub user_id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub token: String
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings){
        let mut connection = PgConnection::establish(&settings.get_database_url())
                                .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn api_url(&self, path: &str) -> String{
        format!("{}/api{}", self.get_app_url(), path)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let mut settings = Settings::get().expect("Failed to read configuration");
        settings.application.port = 0;
        settings.database.name = Uuid::new_v4().to_string();
        let upload_dir = std::env::temp_dir().join(format!("indovendor-{}", Uuid::new_v4()));
        settings.uploads.directory = upload_dir.to_string_lossy().to_string();
        settings.uploads.max_image_bytes = TEST_MAX_IMAGE_BYTES;

        TestApp::create_db(&settings.database);

        let pool = get_connection_pool(&settings.database)
            .expect("Failed to build connection pool to test database");

        let admin_email = settings.superadmin.email.clone();
        let admin_password = settings.superadmin.password.clone();

        let application = Application::new(settings)
                            .await
                            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.server);

        TestApp{
            host,
            port,
            pool,
            api_client: reqwest::Client::new(),
            admin_email,
            admin_password,
            upload_dir
        }
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> reqwest::Response{
        let mut request = self.api_client.post(self.api_url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, body: &Value, token: Option<&str>) -> reqwest::Response{
        let mut request = self.api_client.put(self.api_url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response{
        let mut request = self.api_client.get(self.api_url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> reqwest::Response{
        let mut request = self.api_client.delete(self.api_url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn upload_file(&self, path: &str, token: &str, form: reqwest::multipart::Form) -> reqwest::Response{
        self.api_client.post(self.api_url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    // Files stored under one upload folder, e.g. "products"
    pub fn stored_files(&self, folder: &str) -> usize{
        std::fs::read_dir(self.upload_dir.join(folder))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub fn deactivate_user(&self, user_id: Uuid){
        let mut conn = self.pool.get().expect("Failed to get connection");
        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::is_active.eq(false))
            .execute(&mut conn)
            .expect("Failed to deactivate user");
    }

    pub async fn register(&self, body: Value) -> reqwest::Response{
        self.post_json("/auth/register", &body, None).await
    }

    async fn register_user(&self, email: &str, role: &str, business_name: Option<&str>) -> TestUser{
        let response = self.register(json!({
            "email": email,
            "full_name": "Test Account",
            "password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD,
            "role": role,
            "business_name": business_name
        })).await;

        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Register response is not json");

        TestUser{
            user_id: parse_uuid(&body["data"]["user"]["id"]),
            vendor_id: body["data"]["vendor"]["id"].as_str().map(|id| id.parse().expect("Invalid vendor id")),
            token: body["data"]["tokens"]["access_token"].as_str().expect("Missing access token").to_string()
        }
    }

    pub async fn register_vendor(&self, email: &str) -> TestUser{
        self.register_user(email, "VENDOR", Some("Dekorasi Bahagia")).await
    }

    pub async fn register_client(&self, email: &str) -> TestUser{
        self.register_user(email, "CLIENT", None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response{
        self.post_json("/auth/login", &json!({ "email": email, "password": password }), None).await
    }

    pub async fn admin_token(&self) -> String{
        let response = self.login(&self.admin_email, self.admin_password.expose_secret()).await;
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.expect("Login response is not json");
        body["data"]["tokens"]["access_token"].as_str().expect("Missing access token").to_string()
    }

    pub async fn set_vendor_status(&self, vendor_id: Uuid, status: &str, reason: Option<&str>) -> reqwest::Response{
        let admin = self.admin_token().await;
        self.put_json(
            &format!("/vendor/{}/verification", vendor_id),
            &json!({ "status": status, "reason": reason }),
            Some(&admin)
        ).await
    }

    // Registers a vendor and has the superadmin verify it
    pub async fn verified_vendor(&self, email: &str) -> TestUser{
        let vendor = self.register_vendor(email).await;
        let vendor_id = vendor.vendor_id.expect("Vendor registration returned no vendor");

        let response = self.set_vendor_status(vendor_id, "VERIFIED", None).await;
        assert_eq!(response.status().as_u16(), 200);

        vendor
    }

    pub async fn create_category(&self, name: &str) -> Uuid{
        let admin = self.admin_token().await;
        let response = self.post_json("/categories", &json!({ "name": name }), Some(&admin)).await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.expect("Category response is not json");
        parse_uuid(&body["data"]["id"])
    }

    pub async fn create_product(&self, token: &str, name: &str) -> reqwest::Response{
        self.post_json("/products", &json!({ "name": name, "price": 1_500_000 }), Some(token)).await
    }
}

// A png part padded with zeroes up to `size` bytes
pub fn png_part(size: usize) -> reqwest::multipart::Part{
    let mut bytes = PNG_HEADER.to_vec();
    bytes.resize(size.max(PNG_HEADER.len()), 0);

    reqwest::multipart::Part::bytes(bytes)
        .file_name("foto.png")
        .mime_str("image/png")
        .expect("Invalid mime type")
}

pub fn parse_uuid(value: &Value) -> Uuid{
    value.as_str()
        .expect("Expected a string id")
        .parse()
        .expect("Expected a uuid")
}
