use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{configuration::JWTSettings, domain::UserRole, models::User};

#[derive(Clone)]
pub struct Tokenizer{
    pub secret: SecretString,
    pub access_expiry_minutes: i64,
    pub refresh_expiry_days: i64
}

impl Tokenizer {
    pub fn new(settings: &JWTSettings) -> Self {
        Self{
            secret: settings.secret.clone(),
            access_expiry_minutes: settings.access_expiry_minutes,
            refresh_expiry_days: settings.refresh_expiry_days
        }
    }

    fn lifetime(&self, token_type: TokenType) -> Duration{
        match token_type {
            TokenType::Access => Duration::minutes(self.access_expiry_minutes),
            TokenType::Refresh => Duration::days(self.refresh_expiry_days)
        }
    }

    pub fn generate_key(&self, user: &User, token_type: TokenType) -> Result<String, jsonwebtoken::errors::Error>{
        let now = Utc::now();
        let expiry = now + self.lifetime(token_type);

        let claims = Claims{
            sub: user.id,
            iat: now.timestamp() as usize,
            exp: expiry.timestamp() as usize,
            email: user.email.clone(),
            role: user.user_role(),
            token_type
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
        )
    }

    pub fn generate_pair(&self, user: &User) -> Result<TokenPair, jsonwebtoken::errors::Error>{
        Ok(TokenPair{
            access_token: self.generate_key(user, TokenType::Access)?,
            refresh_token: self.generate_key(user, TokenType::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.lifetime(TokenType::Access).num_seconds()
        })
    }

    pub fn decode_key(&self, token: &str) -> Option<Claims>{
        match jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::new(Algorithm::HS256)
        ) {
            Ok(decoded_data) => Some(decoded_data.claims),
            Err(e) => {
                tracing::debug!("Rejected token: {}", e);
                None
            }
        }
    }

    // Decode a token and make sure it is of the expected type
    pub fn decode_typed(&self, token: &str, token_type: TokenType) -> Option<Claims>{
        self.decode_key(token)
            .filter(|claims| claims.token_type == token_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType{
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims{
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub email: String,
    pub role: UserRole,
    pub token_type: TokenType
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair{
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64
}
