use std::collections::HashMap;
use std::sync::Mutex;

use argon2::{self, Config as ArgonConfig};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use uuid::Uuid;

use crate::config::MAX_TOKEN_TTL_MINUTES;
use crate::error::AppError;
use crate::models::{Claims, User};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt: [u8; 16] = rand::thread_rng().gen();
    let config = ArgonConfig::default();
    Ok(argon2::hash_encoded(password.as_bytes(), &salt, &config)?)
}

pub fn verify_password(encoded: &str, password: &str) -> bool {
    argon2::verify_encoded(encoded, password.as_bytes()).unwrap_or(false)
}

/// Issues and checks session tokens, and remembers which ones were signed
/// out until they would have expired anyway.
pub struct Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
    revoked: Mutex<HashMap<String, usize>>,
}

impl Tokens {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Tokens {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::minutes(ttl_minutes.clamp(1, MAX_TOKEN_TTL_MINUTES)),
            revoked: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let exp = chrono::Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or(AppError::Internal("token expiry out of range"))?
            .timestamp() as usize;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp,
            jti: Uuid::new_v4().to_string(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|_| AppError::Unauthorized("Sesi tidak valid"))?
            .claims;
        if self.is_revoked(&claims.jti) {
            return Err(AppError::Unauthorized("Sesi sudah berakhir"));
        }
        Ok(claims)
    }

    pub fn revoke(&self, claims: &Claims) {
        let now = chrono::Utc::now().timestamp() as usize;
        let mut revoked = self.revoked.lock().unwrap_or_else(|e| e.into_inner());
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti.clone(), claims.exp);
    }

    fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(jti)
    }
}
