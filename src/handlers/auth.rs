use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, Tokens};
use crate::config::Config;
use crate::error::{AppError, Notification};
use crate::middleware::Session;
use crate::models::{self, AuthResponse, Role};
use crate::store::Store;

const MIN_PASSWORD_LEN: usize = 6;

fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn sign_up(
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    new_user: web::Json<models::SignUpInput>,
) -> Result<HttpResponse, AppError> {
    let email = normalise_email(&new_user.email);
    let name = new_user.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Nama lengkap wajib diisi".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Format email tidak valid".to_string()));
    }
    if new_user.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password minimal {} karakter",
            MIN_PASSWORD_LEN
        )));
    }

    let existing = store
        .find_user_by_email(&email)
        .await
        .map_err(AppError::store("Gagal membuat akun"))?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email sudah terdaftar".to_string()));
    }

    let role = if config.is_admin_email(&email) {
        Role::Admin
    } else {
        Role::User
    };
    let account = models::User {
        id: Uuid::new_v4().to_string(),
        name,
        email,
        password: hash_password(&new_user.password)?,
        role,
    };
    store
        .insert_user(&account)
        .await
        .map_err(AppError::store("Gagal membuat akun"))?;
    log::info!("account {} created with role {:?}", account.email, account.role);

    Ok(HttpResponse::Created().json(json!({
        "id": account.id,
        "name": account.name,
        "email": account.email,
        "role": account.role,
        "notification": Notification::titled("Akun berhasil dibuat!", "Silakan masuk dengan akun baru Anda."),
    })))
}

pub async fn sign_in(
    store: web::Data<dyn Store>,
    tokens: web::Data<Tokens>,
    data: web::Json<models::SignInInput>,
) -> Result<HttpResponse, AppError> {
    let user = store
        .find_user_by_email(&normalise_email(&data.email))
        .await
        .map_err(AppError::store("Gagal masuk"))?;

    match user {
        Some(user) if verify_password(&user.password, &data.password) => {
            let token = tokens.issue(&user)?;
            Ok(HttpResponse::Ok().json(AuthResponse {
                token,
                role: user.role,
                notification: Notification::titled("Berhasil masuk!", "Selamat datang kembali!"),
            }))
        }
        _ => {
            log::warn!("failed sign-in for {}", data.email.trim());
            Err(AppError::InvalidCredentials)
        }
    }
}

pub async fn sign_out(tokens: web::Data<Tokens>, session: Session) -> HttpResponse {
    tokens.revoke(&session.claims);
    HttpResponse::Ok().json(json!({
        "notification": Notification::success("Anda telah keluar"),
    }))
}

pub async fn session(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "user": {
            "id": session.claims.sub,
            "email": session.claims.email,
        },
        "role": session.role,
        "is_admin": session.role == Role::Admin,
    }))
}
