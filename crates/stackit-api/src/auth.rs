use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand_core::OsRng;
use tracing::info;

use stackit_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use stackit_types::models::Role;

use crate::error::ApiError;
use crate::rows;
use crate::sanitize::required_text;
use crate::state::AppState;

const TOKEN_LIFETIME_DAYS: i64 = 30;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "Username and password required";
    let username = required_text(req.username, MISSING)?;
    let password = required_text(req.password, MISSING)?;

    let name = username.clone();
    let user_id = state
        .with_db("Error registering user", move |db| {
            let password_hash = hash_password(&password)?;
            db.create_user(&name, &password_hash, Role::User)
        })
        .await?
        .ok_or(ApiError::BadRequest("Username already exists"))?;

    info!(user_id, "Registered user {}", username);

    Ok((StatusCode::CREATED, Json(RegisterResponse { id: user_id, username })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "Username and password required";
    let username = required_text(req.username, MISSING)?;
    let password = required_text(req.password, MISSING)?;

    let user = state
        .with_db("Error logging in", move |db| db.get_user_by_username(&username))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&password, &user.password) {
        return Err(ApiError::Unauthorized);
    }
    if user.role == Role::Banned {
        return Err(ApiError::Forbidden("Account is banned"));
    }

    let token = create_token(&state.jwt_secret, user.id, &user.username, user.role)
        .map_err(|_| ApiError::Internal("Error logging in"))?;

    Ok(Json(LoginResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        token,
    }))
}

/// GET /me — the account behind the bearer token.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .with_db("Error fetching user", move |db| db.get_user_by_id(claims.sub))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(rows::user(user)))
}

/// Argon2id hash in PHC string format.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

pub fn create_token(secret: &str, user_id: i64, username: &str, role: Role) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
