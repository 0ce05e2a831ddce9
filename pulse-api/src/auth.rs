use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use pulse_core::models::{Role, User};
use pulse_core::RepositoryError;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::{AppState, AuthConfig};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// The admin form posts `login` instead of `email`.
#[derive(Debug, Deserialize)]
struct AdminLoginRequest {
    login: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct UserPublic {
    id: i64,
    name: String,
    email: String,
    role: Role,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    message: String,
    token: String,
    user: UserPublic,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/admin", post(admin_login))
}

// ============================================================================
// Handlers
// ============================================================================

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "name, email and password are required".to_string(),
        ));
    }

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::ValidationError(
            "Email is already registered".to_string(),
        ));
    }

    let hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let user = match state
        .users
        .create(&req.name, &req.email, &hash, Role::Client)
        .await
    {
        Ok(user) => user,
        // Duplicate email slipping past the lookup still means "taken".
        Err(RepositoryError::UniqueViolation) => {
            return Err(AppError::ValidationError(
                "Email is already registered".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "user registered");
    let token = issue_token(&user, &state.auth)?;
    Ok(Json(AuthResponse {
        message: "Registration successful".to_string(),
        token,
        user: user.into(),
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = verify_credentials(&state, &req.email, &req.password).await?;
    let token = issue_token(&user, &state.auth)?;
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = verify_credentials(&state, &req.login, &req.password).await?;
    if user.role != Role::Admin {
        return Err(AppError::ValidationError(
            "Insufficient privileges".to_string(),
        ));
    }
    let token = issue_token(&user, &state.auth)?;
    Ok(Json(AuthResponse {
        message: "Admin login successful".to_string(),
        token,
        user: user.into(),
    }))
}

/// Look up by email and check the password. The failure message is the same
/// for an unknown email and a wrong password.
async fn verify_credentials(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let Some(user) = state.users.find_by_email(email).await? else {
        return Err(AppError::ValidationError(
            "Invalid email or password".to_string(),
        ));
    };

    let ok = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    if !ok {
        return Err(AppError::ValidationError(
            "Invalid email or password".to_string(),
        ));
    }
    Ok(user)
}

fn issue_token(user: &User, auth: &AuthConfig) -> Result<String, AppError> {
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}
