//! Registration and sign-in endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{Credentials, User, UserId},
};

use super::AuthenticatedUser;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserInfo,
}

/// Registration outcome
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Present when the account was created
    pub user_id: Option<UserId>,
    pub message: String,
}

/// Public user information
#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Username already exists", body = RegisterResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<Credentials>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let response = match state.services.users.create_user(&request).await? {
        Some(id) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                user_id: Some(id),
                message: "Account created".to_string(),
            }),
        ),
        None => (
            StatusCode::CONFLICT,
            Json(RegisterResponse {
                user_id: None,
                message: "Username already exists".to_string(),
            }),
        ),
    };

    Ok(response)
}

/// Sign in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.jwt_expiration_hours * 3600,
        user: user.into(),
    }))
}

/// Get the signed-in user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserInfo>> {
    let user = state.services.users.get_user(claims.user_id).await?;
    Ok(Json(user.into()))
}
