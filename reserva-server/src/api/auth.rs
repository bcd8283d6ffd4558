//! Registration and login for both principals

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Restaurant, RestaurantLogin, User, UserLogin, UserRegister};
use shared::util::{now_millis, snowflake_id};

use crate::auth::{create_customer_token, create_staff_token, hash_password, verify_password};
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct StaffAuthResponse {
    pub token: String,
    pub restaurant: Restaurant,
}

/// Register a new customer account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<UserRegister>,
) -> ServiceResult<(StatusCode, Json<AuthResponse>)> {
    let name = req.name.trim().to_string();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::validation("Name is required").into());
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("Invalid email address").into());
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Password must be at least 8 characters").into());
    }

    if db::users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(
            AppError::with_message(ErrorCode::AlreadyExists, "Email already registered").into(),
        );
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ServiceError::Db(format!("Password hashing failed: {e}").into()))?;

    let id = snowflake_id();
    let now = now_millis();
    db::users::create(&state.pool, id, &name, &email, &password_hash, now).await?;

    tracing::info!(user_id = id, "Customer registered");

    let user = User {
        id,
        name,
        email,
        password_hash: String::new(),
        created_at: now,
    };
    let token =
        create_customer_token(&user, &state.jwt_secret).map_err(|e| ServiceError::Db(e.into()))?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Customer login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<UserLogin>,
) -> ServiceResult<Json<AuthResponse>> {
    let email = req.email.trim().to_lowercase();

    let mut user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::invalid_credentials().into());
    }

    let token =
        create_customer_token(&user, &state.jwt_secret).map_err(|e| ServiceError::Db(e.into()))?;
    user.password_hash = String::new();

    Ok(Json(AuthResponse { token, user }))
}

/// Staff login for the restaurant dashboard
pub async fn restaurant_login(
    State(state): State<AppState>,
    Json(req): Json<RestaurantLogin>,
) -> ServiceResult<Json<StaffAuthResponse>> {
    let mut restaurant = db::restaurants::find_by_id(&state.pool, req.restaurant_id)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    // A restaurant without a password hash has no dashboard access yet
    let verified = restaurant
        .password_hash
        .as_deref()
        .is_some_and(|hash| verify_password(&req.password, hash));
    if !verified {
        return Err(AppError::invalid_credentials().into());
    }

    let token = create_staff_token(restaurant.id, &state.jwt_secret)
        .map_err(|e| ServiceError::Db(e.into()))?;
    restaurant.password_hash = None;

    Ok(Json(StaffAuthResponse { token, restaurant }))
}
