//! JWT session authentication for the public API
//!
//! Two principals share one token format: customers (booking API) and
//! restaurant staff (dashboard API). The middleware verifies the token
//! and inserts a [`Session`] extension; handlers then narrow it with
//! [`Session::require_customer`] / [`Session::require_staff`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::User;

use crate::state::AppState;

const JWT_EXPIRY_HOURS: i64 = 24;

const ROLE_CUSTOMER: &str = "customer";
const ROLE_STAFF: &str = "staff";

/// JWT claims shared by both principals
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID or restaurant ID, depending on `role`
    pub sub: String,
    /// `customer` or `staff`
    pub role: String,
    /// Customer display name (customers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Customer email (customers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated customer identity
#[derive(Debug, Clone)]
pub struct CustomerSession {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

/// Authenticated restaurant staff identity
#[derive(Debug, Clone)]
pub struct StaffSession {
    pub restaurant_id: i64,
}

/// Verified session, inserted as a request extension by [`auth_middleware`]
#[derive(Debug, Clone)]
pub enum Session {
    Customer(CustomerSession),
    Staff(StaffSession),
}

impl Session {
    pub fn require_customer(&self) -> Result<&CustomerSession, AppError> {
        match self {
            Session::Customer(customer) => Ok(customer),
            Session::Staff(_) => Err(AppError::permission_denied("Customer account required")),
        }
    }

    pub fn require_staff(&self) -> Result<&StaffSession, AppError> {
        match self {
            Session::Staff(staff) => Ok(staff),
            Session::Customer(_) => Err(AppError::permission_denied("Staff account required")),
        }
    }
}

/// Create a JWT token for a customer
pub fn create_customer_token(
    user: &User,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        role: ROLE_CUSTOMER.to_string(),
        name: Some(user.name.clone()),
        email: Some(user.email.clone()),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(&claims, secret)
}

/// Create a JWT token for restaurant staff
pub fn create_staff_token(
    restaurant_id: i64,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: restaurant_id.to_string(),
        role: ROLE_STAFF.to_string(),
        name: None,
        email: None,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(&claims, secret)
}

fn encode(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token and build the session it represents
pub fn verify_token(token: &str, secret: &str) -> Result<Session, AppError> {
    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    session_from_claims(token_data.claims)
}

fn session_from_claims(claims: Claims) -> Result<Session, AppError> {
    let id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed token subject"))?;

    match claims.role.as_str() {
        ROLE_CUSTOMER => Ok(Session::Customer(CustomerSession {
            user_id: id,
            name: claims.name.unwrap_or_default(),
            email: claims.email.unwrap_or_default(),
        })),
        ROLE_STAFF => Ok(Session::Staff(StaffSession { restaurant_id: id })),
        _ => Err(AppError::invalid_token("Unknown token role")),
    }
}

/// Middleware that extracts and verifies the JWT from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let session = verify_token(token, &state.jwt_secret)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
