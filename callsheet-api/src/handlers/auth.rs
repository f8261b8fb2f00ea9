use actix_web::{web, HttpResponse};
use shared_types::{ApiResponse, AuthResponse, LoginRequest, RegisterRequest};
use std::sync::Arc;

use crate::database::admins as admins_db;
use crate::database::{Database, DbError};
use crate::error::ApiError;
use crate::helpers::password::{hash_password, verify_password};
use crate::helpers::session::{AuthenticatedAdmin, SessionTokens};
use crate::helpers::validation;

fn token_response(
    tokens: &SessionTokens,
    status: actix_web::http::StatusCode,
    user: shared_types::AdminProfile,
) -> Result<HttpResponse, ApiError> {
    let token = tokens.issue(user.id, user.role)?;
    let cookie = tokens.cookie(token.clone());

    Ok(HttpResponse::build(status).cookie(cookie).json(AuthResponse {
        success: true,
        token,
        user,
    }))
}

pub async fn register(
    db: web::Data<Arc<Database>>,
    tokens: web::Data<SessionTokens>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let email = request.email.trim().to_lowercase();

    validation::require(&email, "Please provide an email")?;
    validation::validate_email(&email)?;
    validation::validate_password(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let admin = admins_db::insert_admin(db.async_connection.clone(), &email, &password_hash).await?;

    tracing::info!("Registered admin {}", admin.id);
    token_response(&tokens, actix_web::http::StatusCode::CREATED, admin)
}

pub async fn login(
    db: web::Data<Arc<Database>>,
    tokens: web::Data<SessionTokens>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let email = request.email.trim().to_lowercase();

    if email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Please provide email and password".to_string(),
        ));
    }

    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let credentials = admins_db::find_admin_by_email(db.async_connection.clone(), &email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &credentials.password_hash)? {
        return Err(invalid());
    }

    token_response(&tokens, actix_web::http::StatusCode::OK, credentials.profile)
}

pub async fn me(
    db: web::Data<Arc<Database>>,
    admin: AuthenticatedAdmin,
) -> Result<HttpResponse, ApiError> {
    let profile = admins_db::get_admin(db.async_connection.clone(), admin.id)
        .await
        .map_err(|e| match e {
            DbError::NotFound => {
                ApiError::Unauthorized("Not authorized to access this route".to_string())
            }
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(profile)))
}

pub async fn logout(tokens: web::Data<SessionTokens>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(tokens.removal_cookie())
        .json(ApiResponse::ok(serde_json::json!({})))
}
