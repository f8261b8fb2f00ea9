//! Signed session tokens for admins
//!
//! Tokens are HS256 JWTs. Clients present them either as a bearer token or
//! through the `token` cookie set on register/login.

use crate::config::AuthConfig;
use crate::error::ApiError;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared_types::AdminRole;
use std::future::{ready, Ready};
use uuid::Uuid;

pub const TOKEN_COOKIE: &str = "token";

const UNAUTHORIZED: &str = "Not authorized to access this route";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: AdminRole,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_days: u64,
    secure_cookies: bool,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("ttl_days", &self.ttl_days)
            .field("secure_cookies", &self.secure_cookies)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

impl SessionTokens {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_days: config.token_ttl_days,
            secure_cookies: config.secure_cookies,
        }
    }

    pub fn issue(&self, admin_id: Uuid, role: AdminRole) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: admin_id,
            role,
            iat: now,
            exp: now + self.ttl_days * 24 * 60 * 60,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {}", e);
                ApiError::Unauthorized(UNAUTHORIZED.to_string())
            })
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::days(self.ttl_days as i64))
            .finish()
    }

    /// An already-expired `token` cookie that makes the browser drop its copy.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, "none")
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::ZERO)
            .finish()
    }
}

/// The admin behind the current request. Extracting it fails with 401 when
/// no valid token is present.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedAdmin {
    pub id: Uuid,
    pub role: AdminRole,
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|value| value.trim().to_string());

    bearer
        .or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string()))
        .filter(|token| !token.is_empty() && token != "none")
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedAdmin, ApiError> {
    let tokens = req
        .app_data::<web::Data<SessionTokens>>()
        .ok_or_else(|| ApiError::Internal("Session tokens are not configured".to_string()))?;

    let token =
        token_from_request(req).ok_or_else(|| ApiError::Unauthorized(UNAUTHORIZED.to_string()))?;
    // Claims only decode for roles `AdminRole` knows, so every verified
    // token belongs to an admin
    let claims = tokens.verify(&token)?;

    Ok(AuthenticatedAdmin {
        id: claims.sub,
        role: claims.role,
    })
}

impl FromRequest for AuthenticatedAdmin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn tokens() -> SessionTokens {
        SessionTokens::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 1,
            secure_cookies: false,
        })
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = tokens();
        let id = Uuid::new_v4();

        let token = tokens.issue(id, AdminRole::Admin).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let other = SessionTokens::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            token_ttl_days: 1,
            secure_cookies: false,
        });
        let token = other.issue(Uuid::new_v4(), AdminRole::Admin).unwrap();

        assert!(matches!(tokens().verify(&token), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_cookies() {
        let tokens = tokens();
        let cookie = tokens.cookie("abc".to_string());
        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(CookieDuration::days(1)));

        let removal = tokens.removal_cookie();
        assert_eq!(removal.value(), "none");
        assert_eq!(removal.max_age(), Some(CookieDuration::ZERO));
    }

    #[actix_web::test]
    async fn test_extract_from_bearer_header() {
        let tokens = tokens();
        let id = Uuid::new_v4();
        let token = tokens.issue(id, AdminRole::Admin).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(tokens))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let admin = AuthenticatedAdmin::extract(&req).await.unwrap();
        assert_eq!(admin.id, id);
    }

    #[actix_web::test]
    async fn test_extract_from_cookie() {
        let tokens = tokens();
        let id = Uuid::new_v4();
        let token = tokens.issue(id, AdminRole::Admin).unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(tokens))
            .cookie(Cookie::new(TOKEN_COOKIE, token))
            .to_http_request();

        assert_eq!(AuthenticatedAdmin::extract(&req).await.unwrap().id, id);
    }

    #[actix_web::test]
    async fn test_extract_rejects_unknown_role() {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = serde_json::json!({
            "sub": Uuid::new_v4(),
            "role": "agent",
            "iat": now,
            "exp": now + 3600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(tokens()))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let result = AuthenticatedAdmin::extract(&req).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(msg)) if msg == UNAUTHORIZED));
    }

    #[actix_web::test]
    async fn test_extract_without_token() {
        let req = TestRequest::default()
            .app_data(web::Data::new(tokens()))
            .cookie(Cookie::new(TOKEN_COOKIE, "none"))
            .to_http_request();

        let result = AuthenticatedAdmin::extract(&req).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(msg)) if msg == UNAUTHORIZED));
    }
}
