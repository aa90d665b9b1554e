use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;

/// Claims we read from the session JWT. The credential stays opaque
/// beyond this: only the subject is extracted.
#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    #[allow(dead_code)]
    exp: u64,
}

/// Bearer-token middleware.
///
/// Extracts `Authorization: Bearer <token>`, reads the subject claim, and
/// inserts `AuthUser` into request extensions. Signature verification
/// happens at the store, which validates the same token on every row
/// operation; this layer only needs the claimed subject for scoping.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let (sub, token) = {
        let auth_header = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_aud = false;

        let claims = decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|_| StatusCode::UNAUTHORIZED)?
            .claims;

        (claims.sub, token.to_string())
    };

    req.extensions_mut().insert(AuthUser { sub, token });

    Ok(next.run(req).await)
}

/// Authenticated caller: opaque user id plus the bearer credential used
/// to authorize collaborator calls on their behalf.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
    pub token: String,
}
