use std::env;

use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Name of the session cookie the API issues on login/register.
pub const TOKEN_COOKIE: &str = "token";

lazy_static! {
    static ref JWT_SECRET: String =
        env::var("JWT_SECRET").unwrap_or_else(|_| "escolar-dev-secret".to_string());
    static ref TOKEN_EXPIRY_HOURS: i64 = env::var("TOKEN_EXPIRY_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(24);
}

/// Closed set of roles. Authorization is exact membership over these
/// variants; the string form is what gets persisted and carried in tokens.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

/// Payload of a session token. `sub` is the user id; expiry is fixed at
/// issue time, there is no refresh and no server-side revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
}

pub fn create_token(user_id: Uuid, email: &str, role: Role) -> String {
    let expire_at = Utc::now() + Duration::hours(*TOKEN_EXPIRY_HOURS);
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        role: role.to_string(),
        exp: expire_at.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Can't create token")
}

/// Verifies signature and expiry. Anything malformed, forged or expired
/// comes back as `None`.
pub fn decode_token(token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Pulls the session token off a request and verifies it. The cookie is
/// the primary transport; `Authorization: Bearer` is the fallback.
pub fn get_claims(req: &HttpRequest) -> Option<Claims> {
    token_from_request(req).and_then(|token| decode_token(&token))
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        return Some(cookie.value().to_owned());
    }
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use std::str::FromStr;

    #[test]
    fn role_strings_round_trip() {
        for role in &[Role::Admin, Role::Teacher, Role::Student] {
            let parsed = Role::from_str(&role.to_string()).unwrap();
            assert_eq!(parsed, *role);
        }
        assert_eq!(Role::Student.to_string(), "student");
        assert!(Role::from_str("estudiante").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn token_round_trip() {
        let uid = Uuid::new_v4();
        let token = create_token(uid, "ana@colegio.com", Role::Teacher);
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims.sub, uid.to_string());
        assert_eq!(claims.email, "ana@colegio.com");
        assert_eq!(claims.role, "teacher");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "old@colegio.com".to_owned(),
            role: Role::Student.to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();
        assert!(decode_token(&token).is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = create_token(Uuid::new_v4(), "x@colegio.com", Role::Admin);
        let mut forged = token;
        forged.pop();
        assert!(decode_token(&forged).is_none());
        assert!(decode_token("not-a-token").is_none());
    }

    #[test]
    fn claims_come_from_cookie() {
        let token = create_token(Uuid::new_v4(), "c@colegio.com", Role::Student);
        let req = TestRequest::default()
            .cookie(Cookie::new(TOKEN_COOKIE, token))
            .to_http_request();
        assert_eq!(get_claims(&req).unwrap().role, "student");
    }

    #[test]
    fn claims_fall_back_to_bearer_header() {
        let token = create_token(Uuid::new_v4(), "b@colegio.com", Role::Admin);
        let req = TestRequest::default()
            .header("Authorization", format!("Bearer {}", token))
            .to_http_request();
        assert_eq!(get_claims(&req).unwrap().role, "admin");

        let req = TestRequest::default()
            .header("Authorization", "Basic abc")
            .to_http_request();
        assert!(get_claims(&req).is_none());
    }

    #[test]
    fn cookie_wins_over_header() {
        let cookie_token = create_token(Uuid::new_v4(), "c@colegio.com", Role::Student);
        let header_token = create_token(Uuid::new_v4(), "h@colegio.com", Role::Admin);
        let req = TestRequest::default()
            .cookie(Cookie::new(TOKEN_COOKIE, cookie_token))
            .header("Authorization", format!("Bearer {}", header_token))
            .to_http_request();
        assert_eq!(get_claims(&req).unwrap().email, "c@colegio.com");
    }
}
