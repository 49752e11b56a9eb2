use std::str::FromStr;

use actix_web::HttpRequest;
use diesel::PgConnection;
use uuid::Uuid;

use escolar_common::auth::{get_claims, Role};
use escolar_db::models::user::User;

use crate::error::ApiError;

/// Resolves the request's session token to a live user row.
///
/// Signature or expiry failure is `InvalidToken`; a subject that no longer
/// resolves, or resolves to a deactivated account, is `UserUnavailable`.
/// Both surface as 401.
pub fn authenticate(req: &HttpRequest, conn: &PgConnection) -> Result<User, ApiError> {
    let claims = get_claims(req).ok_or(ApiError::InvalidToken)?;
    let uid = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::InvalidToken)?;
    let user = match User::get(uid, conn) {
        Ok(user) => user,
        Err(diesel::result::Error::NotFound) => return Err(ApiError::UserUnavailable),
        Err(e) => return Err(e.into()),
    };
    if !user.is_active {
        return Err(ApiError::UserUnavailable);
    }
    Ok(user)
}

/// Exact role-set membership, no hierarchy. An unparseable persisted role
/// also lands on `Forbidden`.
pub fn authorize(user: &User, allowed: &[Role]) -> Result<Role, ApiError> {
    let role = Role::from_str(&user.user_role).map_err(|_| ApiError::Forbidden)?;
    if allowed.contains(&role) {
        Ok(role)
    } else {
        Err(ApiError::Forbidden)
    }
}

/// The two gate checks most handlers run back to back.
pub fn require_role(
    req: &HttpRequest,
    conn: &PgConnection,
    allowed: &[Role],
) -> Result<User, ApiError> {
    let user = authenticate(req, conn)?;
    authorize(&user, allowed)?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "u@colegio.com".to_owned(),
            hash_pwd: String::new(),
            given_name: "Usuario".to_owned(),
            family_name: "Prueba".to_owned(),
            user_role: role.to_owned(),
            is_active: true,
            joined_at: Utc::now().naive_utc(),
            last_login_at: None,
        }
    }

    #[test]
    fn teacher_is_rejected_by_admin_and_student_sets() {
        let teacher = user_with_role("teacher");
        assert!(authorize(&teacher, &[Role::Admin]).is_err());
        assert!(authorize(&teacher, &[Role::Student]).is_err());
        assert_eq!(authorize(&teacher, &[Role::Teacher]).unwrap(), Role::Teacher);
    }

    #[test]
    fn membership_is_exact_not_hierarchical() {
        let admin = user_with_role("admin");
        assert!(authorize(&admin, &[Role::Student]).is_err());
        assert!(authorize(&admin, &[Role::Teacher, Role::Student]).is_err());
        assert!(authorize(&admin, &[Role::Admin, Role::Teacher]).is_ok());
    }

    #[test]
    fn unknown_persisted_role_is_forbidden() {
        // The closed enum makes the legacy "estudiante" spelling a failure
        // instead of a silent mismatch.
        let drifted = user_with_role("estudiante");
        match authorize(&drifted, &[Role::Student]) {
            Err(ApiError::Forbidden) => {}
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
