use serde::{Deserialize, Serialize};
use uuid::Uuid;

use escolar_db::models::user::User;

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    #[serde(rename = "nombre")]
    pub given_name: String,
    #[serde(rename = "apellido")]
    pub family_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordInput {
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// A user as the API returns it. The credential never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "nombre")]
    pub given_name: String,
    #[serde(rename = "apellido")]
    pub family_name: String,
    pub role: String,
    #[serde(rename = "activo")]
    pub is_active: bool,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        UserDto {
            id: user.id,
            email: user.email.clone(),
            given_name: user.given_name.clone(),
            family_name: user.family_name.clone(),
            role: user.user_role.clone(),
            is_active: user.is_active,
        }
    }
}

/// Short profile embedded in enriched views (students of a grade,
/// teachers of a subject).
#[derive(Debug, Serialize)]
pub struct PersonDto {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub given_name: String,
    #[serde(rename = "apellido")]
    pub family_name: String,
    pub email: String,
}

impl From<&User> for PersonDto {
    fn from(user: &User) -> Self {
        PersonDto {
            id: user.id,
            given_name: user.given_name.clone(),
            family_name: user.family_name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserDto,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn user_dto_speaks_the_wire_contract() {
        let user = User {
            id: Uuid::new_v4(),
            email: "est1@colegio.com".to_owned(),
            hash_pwd: "$2b$12$secret".to_owned(),
            given_name: "Ana".to_owned(),
            family_name: "Gómez".to_owned(),
            user_role: "student".to_owned(),
            is_active: true,
            joined_at: Utc::now().naive_utc(),
            last_login_at: None,
        };
        let body = serde_json::to_value(UserDto::from(&user)).unwrap();
        assert_eq!(body["nombre"], "Ana");
        assert_eq!(body["apellido"], "Gómez");
        assert_eq!(body["activo"], true);
        assert_eq!(body["role"], "student");
        // The hash must not appear anywhere in the serialized form.
        assert!(!body.to_string().contains("secret"));
    }
}
