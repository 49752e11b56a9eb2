use std::str::FromStr;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use escolar_common::auth::{create_token, Role, TOKEN_COOKIE};
use escolar_db::connection::PgPool;
use escolar_db::models::user::{NewUser, User};

use crate::config::Config;
use crate::error::{ApiError, FieldError};
use crate::gate;
use crate::models::user::{
    AuthPayload, ChangePasswordInput, LoginInput, RegisterInput, UserDto,
};
use crate::models::{ok_message, ApiResponse};
use crate::validate;

use super::pg_pool_handler;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(profile)
        .service(change_password)
        .service(logout);
}

fn session_cookie<'a>(token: &'a str, cfg: &Config) -> Cookie<'a> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(cfg.cookie_secure)
        .same_site(SameSite::Strict)
        .finish()
}

#[post("/register")]
pub(crate) async fn register(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    input: web::Json<RegisterInput>,
) -> Result<HttpResponse, ApiError> {
    validate::register_input(&input)?;
    let conn = pg_pool_handler(&pool)?;

    if User::find_by_email(input.email.trim(), &conn)?.is_some() {
        return Err(ApiError::Conflict("El email ya está registrado".to_owned()));
    }

    let role = input
        .role
        .as_deref()
        .map(Role::from_str)
        .transpose()
        .map_err(|_| {
            ApiError::validation(vec![FieldError {
                field: "role",
                message: "El rol debe ser admin, teacher o student",
            }])
        })?
        .unwrap_or(Role::Student);

    let hashed = bcrypt::hash(&input.password, cfg.bcrypt_cost).map_err(|e| {
        log::error!("bcrypt failure: {}", e);
        ApiError::Internal
    })?;

    let new_user = NewUser {
        id: Uuid::new_v4(),
        email: input.email.trim().to_owned(),
        hash_pwd: hashed,
        given_name: input.given_name.trim().to_owned(),
        family_name: input.family_name.trim().to_owned(),
        user_role: role.to_string(),
        is_active: true,
        joined_at: Utc::now().naive_utc(),
    };
    // The pre-check above races with concurrent registrations; the unique
    // index on email settles it.
    let user = new_user
        .create(&conn)
        .map_err(ApiError::insert_conflict("El email ya está registrado"))?;

    let token = create_token(user.id, &user.email, role);
    log::info!("registered {} as {}", user.email, role);
    Ok(HttpResponse::Created()
        .cookie(session_cookie(&token, &cfg))
        .json(ApiResponse::message_data(
            "Usuario registrado exitosamente",
            AuthPayload {
                user: UserDto::from(&user),
                token: token.clone(),
            },
        )))
}

#[post("/login")]
pub(crate) async fn login(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, ApiError> {
    validate::login_input(&input)?;
    let conn = pg_pool_handler(&pool)?;

    // Unknown email and wrong password take the same exit.
    let user = User::find_by_email(input.email.trim(), &conn)?
        .ok_or(ApiError::InvalidCredentials)?;
    if !bcrypt::verify(&input.password, &user.hash_pwd).unwrap_or(false) {
        return Err(ApiError::InvalidCredentials);
    }
    if !user.is_active {
        return Err(ApiError::UserUnavailable);
    }

    let role = Role::from_str(&user.user_role).map_err(|_| {
        log::error!("user {} carries unknown role {:?}", user.id, user.user_role);
        ApiError::Internal
    })?;
    user.update_last_login(Utc::now().naive_utc(), &conn)?;

    let token = create_token(user.id, &user.email, role);
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, &cfg))
        .json(ApiResponse::message_data(
            "Login exitoso",
            AuthPayload {
                user: UserDto::from(&user),
                token: token.clone(),
            },
        )))
}

#[get("/profile")]
pub(crate) async fn profile(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    let user = gate::authenticate(&req, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(UserDto::from(&user))))
}

#[put("/password")]
pub(crate) async fn change_password(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    req: HttpRequest,
    input: web::Json<ChangePasswordInput>,
) -> Result<HttpResponse, ApiError> {
    validate::change_password_input(&input)?;
    let conn = pg_pool_handler(&pool)?;
    let user = gate::authenticate(&req, &conn)?;

    if !bcrypt::verify(&input.old_password, &user.hash_pwd).unwrap_or(false) {
        return Err(ApiError::InvalidCredentials);
    }
    let hashed = bcrypt::hash(&input.new_password, cfg.bcrypt_cost).map_err(|e| {
        log::error!("bcrypt failure: {}", e);
        ApiError::Internal
    })?;
    user.update_password_hash(hashed, &conn)?;

    Ok(HttpResponse::Ok().json(ok_message("Contraseña actualizada exitosamente")))
}

/// Tokens are stateless, so there is nothing to revoke server-side;
/// logging out means dropping the cookie.
#[post("/logout")]
pub(crate) async fn logout(cfg: web::Data<Config>) -> HttpResponse {
    HttpResponse::Ok()
        .del_cookie(&session_cookie("", &cfg))
        .json(ok_message("Sesión cerrada exitosamente"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_locked_down() {
        let cfg = Config::default();
        let rendered = session_cookie("tok", &cfg).to_string();
        assert!(rendered.starts_with("token=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Path=/"));
    }

    #[test]
    fn cookie_secure_flag_follows_config() {
        let cfg = Config {
            cookie_secure: false,
            ..Config::default()
        };
        let rendered = session_cookie("tok", &cfg).to_string();
        assert!(!rendered.contains("Secure"));
    }
}
