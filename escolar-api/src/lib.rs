use actix_web::web;
use chrono::Utc;
use uuid::Uuid;

use escolar_common::auth::Role;
use escolar_db::connection::PgPool;
use escolar_db::models::user::{NewUser, User};

use crate::config::Config;

pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod validate;

mod handlers;

pub fn configure_service(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::index)
        .service(web::scope("/api/auth").configure(handlers::auth::configure))
        .service(web::scope("/api/admin").configure(handlers::admin::configure))
        .service(web::scope("/api/student").configure(handlers::student::configure))
        .service(web::scope("/api/teacher").configure(handlers::teacher::configure));
}

fn log_level_from_env() -> simplelog::LevelFilter {
    use simplelog::LevelFilter;

    let mut level_string = match std::env::var("LOG_LEVEL") {
        Err(_) => return LevelFilter::Info,
        Ok(s) => s,
    };

    level_string.make_ascii_lowercase();
    match level_string.as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

pub fn init_logging() {
    use simplelog::{ColorChoice, TermLogger, TerminalMode};

    let res = TermLogger::init(
        log_level_from_env(),
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    if res.is_err() {
        log::info!("logging already initialised");
    }
}

/// Guarantees a usable admin account exists before the server accepts
/// requests. Admins cannot be registered through the public endpoint
/// chain alone on a fresh database.
pub fn ensure_admin(cfg: &Config, pool: &PgPool) {
    let conn = pool.get().expect("Can't get DB connection");
    let existing = User::find_by_email(&cfg.admin_email, &conn).expect("Can't query users");
    if existing.is_some() {
        return;
    }

    let hashed =
        bcrypt::hash(&cfg.admin_password, cfg.bcrypt_cost).expect("Can't hash admin password");
    NewUser {
        id: Uuid::new_v4(),
        email: cfg.admin_email.clone(),
        hash_pwd: hashed,
        given_name: "Admin".to_owned(),
        family_name: "Sistema".to_owned(),
        user_role: Role::Admin.to_string(),
        is_active: true,
        joined_at: Utc::now().naive_utc(),
    }
    .create(&conn)
    .expect("Can't create default admin");
    log::info!("created default admin account {}", cfg.admin_email);
}
