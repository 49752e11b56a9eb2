use actix_web::{get, web, HttpResponse};

use escolar_db::connection::{Conn, PgPool};

use crate::error::ApiError;
use crate::models::ApiResponse;

pub mod admin;
pub mod auth;
pub mod student;
pub mod teacher;

pub(crate) fn pg_pool_handler(pool: &web::Data<PgPool>) -> Result<Conn, ApiError> {
    pool.get().map_err(|e| {
        log::error!("can't check out a pooled connection: {}", e);
        ApiError::Internal
    })
}

#[get("/")]
pub(crate) async fn index() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::data(serde_json::json!({
        "nombre": "API del Sistema de Gestión Escolar",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth",
            "admin": "/api/admin",
            "student": "/api/student",
            "teacher": "/api/teacher",
        }
    })))
}
