use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use thiserror::Error;

/// One entry of the `errors` array on a validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// The full failure taxonomy of the API. Every handler returns
/// `Result<HttpResponse, ApiError>`; the `ResponseError` impl renders the
/// `{ success, message, errors? }` envelope with the matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("Credenciales inválidas")]
    InvalidCredentials,
    #[error("Token inválido")]
    InvalidToken,
    #[error("Usuario no encontrado o inactivo")]
    UserUnavailable,
    #[error("No tienes permisos para acceder a este recurso")]
    Forbidden,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("Error interno del servidor")]
    Internal,
}

impl ApiError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        ApiError::Validation {
            message: "Datos de entrada inválidos".to_owned(),
            errors,
        }
    }

    /// A business-rule rejection that carries its own message and no field
    /// breakdown (e.g. assigning against an inactive grade).
    pub fn precondition(message: &str) -> Self {
        ApiError::Validation {
            message: message.to_owned(),
            errors: Vec::new(),
        }
    }

    /// Maps the diesel error of a lookup so that a missing row surfaces
    /// with the given message instead of the generic one.
    pub fn not_found(message: &'static str) -> impl Fn(DieselError) -> ApiError {
        move |e| match e {
            DieselError::NotFound => ApiError::NotFound(message),
            other => other.into(),
        }
    }

    /// Maps the diesel error of a guarded insert: the unique-pair (or
    /// unique-field) violation becomes a `Conflict` with the given message.
    /// This is also what resolves the race of two identical concurrent
    /// inserts: the database rejects the second, we translate it here.
    pub fn insert_conflict(message: &'static str) -> impl Fn(DieselError) -> ApiError {
        move |e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict(message.to_owned())
            }
            other => other.into(),
        }
    }
}

impl From<DieselError> for ApiError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => ApiError::NotFound("Recurso no encontrado"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict("El recurso ya existe".to_owned())
            }
            other => {
                log::error!("database error: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::InvalidToken | ApiError::UserUnavailable => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });
        if let ApiError::Validation { errors, .. } = self {
            if !errors.is_empty() {
                body["errors"] = serde_json::to_value(errors).unwrap_or_default();
            }
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::UserUnavailable.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("Grado no encontrado").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("ya existe".to_owned()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn diesel_not_found_translates() {
        let e: ApiError = DieselError::NotFound.into();
        match e {
            ApiError::NotFound(_) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn unique_violation_translates_to_conflict() {
        let e = ApiError::insert_conflict("Esta materia ya está asignada a este grado")(
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new("duplicate key".to_owned()),
            ),
        );
        match e {
            ApiError::Conflict(msg) => {
                assert_eq!(msg, "Esta materia ya está asignada a este grado")
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn contextual_not_found_keeps_its_message() {
        let e = ApiError::not_found("Grado no encontrado")(DieselError::NotFound);
        assert_eq!(e.to_string(), "Grado no encontrado");
    }

    #[test]
    fn internal_message_leaks_nothing() {
        assert_eq!(ApiError::Internal.to_string(), "Error interno del servidor");
    }

    #[test]
    fn credential_errors_share_one_message() {
        // Unknown email and wrong password must be indistinguishable.
        let a = ApiError::InvalidCredentials;
        let b = ApiError::InvalidCredentials;
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.status_code(), b.status_code());
    }
}
