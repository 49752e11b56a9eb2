use std::str::FromStr;

use escolar_common::auth::Role;

use crate::error::{ApiError, FieldError};
use crate::models::user::{ChangePasswordInput, LoginInput, RegisterInput};

/// The enumerated grade-name catalog, active when `grade_name_catalog`
/// is set.
pub const GRADE_NAMES: [&str; 6] = ["1°", "2°", "3°", "4°", "5°", "6°"];

pub const MAX_GRADE_NAME_LEN: usize = 20;
pub const MAX_SUBJECT_NAME_LEN: usize = 100;
const MIN_PASSWORD_LEN: usize = 6;
const MIN_PERSON_NAME_LEN: usize = 2;

/// Good enough for a boundary check: one '@' with something on both
/// sides and a dot in the domain. Anything stricter belongs to a mail
/// delivery attempt, not input validation.
fn is_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn finish(errors: Vec<FieldError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}

pub fn register_input(input: &RegisterInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if !is_email(input.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "El email debe ser válido",
        });
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        errors.push(FieldError {
            field: "password",
            message: "La contraseña debe tener al menos 6 caracteres",
        });
    }
    if input.given_name.trim().chars().count() < MIN_PERSON_NAME_LEN {
        errors.push(FieldError {
            field: "nombre",
            message: "El nombre debe tener al menos 2 caracteres",
        });
    }
    if input.family_name.trim().chars().count() < MIN_PERSON_NAME_LEN {
        errors.push(FieldError {
            field: "apellido",
            message: "El apellido debe tener al menos 2 caracteres",
        });
    }
    if let Some(role) = &input.role {
        if Role::from_str(role).is_err() {
            errors.push(FieldError {
                field: "role",
                message: "El rol debe ser admin, teacher o student",
            });
        }
    }
    finish(errors)
}

pub fn login_input(input: &LoginInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if !is_email(input.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "El email debe ser válido",
        });
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        errors.push(FieldError {
            field: "password",
            message: "La contraseña debe tener al menos 6 caracteres",
        });
    }
    finish(errors)
}

pub fn change_password_input(input: &ChangePasswordInput) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if input.old_password.is_empty() {
        errors.push(FieldError {
            field: "oldPassword",
            message: "La contraseña actual es obligatoria",
        });
    }
    if input.new_password.len() < MIN_PASSWORD_LEN {
        errors.push(FieldError {
            field: "newPassword",
            message: "La contraseña debe tener al menos 6 caracteres",
        });
    }
    finish(errors)
}

/// Grade names are always non-empty and bounded; under the catalog policy
/// they must additionally be one of the enumerated cohort names.
pub fn grade_name(name: &str, catalog: bool) -> Result<(), ApiError> {
    let name = name.trim();
    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(FieldError {
            field: "nombre",
            message: "El nombre del grado es obligatorio",
        });
    } else if name.chars().count() > MAX_GRADE_NAME_LEN {
        errors.push(FieldError {
            field: "nombre",
            message: "El nombre del grado es demasiado largo",
        });
    } else if catalog && !GRADE_NAMES.contains(&name) {
        errors.push(FieldError {
            field: "nombre",
            message: "El nombre del grado debe ser uno de: 1°, 2°, 3°, 4°, 5°, 6°",
        });
    }
    finish(errors)
}

pub fn subject_name(name: &str) -> Result<(), ApiError> {
    let name = name.trim();
    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push(FieldError {
            field: "nombre",
            message: "El nombre de la materia es obligatorio",
        });
    } else if name.chars().count() > MAX_SUBJECT_NAME_LEN {
        errors.push(FieldError {
            field: "nombre",
            message: "El nombre de la materia es demasiado largo",
        });
    }
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str, nombre: &str, role: Option<&str>) -> RegisterInput {
        RegisterInput {
            email: email.to_owned(),
            password: password.to_owned(),
            given_name: nombre.to_owned(),
            family_name: "Pérez".to_owned(),
            role: role.map(|r| r.to_owned()),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(register_input(&register("est1@colegio.com", "password123", "Ana", None)).is_ok());
        assert!(
            register_input(&register("t@colegio.com", "password123", "Luis", Some("teacher")))
                .is_ok()
        );
    }

    #[test]
    fn bad_fields_are_reported_per_field() {
        let err = register_input(&register("no-es-email", "123", "A", Some("profesor")))
            .unwrap_err();
        match err {
            ApiError::Validation { errors, .. } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["email", "password", "nombre", "role"]);
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a@"));
        assert!(!is_email("a.b.co"));
        assert!(!is_email("a@.co"));
    }

    #[test]
    fn login_requires_well_formed_fields() {
        let ok = LoginInput {
            email: "est1@colegio.com".to_owned(),
            password: "password123".to_owned(),
        };
        assert!(login_input(&ok).is_ok());

        let bad = LoginInput {
            email: "est1".to_owned(),
            password: "12345".to_owned(),
        };
        assert!(login_input(&bad).is_err());
    }

    #[test]
    fn grade_name_catalog_policy() {
        for name in &GRADE_NAMES {
            assert!(grade_name(name, true).is_ok());
        }
        assert!(grade_name("7°", true).is_err());
        assert!(grade_name("Primero", true).is_err());

        // Freeform policy keeps only the structural rules.
        assert!(grade_name("Primero A", false).is_ok());
        assert!(grade_name("", false).is_err());
        assert!(grade_name("x".repeat(21).as_str(), false).is_err());
    }

    #[test]
    fn subject_name_rules() {
        assert!(subject_name("Matemáticas").is_ok());
        assert!(subject_name("  ").is_err());
        assert!(subject_name("x".repeat(101).as_str()).is_err());
    }
}
