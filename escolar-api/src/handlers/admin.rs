use actix_web::{delete, get, patch, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use escolar_common::auth::Role;
use escolar_db::connection::{Conn, PgPool};
use escolar_db::models::grade::{Grade, NewGrade};
use escolar_db::models::grade_subject::{GradeSubject, NewGradeSubject};
use escolar_db::models::student_grade::{NewStudentGrade, StudentGrade};
use escolar_db::models::subject::{NewSubject, Subject};
use escolar_db::models::teacher_subject::{NewTeacherSubject, TeacherSubject};
use escolar_db::models::user::User;

use crate::config::Config;
use crate::error::ApiError;
use crate::gate;
use crate::models::academic::{EnrolledGrade, StudentFullInfo, SubjectWithTeachers};
use crate::models::catalog::{
    AssignSubjectToGrade, AssignSubjectToTeacher, CatalogInput, EnrollStudent, GradeDetail,
    GradeDto, StatusInput, SubjectDetail, SubjectDto,
};
use crate::models::user::{PersonDto, UserDto};
use crate::models::{ok_message, ApiResponse};
use crate::validate;

use super::pg_pool_handler;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_grades)
        .service(create_grade)
        .service(get_grade)
        .service(update_grade)
        .service(set_grade_status)
        .service(list_subjects)
        .service(create_subject)
        .service(get_subject)
        .service(update_subject)
        .service(set_subject_status)
        .service(assign_subject_to_grade)
        .service(remove_subject_from_grade)
        .service(assign_subject_to_teacher)
        .service(remove_subject_from_teacher)
        .service(enroll_student)
        .service(remove_student_from_grade)
        .service(get_student_info)
        .service(list_users)
        .service(set_user_status);
}

fn grade_detail(grade: &Grade, conn: &Conn) -> Result<GradeDetail, ApiError> {
    let subjects = grade.subjects(conn)?;
    let students = grade.students(conn)?;
    Ok(GradeDetail::new(grade, &subjects, &students))
}

fn subject_detail(subject: &Subject, conn: &Conn) -> Result<SubjectDetail, ApiError> {
    let grades = subject.grades(conn)?;
    let teachers = subject.teachers(conn)?;
    Ok(SubjectDetail::new(subject, &grades, &teachers))
}

// ---- grades ----

#[get("/grades")]
pub(crate) async fn list_grades(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let grades = if cfg.list_active_only {
        Grade::list_active(&conn)?
    } else {
        Grade::list_all(&conn)?
    };
    let mut out = Vec::with_capacity(grades.len());
    for grade in &grades {
        out.push(grade_detail(grade, &conn)?);
    }
    Ok(HttpResponse::Ok().json(ApiResponse::data(out)))
}

#[post("/grades")]
pub(crate) async fn create_grade(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    req: HttpRequest,
    input: web::Json<CatalogInput>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;
    validate::grade_name(&input.name, cfg.grade_name_catalog)?;

    if Grade::find_by_name(input.name.trim(), &conn)?.is_some() {
        return Err(ApiError::Conflict(
            "Ya existe un grado con ese nombre".to_owned(),
        ));
    }
    let grade = NewGrade {
        id: Uuid::new_v4(),
        name: input.name.trim().to_owned(),
        description: input.description.clone(),
    }
    .create(&conn)
    .map_err(ApiError::insert_conflict("Ya existe un grado con ese nombre"))?;

    Ok(HttpResponse::Created().json(ApiResponse::message_data(
        "Grado creado exitosamente",
        GradeDto::from(&grade),
    )))
}

#[get("/grades/{id}")]
pub(crate) async fn get_grade(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let grade =
        Grade::find(path.into_inner(), &conn).map_err(ApiError::not_found("Grado no encontrado"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(grade_detail(&grade, &conn)?)))
}

#[put("/grades/{id}")]
pub(crate) async fn update_grade(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    input: web::Json<CatalogInput>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;
    validate::grade_name(&input.name, cfg.grade_name_catalog)?;

    let grade =
        Grade::find(path.into_inner(), &conn).map_err(ApiError::not_found("Grado no encontrado"))?;
    if let Some(other) = Grade::find_by_name(input.name.trim(), &conn)? {
        if other.id != grade.id {
            return Err(ApiError::Conflict(
                "Ya existe un grado con ese nombre".to_owned(),
            ));
        }
    }
    grade.update_info(input.name.trim(), input.description.as_deref(), &conn)?;

    let updated = Grade::find(grade.id, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_data(
        "Grado actualizado exitosamente",
        GradeDto::from(&updated),
    )))
}

#[patch("/grades/{id}/status")]
pub(crate) async fn set_grade_status(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    input: web::Json<StatusInput>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let grade =
        Grade::find(path.into_inner(), &conn).map_err(ApiError::not_found("Grado no encontrado"))?;
    // Existing enrollments survive deactivation; only new assignment is
    // gated elsewhere.
    grade.update_active(input.active, &conn)?;

    let message = if input.active {
        "Grado activado exitosamente"
    } else {
        "Grado desactivado exitosamente"
    };
    let updated = Grade::find(grade.id, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_data(message, GradeDto::from(&updated))))
}

// ---- subjects ----

#[get("/subjects")]
pub(crate) async fn list_subjects(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let subjects = if cfg.list_active_only {
        Subject::list_active(&conn)?
    } else {
        Subject::list_all(&conn)?
    };
    let mut out = Vec::with_capacity(subjects.len());
    for subject in &subjects {
        out.push(subject_detail(subject, &conn)?);
    }
    Ok(HttpResponse::Ok().json(ApiResponse::data(out)))
}

#[post("/subjects")]
pub(crate) async fn create_subject(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    input: web::Json<CatalogInput>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;
    validate::subject_name(&input.name)?;

    if Subject::find_by_name(input.name.trim(), &conn)?.is_some() {
        return Err(ApiError::Conflict(
            "Ya existe una materia con ese nombre".to_owned(),
        ));
    }
    let subject = NewSubject {
        id: Uuid::new_v4(),
        name: input.name.trim().to_owned(),
        description: input.description.clone(),
    }
    .create(&conn)
    .map_err(ApiError::insert_conflict(
        "Ya existe una materia con ese nombre",
    ))?;

    Ok(HttpResponse::Created().json(ApiResponse::message_data(
        "Materia creada exitosamente",
        SubjectDto::from(&subject),
    )))
}

#[get("/subjects/{id}")]
pub(crate) async fn get_subject(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let subject = Subject::find(path.into_inner(), &conn)
        .map_err(ApiError::not_found("Materia no encontrada"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(subject_detail(&subject, &conn)?)))
}

#[put("/subjects/{id}")]
pub(crate) async fn update_subject(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    input: web::Json<CatalogInput>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;
    validate::subject_name(&input.name)?;

    let subject = Subject::find(path.into_inner(), &conn)
        .map_err(ApiError::not_found("Materia no encontrada"))?;
    if let Some(other) = Subject::find_by_name(input.name.trim(), &conn)? {
        if other.id != subject.id {
            return Err(ApiError::Conflict(
                "Ya existe una materia con ese nombre".to_owned(),
            ));
        }
    }
    subject.update_info(input.name.trim(), input.description.as_deref(), &conn)?;

    let updated = Subject::find(subject.id, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_data(
        "Materia actualizada exitosamente",
        SubjectDto::from(&updated),
    )))
}

#[patch("/subjects/{id}/status")]
pub(crate) async fn set_subject_status(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    input: web::Json<StatusInput>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let subject = Subject::find(path.into_inner(), &conn)
        .map_err(ApiError::not_found("Materia no encontrada"))?;
    subject.update_active(input.active, &conn)?;

    let message = if input.active {
        "Materia activada exitosamente"
    } else {
        "Materia desactivada exitosamente"
    };
    let updated = Subject::find(subject.id, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_data(
        message,
        SubjectDto::from(&updated),
    )))
}

// ---- associations ----

#[post("/grades/assign-subject")]
pub(crate) async fn assign_subject_to_grade(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    req: HttpRequest,
    input: web::Json<AssignSubjectToGrade>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let grade = Grade::find(input.grade_id, &conn)
        .map_err(ApiError::not_found("Grado o materia no encontrado"))?;
    let subject = Subject::find(input.subject_id, &conn)
        .map_err(ApiError::not_found("Grado o materia no encontrado"))?;
    if cfg.strict_active_checks && (!grade.is_active || !subject.is_active) {
        return Err(ApiError::precondition(
            "El grado y la materia deben estar activos",
        ));
    }

    NewGradeSubject {
        id: Uuid::new_v4(),
        grade_id: grade.id,
        subject_id: subject.id,
    }
    .create(&conn)
    .map_err(ApiError::insert_conflict(
        "Esta materia ya está asignada a este grado",
    ))?;

    Ok(HttpResponse::Created().json(ok_message("Materia asignada al grado exitosamente")))
}

#[delete("/grades/{grade_id}/subjects/{subject_id}")]
pub(crate) async fn remove_subject_from_grade(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let (grade_id, subject_id) = path.into_inner();
    let assignment = GradeSubject::find_pair(grade_id, subject_id, &conn)?
        .ok_or(ApiError::NotFound("Asignación no encontrada"))?;
    assignment.delete(&conn)?;

    Ok(HttpResponse::Ok().json(ok_message("Materia removida del grado exitosamente")))
}

#[post("/teachers/assign-subject")]
pub(crate) async fn assign_subject_to_teacher(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    req: HttpRequest,
    input: web::Json<AssignSubjectToTeacher>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let teacher = User::get_active_in_role(input.teacher_id, &Role::Teacher.to_string(), &conn)
        .map_err(ApiError::not_found("Profesor o materia no encontrado"))?;
    let subject = Subject::find(input.subject_id, &conn)
        .map_err(ApiError::not_found("Profesor o materia no encontrado"))?;
    if cfg.strict_active_checks && !subject.is_active {
        return Err(ApiError::precondition("La materia debe estar activa"));
    }

    NewTeacherSubject {
        id: Uuid::new_v4(),
        teacher_id: teacher.id,
        subject_id: subject.id,
    }
    .create(&conn)
    .map_err(ApiError::insert_conflict(
        "Esta materia ya está asignada a este profesor",
    ))?;

    Ok(HttpResponse::Created().json(ok_message("Materia asignada al profesor exitosamente")))
}

#[delete("/teachers/{teacher_id}/subjects/{subject_id}")]
pub(crate) async fn remove_subject_from_teacher(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let (teacher_id, subject_id) = path.into_inner();
    let assignment = TeacherSubject::find_pair(teacher_id, subject_id, &conn)?
        .ok_or(ApiError::NotFound("Asignación no encontrada"))?;
    assignment.delete(&conn)?;

    Ok(HttpResponse::Ok().json(ok_message("Materia removida del profesor exitosamente")))
}

#[post("/students/enroll")]
pub(crate) async fn enroll_student(
    pool: web::Data<PgPool>,
    cfg: web::Data<Config>,
    req: HttpRequest,
    input: web::Json<EnrollStudent>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let student = User::get_active_in_role(input.student_id, &Role::Student.to_string(), &conn)
        .map_err(ApiError::not_found("Estudiante o grado no encontrado"))?;
    let grade = Grade::find(input.grade_id, &conn)
        .map_err(ApiError::not_found("Estudiante o grado no encontrado"))?;
    if cfg.strict_active_checks && !grade.is_active {
        return Err(ApiError::precondition("El grado debe estar activo"));
    }

    NewStudentGrade {
        id: Uuid::new_v4(),
        student_id: student.id,
        grade_id: grade.id,
        enrolled_at: Utc::now().naive_utc(),
    }
    .create(&conn)
    .map_err(ApiError::insert_conflict(
        "Este estudiante ya está inscrito en este grado",
    ))?;

    Ok(HttpResponse::Created().json(ok_message("Estudiante inscrito en el grado exitosamente")))
}

#[delete("/students/{student_id}/grades/{grade_id}")]
pub(crate) async fn remove_student_from_grade(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let (student_id, grade_id) = path.into_inner();
    let enrollment = StudentGrade::find_pair(student_id, grade_id, &conn)?
        .ok_or(ApiError::NotFound("Inscripción no encontrada"))?;
    enrollment.delete(&conn)?;

    Ok(HttpResponse::Ok().json(ok_message("Estudiante removido del grado exitosamente")))
}

// ---- users ----

#[get("/users")]
pub(crate) async fn list_users(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let users = User::list_all(&conn)?;
    let out: Vec<UserDto> = users.iter().map(UserDto::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::data(out)))
}

/// Soft enable/disable. A disabled user keeps their rows everywhere but
/// can no longer log in or pass the gate.
#[patch("/users/{id}/status")]
pub(crate) async fn set_user_status(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    input: web::Json<StatusInput>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    let admin = gate::require_role(&req, &conn, &[Role::Admin])?;

    let user =
        User::get(path.into_inner(), &conn).map_err(ApiError::not_found("Usuario no encontrado"))?;
    if user.id == admin.id {
        return Err(ApiError::precondition(
            "No puedes cambiar el estado de tu propia cuenta",
        ));
    }
    user.update_active(input.active, &conn)?;

    let message = if input.active {
        "Usuario activado exitosamente"
    } else {
        "Usuario desactivado exitosamente"
    };
    let updated = User::get(user.id, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_data(message, UserDto::from(&updated))))
}

#[get("/students/{student_id}")]
pub(crate) async fn get_student_info(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    gate::require_role(&req, &conn, &[Role::Admin])?;

    let student = User::get_active_in_role(path.into_inner(), &Role::Student.to_string(), &conn)
        .map_err(ApiError::not_found("Estudiante no encontrado"))?;

    let enrollments = StudentGrade::enrollments_of_student(student.id, &conn)?;
    let mut grades = Vec::with_capacity(enrollments.len());
    for (enrollment, grade) in &enrollments {
        let subjects = grade.subjects(&conn)?;
        let mut enriched = Vec::with_capacity(subjects.len());
        for subject in &subjects {
            let teachers = subject.teachers(&conn)?;
            enriched.push(SubjectWithTeachers {
                subject: subject.into(),
                teachers: teachers.iter().map(PersonDto::from).collect(),
            });
        }
        grades.push(EnrolledGrade {
            grade: grade.into(),
            enrolled_at: enrollment.enrolled_at,
            subjects: enriched,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::data(StudentFullInfo {
        student: PersonDto::from(&student),
        grades,
    })))
}
