use actix_web::{get, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use escolar_common::auth::Role;
use escolar_db::connection::PgPool;
use escolar_db::models::subject::Subject;
use escolar_db::models::teacher_subject::TeacherSubject;

use crate::error::ApiError;
use crate::gate;
use crate::models::academic::{
    SubjectStudents, SubjectSummary, SummaryCounts, TeacherSubjects, TeacherSummary,
};
use crate::models::user::PersonDto;
use crate::models::ApiResponse;

use super::pg_pool_handler;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(my_subjects)
        .service(subject_students)
        .service(summary);
}

#[get("/subjects")]
pub(crate) async fn my_subjects(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    let teacher = gate::require_role(&req, &conn, &[Role::Teacher])?;

    let subjects = TeacherSubject::subjects_of_teacher(teacher.id, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(TeacherSubjects {
        teacher: PersonDto::from(&teacher),
        subjects: subjects.iter().map(SubjectSummary::from).collect(),
    })))
}

/// Students reached by one of the teacher's subjects. The teacher must
/// actually be assigned to it; anyone else's subject is off limits.
#[get("/subjects/{subject_id}/students")]
pub(crate) async fn subject_students(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    let teacher = gate::require_role(&req, &conn, &[Role::Teacher])?;

    let subject_id = path.into_inner();
    if TeacherSubject::find_pair(teacher.id, subject_id, &conn)?.is_none() {
        return Err(ApiError::Forbidden);
    }
    let subject = Subject::find(subject_id, &conn)
        .map_err(ApiError::not_found("Materia no encontrada"))?;
    if !subject.is_active {
        return Err(ApiError::NotFound("Materia no encontrada"));
    }

    let students = subject.enrolled_students(&conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(SubjectStudents {
        subject: SubjectSummary::from(&subject),
        students: students.iter().map(PersonDto::from).collect(),
    })))
}

/// Aggregate view. Only the subject count is computed; per-grade and
/// per-student totals come back as null.
#[get("/summary")]
pub(crate) async fn summary(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    let teacher = gate::require_role(&req, &conn, &[Role::Teacher])?;

    let total_subjects = TeacherSubject::count_for_teacher(teacher.id, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(TeacherSummary {
        teacher: PersonDto::from(&teacher),
        summary: SummaryCounts {
            total_materias: total_subjects,
            total_grados: None,
            total_estudiantes: None,
        },
    })))
}
