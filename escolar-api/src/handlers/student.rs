use actix_web::{get, web, HttpRequest, HttpResponse};

use escolar_common::auth::Role;
use escolar_db::connection::PgPool;
use escolar_db::models::student_grade::StudentGrade;

use crate::error::ApiError;
use crate::gate;
use crate::models::academic::{
    AcademicInfo, GradeSummary, ScheduleBlock, ScheduleInfo, SubjectWithTeachers,
};
use crate::models::user::PersonDto;
use crate::models::ApiResponse;

use super::pg_pool_handler;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(academic_info).service(schedule);
}

/// The authenticated student's profile plus every grade they are enrolled
/// in. A fresh account simply gets `grados: []`.
#[get("/academic-info")]
pub(crate) async fn academic_info(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    let student = gate::require_role(&req, &conn, &[Role::Student])?;

    let grades = StudentGrade::grades_of_student(student.id, &conn)?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(AcademicInfo {
        student: PersonDto::from(&student),
        grades: grades.iter().map(GradeSummary::from).collect(),
    })))
}

/// Timetable source data: per enrolled grade, the subjects assigned to it
/// and who teaches them.
#[get("/schedule")]
pub(crate) async fn schedule(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = pg_pool_handler(&pool)?;
    let student = gate::require_role(&req, &conn, &[Role::Student])?;

    let grades = StudentGrade::grades_of_student(student.id, &conn)?;
    let mut blocks = Vec::with_capacity(grades.len());
    for grade in &grades {
        let subjects = grade.subjects(&conn)?;
        let mut enriched = Vec::with_capacity(subjects.len());
        for subject in &subjects {
            let teachers = subject.teachers(&conn)?;
            enriched.push(SubjectWithTeachers {
                subject: subject.into(),
                teachers: teachers.iter().map(PersonDto::from).collect(),
            });
        }
        blocks.push(ScheduleBlock {
            grade: grade.into(),
            subjects: enriched,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::data(ScheduleInfo {
        student: PersonDto::from(&student),
        blocks,
    })))
}
