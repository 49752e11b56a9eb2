use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use escolar_db::models::grade::Grade;
use escolar_db::models::subject::Subject;

use super::user::PersonDto;

/// Grade as it appears inside role-specific views: no active flag, the
/// caller already filtered.
#[derive(Debug, Serialize)]
pub struct GradeSummary {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl From<&Grade> for GradeSummary {
    fn from(grade: &Grade) -> Self {
        GradeSummary {
            id: grade.id,
            name: grade.name.clone(),
            description: grade.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubjectSummary {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl From<&Subject> for SubjectSummary {
    fn from(subject: &Subject) -> Self {
        SubjectSummary {
            id: subject.id,
            name: subject.name.clone(),
            description: subject.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubjectWithTeachers {
    #[serde(flatten)]
    pub subject: SubjectSummary,
    #[serde(rename = "profesores")]
    pub teachers: Vec<PersonDto>,
}

/// `GET /api/student/academic-info` payload.
#[derive(Debug, Serialize)]
pub struct AcademicInfo {
    #[serde(rename = "estudiante")]
    pub student: PersonDto,
    #[serde(rename = "grados")]
    pub grades: Vec<GradeSummary>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleBlock {
    #[serde(rename = "grado")]
    pub grade: GradeSummary,
    #[serde(rename = "materias")]
    pub subjects: Vec<SubjectWithTeachers>,
}

/// `GET /api/student/schedule` payload: the association data a timetable
/// is built from, one block per enrolled grade.
#[derive(Debug, Serialize)]
pub struct ScheduleInfo {
    #[serde(rename = "estudiante")]
    pub student: PersonDto,
    #[serde(rename = "horario")]
    pub blocks: Vec<ScheduleBlock>,
}

/// One enrollment inside the admin's full-student view.
#[derive(Debug, Serialize)]
pub struct EnrolledGrade {
    #[serde(flatten)]
    pub grade: GradeSummary,
    #[serde(rename = "fechaInscripcion")]
    pub enrolled_at: NaiveDateTime,
    #[serde(rename = "materias")]
    pub subjects: Vec<SubjectWithTeachers>,
}

/// `GET /api/admin/students/{id}` payload.
#[derive(Debug, Serialize)]
pub struct StudentFullInfo {
    #[serde(rename = "estudiante")]
    pub student: PersonDto,
    #[serde(rename = "grados")]
    pub grades: Vec<EnrolledGrade>,
}

/// `GET /api/teacher/subjects` payload.
#[derive(Debug, Serialize)]
pub struct TeacherSubjects {
    #[serde(rename = "profesor")]
    pub teacher: PersonDto,
    #[serde(rename = "materias")]
    pub subjects: Vec<SubjectSummary>,
}

/// `GET /api/teacher/subjects/{id}/students` payload.
#[derive(Debug, Serialize)]
pub struct SubjectStudents {
    #[serde(rename = "materia")]
    pub subject: SubjectSummary,
    #[serde(rename = "estudiantes")]
    pub students: Vec<PersonDto>,
}

/// Aggregates for the teacher summary. Subjects are counted for real;
/// grade and student totals are not computed and serialize as null.
#[derive(Debug, Serialize)]
pub struct SummaryCounts {
    pub total_materias: i64,
    pub total_grados: Option<i64>,
    pub total_estudiantes: Option<i64>,
}

/// `GET /api/teacher/summary` payload.
#[derive(Debug, Serialize)]
pub struct TeacherSummary {
    #[serde(rename = "profesor")]
    pub teacher: PersonDto,
    #[serde(rename = "resumen")]
    pub summary: SummaryCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncomputed_totals_serialize_as_null() {
        let counts = SummaryCounts {
            total_materias: 3,
            total_grados: None,
            total_estudiantes: None,
        };
        let body = serde_json::to_value(&counts).unwrap();
        assert_eq!(body["total_materias"], 3);
        assert!(body["total_grados"].is_null());
        assert!(body["total_estudiantes"].is_null());
    }
}
