use serde::{Deserialize, Serialize};
use uuid::Uuid;

use escolar_db::models::grade::Grade;
use escolar_db::models::subject::Subject;
use escolar_db::models::user::User;

use super::user::PersonDto;

/// Create/update body shared by grades and subjects.
#[derive(Debug, Deserialize)]
pub struct CatalogInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    #[serde(rename = "activo")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct AssignSubjectToGrade {
    #[serde(rename = "gradeId")]
    pub grade_id: Uuid,
    #[serde(rename = "subjectId")]
    pub subject_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AssignSubjectToTeacher {
    #[serde(rename = "teacherId")]
    pub teacher_id: Uuid,
    #[serde(rename = "subjectId")]
    pub subject_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct EnrollStudent {
    #[serde(rename = "studentId")]
    pub student_id: Uuid,
    #[serde(rename = "gradeId")]
    pub grade_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct GradeDto {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "activo")]
    pub is_active: bool,
}

impl From<&Grade> for GradeDto {
    fn from(grade: &Grade) -> Self {
        GradeDto {
            id: grade.id,
            name: grade.name.clone(),
            description: grade.description.clone(),
            is_active: grade.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubjectDto {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "activo")]
    pub is_active: bool,
}

impl From<&Subject> for SubjectDto {
    fn from(subject: &Subject) -> Self {
        SubjectDto {
            id: subject.id,
            name: subject.name.clone(),
            description: subject.description.clone(),
            is_active: subject.is_active,
        }
    }
}

/// Admin listing row: a grade with its subjects and enrolled students.
#[derive(Debug, Serialize)]
pub struct GradeDetail {
    #[serde(flatten)]
    pub grade: GradeDto,
    #[serde(rename = "materias")]
    pub subjects: Vec<SubjectDto>,
    #[serde(rename = "estudiantes")]
    pub students: Vec<PersonDto>,
}

impl GradeDetail {
    pub fn new(grade: &Grade, subjects: &[Subject], students: &[User]) -> Self {
        GradeDetail {
            grade: grade.into(),
            subjects: subjects.iter().map(SubjectDto::from).collect(),
            students: students.iter().map(PersonDto::from).collect(),
        }
    }
}

/// Admin listing row: a subject with its grades and teachers.
#[derive(Debug, Serialize)]
pub struct SubjectDetail {
    #[serde(flatten)]
    pub subject: SubjectDto,
    #[serde(rename = "grados")]
    pub grades: Vec<GradeDto>,
    #[serde(rename = "profesores")]
    pub teachers: Vec<PersonDto>,
}

impl SubjectDetail {
    pub fn new(subject: &Subject, grades: &[Grade], teachers: &[User]) -> Self {
        SubjectDetail {
            subject: subject.into(),
            grades: grades.iter().map(GradeDto::from).collect(),
            teachers: teachers.iter().map(PersonDto::from).collect(),
        }
    }
}
