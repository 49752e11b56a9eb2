pub mod grade;
pub mod grade_subject;
pub mod student_grade;
pub mod subject;
pub mod teacher_subject;
pub mod user;
