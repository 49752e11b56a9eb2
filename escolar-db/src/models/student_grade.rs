use super::grade::Grade;
use super::user::User;
use crate::schema::student_grades;
use crate::schema::student_grades::dsl::*;
use crate::schema::grades;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::PgConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enrollment of a student-role user in a grade, stamped at creation.
#[derive(Queryable, Debug, Serialize, Deserialize, Identifiable, Associations, Clone)]
#[belongs_to(User, foreign_key = "student_id")]
#[belongs_to(Grade)]
#[table_name = "student_grades"]
pub struct StudentGrade {
    pub id: Uuid,
    pub student_id: Uuid,
    pub grade_id: Uuid,
    pub enrolled_at: NaiveDateTime,
    pub is_active: bool,
}

impl StudentGrade {
    pub fn find_pair(sid: Uuid, gid: Uuid, conn: &PgConnection) -> QueryResult<Option<Self>> {
        student_grades
            .filter(student_id.eq(sid))
            .filter(grade_id.eq(gid))
            .first(conn)
            .optional()
    }

    pub fn grades_of_student(sid: Uuid, conn: &PgConnection) -> QueryResult<Vec<Grade>> {
        student_grades
            .filter(student_id.eq(sid))
            .inner_join(grades::table)
            .select(grades::all_columns)
            .order(grades::name.asc())
            .load(conn)
    }

    /// Enrollments with their grade rows, for views that need the
    /// enrollment timestamp alongside the grade.
    pub fn enrollments_of_student(
        sid: Uuid,
        conn: &PgConnection,
    ) -> QueryResult<Vec<(StudentGrade, Grade)>> {
        student_grades
            .filter(student_id.eq(sid))
            .inner_join(grades::table)
            .order(grades::name.asc())
            .load(conn)
    }

    pub fn delete(&self, conn: &PgConnection) -> QueryResult<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}

#[derive(Insertable, Debug)]
#[table_name = "student_grades"]
pub struct NewStudentGrade {
    pub id: Uuid,
    pub student_id: Uuid,
    pub grade_id: Uuid,
    pub enrolled_at: NaiveDateTime,
}

impl NewStudentGrade {
    pub fn create(&self, conn: &PgConnection) -> QueryResult<StudentGrade> {
        diesel::insert_into(student_grades::table)
            .values(self)
            .get_result(conn)
    }
}
