use super::grade::Grade;
use super::subject::Subject;
use crate::schema::grade_subjects;
use crate::schema::grade_subjects::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::PgConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Join row linking a grade to a subject. The (grade_id, subject_id) pair
/// is unique at the database level; a duplicate insert fails instead of
/// overwriting.
#[derive(Queryable, Debug, Serialize, Deserialize, Identifiable, Associations, Clone)]
#[belongs_to(Grade)]
#[belongs_to(Subject)]
#[table_name = "grade_subjects"]
pub struct GradeSubject {
    pub id: Uuid,
    pub grade_id: Uuid,
    pub subject_id: Uuid,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl GradeSubject {
    pub fn find_pair(gid: Uuid, sid: Uuid, conn: &PgConnection) -> QueryResult<Option<Self>> {
        grade_subjects
            .filter(grade_id.eq(gid))
            .filter(subject_id.eq(sid))
            .first(conn)
            .optional()
    }

    /// Hard delete of the join row only; the grade and subject rows are
    /// untouched.
    pub fn delete(&self, conn: &PgConnection) -> QueryResult<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}

#[derive(Insertable, Debug)]
#[table_name = "grade_subjects"]
pub struct NewGradeSubject {
    pub id: Uuid,
    pub grade_id: Uuid,
    pub subject_id: Uuid,
}

impl NewGradeSubject {
    pub fn create(&self, conn: &PgConnection) -> QueryResult<GradeSubject> {
        diesel::insert_into(grade_subjects::table)
            .values(self)
            .get_result(conn)
    }
}
