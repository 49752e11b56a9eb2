use super::subject::Subject;
use super::user::User;
use crate::schema::teacher_subjects;
use crate::schema::teacher_subjects::dsl::*;
use crate::schema::subjects;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::PgConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Join row linking a teacher-role user to a subject. The role check lives
/// in the operation (the schema only knows user ids).
#[derive(Queryable, Debug, Serialize, Deserialize, Identifiable, Associations, Clone)]
#[belongs_to(User, foreign_key = "teacher_id")]
#[belongs_to(Subject)]
#[table_name = "teacher_subjects"]
pub struct TeacherSubject {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl TeacherSubject {
    pub fn find_pair(tid: Uuid, sid: Uuid, conn: &PgConnection) -> QueryResult<Option<Self>> {
        teacher_subjects
            .filter(teacher_id.eq(tid))
            .filter(subject_id.eq(sid))
            .first(conn)
            .optional()
    }

    pub fn subjects_of_teacher(tid: Uuid, conn: &PgConnection) -> QueryResult<Vec<Subject>> {
        teacher_subjects
            .filter(teacher_id.eq(tid))
            .inner_join(subjects::table)
            .select(subjects::all_columns)
            .order(subjects::name.asc())
            .load(conn)
    }

    pub fn count_for_teacher(tid: Uuid, conn: &PgConnection) -> QueryResult<i64> {
        teacher_subjects
            .filter(teacher_id.eq(tid))
            .count()
            .get_result(conn)
    }

    pub fn delete(&self, conn: &PgConnection) -> QueryResult<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}

#[derive(Insertable, Debug)]
#[table_name = "teacher_subjects"]
pub struct NewTeacherSubject {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
}

impl NewTeacherSubject {
    pub fn create(&self, conn: &PgConnection) -> QueryResult<TeacherSubject> {
        diesel::insert_into(teacher_subjects::table)
            .values(self)
            .get_result(conn)
    }
}
