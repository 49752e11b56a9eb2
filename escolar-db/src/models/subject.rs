use super::grade::Grade;
use super::user::User;
use crate::schema::subjects;
use crate::schema::subjects::dsl::*;
use crate::schema::{grade_subjects, grades, student_grades, teacher_subjects, users};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course in the curriculum, linked to grades and teachers through the
/// association tables.
#[derive(Queryable, Debug, Serialize, Deserialize, AsChangeset, Clone, Identifiable)]
#[table_name = "subjects"]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Subject {
    pub fn find(sid: Uuid, conn: &PgConnection) -> QueryResult<Self> {
        subjects.find(sid).first(conn)
    }

    pub fn find_by_name(sname: &str, conn: &PgConnection) -> QueryResult<Option<Self>> {
        subjects.filter(name.eq(sname)).first(conn).optional()
    }

    pub fn list_all(conn: &PgConnection) -> QueryResult<Vec<Self>> {
        subjects.order(name.asc()).load(conn)
    }

    pub fn list_active(conn: &PgConnection) -> QueryResult<Vec<Self>> {
        subjects
            .filter(is_active.eq(true))
            .order(name.asc())
            .load(conn)
    }

    pub fn update_info(
        &self,
        new_name: &str,
        new_description: Option<&str>,
        conn: &PgConnection,
    ) -> QueryResult<()> {
        diesel::update(self)
            .set((
                name.eq(new_name),
                description.eq(new_description),
                updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        Ok(())
    }

    pub fn update_active(&self, active: bool, conn: &PgConnection) -> QueryResult<()> {
        diesel::update(self)
            .set((is_active.eq(active), updated_at.eq(Utc::now().naive_utc())))
            .execute(conn)?;
        Ok(())
    }

    /// Grades this subject is assigned to.
    pub fn grades(&self, conn: &PgConnection) -> QueryResult<Vec<Grade>> {
        grade_subjects::table
            .filter(grade_subjects::subject_id.eq(self.id))
            .inner_join(grades::table)
            .select(grades::all_columns)
            .order(grades::name.asc())
            .load(conn)
    }

    /// Teachers assigned to this subject.
    pub fn teachers(&self, conn: &PgConnection) -> QueryResult<Vec<User>> {
        teacher_subjects::table
            .filter(teacher_subjects::subject_id.eq(self.id))
            .inner_join(users::table)
            .select(users::all_columns)
            .order(users::family_name.asc())
            .load(conn)
    }

    /// Students reached by this subject: everyone enrolled in a grade the
    /// subject is assigned to. Distinct because a student may sit in more
    /// than one such grade.
    pub fn enrolled_students(&self, conn: &PgConnection) -> QueryResult<Vec<User>> {
        student_grades::table
            .inner_join(users::table)
            .inner_join(
                grade_subjects::table
                    .on(grade_subjects::grade_id.eq(student_grades::grade_id)),
            )
            .filter(grade_subjects::subject_id.eq(self.id))
            .select(users::all_columns)
            .distinct()
            .load(conn)
    }
}

#[derive(Debug, Serialize, Deserialize, Insertable)]
#[table_name = "subjects"]
pub struct NewSubject {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl NewSubject {
    pub fn create(&self, conn: &PgConnection) -> QueryResult<Subject> {
        diesel::insert_into(subjects::table)
            .values(self)
            .get_result(conn)
    }
}
