use super::subject::Subject;
use super::user::User;
use crate::schema::grades;
use crate::schema::grades::dsl::*;
use crate::schema::{grade_subjects, student_grades, subjects, users};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An academic cohort ("1°".."6°" under the enumerated naming policy).
/// Grades are soft-disabled through `is_active`, never deleted.
#[derive(Queryable, Debug, Serialize, Deserialize, AsChangeset, Clone, Identifiable)]
#[table_name = "grades"]
pub struct Grade {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Grade {
    pub fn find(gid: Uuid, conn: &PgConnection) -> QueryResult<Self> {
        grades.find(gid).first(conn)
    }

    pub fn find_by_name(gname: &str, conn: &PgConnection) -> QueryResult<Option<Self>> {
        grades.filter(name.eq(gname)).first(conn).optional()
    }

    pub fn list_all(conn: &PgConnection) -> QueryResult<Vec<Self>> {
        grades.order(name.asc()).load(conn)
    }

    pub fn list_active(conn: &PgConnection) -> QueryResult<Vec<Self>> {
        grades
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

    /// Subjects assigned to this grade through grade_subjects.
    pub fn subjects(&self, conn: &PgConnection) -> QueryResult<Vec<Subject>> {
        grade_subjects::table
            .filter(grade_subjects::grade_id.eq(self.id))
            .inner_join(subjects::table)
            .select(subjects::all_columns)
            .order(subjects::name.asc())
            .load(conn)
    }

    /// Students enrolled in this grade through student_grades.
    pub fn students(&self, conn: &PgConnection) -> QueryResult<Vec<User>> {
        student_grades::table
            .filter(student_grades::grade_id.eq(self.id))
            .inner_join(users::table)
            .select(users::all_columns)
            .order(users::family_name.asc())
            .load(conn)
    }
}

#[derive(Debug, Serialize, Deserialize, Insertable)]
#[table_name = "grades"]
pub struct NewGrade {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl NewGrade {
    pub fn create(&self, conn: &PgConnection) -> QueryResult<Grade> {
        diesel::insert_into(grades::table)
            .values(self)
            .get_result(conn)
    }
}
