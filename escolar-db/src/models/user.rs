use crate::schema::users;
use crate::schema::users::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::PgConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Queryable, Debug, Serialize, Deserialize, AsChangeset, Clone, Identifiable)]
#[table_name = "users"]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hash_pwd: String,
    pub given_name: String,
    pub family_name: String,
    pub user_role: String,
    pub is_active: bool,
    pub joined_at: NaiveDateTime,
    pub last_login_at: Option<NaiveDateTime>,
}

impl User {
    pub fn get(uid: Uuid, conn: &PgConnection) -> QueryResult<Self> {
        users.find(uid).first(conn)
    }

    pub fn find_by_email(addr: &str, conn: &PgConnection) -> QueryResult<Option<Self>> {
        users.filter(email.eq(addr)).first(conn).optional()
    }

    /// Lookup used by the association operations: the id must exist, carry
    /// the given role and still be active, otherwise this is a plain
    /// `NotFound` regardless of which of the three conditions failed.
    pub fn get_active_in_role(uid: Uuid, role: &str, conn: &PgConnection) -> QueryResult<Self> {
        users
            .filter(id.eq(uid))
            .filter(user_role.eq(role))
            .filter(is_active.eq(true))
            .first(conn)
    }

    pub fn list_all(conn: &PgConnection) -> QueryResult<Vec<Self>> {
        users.load(conn)
    }

    pub fn count_in_role(role: &str, conn: &PgConnection) -> QueryResult<i64> {
        users.filter(user_role.eq(role)).count().get_result(conn)
    }

    pub fn update_password_hash(&self, new_hash: String, conn: &PgConnection) -> QueryResult<()> {
        diesel::update(self)
            .set(hash_pwd.eq(new_hash))
            .execute(conn)?;
        Ok(())
    }

    pub fn update_active(&self, active: bool, conn: &PgConnection) -> QueryResult<()> {
        diesel::update(self)
            .set(is_active.eq(active))
            .execute(conn)?;
        Ok(())
    }

    pub fn update_last_login(&self, time: NaiveDateTime, conn: &PgConnection) -> QueryResult<()> {
        diesel::update(self)
            .set(last_login_at.eq(time))
            .execute(conn)?;
        Ok(())
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug)]
#[table_name = "users"]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub hash_pwd: String,
    pub given_name: String,
    pub family_name: String,
    pub user_role: String,
    pub is_active: bool,
    pub joined_at: NaiveDateTime,
}

impl NewUser {
    pub fn create(&self, conn: &PgConnection) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(self)
            .get_result(conn)
    }
}
