//! Persistence layer: pooled Postgres connections, the diesel schema and
//! one model module per entity. Migrations are embedded so a fresh
//! database is brought up by the binary itself.

use connection::PgPool;

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

embed_migrations!();

pub fn run_migrations(pool: &PgPool) {
    let conn = pool.get().expect("Can't get DB connection");
    embedded_migrations::run(&conn).expect("Failed to run database migrations");
}

pub mod connection;
pub mod models;
pub mod schema;
