//! `PostgreSQL` adapters for task tracking persistence.

mod models;
mod repository;
mod schema;

pub use repository::{MIGRATIONS, PostgresTaskStore, TaskPgPool};
