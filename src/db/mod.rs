pub mod models;
pub mod repository;

pub use models::*;
pub use repository::*;

/// Migrations embedded at compile time; shared by the server and the tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
