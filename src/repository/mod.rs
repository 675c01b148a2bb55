//! Data access layer (Repository pattern)

pub mod cart;
pub mod user;

pub use cart::CartRepository;
pub use user::UserRepository;

use crate::error::AppError;
use sqlx::PgPool;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn inner(&self) -> &PgPool {
        &self.pool
    }
}

impl std::ops::Deref for DbPool {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}

/// Convert a unique-constraint violation into `AppError::Conflict`
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> AppError {
    let is_unique = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
    if is_unique {
        AppError::Conflict(message.to_string())
    } else {
        AppError::Database(e)
    }
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// SQLSTATE 22003, e.g. an `INTEGER` column incremented past its maximum
pub(crate) fn is_numeric_out_of_range(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("22003"))
}
