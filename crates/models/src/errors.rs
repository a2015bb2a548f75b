use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
}

/// Unique and foreign-key violations reported by the store are client errors;
/// everything else stays a database error.
impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                Self::Constraint(format!("unique constraint violated: {msg}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                Self::Constraint(format!("foreign key constraint violated: {msg}"))
            }
            _ => Self::Db(e.to_string()),
        }
    }
}
