use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("bad_request: {0}")]
    BadRequest(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("not_found")]
    NotFound,
    #[error("db_error")]
    DbError,
    #[error("invalid_credentials")]
    InvalidCredentials,
    #[error("kdf_error")]
    Kdf,
    #[error("internal: {0}")]
    Internal(&'static str),
}
