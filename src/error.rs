use mongodb::error::{ErrorKind, WriteFailure, TRANSIENT_TRANSACTION_ERROR};
use thiserror::Error;

/// Failure taxonomy shared by every service entry point.
///
/// Business-rule violations come back as values; the dispatch layer that
/// calls into this crate maps each variant to a status code. Only
/// `QuoteUnavailable` and `Store` are worth a caller-side retry, and ledger
/// writes must never be retried blindly (a second apply doubles the balance
/// change).
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username or document already registered")]
    Duplicate,

    #[error("unknown city")]
    InvalidCity,

    #[error("quote source unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("{0}")]
    Validation(String),

    #[error("concurrent update conflict")]
    ConcurrencyConflict,

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }
}

// Mongo duplicate-key errors carry code 11000; a save that trips a unique
// index must surface distinctly from a generic store failure.
fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        ErrorKind::Command(ce) => ce.code == 11000,
        ErrorKind::BulkWrite(fail) => fail
            .write_errors
            .as_ref()
            .map(|errs| errs.iter().any(|we| we.code == 11000))
            .unwrap_or(false),
        _ => false,
    }
}

// WriteConflict (112) or a transient-transaction label means two sessions
// raced on the same document.
fn is_write_conflict(e: &mongodb::error::Error) -> bool {
    if e.contains_label(TRANSIENT_TRANSACTION_ERROR) {
        return true;
    }
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 112,
        ErrorKind::Command(ce) => ce.code == 112,
        _ => false,
    }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> Self {
        if is_duplicate_key(&e) {
            ServiceError::Duplicate
        } else if is_write_conflict(&e) {
            ServiceError::ConcurrencyConflict
        } else {
            ServiceError::Store(e.to_string())
        }
    }
}
