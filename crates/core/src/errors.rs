//! Core error types for the advisory desk.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the desk.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Trade rejected: {0}")]
    Trade(#[from] TradeError),

    #[error("Clustering failed: {0}")]
    Clustering(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the failure came from the persistence layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Database(_))
    }

    /// Shorthand for an unknown referenced entity.
    pub fn unknown(kind: &'static str, id: impl ToString) -> Self {
        Error::Validation(ValidationError::UnknownEntity {
            kind,
            id: id.to_string(),
        })
    }

    /// Shorthand for an amount that does not fit in a `Decimal`.
    pub fn out_of_range(field: &str, value: impl ToString) -> Self {
        Error::Validation(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    /// Shorthand for a free-form invalid input.
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(message.into()))
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// A trade that cannot be settled against the account's resources.
///
/// Raised inside a ledger transaction; the transaction is rolled back and no
/// partial state is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Insufficient funds in account {account_id}: required {required}, available {available}")]
    InsufficientFunds {
        account_id: i32,
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient shares of {symbol} in account {account_id}: requested {requested}, held {held}")]
    InsufficientShares {
        account_id: i32,
        symbol: String,
        requested: Decimal,
        held: Decimal,
    },
}

/// Validation errors for caller input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Unknown {kind} '{id}'")]
    UnknownEntity { kind: &'static str, id: String },

    #[error("Value {value} is out of range for '{field}'")]
    OutOfRange { field: String, value: String },

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
