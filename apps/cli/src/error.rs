//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally                                  │
//! │                                                                         │
//! │  tally add --code "" ...                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<(), CliError>                                            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ──── StoreError::Io("...") ────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Validation Error? ─── FieldErrors ─────────── CliError ───────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr:                                                                │
//! │    error [VALIDATION_ERROR]: 1 field(s) failed validation               │
//! │      invoiceCode: Invoice code must be filled                           │
//! │  exit status 2                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::process::ExitCode;
use tally_core::FieldErrors;
use tally_store::StoreError;

/// Error returned from commands.
///
/// ## Printed Form
/// ```text
/// error [NOT_FOUND]: Sale not found: 7
/// ```
#[derive(Debug, Clone)]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// One `path: message` line per failing field (validation only)
    pub details: Vec<String>,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Sale draft failed validation
    ValidationError,

    /// No sale at the given index
    NotFound,

    /// Reading or writing the persisted document failed
    StorageError,

    /// Configuration couldn't be resolved
    ConfigError,

    /// Command arguments couldn't be understood
    InvalidInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
        }
    }
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Creates a not found error for a sale index.
    pub fn not_found(index: usize) -> Self {
        CliError::new(ErrorCode::NotFound, format!("Sale not found: {index}"))
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    /// Process exit status: 2 for validation failures, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            ErrorCode::ValidationError => 2,
            _ => 1,
        }
    }

    /// Prints the error and its details to stderr.
    pub fn report(&self) -> ExitCode {
        eprintln!("{self}");
        for line in &self.details {
            eprintln!("  {line}");
        }
        ExitCode::from(self.exit_code())
    }
}

/// Converts store errors to CLI errors.
impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CorruptDocument { .. } => CliError::new(
                ErrorCode::StorageError,
                format!("{err}. Fix or move the document before running tally again"),
            ),
            StoreError::QueryFailed(ref e) | StoreError::Internal(ref e) => {
                tracing::error!("Storage operation failed: {}", e);
                CliError::new(ErrorCode::StorageError, err.to_string())
            }
            other => CliError::new(ErrorCode::StorageError, other.to_string()),
        }
    }
}

/// Converts collected field errors to one validation error.
impl From<FieldErrors> for CliError {
    fn from(errors: FieldErrors) -> Self {
        CliError {
            code: ErrorCode::ValidationError,
            message: errors.to_string(),
            details: errors
                .iter()
                .map(|(path, err)| format!("{path}: {err}"))
                .collect(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::StorageError, format!("I/O error: {err}"))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}
