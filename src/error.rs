// ⚠️ Error taxonomy
// Validation failures (client sent a bad receipt) and lookup misses

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    /// A receipt field is missing or cannot be parsed
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// No score was ever stored under this identifier
    #[error("Receipt not found")]
    NotFound { id: String },
}

impl ReceiptError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReceiptError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        ReceiptError::NotFound { id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReceiptError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
