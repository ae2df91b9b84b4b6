use serde::Serialize;

use crate::models::{Stage, Status};
use crate::store::StoreError;

/// Errors surfaced by ledger operations.
///
/// Everything except [`ServiceError::Store`] and
/// [`ServiceError::SerializationError`] is a caller-correctable input problem.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Status '{status}' is not valid for a record in the {stage} stage")]
    InvalidStatusForStage {
        #[serde(serialize_with = "crate::errors::display")]
        status: Status,
        #[serde(serialize_with = "crate::errors::display")]
        stage: Stage,
    },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("No records selected")]
    EmptySelection,

    #[error("No record matches {0}")]
    UnknownRecordKey(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("Store error: {0}")]
    Store(
        #[from]
        #[serde(skip)]
        StoreError,
    ),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl ServiceError {
    /// True when the user can fix the problem by changing their input.
    pub fn is_user_correctable(&self) -> bool {
        !matches!(
            self,
            Self::Store(_) | Self::SerializationError(_) | Self::MalformedRecord { .. }
        )
    }

    /// Short machine-readable code for the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidStatusForStage { .. } => "invalid_status_for_stage",
            Self::InvalidQuantity(_) => "invalid_quantity",
            Self::EmptySelection => "empty_selection",
            Self::UnknownRecordKey(_) => "unknown_record_key",
            Self::UnknownStatus(_) => "unknown_status",
            Self::UnknownColumn(_) => "unknown_column",
            Self::ValidationError(_) => "validation_error",
            Self::MalformedRecord { .. } => "malformed_record",
            Self::Store(_) => "store_error",
            Self::SerializationError(_) => "serialization_error",
        }
    }

    /// The message suitable for showing to a user.
    /// Store failures return a generic message to avoid leaking paths.
    pub fn response_message(&self) -> String {
        match self {
            Self::Store(_) => "The ledger could not be read or written".to_string(),
            Self::SerializationError(_) => "Internal error".to_string(),
            Self::InvalidStatusForStage { stage, .. } => {
                let allowed: Vec<&str> = stage.statuses().iter().map(|s| s.as_ref()).collect();
                format!("{}. Allowed: {}", self, allowed.join(", "))
            }
            _ => self.to_string(),
        }
    }
}

fn display<T: std::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
