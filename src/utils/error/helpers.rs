//! Helper functions for creating specific error types

use super::types::GateError;

impl GateError {
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn self_action_denied<S: Into<String>>(message: S) -> Self {
        Self::SelfActionDenied(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn crypto<S: Into<String>>(message: S) -> Self {
        Self::Crypto(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Map a storage write error, surfacing unique-constraint violations as
    /// `Conflict` and dangling references as `NotFound`.
    ///
    /// `what` names the value being written ("Role name already exists").
    pub fn from_db_write(err: sea_orm::DbErr, what: &str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                Self::Conflict(format!("{} already exists", what))
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::NotFound(format!("{} references a missing record", what))
            }
            _ => Self::Database(err),
        }
    }

    /// Whether this error is one of the user-visible domain outcomes.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Conflict(_)
                | Self::InvalidRequest(_)
                | Self::Unauthorized(_)
                | Self::Forbidden(_)
                | Self::SelfActionDenied(_)
        )
    }
}
