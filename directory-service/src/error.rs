use crate::models::permission::ApiPermission;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("claims wrapping: {}", .reasons.join(", "))]
    Wrapping { reasons: Vec<String> },

    #[error("claims unwrapping: {}", .reasons.join(", "))]
    Unwrapping { reasons: Vec<String> },

    #[error("claims invalid: {}", .reasons.join(", "))]
    Invalid { reasons: Vec<String> },
}

#[derive(Debug, Error)]
pub enum IdentifierError {
    #[error("identifier wrapping: {}", .reasons.join(", "))]
    Wrapping { reasons: Vec<String> },

    #[error("identifier unwrapping: {}", .reasons.join(", "))]
    Unwrapping { reasons: Vec<String> },

    #[error("identifier invalid: {}", .reasons.join(", "))]
    Invalid { reasons: Vec<String> },
}

#[derive(Debug, Error)]
pub enum CriterionError {
    #[error("criterion wrapping: {}", .reasons.join(", "))]
    Wrapping { reasons: Vec<String> },

    #[error("criterion unwrapping: {}", .reasons.join(", "))]
    Unwrapping { reasons: Vec<String> },

    #[error("criterion invalid: {}", .reasons.join(", "))]
    Invalid { reasons: Vec<String> },
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Claims(#[from] ClaimsError),

    #[error("invalid signing key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("signing token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("invalid jwt: {}", .reasons.join(", "))]
    InvalidJwt { reasons: Vec<String> },

    #[error("jwt verification: {}", .reasons.join(", "))]
    JwtVerification { reasons: Vec<String> },

    #[error("jwt unmarshalling: {}", .reasons.join(", "))]
    JwtUnmarshalling { reasons: Vec<String> },
}

#[derive(Debug, Error)]
pub enum RecordHandlerError {
    #[error("invalid request: {}", .reasons.join(", "))]
    RequestInvalid { reasons: Vec<String> },

    #[error("record not found")]
    NotFound,

    #[error("creating record: {}", .reasons.join(", "))]
    Create { reasons: Vec<String> },

    #[error("updating record: {}", .reasons.join(", "))]
    Update { reasons: Vec<String> },

    #[error("deleting record: {}", .reasons.join(", "))]
    Delete { reasons: Vec<String> },

    #[error("collecting records: {}", .reasons.join(", "))]
    Collect { reasons: Vec<String> },

    #[error("unexpected: {}", .reasons.join(", "))]
    Unexpected { reasons: Vec<String> },
}

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("invalid request: {}", .reasons.join(", "))]
    RequestInvalid { reasons: Vec<String> },

    #[error("claims of type {claims_type} cannot be permission checked")]
    InvalidClaimsType { claims_type: &'static str },

    #[error("retrieving all user permissions: {}", .reasons.join(", "))]
    GetAllPermissions { reasons: Vec<String> },

    #[error(transparent)]
    Record(#[from] RecordHandlerError),
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("not authorised for {permission}")]
    NotAuthorised { permission: ApiPermission },

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Claims(#[from] ClaimsError),

    #[error(transparent)]
    Permission(#[from] PermissionError),
}

impl From<ClaimsError> for AppError {
    fn from(err: ClaimsError) -> Self {
        match err {
            e @ ClaimsError::Wrapping { .. } => AppError::InternalError(anyhow::Error::new(e)),
            e => AppError::Unauthorized(anyhow::Error::new(e)),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            e @ (TokenError::InvalidKey(_) | TokenError::Signing(_)) => {
                AppError::InternalError(anyhow::Error::new(e))
            }
            TokenError::Claims(e) => e.into(),
            e => AppError::Unauthorized(anyhow::Error::new(e)),
        }
    }
}

impl From<CriterionError> for AppError {
    fn from(err: CriterionError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

impl From<IdentifierError> for AppError {
    fn from(err: IdentifierError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

impl From<RecordHandlerError> for AppError {
    fn from(err: RecordHandlerError) -> Self {
        match err {
            e @ RecordHandlerError::RequestInvalid { .. } => {
                AppError::BadRequest(anyhow::Error::new(e))
            }
            RecordHandlerError::NotFound => {
                AppError::NotFound(anyhow::anyhow!("record not found"))
            }
            e => AppError::DatabaseError(anyhow::Error::new(e)),
        }
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        match err {
            e @ PermissionError::RequestInvalid { .. } => {
                AppError::BadRequest(anyhow::Error::new(e))
            }
            e @ PermissionError::InvalidClaimsType { .. } => {
                AppError::Unauthorized(anyhow::Error::new(e))
            }
            PermissionError::Record(e) => e.into(),
            e => AppError::InternalError(anyhow::Error::new(e)),
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            e @ AccessError::NotAuthorised { .. } => AppError::Forbidden(anyhow::Error::new(e)),
            AccessError::Token(e) => e.into(),
            AccessError::Claims(e) => e.into(),
            AccessError::Permission(e) => e.into(),
        }
    }
}
