use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Validation Error: {message}")]
    Validation { message: Cow<'static, str>, fields: Vec<Cow<'static, str>> },
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Upstream Service Error")]
    Upstream,
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<Cow<'static, str>>,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal_server_error() -> Self {
        Self::InternalServer
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            // duplicates are reported as plain bad requests to clients
            Error::BadRequest(_) | Error::Validation { .. } | Error::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Upstream | Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());

        match self {
            // Has Message
            Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::Unauthorized(msg)
            | Error::BadRequest(msg)
            | Error::Forbidden(msg) => {
                res.json(ErrorBody { message: msg.clone(), missing_fields: Vec::new() })
            }
            Error::Validation { message, fields } => {
                res.json(ErrorBody { message: message.clone(), missing_fields: fields.clone() })
            }
            // No Message
            Error::Upstream => res.json(ErrorBody {
                message: "Chat service is unavailable".into(),
                missing_fields: Vec::new(),
            }),
            Error::InternalServer => res.json(ErrorBody {
                message: "Internal Server Error".into(),
                missing_fields: Vec::new(),
            }),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // jwt errors
    #[error("JWT Error")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    // argon2 errors
    #[error("Hash Error")]
    HashError(#[from] argon2::password_hash::Error),
    // sqlx errors
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error("Migration Error")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    // serde errors
    #[error("JSON Serialization/Deserialization Error")]
    JsonError(#[from] serde_json::Error),
    // chat vendor errors
    #[error("Upstream request failed")]
    UpstreamRequest(#[from] reqwest::Error),
    #[error("Upstream error: {0}")]
    Upstream(Cow<'static, str>),
    // Domain Errors
    #[error("{message}")]
    Validation { message: Cow<'static, str>, fields: Vec<Cow<'static, str>> },
    #[error("Email is already registered, use another email")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredential,
    #[error("Not authorized, user not found")]
    AccountNotFound,
    #[error("You cannot send friend request to yourself")]
    SelfRequest,
    #[error("User is already your friend")]
    AlreadyFriends,
    #[error("Friend request already exists")]
    DuplicateRequest,
    #[error("Friend request already accepted")]
    AlreadyAccepted,
    // Custom Errors
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
    #[error("Database Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Database Conflict: {0:?}")]
    Conflict(Option<DbErrorMeta>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

fn conflict_message(meta: &Option<DbErrorMeta>) -> Cow<'static, str> {
    let Some(m) = meta else {
        return "Duplicate value".into();
    };

    let Some(constraint) = &m.constraint else {
        return "Duplicate value".into();
    };

    let field = constraint.trim_end_matches("_key").split('_').next_back().unwrap_or("value");

    let mut chars = field.chars();
    let field = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Value".to_string(),
    };

    format!("{field} already exists").into()
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::Validation { message, fields } => Error::Validation { message, fields },
            SystemError::SelfRequest => Error::BadRequest(value.to_string().into()),
            SystemError::DuplicateEmail
            | SystemError::DuplicateRequest
            | SystemError::AlreadyFriends
            | SystemError::AlreadyAccepted => Error::Conflict(value.to_string().into()),
            SystemError::Conflict(meta) => {
                if let Some(m) = &meta {
                    log::warn!(
                        "Unmapped unique violation {:?} on {:?}: {}",
                        m.code, m.constraint, m.message
                    );
                }
                Error::Conflict(conflict_message(&meta))
            }
            SystemError::InvalidCredential | SystemError::AccountNotFound => {
                Error::Unauthorized(value.to_string().into())
            }
            SystemError::Unauthorized(msg) => Error::Unauthorized(msg),
            SystemError::Forbidden(msg) => Error::Forbidden(msg),
            SystemError::NotFound(msg) => Error::NotFound(msg),
            SystemError::Upstream(_) | SystemError::UpstreamRequest(_) => {
                log::error!("Upstream Service Error: {:?}", value);
                Error::Upstream
            }
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    log::debug!("Unique violation: {:?}", db_err);
                    return match db_err.constraint() {
                        Some("users_email_key") => SystemError::DuplicateEmail,
                        Some("friend_requests_pending_pair_key") => SystemError::DuplicateRequest,
                        _ => SystemError::Conflict(Some(DbErrorMeta {
                            code: db_err.code().map(|s| s.to_string()),
                            constraint: db_err.constraint().map(|s| s.to_string()),
                            message: db_err.message().to_string(),
                        })),
                    };
                }
                Some("23514") if db_err.constraint() == Some("friend_requests_no_self") => {
                    return SystemError::SelfRequest;
                }
                _ => {
                    log::error!("Unhandled DB error: {:?}", db_err);
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        log::error!("{:?}", err);
        SystemError::InternalError(Box::new(err))
    }
}

impl From<validator::ValidationErrors> for SystemError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        let mut messages = Vec::new();
        for (field, errs) in errors.field_errors() {
            fields.push(Cow::Owned(field.to_string()));
            messages.extend(errs.iter().map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("Invalid {field}"),
            }));
        }
        fields.sort();
        messages.sort();
        SystemError::Validation { message: messages.join(", ").into(), fields }
    }
}

impl SystemError {
    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn upstream(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        Self::Validation {
            message: "Please provide all required fields".into(),
            fields: fields.into_iter().map(Cow::Borrowed).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: Error) -> serde_json::Value {
        let res = err.error_response();
        let bytes = to_bytes(res.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (SystemError::SelfRequest, StatusCode::BAD_REQUEST),
            (SystemError::DuplicateEmail, StatusCode::BAD_REQUEST),
            (SystemError::DuplicateRequest, StatusCode::BAD_REQUEST),
            (SystemError::AlreadyFriends, StatusCode::BAD_REQUEST),
            (SystemError::AlreadyAccepted, StatusCode::BAD_REQUEST),
            (SystemError::missing_fields(vec!["bio"]), StatusCode::BAD_REQUEST),
            (SystemError::InvalidCredential, StatusCode::UNAUTHORIZED),
            (SystemError::AccountNotFound, StatusCode::UNAUTHORIZED),
            (SystemError::unauthorized("no token"), StatusCode::UNAUTHORIZED),
            (SystemError::forbidden("nope"), StatusCode::FORBIDDEN),
            (SystemError::not_found("gone"), StatusCode::NOT_FOUND),
            (SystemError::upstream("stream down"), StatusCode::INTERNAL_SERVER_ERROR),
            (SystemError::DatabaseError("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (system, status) in cases {
            let err: Error = system.into();
            assert_eq!(err.status_code(), status, "unexpected status for {err:?}");
        }
    }

    #[actix_web::test]
    async fn test_validation_body_lists_missing_fields() {
        let err: Error = SystemError::missing_fields(vec!["bio", "location"]).into();
        let body = body_json(err).await;
        assert_eq!(body["message"], "Please provide all required fields");
        assert_eq!(body["missingFields"], serde_json::json!(["bio", "location"]));
    }

    #[actix_web::test]
    async fn test_upstream_detail_is_not_leaked() {
        let err: Error = SystemError::upstream("stream said: secret=abc").into();
        let body = body_json(err).await;
        assert_eq!(body["message"], "Chat service is unavailable");
        assert!(body.get("missingFields").is_none());
    }

    #[test]
    fn test_conflict_message_uses_constraint_field() {
        let meta = Some(DbErrorMeta {
            code: Some("23505".into()),
            constraint: Some("users_username_key".into()),
            message: "duplicate key".into(),
        });
        assert_eq!(conflict_message(&meta), "Username already exists");
        assert_eq!(conflict_message(&None), "Duplicate value");
    }
}
