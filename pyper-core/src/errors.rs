//! # Errors
//!
//! Core lookups in SalesPyper never fail: unknown tenants resolve to no
//! data and unknown roles to no permissions. Errors only exist at the
//! edges (fixture loading, request parsing, the reserved write path),
//! and those use the structured [`PyperError`] below so a transport can
//! turn them into a consistent payload.
//!
//! - consistent status codes + class names
//! - can be carried through `anyhow::Error`
//! - transport-agnostic (the server crate decides how to serialize)

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::Value;
use thiserror::Error;

/// A convenience result type for SalesPyper APIs that surface errors.
pub type PyperResult<T> = std::result::Result<T, AnyError>;

/// Error class names + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,     // 400
    Forbidden,      // 403
    NotFound,       // 404
    GeneralError,   // 500
    NotImplemented, // 501
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::GeneralError => 500,
            ErrorKind::NotImplemented => 501,
        }
    }

    /// Error `name` (e.g. "NotFound")
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::GeneralError => "GeneralError",
            ErrorKind::NotImplemented => "NotImplemented",
        }
    }

    /// Error `className`, kebab-cased.
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::GeneralError => "general-error",
            ErrorKind::NotImplemented => "not-implemented",
        }
    }
}

/// A structured SalesPyper error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct PyperError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<Value>,
    pub errors: Option<Value>,
    pub source: Option<AnyError>,
}

impl PyperError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            errors: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Turn any error into a PyperError:
    /// - if it's already a PyperError, keep it
    /// - otherwise wrap as GeneralError
    pub fn normalize(err: AnyError) -> PyperError {
        match err.downcast::<PyperError>() {
            Ok(err) => err,
            Err(other) => {
                PyperError::new(ErrorKind::GeneralError, other.to_string()).with_source(other)
            }
        }
    }

    /// Copy suitable for returning to clients: the inner `source` is dropped.
    pub fn sanitize_for_client(&self) -> PyperError {
        PyperError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }

    pub fn to_json(&self) -> Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        if let Some(e) = &self.errors {
            base["errors"] = e.clone();
        }
        base
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, msg)
    }
}

impl fmt::Display for PyperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for PyperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// "Bail with PyperError".
#[macro_export]
macro_rules! bail_pyper {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::PyperError::$ctor($msg).into_anyhow())
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::PyperError::$ctor(format!($fmt, $($arg)*)).into_anyhow())
    };
}

/// Failure to read one of the closed vocabularies from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown lead status '{0}'")]
    LeadStatus(String),
    #[error("unknown call outcome '{0}'")]
    CallOutcome(String),
    #[error("unknown status filter '{0}'")]
    StatusFilter(String),
    #[error("unknown permission '{0}'")]
    Permission(String),
    #[error("unknown role '{0}'")]
    Role(String),
    #[error("unknown tab '{0}'")]
    Tab(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_keeps_structured_errors() {
        let err = PyperError::forbidden("nope").into_anyhow();
        let norm = PyperError::normalize(err);
        assert_eq!(norm.kind, ErrorKind::Forbidden);
        assert_eq!(norm.code(), 403);
    }

    #[test]
    fn normalize_wraps_plain_errors_as_general() {
        let norm = PyperError::normalize(anyhow::anyhow!("boom"));
        assert_eq!(norm.kind, ErrorKind::GeneralError);
        assert!(norm.source.is_some());
        assert!(norm.sanitize_for_client().source.is_none());
    }

    #[test]
    fn json_shape_carries_errors() {
        let err = PyperError::bad_request("bad filter").with_errors(json!({"status": ["unknown"]}));
        let body = err.to_json();
        assert_eq!(body["name"], "BadRequest");
        assert_eq!(body["code"], 400);
        assert_eq!(body["className"], "bad-request");
        assert_eq!(body["errors"]["status"][0], "unknown");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn bail_macro_returns_structured_error() {
        fn reserved() -> PyperResult<()> {
            bail_pyper!(not_implemented, "{} is not available", "create");
        }

        let err = reserved().unwrap_err();
        let pyper = err.downcast_ref::<PyperError>().unwrap();
        assert_eq!(pyper.kind, ErrorKind::NotImplemented);
        assert_eq!(pyper.message, "create is not available");
    }
}
