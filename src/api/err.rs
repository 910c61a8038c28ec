//! API error handling.
//!
//! We define our own error to use for all resolvers. It is turned into a
//! GraphQL field error whose `extensions` carry a coarse "error kind" and an
//! optional "key", so that clients can react to specific errors without
//! parsing messages.

use juniper::{FieldError, IntoFieldError, ScalarValue, graphql_value};


pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) msg: String,
    pub(crate) kind: ApiErrorKind,
    pub(crate) key: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// The `after` argument is not a cursor we handed out.
    InvalidCursor,
}

impl ApiErrorKind {
    pub(crate) fn kind_str(&self) -> &'static str {
        match self {
            Self::InvalidCursor => "INVALID_CURSOR",
        }
    }

    fn message_prefix(&self) -> &str {
        match self {
            Self::InvalidCursor => "Invalid cursor",
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for ApiError {
    fn into_field_error(self) -> juniper::FieldError<S> {
        let msg = format!("{}: {}", self.kind.message_prefix(), self.msg);
        let ext = if let Some(key) = self.key {
            graphql_value!({
                "kind": (self.kind.kind_str()),
                "key": key,
            })
        } else {
            graphql_value!({
                "kind": (self.kind.kind_str()),
            })
        };

        FieldError::new(msg, ext)
    }
}


// ===== Helper macros to easily create errors ==================================================

/// Creates an `ApiError` with a `format!` like syntax.
macro_rules! api_err {
    ($kind:ident, key = $key:literal, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::api::err::ApiError {
            msg: format!($fmt $(, $arg)*),
            kind: $crate::api::err::ApiErrorKind::$kind,
            key: Some($key),
        }
    };
    ($kind:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::api::err::ApiError {
            msg: format!($fmt $(, $arg)*),
            kind: $crate::api::err::ApiErrorKind::$kind,
            key: None,
        }
    };
}

macro_rules! invalid_cursor {
    ($($t:tt)+) => { $crate::api::err::api_err!(InvalidCursor, $($t)*) };
}

pub(crate) use api_err;
pub(crate) use invalid_cursor;
