use backtrace::Backtrace;
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for filter indexing operations.
///
/// Each kind describes one category of failure so that callers can react to
/// a data problem (such as a non-numeric event property) differently from a
/// programming error (such as inserting a rectangle outside an index region).
///
/// # Examples
///
/// ```rust
/// use evfilter::errors::{ErrorKind, EvFilterError, EvFilterResult};
///
/// fn example() -> EvFilterResult<()> {
///     Err(EvFilterError::new("Index not found", ErrorKind::IndexNotFound))
/// }
/// assert!(example().is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Filter Errors
    /// Error during filter evaluation or construction
    FilterError,

    // Indexing Errors
    /// Generic indexing error
    IndexingError,
    /// Index does not exist
    IndexNotFound,

    // Operation Errors
    /// The operation is not valid in the current context
    InvalidOperation,

    // Data Errors
    /// An event property could not be coerced to the type an index requires
    TypeCoercionError,
    /// Invalid data type for operation
    InvalidDataType,
    /// Generic validation error
    ValidationError,

    // Extension Errors - external crates plug in their own categories
    // The String contains the extension name (e.g., "spatial")
    /// Error from an extension module
    Extension(String),

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::IndexingError => write!(f, "Indexing error"),
            ErrorKind::IndexNotFound => write!(f, "Index not found"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::TypeCoercionError => write!(f, "Type coercion error"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::Extension(name) => write!(f, "{} error", name),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the filter indexing layer.
///
/// `EvFilterError` carries a message, a [`ErrorKind`], an optional cause and a
/// lazily resolved backtrace. Errors raised while matching events are on the
/// hot path, so the backtrace is captured unresolved and only symbolized when
/// the error is printed with `{:?}`.
///
/// # Examples
///
/// ```rust
/// use evfilter::errors::{ErrorKind, EvFilterError};
///
/// let cause = EvFilterError::new("x is not numeric", ErrorKind::TypeCoercionError);
/// let err = EvFilterError::new_with_cause("Match failed", ErrorKind::FilterError, cause);
/// assert_eq!(err.kind(), &ErrorKind::FilterError);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct EvFilterError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<EvFilterError>>,
    backtrace: Arc<Mutex<Backtrace>>,
}

impl EvFilterError {
    /// Creates a new `EvFilterError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        EvFilterError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    /// Creates a new `EvFilterError` with a cause error.
    ///
    /// The cause is kept in the chain and exposed through [`Error::source`].
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: EvFilterError) -> Self {
        EvFilterError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&EvFilterError> {
        self.cause.as_deref()
    }
}

impl Display for EvFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for EvFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => {
                let mut backtrace = self.backtrace.lock();
                backtrace.resolve();
                write!(f, "{}\n{:?}", self.message, *backtrace)
            }
        }
    }
}

impl Error for EvFilterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for filter indexing operations.
pub type EvFilterResult<T> = Result<T, EvFilterError>;

impl From<std::num::ParseFloatError> for EvFilterError {
    fn from(err: std::num::ParseFloatError) -> Self {
        EvFilterError::new(
            &format!("Float parsing error: {}", err),
            ErrorKind::TypeCoercionError,
        )
    }
}

impl From<String> for EvFilterError {
    fn from(msg: String) -> Self {
        EvFilterError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for EvFilterError {
    fn from(msg: &str) -> Self {
        EvFilterError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_new_creates_error() {
        let error = EvFilterError::new("An error occurred", ErrorKind::IndexingError);
        assert_eq!(error.message, "An error occurred");
        assert_eq!(error.error_kind, ErrorKind::IndexingError);
        assert!(error.cause.is_none());
    }

    #[test]
    fn error_new_with_cause_keeps_chain() {
        let cause = EvFilterError::new("not a number", ErrorKind::TypeCoercionError);
        let error = EvFilterError::new_with_cause("Match failed", ErrorKind::FilterError, cause);
        assert_eq!(error.kind(), &ErrorKind::FilterError);
        assert_eq!(error.cause().map(|c| c.kind()), Some(&ErrorKind::TypeCoercionError));

        let source = error.source().expect("source should be set");
        assert_eq!(source.to_string(), "not a number");
    }

    #[test]
    fn error_display_prints_message_only() {
        let error = EvFilterError::new("Index not found", ErrorKind::IndexNotFound);
        assert_eq!(format!("{}", error), "Index not found");
    }

    #[test]
    fn error_debug_includes_cause() {
        let cause = EvFilterError::new("inner", ErrorKind::ValidationError);
        let error = EvFilterError::new_with_cause("outer", ErrorKind::IndexingError, cause);
        let debug = format!("{:?}", error);
        assert!(debug.starts_with("outer"));
        assert!(debug.contains("Caused by: inner"));
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::TypeCoercionError.to_string(), "Type coercion error");
        assert_eq!(ErrorKind::Extension("spatial".into()).to_string(), "spatial error");
        assert_eq!(ErrorKind::ValidationError.to_string(), "Validation error");
    }

    #[test]
    fn error_from_parse_float_is_coercion_error() {
        let err: EvFilterError = "abc".parse::<f64>().unwrap_err().into();
        assert_eq!(err.kind(), &ErrorKind::TypeCoercionError);
    }

    #[test]
    fn error_from_str_is_internal() {
        let err: EvFilterError = "boom".into();
        assert_eq!(err.kind(), &ErrorKind::InternalError);
        let err: EvFilterError = String::from("boom").into();
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn cloned_error_shares_backtrace() {
        let error = EvFilterError::new("cloned", ErrorKind::InternalError);
        let clone = error.clone();
        assert!(Arc::ptr_eq(&error.backtrace, &clone.backtrace));
        assert_eq!(clone.message(), "cloned");
    }
}
