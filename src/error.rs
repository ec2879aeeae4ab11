use crate::constants::is_recognized_status_code;
use thiserror::Error;

/// Every failure the crate can produce.
///
/// Registration-time variants (`PatternCompile`, `InvalidMethod`,
/// `EmptyMethods`, `DuplicateAlias`, `UnknownAlias`, `NoRouteToAttach`)
/// propagate to the caller and should abort setup. Dispatch-time variants
/// are never surfaced to the caller of [`Dispatcher::dispatch`](crate::Dispatcher::dispatch);
/// they are converted into error responses instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed route pattern or a constraint using characters outside the
    /// safe subset.
    #[error("could not compile route pattern {pattern:?}: {reason}")]
    PatternCompile { pattern: String, reason: String },

    /// A method string outside the allowed HTTP method vocabulary.
    #[error("{method:?} is not a valid HTTP request method")]
    InvalidMethod { method: String },

    /// A route registered with an empty method set.
    #[error("a route requires at least one HTTP method")]
    EmptyMethods,

    /// A middleware alias can be bound exactly once.
    #[error("middleware alias {alias:?} is already registered")]
    DuplicateAlias { alias: String },

    /// A middleware alias that was never registered.
    #[error("middleware alias {alias:?} is not registered")]
    UnknownAlias { alias: String },

    /// Middleware attachment with no route to attach to.
    #[error("no route has been registered to attach middleware to")]
    NoRouteToAttach,

    /// A named controller target could not be resolved to an invocable.
    /// Raised at dispatch time, never at registration.
    #[error("could not resolve target {reference:?}: {reason}")]
    TargetResolution { reference: String, reason: String },

    /// No registered route matched the request.
    #[error("Route not found")]
    RouteNotFound,

    /// A status code outside the recognized set.
    #[error("{code} is not a recognized response status code")]
    InvalidStatusCode { code: u16 },

    /// A failure raised by a handler or middleware that carries an HTTP
    /// status code.
    #[error("{message}")]
    Status { code: u16, message: String },

    /// Any other failure.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a generic error with the given message.
    pub fn new<M: Into<String>>(message: M) -> Self {
        Error::Message(message.into())
    }

    /// Creates a failure carrying an HTTP status code. During dispatch the
    /// code becomes the response status if it is recognized, otherwise the
    /// response falls back to 500.
    pub fn with_status<M: Into<String>>(code: u16, message: M) -> Self {
        Error::Status {
            code,
            message: message.into(),
        }
    }

    /// The status code this error maps to when converted into a response.
    pub(crate) fn response_code(&self) -> u16 {
        match self {
            Error::RouteNotFound => 404,
            Error::Status { code, .. } if is_recognized_status_code(*code) => *code,
            _ => 500,
        }
    }
}

/// A Result type often returned from methods that can have routing errors.
pub type Result<T> = std::result::Result<T, Error>;
