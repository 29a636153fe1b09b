//! Router configuration errors and navigation failures.
//!
//! Configuration errors surface while the route table is compiled and are fatal to startup.
//! Navigation failures reject a single navigation and leave the current route mounted.

use snafu::prelude::*;

/// Error produced while compiling a route table or reversing a named route.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum RouterError {
    /// Two records normalize to the same path pattern.
    #[snafu(display("duplicate route path '{duplicate}' conflicts with '{existing}'"))]
    DuplicatePath { existing: String, duplicate: String },

    /// Two records share a route name.
    #[snafu(display("duplicate route name '{name}'"))]
    DuplicateName { name: String },

    /// The path pattern cannot be compiled.
    #[snafu(display("invalid route path '{path}': {reason}"))]
    InvalidPath { path: String, reason: String },

    /// Reverse lookup of a name that is not in the table.
    #[snafu(display("no route named '{name}'"))]
    UnknownRoute { name: String },

    /// Reverse lookup without a value for one of the pattern's parameters.
    #[snafu(display("route '{name}' requires parameter '{param}'"))]
    MissingParam { name: String, param: String },
}

/// Failure raised by a component loader.
#[derive(Debug, Snafu)]
#[snafu(display("{message}"))]
pub struct LoadError {
    message: String,
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl LoadError {
    /// Create a load error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a load error wrapping an underlying cause.
    pub fn with_cause(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying cause, if the loader supplied one.
    pub fn underlying(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

/// Reason a navigation was rejected. The previously committed route stays current.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum NavigationFailure {
    /// No route matches the location.
    #[snafu(display("no route matches '{location}'"))]
    NotFound { location: String },

    /// The location is already the current route.
    #[snafu(display("already at '{location}'"))]
    Duplicated { location: String },

    /// A newer navigation started before this one finished loading.
    #[snafu(display("navigation to '{location}' was superseded"))]
    Cancelled { location: String },

    /// The route's component loader rejected.
    #[snafu(display("failed to load route '{route}': {source}"))]
    LoadFailed { route: String, source: LoadError },

    /// History traversal past the first or last entry.
    #[snafu(display("no history entry in that direction"))]
    NoHistory,
}

impl NavigationFailure {
    /// True when the failure is expected during normal use and needs no user-visible notice.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            NavigationFailure::Duplicated { .. } | NavigationFailure::Cancelled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_path() {
        let err = RouterError::DuplicatePath {
            existing: "/".into(),
            duplicate: "/".into(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate route path '/' conflicts with '/'"
        );
    }

    #[test]
    fn test_load_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "chunk missing");
        let err = LoadError::with_cause("fetch failed", io);
        assert_eq!(err.message(), "fetch failed");
        assert!(err.underlying().is_some());
        assert!(LoadError::new("plain").underlying().is_none());
    }

    #[test]
    fn test_benign_failures() {
        assert!(NavigationFailure::Duplicated { location: "/".into() }.is_benign());
        assert!(NavigationFailure::Cancelled { location: "/".into() }.is_benign());
        assert!(!NavigationFailure::NotFound { location: "/x".into() }.is_benign());
        assert!(!NavigationFailure::NoHistory.is_benign());
    }
}
