//! Errors surfaced by route collection.
use http::Method;
use thiserror::Error;

/// A specialized [Result][std::result::Result] for route collection.
pub type Result<T> = std::result::Result<T, Error>;

/// An error encountered while resolving or decoding a request target.
#[derive(Debug, Error)]
pub enum Error {
    /// No node matched a path segment, or the terminal node has no handler for the method.
    ///
    /// Both cases are reported identically; use [Tree::allowed_methods][crate::Tree::allowed_methods]
    /// to tell a `405` apart from a `404`.
    #[error("no route for {method} {path:?}")]
    RouteNotFound {
        /// The requested method.
        method: Method,

        /// The requested path, without its query string.
        path: String,
    },

    /// The query string could not be deserialized into the requested type.
    #[error("failed to parse query string: {0}")]
    Query(#[from] serde_urlencoded::de::Error),
}

impl Error {
    pub(crate) fn not_found(method: &Method, path: &str) -> Self {
        let method = method.clone();
        let path = path.into();
        Error::RouteNotFound { method, path }
    }

    /// Whether this error is [Error::RouteNotFound].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RouteNotFound { .. })
    }
}
