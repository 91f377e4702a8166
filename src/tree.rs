//! Segment trie holding middleware and handlers.
//!
//! One trie level per `/`-delimited path segment. Each node owns its children, the middleware
//! that fires whenever a request passes through it, and the handlers registered at exactly its
//! path.
use super::{
    segment::{segments, Segment},
    store::Store,
};
use http::Method;
use std::fmt;
use tracing::debug;

/// Expands to a route pattern string.
///
/// Segments are string literals or `*` (a positional wildcard), separated by `/`.
///
/// ```
/// use routetrie::path;
///
/// assert_eq!("", path![]);
/// assert_eq!("one/", path!["one"]);
/// assert_eq!("one/*/three/", path!["one" / * / "three"]);
/// assert_eq!("*/*/", path![* / *]);
/// ```
///
/// Trailing and doubled slashes are ignored by registration, so the output can be passed
/// directly to [Tree::add_handler] and friends.
#[macro_export]
macro_rules! path {
    () => {
        ""
    };

    ($( $segment:tt ) / +) => {
        concat!($( $crate::__path_segment!($segment), "/" ),+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __path_segment {
    (*) => {
        "*"
    };

    ($segment:literal) => {
        $segment
    };
}

/// What to attach to the node a registration path resolves to.
#[derive(Clone, Debug)]
pub enum Entry<H> {
    /// Fire `H` for every request whose path passes through the node.
    Middleware(H),

    /// Terminate requests with this method at the node.
    Handler(Method, H),

    /// Attach nothing; the node only exists to scope further registrations.
    Prefix,
}

/// How the collector picks between sibling children that both accept a segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchPolicy {
    /// The first accepting child in registration order wins, so a wildcard registered
    /// before a literal sibling shadows it.
    RegistrationOrder,

    /// A literal child equal to the segment always beats a wildcard sibling.
    LiteralFirst,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy::RegistrationOrder
    }
}

/// A single trie node.
#[derive(Clone, Debug)]
pub struct Node<H> {
    segment: Segment,
    children: Store<Node<H>>,
    middlewares: Store<H>,
    handlers: Store<(Method, H)>,
}

impl<H> Node<H> {
    fn new(segment: Segment) -> Self {
        Self {
            segment,
            children: Store::new(),
            middlewares: Store::new(),
            handlers: Store::new(),
        }
    }

    /// The identifier this node matches.
    #[inline]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Child nodes in registration order.
    #[inline]
    pub fn children(&self) -> &[Node<H>] {
        &self.children
    }

    /// Middleware attached to this node in registration order.
    #[inline]
    pub fn middlewares(&self) -> &[H] {
        &self.middlewares
    }

    /// Handlers attached to this node in registration order. Duplicate methods are kept.
    #[inline]
    pub fn handlers(&self) -> &[(Method, H)] {
        &self.handlers
    }

    /// The first handler registered for `method`, if any.
    pub fn handler(&self, method: &Method) -> Option<&H> {
        (self.handlers.iter())
            .find(|(m, _)| m == method)
            .map(|(_, h)| h)
    }

    /// Walk `path` from this node, creating missing nodes along the way, and attach `entry`
    /// to the node reached. Returns that node.
    ///
    /// Registration is additive: existing nodes are reused, but attaching the same middleware
    /// or handler twice stores it twice.
    ///
    /// ```
    /// use http::Method;
    /// use routetrie::{Entry, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let api = tree.add_prefix("/api");
    /// api.add("users", Entry::Handler(Method::GET, "list users"));
    ///
    /// let m = tree.collect(&Method::GET, "/api/users").unwrap();
    /// assert_eq!(&"list users", m.handler());
    /// ```
    pub fn add(&mut self, path: &str, entry: Entry<H>) -> &mut Self {
        let mut n = self;
        let mut depth = 0usize;

        for seg in segments(path) {
            let id = Segment::parse(seg);
            let pos = n.children.iter().position(|c| c.segment == id);

            n = match pos {
                Some(i) => n.children.nth_mut(i),
                None => n.children.push(Node::new(id)),
            };
            depth += 1;
        }

        match entry {
            Entry::Middleware(mw) => {
                debug!(path, depth, "registered middleware");
                n.middlewares.push(mw);
            }

            Entry::Handler(method, handler) => {
                debug!(%method, path, depth, "registered handler");
                n.handlers.push((method, handler));
            }

            Entry::Prefix => debug!(path, depth, "registered prefix"),
        }

        n
    }

    /// Ensure the nodes for `path` exist and return the last one, for scoping further
    /// registrations beneath it.
    #[inline]
    pub fn add_prefix(&mut self, path: &str) -> &mut Self {
        self.add(path, Entry::Prefix)
    }

    /// Attach `middleware` to the node reached by `path`. Returns `self` for chaining.
    #[inline]
    pub fn add_middleware(&mut self, path: &str, middleware: H) -> &mut Self {
        self.add(path, Entry::Middleware(middleware));
        self
    }

    /// Attach a `handler` for `method` to the node reached by `path`. Returns `self` for
    /// chaining.
    #[inline]
    pub fn add_handler(&mut self, method: Method, path: &str, handler: H) -> &mut Self {
        self.add(path, Entry::Handler(method, handler));
        self
    }

    /// Shorthand for [Node::add_handler] with [Method::GET].
    #[inline]
    pub fn get(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::GET, path, handler)
    }

    /// Shorthand for [Node::add_handler] with [Method::POST].
    #[inline]
    pub fn post(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::POST, path, handler)
    }

    /// Shorthand for [Node::add_handler] with [Method::PUT].
    #[inline]
    pub fn put(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::PUT, path, handler)
    }

    /// Shorthand for [Node::add_handler] with [Method::PATCH].
    #[inline]
    pub fn patch(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::PATCH, path, handler)
    }

    /// Shorthand for [Node::add_handler] with [Method::DELETE].
    #[inline]
    pub fn delete(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::DELETE, path, handler)
    }

    fn count_handlers(&self) -> usize {
        let below: usize = self.children.iter().map(Node::count_handlers).sum();
        self.handlers.len() + below
    }

    fn routes_into(&self, pattern: &str, out: &mut Vec<Route>) {
        for (method, _) in &self.handlers {
            out.push(Route {
                method: method.clone(),
                pattern: if pattern.is_empty() { "/".into() } else { pattern.into() },
            });
        }

        for child in &self.children {
            child.routes_into(&format!("{}/{}", pattern, child.segment), out);
        }
    }
}

/// A registered `(method, pattern)` pair, as reported by [Tree::routes].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// The method the handler was registered for.
    pub method: Method,

    /// The normalized pattern, e.g. `/api/*/users`.
    pub pattern: String,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

/// A route tree: the root node plus the collector's [MatchPolicy].
///
/// Trees are built once, then queried. Nothing in the query path mutates the tree, so a
/// finished tree can be shared across threads behind an [Arc][std::sync::Arc] (or a
/// [SharedTree][crate::SharedTree] when it must be replaced at runtime).
///
/// ```
/// use http::Method;
/// use routetrie::Tree;
///
/// let mut tree = Tree::new();
/// tree.add_middleware("users", "auth")
///     .add_handler(Method::GET, "users/*", "show user");
///
/// let m = tree.collect(&Method::GET, "/users/42?full=1").unwrap();
/// assert_eq!(vec![&"auth", &"show user"], m.chain());
/// assert_eq!(&["42"], m.params());
/// assert_eq!("full=1", m.query());
/// ```
#[derive(Clone, Debug)]
pub struct Tree<H> {
    root: Node<H>,
    policy: MatchPolicy,
}

impl<H> Default for Tree<H> {
    fn default() -> Self {
        Self {
            root: Node::new(Segment::Root),
            policy: MatchPolicy::default(),
        }
    }
}

impl<H> Tree<H> {
    /// Create an empty tree using [MatchPolicy::RegistrationOrder].
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `policy` to pick between siblings that both accept a segment.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// The root node. It represents the empty path and never matches request text itself.
    #[inline]
    pub fn root(&self) -> &Node<H> {
        &self.root
    }

    /// Mutable access to the root node, for registrations through [Node::add].
    #[inline]
    pub fn root_mut(&mut self) -> &mut Node<H> {
        &mut self.root
    }

    /// See [Node::add_prefix].
    ///
    /// ```
    /// use http::Method;
    /// use routetrie::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.add_prefix("api/v1")
    ///     .add_middleware("", "v1 only")
    ///     .get("health", "ok");
    ///
    /// let m = tree.collect(&Method::GET, "api/v1/health").unwrap();
    /// assert_eq!(vec![&"v1 only", &"ok"], m.chain());
    /// ```
    #[inline]
    pub fn add_prefix(&mut self, path: &str) -> &mut Node<H> {
        self.root.add_prefix(path)
    }

    /// See [Node::add_middleware].
    ///
    /// Middleware registered at the empty path attaches to the root and leads every chain.
    #[inline]
    pub fn add_middleware(&mut self, path: &str, middleware: H) -> &mut Self {
        self.root.add_middleware(path, middleware);
        self
    }

    /// See [Node::add_handler].
    #[inline]
    pub fn add_handler(&mut self, method: Method, path: &str, handler: H) -> &mut Self {
        self.root.add_handler(method, path, handler);
        self
    }

    #[inline]
    pub fn get(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::GET, path, handler)
    }

    #[inline]
    pub fn post(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::POST, path, handler)
    }

    #[inline]
    pub fn put(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::PUT, path, handler)
    }

    #[inline]
    pub fn patch(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::PATCH, path, handler)
    }

    #[inline]
    pub fn delete(&mut self, path: &str, handler: H) -> &mut Self {
        self.add_handler(Method::DELETE, path, handler)
    }

    /// The number of handler registrations, duplicates included.
    pub fn len(&self) -> usize {
        self.root.count_handlers()
    }

    /// Whether no handler has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every registered `(method, pattern)` pair, depth-first in registration order.
    ///
    /// ```
    /// use http::Method;
    /// use routetrie::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.add_handler(Method::GET, "/", ())
    ///     .add_handler(Method::POST, "users/*/", ());
    ///
    /// let routes: Vec<_> = tree.routes().iter().map(|r| r.to_string()).collect();
    /// assert_eq!(vec!["GET /", "POST /users/*"], routes);
    /// ```
    pub fn routes(&self) -> Vec<Route> {
        let mut out = vec![];
        self.root.routes_into("", &mut out);
        out
    }
}
