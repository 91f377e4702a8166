//! Request-time traversal of a [Tree].
//!
//! A lookup walks from the root one segment at a time, descending into the first child that
//! accepts the segment. Middleware is accumulated from every node passed through, wildcard
//! segments are captured in traversal order, and the handler for the requested method at the
//! final node terminates the chain. There is no backtracking: if no child accepts a segment the
//! lookup fails right there, even if another branch could have matched deeper.
use super::{
    error::{Error, Result},
    segment::segments,
    tree::{MatchPolicy, Node, Tree},
};
use http::{Method, Request};
use tracing::trace;

/// Split a raw request target into `(path, query)`.
///
/// The query string is exactly the second `?`-delimited component of `raw`. Anything after a
/// second `?` is dropped.
///
/// ```
/// use routetrie::split_query;
///
/// assert_eq!(("foo", "a=1&b=2"), split_query("foo?a=1&b=2"));
/// assert_eq!(("foo", ""), split_query("foo?"));
/// assert_eq!(("foo", ""), split_query("foo"));
/// assert_eq!(("foo", "a"), split_query("foo?a?b"));
/// ```
pub fn split_query(raw: &str) -> (&str, &str) {
    let mut parts = raw.split('?');
    let path = parts.next().unwrap_or_default();
    let query = parts.next().unwrap_or_default();
    (path, query)
}

/// A successful lookup.
///
/// Borrows the tree it was collected from and the raw target it was collected for.
#[derive(Debug)]
pub struct Match<'a, H> {
    pub(crate) chain: Vec<&'a H>,
    pub(crate) handler: &'a H,
    pub(crate) params: Vec<&'a str>,
    pub(crate) query: &'a str,
}

impl<'a, H> Match<'a, H> {
    /// Middleware from root to leaf, followed by the handler.
    #[inline]
    pub fn chain(&self) -> &[&'a H] {
        &self.chain
    }

    /// The chain without its final handler.
    #[inline]
    pub fn middlewares(&self) -> &[&'a H] {
        &self.chain[..self.chain.len() - 1]
    }

    /// The handler registered for the requested method at the matched path.
    #[inline]
    pub fn handler(&self) -> &'a H {
        self.handler
    }

    /// Raw text of every wildcard segment, left to right.
    #[inline]
    pub fn params(&self) -> &[&'a str] {
        &self.params
    }

    /// The isolated query string, empty if there was none.
    #[inline]
    pub fn query(&self) -> &'a str {
        self.query
    }

    /// Consume the match, yielding its chain.
    pub fn into_chain(self) -> Vec<&'a H> {
        self.chain
    }
}

/// Pick the child of `node` that accepts `seg` under `policy`.
fn select<'a, H>(node: &'a Node<H>, seg: &str, policy: MatchPolicy) -> Option<&'a Node<H>> {
    let children = node.children();

    match policy {
        MatchPolicy::RegistrationOrder => children.iter().find(|c| c.segment().accepts(seg)),

        MatchPolicy::LiteralFirst => (children.iter())
            .find(|c| c.segment().is_literal(seg))
            .or_else(|| children.iter().find(|c| c.segment().is_wildcard())),
    }
}

impl<H> Tree<H> {
    /// Walk `path` to its terminal node, calling `visit` on every node descended into.
    fn resolve<'a, F>(&'a self, path: &'a str, mut visit: F) -> Option<&'a Node<H>>
    where F: FnMut(&'a Node<H>, &'a str) {
        let mut n = self.root();

        for seg in segments(path) {
            n = match select(n, seg, self.policy()) {
                Some(child) => child,
                None => {
                    trace!(path, segment = seg, "no child accepts segment");
                    return None;
                }
            };
            visit(n, seg);
        }

        Some(n)
    }

    /// Like [Tree::collect], but appends into caller-supplied accumulators and returns only
    /// the query string. Lets a server reuse its buffers across requests.
    ///
    /// On error, `chain` and `params` may hold a partial traversal.
    ///
    /// ```
    /// use http::Method;
    /// use routetrie::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.add_middleware("*", "log").get("*", "echo");
    ///
    /// let (mut chain, mut params) = (vec![], vec![]);
    /// let q = tree.collect_into(&Method::GET, "/hi?x", &mut chain, &mut params).unwrap();
    ///
    /// assert_eq!(vec![&"log", &"echo"], chain);
    /// assert_eq!(vec!["hi"], params);
    /// assert_eq!("x", q);
    /// ```
    pub fn collect_into<'a>(
        &'a self,
        method: &Method,
        raw: &'a str,
        chain: &mut Vec<&'a H>,
        params: &mut Vec<&'a str>,
    ) -> Result<&'a str> {
        let (handler, query) = self.walk(method, raw, chain, params)?;
        chain.push(handler);
        Ok(query)
    }

    /// Collect the middleware chain, wildcard parameters and query string for a request.
    ///
    /// `raw` is the request target: a `/`-separated path with an optional `?query`. Leading,
    /// trailing and doubled slashes are ignored.
    ///
    /// Middleware registered on the root (the empty path) leads every chain.
    ///
    /// # Errors
    /// [Error::RouteNotFound] if some segment has no accepting child, or if the final node
    /// has no handler for `method`.
    pub fn collect<'a>(&'a self, method: &Method, raw: &'a str) -> Result<Match<'a, H>> {
        let mut chain = vec![];
        let mut params = vec![];

        let (handler, query) = self.walk(method, raw, &mut chain, &mut params)?;
        chain.push(handler);

        Ok(Match {
            chain,
            handler,
            params,
            query,
        })
    }

    fn walk<'a>(
        &'a self,
        method: &Method,
        raw: &'a str,
        chain: &mut Vec<&'a H>,
        params: &mut Vec<&'a str>,
    ) -> Result<(&'a H, &'a str)> {
        let (path, query) = split_query(raw);

        chain.extend(self.root().middlewares());

        let node = self.resolve(path, |n, seg| {
            if n.segment().is_wildcard() {
                params.push(seg);
            }
            chain.extend(n.middlewares());
        });

        let node = node.ok_or_else(|| Error::not_found(method, path))?;

        match node.handler(method) {
            Some(h) => Ok((h, query)),
            None => {
                trace!(%method, path, "no handler for method");
                Err(Error::not_found(method, path))
            }
        }
    }

    /// Collect for an [http::Request], using its method and path-and-query.
    ///
    /// ```
    /// use http::Request;
    /// use routetrie::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.post("items/*", "create");
    ///
    /// let req = Request::post("http://localhost/items/9?dry=1").body(()).unwrap();
    /// let m = tree.route(&req).unwrap();
    ///
    /// assert_eq!(&"create", m.handler());
    /// assert_eq!(&["9"], m.params());
    /// assert_eq!("dry=1", m.query());
    /// ```
    pub fn route<'a, B>(&'a self, req: &'a Request<B>) -> Result<Match<'a, H>> {
        let target = (req.uri().path_and_query())
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.uri().path());

        self.collect(req.method(), target)
    }

    /// Methods with a handler at the node `raw` resolves to, deduplicated, in registration
    /// order. Empty if the path itself does not resolve.
    ///
    /// Use after a failed [Tree::collect] to distinguish `405 Method Not Allowed` (non-empty)
    /// from `404 Not Found` (empty).
    ///
    /// ```
    /// use http::Method;
    /// use routetrie::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.get("a", ()).post("a", ()).get("a", ());
    ///
    /// assert_eq!(vec![Method::GET, Method::POST], tree.allowed_methods("/a?x=1"));
    /// assert!(tree.allowed_methods("/b").is_empty());
    /// ```
    pub fn allowed_methods(&self, raw: &str) -> Vec<Method> {
        let (path, _) = split_query(raw);
        let mut out: Vec<Method> = vec![];

        if let Some(node) = self.resolve(path, |_, _| {}) {
            for (method, _) in node.handlers() {
                if !out.contains(method) {
                    out.push(method.clone());
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn clean(s: &str) -> String {
        s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
    }

    #[test]
    fn test_split_query() {
        assert_eq!(("", ""), split_query(""));
        assert_eq!(("", "q"), split_query("?q"));
        assert_eq!(("/a/b", "x=1"), split_query("/a/b?x=1"));
        assert_eq!(("/a", "x=1"), split_query("/a?x=1?y=2"));
        assert_eq!(("/a", ""), split_query("/a??y=2"));
    }

    #[quickcheck]
    fn test_query_is_second_component(path: String, query: String) -> TestResult {
        if path.contains('?') || query.contains('?') {
            return TestResult::discard();
        }

        let raw = format!("{}?{}", path, query);
        TestResult::from_bool(split_query(&raw) == (&path[..], &query[..]))
    }

    #[test]
    fn test_registration_order_policy() {
        let mut tree = Tree::new();
        tree.get("*", "wild").get("lit", "lit");

        let m = tree.collect(&Method::GET, "lit").unwrap();
        assert_eq!(&"wild", m.handler());
        assert_eq!(&["lit"], m.params());

        let mut tree = Tree::new();
        tree.get("lit", "lit").get("*", "wild");

        let m = tree.collect(&Method::GET, "lit").unwrap();
        assert_eq!(&"lit", m.handler());
        assert!(m.params().is_empty());
    }

    #[test]
    fn test_literal_first_policy() {
        let mut tree = Tree::new().with_policy(MatchPolicy::LiteralFirst);
        tree.get("*", "wild").get("lit", "lit");

        let m = tree.collect(&Method::GET, "lit").unwrap();
        assert_eq!(&"lit", m.handler());
        assert!(m.params().is_empty());

        let m = tree.collect(&Method::GET, "other").unwrap();
        assert_eq!(&"wild", m.handler());
        assert_eq!(&["other"], m.params());
    }

    #[test]
    fn test_no_backtracking() {
        let mut tree = Tree::new();
        tree.get("a/x", "ax").get("*/y", "wy");

        assert_eq!(&"ax", tree.collect(&Method::GET, "a/x").unwrap().handler());
        assert_eq!(&"wy", tree.collect(&Method::GET, "b/y").unwrap().handler());

        // "a" commits to the literal branch, which has no "y" child
        let err = tree.collect(&Method::GET, "a/y").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_root_middleware_leads_every_chain() {
        let mut tree = Tree::new();
        tree.add_middleware("", "global")
            .add_middleware("a", "a")
            .get("/", "root")
            .get("a", "ha");

        assert_eq!(vec![&"global", &"root"], tree.collect(&Method::GET, "").unwrap().chain());
        assert_eq!(
            vec![&"global", &"a", &"ha"],
            tree.collect(&Method::GET, "/a/").unwrap().chain()
        );
    }

    #[test]
    fn test_empty_path_needs_root_handler() {
        let mut tree = Tree::new();
        tree.get("a", ());

        assert!(tree.collect(&Method::GET, "").is_err());
        assert!(tree.collect(&Method::GET, "/?x=1").is_err());

        tree.get("/", ());
        let m = tree.collect(&Method::GET, "/?x=1").unwrap();
        assert_eq!("x=1", m.query());
        assert!(m.middlewares().is_empty());
    }

    #[test]
    fn test_not_found_error_carries_request() {
        let tree: Tree<()> = Tree::new();

        match tree.collect(&Method::DELETE, "/gone?q").unwrap_err() {
            Error::RouteNotFound { method, path } => {
                assert_eq!(Method::DELETE, method);
                assert_eq!("/gone", path);
            }
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_collect_into_reuses_buffers() {
        let mut tree = Tree::new();
        tree.add_middleware("*", "m").get("*/*", "h");

        let (mut chain, mut params) = (vec![], vec![]);
        for raw in &["a/b", "c/d"] {
            chain.clear();
            params.clear();

            tree.collect_into(&Method::GET, raw, &mut chain, &mut params).unwrap();
            assert_eq!(vec![&"m", &"h"], chain);
        }
        assert_eq!(vec!["c", "d"], params);
    }

    #[test]
    fn test_allowed_methods() {
        let mut tree = Tree::new();
        tree.get("a/*", ()).put("a/*", ());

        assert_eq!(vec![Method::GET, Method::PUT], tree.allowed_methods("a/1"));
        assert!(tree.allowed_methods("a").is_empty());
        assert!(tree.allowed_methods("a/1/2").is_empty());
    }

    #[quickcheck]
    fn test_wildcard_capture_order(segs: Vec<String>) -> TestResult {
        let segs: Vec<String> = segs.iter().map(|s| clean(s)).filter(|s| !s.is_empty()).collect();
        if segs.is_empty() {
            return TestResult::discard();
        }

        let pattern = vec!["*"; segs.len()].join("/");
        let mut tree = Tree::new();
        tree.get(&pattern, ());

        let raw = segs.join("/");
        let m = tree.collect(&Method::GET, &raw).unwrap();

        TestResult::from_bool(m.params() == &segs.iter().map(String::as_str).collect::<Vec<_>>()[..])
    }
}
