//! Publishing a finished tree to concurrent readers.
//!
//! Querying a [Tree] is read-only, so any number of threads may collect against the same
//! snapshot without locking. Hot reload builds a brand-new tree off to the side and swaps it
//! in atomically; lookups already in flight finish against the snapshot they loaded.
use super::tree::Tree;
use arc_swap::{ArcSwap, Guard};
use std::{fmt, sync::Arc};
use tracing::debug;

/// An atomically replaceable [Tree].
///
/// ```
/// use http::Method;
/// use routetrie::{SharedTree, Tree};
///
/// let mut v1 = Tree::new();
/// v1.get("version", "v1");
/// let shared = SharedTree::new(v1);
///
/// let before = shared.snapshot();
///
/// let mut v2 = Tree::new();
/// v2.get("version", "v2");
/// shared.replace(v2);
///
/// assert_eq!(&"v1", before.collect(&Method::GET, "version").unwrap().handler());
/// assert_eq!(&"v2", shared.load().collect(&Method::GET, "version").unwrap().handler());
/// ```
pub struct SharedTree<H> {
    current: ArcSwap<Tree<H>>,
}

impl<H> SharedTree<H> {
    /// Publish `tree`.
    pub fn new(tree: Tree<H>) -> Self {
        let current = ArcSwap::from_pointee(tree);
        Self { current }
    }

    /// Borrow the current snapshot. Cheap; intended for the per-request path.
    #[inline]
    pub fn load(&self) -> Guard<Arc<Tree<H>>> {
        self.current.load()
    }

    /// An owned handle to the current snapshot, for holding across await points or threads.
    #[inline]
    pub fn snapshot(&self) -> Arc<Tree<H>> {
        self.current.load_full()
    }

    /// Atomically publish `tree`, returning the snapshot it replaced.
    pub fn replace(&self, tree: Tree<H>) -> Arc<Tree<H>> {
        debug!(routes = tree.len(), "publishing route tree");
        self.current.swap(Arc::new(tree))
    }
}

impl<H> Default for SharedTree<H> {
    fn default() -> Self {
        Self::new(Tree::default())
    }
}

impl<H> From<Tree<H>> for SharedTree<H> {
    fn from(tree: Tree<H>) -> Self {
        Self::new(tree)
    }
}

impl<H: fmt::Debug> fmt::Debug for SharedTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (f.debug_struct("SharedTree"))
            .field("current", &**self.current.load())
            .finish()
    }
}
