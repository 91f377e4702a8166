//! The callable seam between the tree and an application.
//!
//! The tree never invokes what it stores. Applications choose a request context `Cx` and an
//! error type `E`; anything implementing [Handler] over them can be run as a chain.
use super::collect::Match;

/// A middleware or handler over request context `Cx`, failing with `E`.
///
/// Implemented for every `Fn(&mut Cx) -> Result<(), E>`, which covers `fn` pointers,
/// closures and boxed closures.
pub trait Handler<Cx, E> {
    fn handle(&self, cx: &mut Cx) -> Result<(), E>;
}

impl<Cx, E, F> Handler<Cx, E> for F
where F: Fn(&mut Cx) -> Result<(), E>
{
    #[inline]
    fn handle(&self, cx: &mut Cx) -> Result<(), E> {
        self(cx)
    }
}

impl<'a, H> Match<'a, H> {
    /// Run the chain against `cx` in order, stopping at the first failure.
    ///
    /// ```
    /// use http::Method;
    /// use routetrie::Tree;
    ///
    /// type Step = fn(&mut Vec<&'static str>) -> Result<(), String>;
    ///
    /// let mut tree: Tree<Step> = Tree::new();
    /// tree.add_middleware("a", |cx| Ok(cx.push("mw")))
    ///     .get("a", |cx| Ok(cx.push("handler")));
    ///
    /// let mut cx: Vec<&str> = vec![];
    /// tree.collect(&Method::GET, "a").unwrap().run(&mut cx).unwrap();
    /// assert_eq!(vec!["mw", "handler"], cx);
    /// ```
    pub fn run<Cx, E>(&self, cx: &mut Cx) -> Result<(), E>
    where H: Handler<Cx, E> {
        for &link in self.chain() {
            link.handle(cx)?;
        }

        Ok(())
    }
}
