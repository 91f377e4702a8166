//! Decoding helpers for captured parameters and query strings.
//!
//! A [Match] only ever hands out raw text. These helpers percent-decode it on demand, so
//! callers that never look at a parameter never pay for decoding it.
use super::{collect::Match, error::Result};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

#[inline]
fn decode(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw).decode_utf8_lossy()
}

impl<'a, H> Match<'a, H> {
    /// The `i`th wildcard capture, percent-decoded.
    ///
    /// ```
    /// use http::Method;
    /// use routetrie::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.get("files/*", ());
    ///
    /// let m = tree.collect(&Method::GET, "/files/a%20b.txt").unwrap();
    /// assert_eq!("a b.txt", m.param(0).unwrap());
    /// assert_eq!(None, m.param(1));
    /// ```
    pub fn param(&self, i: usize) -> Option<Cow<'a, str>> {
        self.params.get(i).map(|&raw| decode(raw))
    }

    /// The first value of query parameter `name`, percent-decoded. Pairs without a `=` are
    /// ignored.
    ///
    /// ```
    /// use http::Method;
    /// use routetrie::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.get("search", ());
    ///
    /// let m = tree.collect(&Method::GET, "search?q=caf%C3%A9&page=2&page=3").unwrap();
    /// assert_eq!("café", m.query_param("q").unwrap());
    /// assert_eq!("2", m.query_param("page").unwrap());
    /// assert_eq!(None, m.query_param("missing"));
    /// ```
    pub fn query_param(&self, name: &str) -> Option<Cow<'a, str>> {
        let query: &'a str = self.query;

        (query.split('&'))
            .find_map(|kv| match kv.find('=')? {
                // "key=val": kv
                // "key": kv[..i]
                // "val": kv[i+1..]
                i if kv[..i] == *name => Some(&kv[i + 1..]),
                _ => None,
            })
            .map(decode)
    }

    /// Deserialize the whole query string into `T`.
    ///
    /// # Errors
    /// [Error::Query][crate::Error::Query] if the query string doesn't fit `T`.
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_urlencoded::from_str(self.query)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Tree};
    use http::Method;
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
    use quickcheck_macros::quickcheck;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Page {
        page: u32,
        sort: Option<String>,
    }

    fn tree() -> Tree<()> {
        let mut tree = Tree::new();
        tree.get("items/*", ());
        tree
    }

    #[test]
    fn test_query_as() {
        let tree = tree();

        let m = tree.collect(&Method::GET, "items/x?page=3&sort=name").unwrap();
        let page: Page = m.query_as().unwrap();
        assert_eq!(
            Page {
                page: 3,
                sort: Some("name".into()),
            },
            page
        );

        let m = tree.collect(&Method::GET, "items/x?page=1").unwrap();
        assert_eq!(None, m.query_as::<Page>().unwrap().sort);
    }

    #[test]
    fn test_query_as_error() {
        let tree = tree();
        let m = tree.collect(&Method::GET, "items/x?page=abc").unwrap();

        match m.query_as::<Page>() {
            Err(Error::Query(_)) => {}
            other => panic!("expected a query error, got {:?}", other),
        }
    }

    #[test]
    fn test_query_param_skips_bare_keys() {
        let tree = tree();
        let m = tree.collect(&Method::GET, "items/x?flag&flag=on").unwrap();

        assert_eq!("on", m.query_param("flag").unwrap());
    }

    #[quickcheck]
    fn test_param_decodes(x: String) -> bool {
        let tree = tree();
        let raw = format!("items/{}", utf8_percent_encode(&x, NON_ALPHANUMERIC));

        match tree.collect(&Method::GET, &raw) {
            Ok(m) => m.param(0).unwrap() == x,
            // the empty string encodes to an empty segment, which cannot match a wildcard
            Err(_) => x.is_empty(),
        }
    }

    #[quickcheck]
    fn test_query_param_decodes(x: String) -> bool {
        let tree = tree();
        let raw = format!("items/1?v={}", utf8_percent_encode(&x, NON_ALPHANUMERIC));
        let m = tree.collect(&Method::GET, &raw).unwrap();

        m.query_param("v").unwrap() == x
    }
}
