//! A segment trie that resolves an http method and request target into an ordered chain of
//! middleware terminated by exactly one handler.
//!
//! Routes are registered once, then queried. Patterns are `/`-separated segments, where a
//! segment of exactly `*` is a positional wildcard and anything else is a literal. Leading,
//! trailing and doubled slashes never matter.
//!
//! ```
//! use http::Method;
//! use routetrie::Tree;
//!
//! let mut tree = Tree::new();
//! tree.add_middleware("api", "cors");
//!
//! let users = tree.add_prefix("api/users");
//! users
//!     .add_middleware("", "auth")
//!     .get("", "list users")
//!     .get("*", "show user")
//!     .post("*/avatar", "upload avatar");
//!
//! let m = tree.collect(&Method::GET, "/api/users/42?expand=1").unwrap();
//! assert_eq!(vec![&"cors", &"auth", &"show user"], m.chain());
//! assert_eq!(&["42"], m.params());
//! assert_eq!("expand=1", m.query());
//!
//! assert!(tree.collect(&Method::DELETE, "/api/users/42").is_err());
//! ```
//!
//! # Matching
//! Lookups walk from the root, descending into the first child that accepts each segment.
//! By default "first" means first registered: a wildcard registered before a literal sibling
//! shadows that literal. Use [MatchPolicy::LiteralFirst] to always prefer exact literals.
//! There is no backtracking once a child has been chosen.
//!
//! Middleware is collected from every node passed through, root to leaf, each node's
//! middleware in registration order. The root is never descended into, so a strict
//! root-to-leaf walk would drop its middleware; instead, middleware registered at the empty
//! path is prepended to every chain, ahead of anything collected along the way.
//!
//! # Callables
//! What a tree stores is up to the application. Anything implementing [Handler] over some
//! context type can be run with [Match::run]; the tree itself never calls into it.
//!
//! # Concurrency
//! A finished tree is immutable and can be queried from any number of threads. To change
//! routes at runtime, build a new tree and publish it through a [SharedTree].
mod collect;
mod error;
mod handler;
mod query;
mod segment;
mod shared;
mod store;
mod tree;

pub use collect::{split_query, Match};
pub use error::{Error, Result};
pub use handler::Handler;
pub use segment::{Segment, WILDCARD};
pub use shared::SharedTree;
pub use store::Store;
pub use tree::{Entry, MatchPolicy, Node, Route, Tree};

#[doc(inline)]
pub use http::Method;
