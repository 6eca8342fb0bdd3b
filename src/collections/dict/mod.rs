//! A module containing [`AnyDict`], the thread-safe unordered map.
//!
//! [`AnyDict`] is the registry type of the crate: anything that needs a shared key to value lookup
//! without caring about order, such as a pool of named connections, should reach for it. Owned
//! iteration is provided through [`std::collections::hash_map::IntoIter`].

mod any_dict;

pub use any_dict::*;
