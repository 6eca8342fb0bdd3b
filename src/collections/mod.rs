//! Thread-safe collection types.
//!
//! # Purpose
//! Every type here wraps its storage in a single read-write lock, so one instance can be shared
//! between threads (behind an `Arc` or a scoped borrow) and used through `&self` alone. Values are
//! copied in and out rather than borrowed, which keeps the lock from escaping a method call.
//!
//! # Method
//! The ordered algorithms are written once, on a lock-free core type owned by [`array`], and every
//! locking type delegates to it. A method takes its lock exactly once and never calls another
//! locking method on the same collection while holding it.
//!
//! | Type | Ordering | Lookup |
//! |-|-|-|
//! | [`AnyArray`](array::AnyArray) | Insertion order | By index |
//! | [`AnyDict`](dict::AnyDict) | None | By key, hashed |
//! | [`AnyOrderlyDict`](orderly::AnyOrderlyDict) | Insertion order | By key, linear scan |

#[cfg(feature = "array")]
pub mod array;
#[cfg(feature = "dict")]
pub mod dict;
#[cfg(feature = "orderly")]
pub mod orderly;
