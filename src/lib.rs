//! Generic, thread-safe containers with a wide set of convenience operations.
//!
//! # Purpose
//! This crate provides three containers for code that needs to share a collection between threads
//! without wrapping it in a lock at every call site:
//! - [`AnyArray`](collections::array::AnyArray), an ordered list.
//! - [`AnyDict`](collections::dict::AnyDict), an unordered map.
//! - [`AnyOrderlyDict`](collections::orderly::AnyOrderlyDict), a map that keeps insertion order.
//!
//! Alongside the usual accessors, each of them offers the small operations that otherwise get
//! rewritten over and over: deduplication, chunking, joining into a string, removing "empty"
//! values, set operations and so on.
//!
//! # Method
//! Each container owns a single [`parking_lot::RwLock`]. All methods take `&self`, acquire the lock
//! once and release it before returning. Nothing hands out a reference into the locked storage;
//! values are returned as clones, which is the price of being able to call any method from any
//! thread at any time.
//!
//! What counts as "empty" is decided at compile time by the [`IsZero`](traits::IsZero) trait,
//! rather than by inspecting values at runtime.
//!
//! # Error Handling
//! Accessors that can reasonably miss, such as `get`, return an [`Option`]. Methods that address an
//! element by index come in two flavours: one that panics with the message of a typed error, for
//! callers that have already checked their index, and a `try_` variant that returns the error in a
//! [`Result`]. The errors themselves live in [`error`] and implement [`Error`](std::error::Error).
//!
//! # Logging
//! The crate logs through the [`log`] facade and never installs a logger. Rejected arguments are
//! reported at `warn`, ignored arguments at `debug` and bulk removals at `trace`.
//!
//! # Features
//! - `array`, `dict` and `orderly` enable the respective containers. All are on by default through
//!   `collections-all`.
//! - `serde` implements `Serialize` and `Deserialize` for every container. An
//!   [`AnyOrderlyDict`](collections::orderly::AnyOrderlyDict) keeps the order of the document it
//!   was read from.

#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;
pub mod traits;

pub(crate) mod util;

pub use util::error;
