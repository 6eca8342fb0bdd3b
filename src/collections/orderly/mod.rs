//! A module containing [`AnyOrderlyDict`], the thread-safe map that keeps keys in insertion order,
//! and [`Entry`], the key-value record it hands out.
//!
//! Use it where iteration order is observable, such as column headers or configuration that is
//! written back out, and prefer [`AnyDict`](crate::collections::dict::AnyDict) everywhere else.

mod any_orderly_dict;
mod entry;

pub use any_orderly_dict::*;
pub use entry::*;
