//! Capabilities that element types opt into to unlock extra collection operations.

pub mod is_zero;

#[doc(inline)]
pub use is_zero::IsZero;
