//! Prelude module for jalali_field crate.
//!
//! Re-exports commonly used derive macros from derive_more.

pub use derive_more::{Deref, Display, From, Into};
