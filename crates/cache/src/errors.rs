//! Error handling for the cache
//!
//! Every failure inside the cache is an explicit [`CacheError`] carrying a
//! [`RecoveryHint`]. The public `save`/`load` contract collapses these into
//! `bool`/`Option`; the `try_*` operations expose them.

mod conversions;
mod display;
mod recovery;
mod types;

pub use types::*;
