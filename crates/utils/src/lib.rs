//! Shared utilities for keepsake
//!
//! Filesystem helpers (XDG directory resolution, atomic writes) and the
//! tracing subscriber used by host applications.

pub mod atomic_file;
pub mod tracing;
pub mod xdg;

pub use atomic_file::*;
pub use xdg::*;
