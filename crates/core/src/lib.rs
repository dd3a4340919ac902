//! Core errors and constants shared across the `keepsake` workspace.
//!
//! - **`errors`**: the workspace-wide `Error` enum and `Result` alias used by
//!   the utility crate and converted into cache errors at the cache boundary.
//! - **`constants`**: well-known storage names and environment variable names.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result},
};
