//! Contract layer - types handed to the rest of the admin application
//!
//! Collaborators receive these values through the [`crate::AdminContext`]
//! rather than reading globals.

pub mod error;
pub mod model;

pub use error::BootstrapError;
pub use model::{ConnectionTarget, DatabaseDriver, ResolvedConfig, SiteUrls};
