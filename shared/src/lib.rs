//! Shared types for the pharmacy storefront
//!
//! Wire models, unified error codes/responses and small utilities used by
//! the API server and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
