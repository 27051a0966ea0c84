// Utility functions
pub mod error;
pub mod serde_helpers;
pub mod validation;

pub use error::*;
