//! Data model
//!
//! Inputs (feature identity, external references, deployment options)
//! and the resource specifications a plan is made of.

mod config;
mod env;
mod external;
mod identity;
mod resource;

// Re-exports
pub use config::*;
pub use env::*;
pub use external::*;
pub use identity::*;
pub use resource::*;
