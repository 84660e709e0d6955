//! Transform composition for rewire.
//!
//! This module handles:
//! - The `Transform` value and apply-time gating
//! - The `override` combinator that sequences transforms
//! - Adapting two-argument dev-server factories to the same pipeline

pub mod adapter;
pub mod compose;
pub mod transform;

pub use adapter::{override_dev_server, override_dev_server_from_process};
pub use compose::compose;
pub use transform::{Transform, stages};
