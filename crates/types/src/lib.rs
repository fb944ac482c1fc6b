//! Wire types for the warps toolkit.
//!
//! Warps, their actions and inputs, registry records and brands, plus the
//! identifier classifier used to turn raw tokens into hash/alias references.

pub mod action;
pub mod chain;
pub mod identifier;
pub mod registry;
pub mod warp;

pub use action::*;
pub use chain::*;
pub use identifier::*;
pub use registry::*;
pub use warp::*;
