//! `cannareg-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod timestamps;

pub use error::{DomainError, DomainResult};
pub use timestamps::Timestamps;
