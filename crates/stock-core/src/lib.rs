//! Core types and trait definitions for the supply inventory.
//!
//! No HTTP or database dependencies; every other crate builds on this one.

pub mod catalog;
pub mod error;
pub mod export;
pub mod history;
pub mod product;
pub mod store;
pub mod totals;

pub use error::{DomainError, Error, Result};
