//! # HybridRow Configuration Module
//!
//! This module centralizes the format constants of the row encoding. Constants
//! that depend on each other are co-located and their relationships are
//! enforced through compile-time assertions, so a change to one cannot
//! silently desynchronize another.
//!
//! ## Module Organization
//!
//! - [`constants`]: Numeric format constants with dependency documentation

pub mod constants;
pub use constants::*;
