//! Shared test utilities for cinedex integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs against seeded library databases
//! - `MovieRow` builder for describing library rows and their cached images

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
