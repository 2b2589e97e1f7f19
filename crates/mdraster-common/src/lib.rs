//! Common utilities for the mdraster renderer.
//!
//! This crate provides shared infrastructure used by all pipeline components:
//! - **Warning System** - deduplicated warnings for degraded rendering paths
//! - **Script Classification** - CJK detection used by line breaking and by
//!   the approximate font face

pub mod script;
pub mod warning;
