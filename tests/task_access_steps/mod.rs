//! Step definitions for task access control scenarios.

mod then;
pub mod world;
