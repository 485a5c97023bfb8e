//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - catalog rows and tables (`StarRecord`, `Dataset`)
//! - selection primitives (`Mask`, `MembershipTag`, `Ellipse`)
//! - search configuration (`SearchRange`, `SearchGrid`)

pub mod types;

pub use types::*;
