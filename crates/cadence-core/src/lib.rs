//! Cadence Core Types and Definitions
//!
//! This crate provides the foundational types shared by every stage of the
//! Cadence pipeline:
//!
//! - **Identifiers**: String-interned element identifiers ([`identifier::Id`])
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Semantic**: Tag enums for shapes, styles, categories and layout algorithms
//!   ([`semantic`] module)

pub mod geometry;
pub mod identifier;
pub mod semantic;
